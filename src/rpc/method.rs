//! The closed set of remote methods.

use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

/// Version of the command reference returned by [`help`].
pub const HELP_VERSION: &str = "0.0.1";

/// A remote method exposed by the defiads node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Categories,
    List,
    Read,
    Deposit,
    Balance,
    Prepare,
    ListPrepared,
    ReadPrepared,
    Withdraw,
    Fund,
}

impl Method {
    pub const ALL: [Method; 10] = [
        Method::Categories,
        Method::List,
        Method::Read,
        Method::Deposit,
        Method::Balance,
        Method::Prepare,
        Method::ListPrepared,
        Method::ReadPrepared,
        Method::Withdraw,
        Method::Fund,
    ];

    /// Wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Categories => "categories",
            Method::List => "list",
            Method::Read => "read",
            Method::Deposit => "deposit",
            Method::Balance => "balance",
            Method::Prepare => "prepare",
            Method::ListPrepared => "list_prepared",
            Method::ReadPrepared => "read_prepared",
            Method::Withdraw => "withdraw",
            Method::Fund => "fund",
        }
    }

    /// Argument synopsis, not counting the API key.
    pub fn args(&self) -> &'static str {
        match self {
            Method::Categories | Method::Deposit | Method::Balance | Method::ListPrepared => "",
            Method::List => "category: string",
            Method::Read | Method::ReadPrepared => "defiadId: string",
            Method::Prepare => "category: string, abstract: string, content: string",
            Method::Withdraw => "destAddress: BitcoinAddress, feeRate: number, amtSat?: number",
            Method::Fund => "defiadId: DefiadId, amtSat: number, term: number, feeRate: number",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Method::Categories => "Gets list of known categories",
            Method::List => "List ads within a category",
            Method::Read => "Read full contents of an ad",
            Method::Deposit => "Get new deposit address",
            Method::Balance => "Get wallet balance",
            Method::Prepare => "Prepare an ad",
            Method::ListPrepared => "List prepared ads",
            Method::ReadPrepared => "Read a prepared ad",
            Method::Withdraw => "Withdraw Bitcoin from the wallet",
            Method::Fund => "Fund prepared ad and publish it to the network",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| format!("unknown method: {}", s))
    }
}

/// Static command reference for every method, plus `help` itself.
pub fn help() -> Value {
    let mut commands = Map::new();
    for method in Method::ALL {
        commands.insert(
            method.as_str().to_string(),
            json!({ "args": method.args(), "description": method.description() }),
        );
    }
    commands.insert(
        "help".to_string(),
        json!({ "args": "", "description": "Show help information" }),
    );
    json!({ "version": HELP_VERSION, "commands": commands })
}
