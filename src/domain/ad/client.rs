//! Catalog sub-client: categories, listings, ads.

use crate::authenticity::{extract_metadata, WithMetadata};
use crate::client::DefiadsClient;
use crate::domain::ad::{ads_from_value, list_items_from_value, Ad, ListItem};
use crate::domain::{accept, shaped};
use crate::network::{CATEGORIES_CACHE_KEY, LIST_CACHE_PREFIX};
use crate::rpc::Method;
use crate::shared::DefiadId;
use serde_json::Value;

/// Sub-client for reading the catalog.
pub struct Ads<'a> {
    pub(crate) client: &'a DefiadsClient,
}

impl<'a> Ads<'a> {
    /// Known categories.
    pub async fn categories(&self) -> Option<Vec<String>> {
        categories(self.client).await
    }

    /// `categories` through the listing cache, coalescing concurrent calls.
    pub async fn categories_cached(&self) -> Option<Vec<String>> {
        let client = self.client;
        client
            .category_flights
            .run(CATEGORIES_CACHE_KEY, move || async move {
                client
                    .list_cache
                    .get_or_fetch(CATEGORIES_CACHE_KEY, move || async move {
                        categories(client).await
                    })
                    .await
            })
            .await
    }

    /// List the ads of one or more categories.
    pub async fn list(&self, categories: &[&str]) -> Option<Vec<ListItem>> {
        list(self.client, categories.iter().map(|c| Value::from(*c)).collect()).await
    }

    /// Read full ads by id.
    pub async fn read(&self, ids: &[DefiadId]) -> Option<Vec<Ad>> {
        let params = ids.iter().map(|id| Value::from(id.as_str())).collect();
        read(self.client, params).await
    }

    /// Read a single ad by id.
    pub async fn read_one(&self, id: &DefiadId) -> Option<Ad> {
        read(self.client, vec![Value::from(id.as_str())])
            .await?
            .into_iter()
            .next()
    }

    /// Read a single ad and run it through metadata extraction.
    pub async fn read_verified(&self, id: &DefiadId) -> Option<WithMetadata<Ad>> {
        self.read_one(id).await.map(extract_metadata)
    }

    /// List one category through the listing cache.
    ///
    /// Concurrent calls for the same category share one request; a fetched
    /// listing is served from the store until the cache TTL elapses.
    pub async fn list_cached(&self, category: &str) -> Option<Vec<ListItem>> {
        let client = self.client;
        let key = format!("{}{}", LIST_CACHE_PREFIX, category);
        let category = category.to_string();
        let flight_key = key.clone();

        client
            .list_flights
            .run(&flight_key, move || async move {
                client
                    .list_cache
                    .get_or_fetch(&key, move || async move {
                        list(client, vec![Value::from(category)]).await
                    })
                    .await
            })
            .await
    }
}

async fn categories(client: &DefiadsClient) -> Option<Vec<String>> {
    let value = client.rpc.call(Method::Categories, Vec::new()).await?;
    accept(Method::Categories, shaped(value, "array of strings"))
}

async fn list(client: &DefiadsClient, params: Vec<Value>) -> Option<Vec<ListItem>> {
    let value = client.rpc.call(Method::List, params).await?;
    accept(Method::List, list_items_from_value(value))
}

async fn read(client: &DefiadsClient, params: Vec<Value>) -> Option<Vec<Ad>> {
    let value = client.rpc.call(Method::Read, params).await?;
    accept(Method::Read, ads_from_value(value))
}
