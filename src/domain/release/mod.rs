//! Release domain: signed web-app release announcements.

pub mod client;

pub use crate::authenticity::release::ReleaseCandidate;
