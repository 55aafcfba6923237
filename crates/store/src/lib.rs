//! In-memory backing store for creatives, ad copy and created ads.

pub mod store;

pub use store::InMemoryAdStore;
