// Service exports
pub mod cache;
pub mod firestore;
pub mod store;

pub use cache::{CacheError, CacheKey, CacheManager};
pub use firestore::{FirestoreClient, FirestoreCollections};
pub use store::{DocumentStore, InMemoryStore, SeedData, StoreError};
