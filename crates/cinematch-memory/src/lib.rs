//! Vector similarity search: the store abstraction and its backends.

pub mod in_memory_store;
pub mod supabase;
pub mod vector_store;

pub use in_memory_store::InMemoryVectorStore;
pub use supabase::SupabaseStore;
pub use vector_store::{BoxFuture, MatchQuery, MatchedDocument, VectorStore, VectorStoreError};
