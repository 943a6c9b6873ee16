//! Document tree model and query cache for docshelf.
//!
//! The tree model presents a navigable, lazily expanded hierarchy backed by
//! the document API and an in-memory query cache. All mutation follows the
//! invalidate-then-refetch protocol: no optimistic patching, the cache is
//! the single source of last-known-good state.

pub mod cache;
pub mod model;

pub use cache::{CacheKey, Namespace, QueryCache};
pub use model::DocumentTree;
