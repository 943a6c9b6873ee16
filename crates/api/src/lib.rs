//! Wire model and HTTP client for the docshelf document API.
//!
//! The remote API is a thin RPC façade: each operation is one logical call
//! with no client-side retry. [`DocumentsApi`] is the seam the tree model
//! depends on; [`HttpDocumentsClient`] is its production implementation.

pub mod client;
pub mod models;

pub use client::{DocumentsApi, HttpDocumentsClient};
pub use models::{
    DocMetadata, Document, DocumentHierarchy, DocumentId, DocumentKind, FileUpload, GraphDocument,
    GraphMetadata, Parent, RelationshipGraph, SearchHit, SearchResult, UploadOutcome,
};
