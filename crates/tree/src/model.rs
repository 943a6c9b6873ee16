//! Tree model and mutation protocol.
//!
//! [`DocumentTree`] is a pure model object: presentation asks it for the
//! children of a node and it owns the fetch/cache orchestration. Folders are
//! fetched lazily on first expansion; every successful mutation invalidates
//! the documents namespace so the next read refetches. On failure nothing is
//! applied: the last-known-good cache keeps serving and the error is
//! returned for the caller to surface.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use bytes::Bytes;
use docshelf_api::{
    Document, DocumentId, DocumentsApi, FileUpload, Parent, RelationshipGraph, SearchResult,
    UploadOutcome,
};
use docshelf_common::AppResult;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheKey, Namespace, QueryCache};

/// In-memory model of the document hierarchy.
///
/// Holds an arena of last-seen nodes indexed by id, the expansion state of
/// the tree view, and the query cache. All methods take `&self`; the model
/// is safe to share behind an `Arc`.
pub struct DocumentTree {
    api: Arc<dyn DocumentsApi>,
    cache: QueryCache,
    nodes: RwLock<HashMap<DocumentId, Document>>,
    expanded: RwLock<HashSet<DocumentId>>,
}

impl DocumentTree {
    /// Create a tree model over an API client with a fresh cache.
    #[must_use]
    pub fn new(api: Arc<dyn DocumentsApi>) -> Self {
        Self::with_cache(api, QueryCache::new())
    }

    /// Create a tree model over an API client and an existing cache.
    #[must_use]
    pub fn with_cache(api: Arc<dyn DocumentsApi>, cache: QueryCache) -> Self {
        Self {
            api,
            cache,
            nodes: RwLock::new(HashMap::new()),
            expanded: RwLock::new(HashSet::new()),
        }
    }

    /// The query cache backing this model.
    #[must_use]
    pub const fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Last-seen node for an id, if any listing has returned it.
    pub async fn node(&self, id: DocumentId) -> Option<Document> {
        self.nodes.read().await.get(&id).cloned()
    }

    /// Whether a folder is currently expanded.
    pub async fn is_expanded(&self, id: DocumentId) -> bool {
        self.expanded.read().await.contains(&id)
    }

    /// Children of a parent, read through the cache.
    ///
    /// A warm cache answers without a request; a miss issues exactly one
    /// fetch and stores the result.
    pub async fn children(&self, parent: Parent) -> AppResult<Vec<Document>> {
        let key = CacheKey::Children(parent);

        if let Some(documents) = self.cache.get::<Vec<Document>>(&key).await? {
            return Ok(documents);
        }

        let documents = self.api.list_children(parent).await?;
        self.cache.put(key, &documents).await?;
        self.index(&documents).await;
        Ok(documents)
    }

    /// Expand a folder, fetching its children lazily.
    ///
    /// Expanding a node known to be a file is a no-op. A failed fetch rolls
    /// the expansion flag back so the tree state is unchanged.
    pub async fn expand(&self, id: DocumentId) -> AppResult<Vec<Document>> {
        if let Some(node) = self.node(id).await
            && !node.is_folder()
        {
            debug!(document_id = id, "Ignoring expand of a file node");
            return Ok(Vec::new());
        }

        self.expanded.write().await.insert(id);

        match self.children(Parent::Folder(id)).await {
            Ok(documents) => Ok(documents),
            Err(e) => {
                self.expanded.write().await.remove(&id);
                Err(e)
            }
        }
    }

    /// Collapse a folder. Issues no request.
    pub async fn collapse(&self, id: DocumentId) {
        self.expanded.write().await.remove(&id);
    }

    /// Toggle a folder's expansion state.
    ///
    /// Returns the children on expansion, `None` on collapse. Toggling twice
    /// is a round trip back to the prior state; re-expansion reuses the
    /// cache unless a mutation invalidated it.
    pub async fn toggle(&self, id: DocumentId) -> AppResult<Option<Vec<Document>>> {
        if self.is_expanded(id).await {
            self.collapse(id).await;
            Ok(None)
        } else {
            Ok(Some(self.expand(id).await?))
        }
    }

    /// Create a folder and invalidate the documents namespace.
    pub async fn create_folder(&self, name: &str, parent: Parent) -> AppResult<Document> {
        let document = self.api.create_folder(name, parent).await?;
        self.after_mutation(&document).await;
        Ok(document)
    }

    /// Upload one file and invalidate the documents namespace.
    pub async fn upload(&self, upload: FileUpload, parent: Parent) -> AppResult<Document> {
        let document = self.api.upload(upload, parent).await?;
        self.after_mutation(&document).await;
        Ok(document)
    }

    /// Upload a batch of files concurrently.
    ///
    /// The namespace is invalidated once if at least one upload succeeded;
    /// failed uploads leave no partial state. Outcomes are keyed by file
    /// name, not position, so out-of-order completion is harmless.
    pub async fn upload_many(
        &self,
        uploads: Vec<FileUpload>,
        parent: Parent,
    ) -> Vec<UploadOutcome> {
        let outcomes = self.api.upload_many(uploads, parent).await;

        let created: Vec<Document> = outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok().cloned())
            .collect();

        if !created.is_empty() {
            self.cache.invalidate_namespace(Namespace::Documents).await;
            self.index(&created).await;
        }
        outcomes
    }

    /// Move a document under a new parent; [`Parent::Root`] sends it to the
    /// top level.
    ///
    /// Moving a folder into itself or a descendant is rejected by the
    /// server, which is authoritative; the rejection is surfaced as-is.
    pub async fn move_document(&self, id: DocumentId, new_parent: Parent) -> AppResult<Document> {
        let document = self.api.move_document(id, new_parent).await?;
        self.after_mutation(&document).await;
        Ok(document)
    }

    /// Delete a document.
    ///
    /// Deleting a folder that still has documents fails with the distinct
    /// [`docshelf_common::AppError::FolderNotEmpty`] conflict and leaves the
    /// tree untouched.
    pub async fn delete_document(&self, id: DocumentId) -> AppResult<()> {
        self.api.delete_document(id).await?;

        self.cache.invalidate_namespace(Namespace::Documents).await;
        self.nodes.write().await.remove(&id);
        self.expanded.write().await.remove(&id);
        Ok(())
    }

    /// Replace a document's content and invalidate both the documents and
    /// content namespaces.
    pub async fn update_content(&self, id: DocumentId, content: &str) -> AppResult<Document> {
        let document = self.api.update_content(id, content).await?;

        self.cache.invalidate_namespace(Namespace::Documents).await;
        self.cache.invalidate_namespace(Namespace::Content).await;
        self.index(std::slice::from_ref(&document)).await;
        Ok(document)
    }

    /// Raw text content of a document, read through the cache.
    pub async fn content(&self, id: DocumentId) -> AppResult<String> {
        let key = CacheKey::Content(id);

        if let Some(content) = self.cache.get::<String>(&key).await? {
            return Ok(content);
        }

        let content = self.api.get_content(id).await?;
        self.cache.put(key, &content).await?;
        Ok(content)
    }

    /// Raw bytes of a file. Not cached.
    pub async fn download(&self, id: DocumentId) -> AppResult<Bytes> {
        self.api.download(id).await
    }

    /// Whole-corpus relationship snapshot, read through the cache.
    pub async fn graph(&self) -> AppResult<RelationshipGraph> {
        let key = CacheKey::Graph;

        if let Some(graph) = self.cache.get::<RelationshipGraph>(&key).await? {
            return Ok(graph);
        }

        let graph = self.api.get_graph().await?;
        self.cache.put(key, &graph).await?;
        Ok(graph)
    }

    /// Search the corpus. Results are query-dependent and not cached.
    pub async fn search(&self, query: &str) -> AppResult<SearchResult> {
        self.api.search(query).await
    }

    async fn after_mutation(&self, document: &Document) {
        self.cache.invalidate_namespace(Namespace::Documents).await;
        self.index(std::slice::from_ref(document)).await;
    }

    async fn index(&self, documents: &[Document]) {
        let mut nodes = self.nodes.write().await;
        for document in documents {
            nodes.insert(document.id, document.clone());
        }
    }
}
