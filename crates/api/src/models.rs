//! Wire types for the document API.

use std::collections::HashMap;
use std::fmt;

use docshelf_common::AppResult;
use serde::{Deserialize, Serialize};

/// Server-assigned document identifier.
pub type DocumentId = i64;

/// Parent sentinel for listing, upload, and move targets.
///
/// The wire format uses the literal path segment `root` for the top level,
/// so "no parent" is a first-class value rather than a missing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parent {
    /// Top level of the hierarchy.
    Root,
    /// A folder document.
    Folder(DocumentId),
}

impl Parent {
    /// The path segment this parent maps to (`root` or the folder id).
    #[must_use]
    pub fn as_path_segment(&self) -> String {
        match self {
            Self::Root => "root".to_string(),
            Self::Folder(id) => id.to_string(),
        }
    }

    /// The folder id, or `None` for the root.
    #[must_use]
    pub const fn id(&self) -> Option<DocumentId> {
        match self {
            Self::Root => None,
            Self::Folder(id) => Some(*id),
        }
    }
}

impl From<Option<DocumentId>> for Parent {
    fn from(id: Option<DocumentId>) -> Self {
        id.map_or(Self::Root, Self::Folder)
    }
}

impl fmt::Display for Parent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_path_segment())
    }
}

/// Whether a document is a file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Leaf document with content and a MIME type.
    File,
    /// Container whose children are fetchable.
    Folder,
}

/// Document metadata block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocMetadata {
    /// File or folder.
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    /// MIME type, present only for files; drives viewer dispatch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Name the file had when it was uploaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
}

/// A file or folder node in the document hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Server-assigned identifier.
    pub id: DocumentId,
    /// Display label (filename for files, name for folders).
    pub content: String,
    /// Owning folder; `None` means root-level.
    #[serde(default)]
    pub parent_id: Option<DocumentId>,
    /// Kind and MIME metadata.
    pub doc_metadata: DocMetadata,
    /// Download URL, resolvable only for files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl Document {
    /// Returns whether this document is a folder.
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.doc_metadata.kind == DocumentKind::Folder
    }

    /// The parent sentinel this document lives under.
    #[must_use]
    pub fn parent(&self) -> Parent {
        Parent::from(self.parent_id)
    }
}

/// A file queued for upload.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// File name sent as the multipart filename.
    pub name: String,
    /// MIME type; the server falls back to `application/octet-stream`.
    pub content_type: Option<String>,
    /// Raw file bytes.
    pub data: Vec<u8>,
}

/// Result of one upload within a batch.
///
/// Outcomes are keyed by file name so completion order cannot misattribute
/// a result when uploads finish out of order.
#[derive(Debug)]
pub struct UploadOutcome {
    /// Name of the uploaded file.
    pub name: String,
    /// The created document, or the error that aborted this upload.
    pub result: AppResult<Document>,
}

/// Whole-corpus relationship snapshot for the knowledge-graph view.
///
/// This is a separate, coarser graph than the filesystem tree: it may
/// contain cycles and is laid out defensively by `docshelf-graph`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationshipGraph {
    /// Analyzed documents keyed by document id.
    #[serde(default)]
    pub documents: HashMap<String, GraphDocument>,
}

/// One analyzed document in the relationship graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Identity of the analyzed document.
    pub metadata: GraphMetadata,
    /// Hierarchy analysis; documents without one are skipped by the view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<DocumentHierarchy>,
}

/// Identity block of a graph document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphMetadata {
    /// Document id.
    pub doc_id: String,
    /// Original file name, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// Hierarchy analysis attached to a graph document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentHierarchy {
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Brief summary.
    #[serde(default)]
    pub summary: String,
    /// Parent document id, `None` for roots.
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Child document ids.
    #[serde(default)]
    pub children: Vec<String>,
    /// Depth hint assigned by the analyzer.
    #[serde(default)]
    pub level: i64,
    /// Related (non-parent/child) document ids.
    #[serde(default)]
    pub relationships: Vec<String>,
    /// Discriminator for the relationship edges (`child`, `related`, ...).
    #[serde(default)]
    pub relationship_type: String,
    /// Main concepts extracted from the document.
    #[serde(default)]
    pub key_concepts: Vec<String>,
}

/// Corpus search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Synthesized answer to the query.
    pub answer: String,
    /// Documents the answer was drawn from.
    #[serde(default)]
    pub documents: Vec<SearchHit>,
}

/// One document cited by a search answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Cited document id.
    pub id: DocumentId,
    /// Parent folder of the cited document.
    #[serde(default)]
    pub parent: Option<DocumentId>,
    /// Excerpt that matched the query.
    pub subcontent: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parent_path_segments() {
        assert_eq!(Parent::Root.as_path_segment(), "root");
        assert_eq!(Parent::Folder(42).as_path_segment(), "42");
        assert_eq!(Parent::from(None).id(), None);
        assert_eq!(Parent::from(Some(7)), Parent::Folder(7));
    }

    #[test]
    fn test_document_deserializes_folder() {
        let doc: Document = serde_json::from_value(json!({
            "id": 3,
            "content": "Reports",
            "parent_id": null,
            "doc_metadata": { "type": "folder" }
        }))
        .unwrap();

        assert!(doc.is_folder());
        assert_eq!(doc.parent(), Parent::Root);
        assert!(doc.doc_metadata.mime_type.is_none());
        assert!(doc.download_url.is_none());
    }

    #[test]
    fn test_document_deserializes_file() {
        let doc: Document = serde_json::from_value(json!({
            "id": 9,
            "content": "notes.txt",
            "parent_id": 3,
            "doc_metadata": {
                "type": "file",
                "mime_type": "text/plain",
                "original_filename": "notes.txt"
            },
            "download_url": "/documents/download/9"
        }))
        .unwrap();

        assert!(!doc.is_folder());
        assert_eq!(doc.parent(), Parent::Folder(3));
        assert_eq!(doc.doc_metadata.mime_type.as_deref(), Some("text/plain"));
    }

    #[test]
    fn test_relationship_graph_deserializes_analyzer_output() {
        let graph: RelationshipGraph = serde_json::from_value(json!({
            "documents": {
                "doc_a": {
                    "metadata": { "doc_id": "doc_a", "file_name": "a.md" },
                    "hierarchy": {
                        "title": "Intro",
                        "summary": "overview",
                        "parent_id": null,
                        "children": ["doc_b"],
                        "level": 0,
                        "relationships": ["doc_c"],
                        "relationship_type": "root",
                        "key_concepts": ["overview"]
                    }
                },
                "doc_b": {
                    "metadata": { "doc_id": "doc_b" }
                }
            }
        }))
        .unwrap();

        let a = &graph.documents["doc_a"];
        let hierarchy = a.hierarchy.as_ref().unwrap();
        assert_eq!(hierarchy.children, vec!["doc_b"]);
        assert_eq!(hierarchy.relationships, vec!["doc_c"]);
        assert!(graph.documents["doc_b"].hierarchy.is_none());
    }

    #[test]
    fn test_search_result_deserializes() {
        let result: SearchResult = serde_json::from_value(json!({
            "answer": "Quarterly revenue grew 12%.",
            "documents": [
                { "id": 5, "parent": 2, "subcontent": "revenue grew 12%" },
                { "id": 6, "parent": null, "subcontent": "Q3 summary" }
            ]
        }))
        .unwrap();

        assert_eq!(result.documents.len(), 2);
        assert_eq!(result.documents[0].parent, Some(2));
        assert_eq!(result.documents[1].parent, None);
    }
}
