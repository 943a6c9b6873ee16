//! Viewer dispatch for documents.
//!
//! A pure lookup from document kind and MIME type to a rendering strategy.
//! Anything unrecognized falls back to the generic viewer; dispatch never
//! fails.

use docshelf_api::{Document, DocumentKind};

/// Rendering strategy for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerStrategy {
    /// Editable plain-text view.
    PlainTextEditor,
    /// Page-oriented document view.
    PaginatedDocument,
    /// Folder contents summary.
    FolderSummary,
    /// Download-only fallback for unknown formats.
    GenericFallback,
}

/// MIME types rendered as editable text besides the `text/*` family.
const TEXTUAL_MIME_TYPES: &[&str] = &[
    "application/json",
    "application/xml",
    "application/x-yaml",
    "application/toml",
];

/// Select the rendering strategy for a document kind and MIME type.
#[must_use]
pub fn select(kind: DocumentKind, mime_type: Option<&str>) -> ViewerStrategy {
    if kind == DocumentKind::Folder {
        return ViewerStrategy::FolderSummary;
    }

    match mime_type {
        Some(mime) if is_textual(mime) => ViewerStrategy::PlainTextEditor,
        Some("application/pdf") => ViewerStrategy::PaginatedDocument,
        _ => ViewerStrategy::GenericFallback,
    }
}

/// Select the rendering strategy for a document.
#[must_use]
pub fn select_for(document: &Document) -> ViewerStrategy {
    select(
        document.doc_metadata.kind,
        document.doc_metadata.mime_type.as_deref(),
    )
}

fn is_textual(mime: &str) -> bool {
    mime.starts_with("text/") || TEXTUAL_MIME_TYPES.contains(&mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folders_get_the_summary_view() {
        assert_eq!(
            select(DocumentKind::Folder, None),
            ViewerStrategy::FolderSummary
        );
        // Kind wins even if a folder somehow carries a MIME type.
        assert_eq!(
            select(DocumentKind::Folder, Some("text/plain")),
            ViewerStrategy::FolderSummary
        );
    }

    #[test]
    fn test_text_family_opens_the_editor() {
        assert_eq!(
            select(DocumentKind::File, Some("text/plain")),
            ViewerStrategy::PlainTextEditor
        );
        assert_eq!(
            select(DocumentKind::File, Some("text/markdown")),
            ViewerStrategy::PlainTextEditor
        );
        assert_eq!(
            select(DocumentKind::File, Some("application/json")),
            ViewerStrategy::PlainTextEditor
        );
    }

    #[test]
    fn test_pdf_is_paginated() {
        assert_eq!(
            select(DocumentKind::File, Some("application/pdf")),
            ViewerStrategy::PaginatedDocument
        );
    }

    #[test]
    fn test_unknown_or_missing_mime_falls_back() {
        assert_eq!(
            select(DocumentKind::File, Some("application/octet-stream")),
            ViewerStrategy::GenericFallback
        );
        assert_eq!(
            select(DocumentKind::File, None),
            ViewerStrategy::GenericFallback
        );
    }
}
