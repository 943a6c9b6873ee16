//! Conversion from the wire-format relationship snapshot to layout input.

use docshelf_api::RelationshipGraph;

use crate::layout::RelationNode;

/// Flatten a relationship snapshot into layout input.
///
/// Documents without a hierarchy analysis are skipped, matching the graph
/// view. Nodes are ordered by document id so the cycle-breaking walk (and
/// therefore the whole layout) is reproducible for identical snapshots.
#[must_use]
pub fn relation_nodes(graph: &RelationshipGraph) -> Vec<RelationNode> {
    let mut ids: Vec<&String> = graph.documents.keys().collect();
    ids.sort();

    ids.into_iter()
        .filter_map(|id| {
            let document = &graph.documents[id];
            let hierarchy = document.hierarchy.as_ref()?;

            let label = if hierarchy.title.is_empty() {
                document
                    .metadata
                    .file_name
                    .clone()
                    .unwrap_or_else(|| id.clone())
            } else {
                hierarchy.title.clone()
            };

            let related = hierarchy
                .relationships
                .iter()
                .filter(|rel| !hierarchy.children.contains(rel))
                .cloned()
                .collect();

            Some(RelationNode {
                id: id.clone(),
                label,
                children: hierarchy.children.clone(),
                related,
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use docshelf_api::{DocumentHierarchy, GraphDocument, GraphMetadata};
    use std::collections::HashMap;

    fn graph_doc(id: &str, children: &[&str], relationships: &[&str]) -> GraphDocument {
        GraphDocument {
            metadata: GraphMetadata {
                doc_id: id.to_string(),
                file_name: Some(format!("{id}.md")),
            },
            hierarchy: Some(DocumentHierarchy {
                title: format!("Title {id}"),
                children: children.iter().map(ToString::to_string).collect(),
                relationships: relationships.iter().map(ToString::to_string).collect(),
                ..DocumentHierarchy::default()
            }),
        }
    }

    #[test]
    fn test_nodes_are_sorted_by_id_and_unanalyzed_documents_skipped() {
        let mut documents = HashMap::new();
        documents.insert("b".to_string(), graph_doc("b", &[], &[]));
        documents.insert("a".to_string(), graph_doc("a", &["b"], &[]));
        documents.insert(
            "c".to_string(),
            GraphDocument {
                metadata: GraphMetadata {
                    doc_id: "c".to_string(),
                    file_name: None,
                },
                hierarchy: None,
            },
        );

        let nodes = relation_nodes(&RelationshipGraph { documents });

        let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_related_excludes_existing_child_edges() {
        let mut documents = HashMap::new();
        documents.insert("a".to_string(), graph_doc("a", &["b"], &["b", "c"]));
        documents.insert("b".to_string(), graph_doc("b", &[], &[]));
        documents.insert("c".to_string(), graph_doc("c", &[], &[]));

        let nodes = relation_nodes(&RelationshipGraph { documents });
        let a = nodes.iter().find(|n| n.id == "a").unwrap();

        assert_eq!(a.children, vec!["b"]);
        assert_eq!(a.related, vec!["c"]);
    }

    #[test]
    fn test_label_falls_back_to_file_name() {
        let mut doc = graph_doc("a", &[], &[]);
        if let Some(h) = doc.hierarchy.as_mut() {
            h.title = String::new();
        }
        let mut documents = HashMap::new();
        documents.insert("a".to_string(), doc);

        let nodes = relation_nodes(&RelationshipGraph { documents });
        assert_eq!(nodes[0].label, "a.md");
    }
}
