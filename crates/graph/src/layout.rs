//! Tree layout over an arbitrary directed graph.
//!
//! The cycle-breaking policy is deliberate and documented: walking the
//! nodes in insertion order, the first edge that would close a cycle is
//! dropped. The cut is arbitrary but reproducible for a fixed input order.

use std::collections::HashMap;

use serde::Serialize;

/// One input node with its outgoing relationship edges.
#[derive(Debug, Clone)]
pub struct RelationNode {
    /// Node identifier.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Explicit child edges.
    pub children: Vec<String>,
    /// "Related" edges, laid out like children when not already counted as
    /// a parent/child edge.
    pub related: Vec<String>,
}

/// Spacing applied per depth level.
#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig {
    /// Horizontal distance between leaf slots.
    pub h_spacing: f32,
    /// Vertical distance between depth levels.
    pub v_spacing: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            h_spacing: 140.0,
            v_spacing: 90.0,
        }
    }
}

/// A node with its computed position.
#[derive(Debug, Clone, Serialize)]
pub struct PlacedNode {
    /// Node identifier.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
    /// Depth below the (discarded) synthetic root.
    pub depth: usize,
}

/// Complete layout result.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TreeLayout {
    /// Every input node with a position, in input order.
    pub nodes: Vec<PlacedNode>,
    /// Surviving edges (back-edges dropped, synthetic-root edges omitted).
    pub edges: Vec<(String, String)>,
    /// Top-level node ids, in input order.
    pub roots: Vec<String>,
}

impl TreeLayout {
    /// Position of a node by id.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<(f32, f32)> {
        self.nodes
            .iter()
            .find(|node| node.id == id)
            .map(|node| (node.x, node.y))
    }

    /// Whether the surviving edge set contains `from → to`.
    #[must_use]
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edges.iter().any(|(f, t)| f == from && t == to)
    }
}

/// Lay out a graph with default spacing.
#[must_use]
pub fn layout(nodes: &[RelationNode]) -> TreeLayout {
    layout_with(nodes, LayoutConfig::default())
}

/// Lay out a graph with explicit spacing.
///
/// Positions are recomputed from scratch on every call; the graphs this
/// serves are tens to low hundreds of nodes.
#[must_use]
pub fn layout_with(nodes: &[RelationNode], config: LayoutConfig) -> TreeLayout {
    if nodes.is_empty() {
        return TreeLayout::default();
    }

    // Index by id, first occurrence wins.
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&RelationNode> = Vec::new();
    for node in nodes {
        if !index.contains_key(node.id.as_str()) {
            index.insert(node.id.as_str(), order.len());
            order.push(node);
        }
    }
    let count = order.len();

    // Adjacency in insertion order: child edges first, then related edges
    // not already counted as parent/child. Unknown targets and self-loops
    // contribute nothing the walk has to care about beyond dropping them.
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); count];
    for (u, node) in order.iter().enumerate() {
        for target in node.children.iter().chain(node.related.iter()) {
            if let Some(&v) = index.get(target.as_str())
                && !adjacency[u].contains(&v)
            {
                adjacency[u].push(v);
            }
        }
    }

    // Break cycles: the first edge that would close one, in insertion
    // order, is dropped. Self-loops fall out here as immediate cycles.
    let mut colors = vec![Color::White; count];
    let mut kept: Vec<Vec<usize>> = vec![Vec::new(); count];
    for u in 0..count {
        if colors[u] == Color::White {
            drop_back_edges(u, &adjacency, &mut colors, &mut kept);
        }
    }

    // Placement parent: first surviving in-edge in insertion order. The
    // kept edge set is acyclic, so parent pointers form a forest.
    let mut parent: Vec<Option<usize>> = vec![None; count];
    for u in 0..count {
        for &v in &kept[u] {
            if parent[v].is_none() && v != u {
                parent[v] = Some(u);
            }
        }
    }

    let roots: Vec<usize> = (0..count).filter(|&v| parent[v].is_none()).collect();

    let mut tree_children: Vec<Vec<usize>> = vec![Vec::new(); count];
    for u in 0..count {
        for &v in &kept[u] {
            if parent[v] == Some(u) {
                tree_children[u].push(v);
            }
        }
    }

    // Every root hangs off the synthetic anchor at depth 0; the anchor
    // itself is never placed or emitted.
    let mut positions: Vec<(f32, f32, usize)> = vec![(0.0, 0.0, 0); count];
    let mut next_slot = 0usize;
    for &root in &roots {
        place(
            root,
            0,
            &tree_children,
            config,
            &mut next_slot,
            &mut positions,
        );
    }

    let placed = order
        .iter()
        .enumerate()
        .map(|(i, node)| PlacedNode {
            id: node.id.clone(),
            label: node.label.clone(),
            x: positions[i].0,
            y: positions[i].1,
            depth: positions[i].2,
        })
        .collect();

    let mut edges = Vec::new();
    for (u, targets) in kept.iter().enumerate() {
        for &v in targets {
            edges.push((order[u].id.clone(), order[v].id.clone()));
        }
    }

    TreeLayout {
        nodes: placed,
        edges,
        roots: roots.iter().map(|&r| order[r].id.clone()).collect(),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Depth-first walk keeping every edge that does not revisit the current
/// recursion path. An edge into a gray node is a back-edge and is dropped;
/// an edge into a black node is a cross-edge and survives (it cannot close
/// a cycle).
fn drop_back_edges(
    u: usize,
    adjacency: &[Vec<usize>],
    colors: &mut [Color],
    kept: &mut [Vec<usize>],
) {
    colors[u] = Color::Gray;
    for &v in &adjacency[u] {
        if colors[v] == Color::Gray {
            continue;
        }
        kept[u].push(v);
        if colors[v] == Color::White {
            drop_back_edges(v, adjacency, colors, kept);
        }
    }
    colors[u] = Color::Black;
}

/// Post-order placement: leaves take successive horizontal slots, interior
/// nodes center over their children, depth fixes the vertical position.
fn place(
    u: usize,
    depth: usize,
    tree_children: &[Vec<usize>],
    config: LayoutConfig,
    next_slot: &mut usize,
    positions: &mut [(f32, f32, usize)],
) -> f32 {
    let x = if tree_children[u].is_empty() {
        let x = *next_slot as f32 * config.h_spacing;
        *next_slot += 1;
        x
    } else {
        let mut first = 0.0f32;
        let mut last = 0.0f32;
        for (i, &child) in tree_children[u].iter().enumerate() {
            let child_x = place(child, depth + 1, tree_children, config, next_slot, positions);
            if i == 0 {
                first = child_x;
            }
            last = child_x;
        }
        (first + last) / 2.0
    };

    positions[u] = (x, depth as f32 * config.v_spacing, depth);
    x
}
