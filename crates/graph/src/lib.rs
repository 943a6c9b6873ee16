//! Relationship-graph layout engine.
//!
//! Projects an arbitrary directed relationship graph (possibly cyclic,
//! possibly multi-rooted) onto deterministic 2D tree positions. Malformed
//! input never panics: cycles are broken by dropping back-edges, unknown
//! edge targets are ignored, and disconnected roots are unified under a
//! synthetic root that is discarded from the output.

pub mod input;
pub mod layout;

pub use input::relation_nodes;
pub use layout::{LayoutConfig, PlacedNode, RelationNode, TreeLayout, layout, layout_with};
