//! Anchor positioning core for interactive node-edge diagrams.
//!
//! A [`GraphStore`] holds nodes, edges and the two anchors terminating each
//! edge. When a node moves, [`on_pointer_move`] shifts it and the resolver
//! re-places every anchor it owns, handing over to the paired anchor when the
//! pair's geometry depends on it.
//!
//! ```
//! use diagram_anchors::{EdgeSpec, GraphStore, Node, PointerMove, Side, on_pointer_move, resolve_all};
//!
//! let mut store = GraphStore::new();
//! store.add_node(Node::new("a", 0.0, 0.0, 100.0, 50.0))?;
//! store.add_node(Node::new("b", 300.0, 0.0, 100.0, 50.0))?;
//! store.add_edge(EdgeSpec::new("e1", "a", "b"))?;
//! resolve_all(&mut store)?;
//! assert_eq!(store.anchor("e1-source")?.side(), Some(Side::Right));
//!
//! on_pointer_move(&mut store, "b", PointerMove::new(-300.0, 300.0))?;
//! assert_eq!(store.anchor("e1-source")?.side(), Some(Side::Bottom));
//! assert_eq!(store.anchor("e1-target")?.side(), Some(Side::Top));
//! # Ok::<(), diagram_anchors::GraphError>(())
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod drag;
pub mod dump;
pub mod error;
pub mod geometry;
pub mod ir;
pub mod registry;
pub mod render;
pub mod resolver;
pub mod scene;
pub mod store;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, RenderConfig, load_config};
pub use drag::{DragController, DragReport, PointerMove, on_pointer_move};
pub use error::{EntityKind, GraphError};
pub use geometry::Side;
pub use ir::{Anchor, AnchorRole, AnchorSpec, AnchorStrategy, Edge, EdgeKind, EdgeSpec, FixedPosition, Node};
pub use registry::StoreRegistry;
pub use render::render_svg;
pub use resolver::{Resolution, resolve_all, resolve_anchor, resolve_edge};
pub use scene::{Scene, load_scene, parse_scene};
pub use store::{AnchorFilter, GraphStore};
pub use theme::Theme;
