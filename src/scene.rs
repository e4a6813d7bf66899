//! Scene files: a JSON or JSON5 list of nodes and edges that populates a store.
//!
//! ```json5
//! {
//!   nodes: [
//!     { id: "a", position: { x: 0, y: 0 }, width: 100, height: 50, data: "Alpha" },
//!     { id: "b", position: { x: 300, y: 0 }, width: 100, height: 50 },
//!   ],
//!   edges: [{ id: "e1", source: "a", target: "b", targetAnchor: "left" }],
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::AnchorConfig;
use crate::ir::{AnchorSpec, EdgeKind, EdgeSpec, Node};
use crate::resolver::resolve_all;
use crate::store::GraphStore;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenePoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneNode {
    pub id: String,
    pub position: ScenePoint,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub bg_color: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default)]
    pub kind: EdgeKind,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub source_anchor: Option<String>,
    #[serde(default)]
    pub target_anchor: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
    #[serde(default)]
    pub edges: Vec<SceneEdge>,
}

pub fn parse_scene(input: &str) -> Result<Scene> {
    let scene = json5::from_str(input)?;
    Ok(scene)
}

pub fn load_scene(path: &Path) -> Result<Scene> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading scene file {}", path.display()))?;
    parse_scene(&contents).with_context(|| format!("parsing scene file {}", path.display()))
}

fn anchor_spec(token: Option<&str>, fallback: AnchorSpec, edge_id: &str) -> Result<AnchorSpec> {
    match token {
        None => Ok(fallback),
        Some(token) => AnchorSpec::from_token(token)
            .with_context(|| format!("edge {edge_id}: unknown anchor strategy {token:?}")),
    }
}

impl Scene {
    /// Builds a store from the scene and places every anchor.
    pub fn build_store(&self, anchors: &AnchorConfig) -> Result<GraphStore> {
        let mut store = GraphStore::new();
        for node in &self.nodes {
            let mut built = Node::new(
                &node.id,
                node.position.x,
                node.position.y,
                node.width,
                node.height,
            );
            if let Some(data) = &node.data {
                built = built.with_data(data.clone());
            }
            if let Some(color) = &node.bg_color {
                built = built.with_bg_color(color.clone());
            }
            store.add_node(built)?;
        }

        for edge in &self.edges {
            let source = anchor_spec(edge.source_anchor.as_deref(), anchors.default_strategy, &edge.id)?;
            let target = anchor_spec(edge.target_anchor.as_deref(), anchors.default_strategy, &edge.id)?;
            let mut spec = EdgeSpec::new(&edge.id, &edge.source, &edge.target)
                .kind(edge.kind)
                .anchors(source, target);
            spec.label = edge.label.clone();
            store.add_edge(spec)?;
        }

        resolve_all(&mut store)?;
        Ok(store)
    }
}
