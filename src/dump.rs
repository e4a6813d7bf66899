use crate::ir::{AnchorRole, AnchorStrategy, EdgeKind, FixedPosition};
use crate::store::GraphStore;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct StoreDump {
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
    pub anchors: Vec<AnchorDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    pub label: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnchorDump {
    pub id: String,
    pub node: String,
    pub edge: String,
    pub role: AnchorRole,
    pub strategy: String,
    pub x: f32,
    pub y: f32,
    pub angle: Option<f32>,
}

fn strategy_name(strategy: &AnchorStrategy) -> String {
    match strategy {
        AnchorStrategy::Dynamic => "dynamic".to_string(),
        AnchorStrategy::Fixed {
            position: FixedPosition::Side(side),
            ..
        } => format!("fixed:{}", format!("{side:?}").to_lowercase()),
        AnchorStrategy::Fixed {
            position: FixedPosition::Custom(_),
            ..
        } => "fixed:custom".to_string(),
    }
}

impl StoreDump {
    pub fn from_store(store: &GraphStore) -> Self {
        let nodes = store
            .nodes()
            .map(|node| NodeDump {
                id: node.id.clone(),
                x: node.position_x,
                y: node.position_y,
                width: node.width,
                height: node.height,
                data: node.data.clone(),
            })
            .collect();

        let edges = store
            .edges()
            .map(|edge| EdgeDump {
                id: edge.id.clone(),
                source: edge.source_id.clone(),
                target: edge.target_id.clone(),
                kind: edge.kind,
                label: edge.label.clone(),
            })
            .collect();

        let anchors = store
            .anchors_all()
            .map(|anchor| AnchorDump {
                id: anchor.id.clone(),
                node: anchor.node_id.clone(),
                edge: anchor.edge_id.clone(),
                role: anchor.role,
                strategy: strategy_name(&anchor.strategy),
                x: anchor.position_x,
                y: anchor.position_y,
                angle: anchor.angle,
            })
            .collect();

        StoreDump {
            nodes,
            edges,
            anchors,
        }
    }
}

/// Writes the dump as pretty JSON to `path`, or stdout when `None`.
pub fn write_store_dump(path: Option<&Path>, store: &GraphStore) -> anyhow::Result<()> {
    let dump = StoreDump::from_store(store);
    match path {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &dump)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
