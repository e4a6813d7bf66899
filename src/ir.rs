use serde::{Deserialize, Serialize};

use crate::geometry::Side;

/// Maps a node's `(x, y, width, height)` to an anchor `(x, y, angle)`.
pub type PositionFn = fn(f32, f32, f32, f32) -> (f32, f32, f32);

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub position_x: f32,
    pub position_y: f32,
    pub width: f32,
    pub height: f32,
    pub bg_color: Option<String>,
    pub data: String,
}

impl Node {
    pub fn new(id: &str, position_x: f32, position_y: f32, width: f32, height: f32) -> Self {
        Self {
            id: id.to_string(),
            position_x,
            position_y,
            width,
            height,
            bg_color: None,
            data: id.to_string(),
        }
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = data.into();
        self
    }

    pub fn with_bg_color(mut self, color: impl Into<String>) -> Self {
        self.bg_color = Some(color.into());
        self
    }

    /// Adds a movement delta to the top-left corner.
    pub fn set_position(&mut self, dx: f32, dy: f32) {
        self.position_x += dx;
        self.position_y += dy;
    }

    pub fn center(&self) -> (f32, f32) {
        crate::geometry::center(self.position_x, self.position_y, self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Straight,
    #[default]
    #[serde(alias = "default")]
    Bezier,
    #[serde(alias = "smoothstep")]
    Step,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub kind: EdgeKind,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorRole {
    Source,
    Sink,
}

/// How a fixed anchor derives its placement from its bound node.
#[derive(Debug, Clone, Copy)]
pub enum FixedPosition {
    Side(Side),
    Custom(PositionFn),
}

impl FixedPosition {
    pub fn place(&self, x: f32, y: f32, width: f32, height: f32) -> (f32, f32, f32) {
        match self {
            FixedPosition::Side(side) => {
                let (px, py) = side.point(x, y, width, height);
                (px, py, side.angle())
            }
            FixedPosition::Custom(position) => position(x, y, width, height),
        }
    }
}

#[derive(Debug, Clone)]
pub enum AnchorStrategy {
    Fixed {
        node_id: String,
        position: FixedPosition,
    },
    Dynamic,
}

impl AnchorStrategy {
    pub fn is_dynamic(&self) -> bool {
        matches!(self, AnchorStrategy::Dynamic)
    }
}

#[derive(Debug, Clone)]
pub struct Anchor {
    pub id: String,
    pub node_id: String,
    pub edge_id: String,
    pub position_x: f32,
    pub position_y: f32,
    /// Unset until the anchor is resolved for the first time.
    pub angle: Option<f32>,
    pub role: AnchorRole,
    pub strategy: AnchorStrategy,
}

impl Anchor {
    pub fn new(id: &str, node_id: &str, edge_id: &str, role: AnchorRole, strategy: AnchorStrategy) -> Self {
        Self {
            id: id.to_string(),
            node_id: node_id.to_string(),
            edge_id: edge_id.to_string(),
            position_x: 0.0,
            position_y: 0.0,
            angle: None,
            role,
            strategy,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.position_x, self.position_y)
    }

    pub fn side(&self) -> Option<Side> {
        self.angle.and_then(Side::from_angle)
    }
}

/// Caller-facing description of an anchor, bound to a node when the edge is added.
#[derive(Debug, Clone, Copy, Default)]
pub enum AnchorSpec {
    #[default]
    Dynamic,
    Side(Side),
    Custom(PositionFn),
}

impl AnchorSpec {
    pub fn from_token(token: &str) -> Option<Self> {
        if token == "dynamic" {
            return Some(AnchorSpec::Dynamic);
        }
        Side::from_token(token).map(AnchorSpec::Side)
    }

    pub fn bind(self, node_id: &str) -> AnchorStrategy {
        match self {
            AnchorSpec::Dynamic => AnchorStrategy::Dynamic,
            AnchorSpec::Side(side) => AnchorStrategy::Fixed {
                node_id: node_id.to_string(),
                position: FixedPosition::Side(side),
            },
            AnchorSpec::Custom(position) => AnchorStrategy::Fixed {
                node_id: node_id.to_string(),
                position: FixedPosition::Custom(position),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct EdgeSpec {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    pub label: Option<String>,
    pub source_anchor: AnchorSpec,
    pub target_anchor: AnchorSpec,
}

impl EdgeSpec {
    pub fn new(id: &str, source: &str, target: &str) -> Self {
        Self {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            kind: EdgeKind::default(),
            label: None,
            source_anchor: AnchorSpec::Dynamic,
            target_anchor: AnchorSpec::Dynamic,
        }
    }

    pub fn anchors(mut self, source: AnchorSpec, target: AnchorSpec) -> Self {
        self.source_anchor = source;
        self.target_anchor = target;
        self
    }

    pub fn kind(mut self, kind: EdgeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn source_anchor_id(&self) -> String {
        format!("{}-source", self.id)
    }

    pub fn target_anchor_id(&self) -> String {
        format!("{}-target", self.id)
    }
}
