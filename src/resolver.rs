//! Anchor position resolution.
//!
//! Every anchor carries an [`AnchorStrategy`]. Resolving an anchor computes its
//! position and angle from the store's current node geometry, writes them, and
//! may hand over to the paired anchor on the same edge:
//!
//! * fixed anchors always hand over, since the partner may be a dynamic anchor
//!   whose side depends on this anchor's node;
//! * dynamic anchors hand over only when their angle (their side) changed.
//!
//! A resolution reached through the partner never hands back. The partner was
//! just computed from the same node state, so the chain is at most one hop long
//! for any pair of strategies, including two fixed anchors on one edge.

use tracing::trace;

use crate::error::Result;
use crate::geometry::Side;
use crate::ir::{AnchorStrategy, FixedPosition, Node};
use crate::store::{AnchorPair, GraphStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Drag, explicit recompute, or edge creation.
    Direct,
    /// Invoked by the paired anchor.
    Propagated,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
}

/// What one resolution call touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Anchor ids in the order they were recomputed.
    pub recomputed: Vec<String>,
}

impl Resolution {
    pub fn propagated(&self) -> bool {
        self.recomputed.len() > 1
    }

    pub fn merge(&mut self, other: Resolution) {
        self.recomputed.extend(other.recomputed);
    }
}

/// Picks the side of `this` that faces `other`.
///
/// Centers closer to horizontal than 45 degrees attach left/right; anything
/// else (including a slope of exactly 1, vertically aligned centers, and
/// coincident centers) attaches top/bottom. Ties on the compared corner fall
/// to the left and top sides respectively.
pub fn dynamic_side(this: &Node, other: &Node) -> Side {
    let (cx_this, cy_this) = this.center();
    let (cx_other, cy_other) = other.center();
    let dx = cx_this - cx_other;
    let dy = cy_this - cy_other;
    let horizontal = dx != 0.0 && (dy / dx).abs() < 1.0;

    if horizontal {
        if this.position_x < other.position_x {
            Side::Right
        } else {
            Side::Left
        }
    } else if this.position_y < other.position_y {
        Side::Bottom
    } else {
        Side::Top
    }
}

fn place_on(node: &Node, side: Side) -> Placement {
    let (x, y) = side.point(node.position_x, node.position_y, node.width, node.height);
    Placement {
        x,
        y,
        angle: side.angle(),
    }
}

fn fixed_placement(store: &GraphStore, node_id: &str, position: &FixedPosition) -> Result<Placement> {
    let node = store.node(node_id)?;
    let (x, y, angle) = position.place(node.position_x, node.position_y, node.width, node.height);
    Ok(Placement { x, y, angle })
}

fn dynamic_placement(store: &GraphStore, pair: AnchorPair<'_>) -> Result<Placement> {
    let this_node = store.node(&pair.this.node_id)?;
    let other_node = store.node(&pair.other.node_id)?;
    Ok(place_on(this_node, dynamic_side(this_node, other_node)))
}

/// Recomputes `anchor_id` and, when its strategy calls for it, its partner.
pub fn resolve_anchor(store: &mut GraphStore, anchor_id: &str) -> Result<Resolution> {
    let mut resolution = Resolution::default();
    run(store, anchor_id, Trigger::Direct, &mut resolution)?;
    Ok(resolution)
}

fn run(store: &mut GraphStore, anchor_id: &str, trigger: Trigger, resolution: &mut Resolution) -> Result<()> {
    let edge_id = store.anchor(anchor_id)?.edge_id.clone();
    let pair = store.pair(&edge_id, anchor_id)?;
    let other_id = pair.other.id.clone();
    let prev_angle = pair.this.angle;
    let (placement, always_propagate) = match &pair.this.strategy {
        AnchorStrategy::Fixed { node_id, position } => (fixed_placement(store, node_id, position)?, true),
        AnchorStrategy::Dynamic => (dynamic_placement(store, pair)?, false),
    };

    let anchor = store.anchor_mut(anchor_id)?;
    anchor.position_x = placement.x;
    anchor.position_y = placement.y;
    anchor.angle = Some(placement.angle);
    resolution.recomputed.push(anchor_id.to_string());

    let changed = prev_angle != Some(placement.angle);
    let propagate = trigger == Trigger::Direct && (always_propagate || changed);
    trace!(
        anchor = %anchor_id,
        x = placement.x,
        y = placement.y,
        angle = placement.angle,
        changed,
        propagate,
        "resolved anchor"
    );

    if propagate {
        run(store, &other_id, Trigger::Propagated, resolution)?;
    }
    Ok(())
}

/// Resolves both anchors of an edge directly, source end first.
pub fn resolve_edge(store: &mut GraphStore, edge_id: &str) -> Result<Resolution> {
    store.edge(edge_id)?;
    let ids = store.edge_anchors(edge_id)?.map(|anchor| anchor.id.clone());
    let mut resolution = Resolution::default();
    for id in ids {
        resolution.merge(resolve_anchor(store, &id)?);
    }
    Ok(resolution)
}

/// Resolves every edge in insertion order.
pub fn resolve_all(store: &mut GraphStore) -> Result<Resolution> {
    let edge_ids: Vec<String> = store.edges().map(|edge| edge.id.clone()).collect();
    let mut resolution = Resolution::default();
    for edge_id in edge_ids {
        resolution.merge(resolve_edge(store, &edge_id)?);
    }
    Ok(resolution)
}
