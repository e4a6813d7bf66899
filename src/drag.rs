use tracing::{debug, debug_span};

use crate::error::{GraphError, Result};
use crate::resolver::{Resolution, resolve_anchor};
use crate::store::{AnchorFilter, GraphStore};

/// Relative pointer movement since the previous event, in diagram units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerMove {
    pub movement_x: f32,
    pub movement_y: f32,
}

impl PointerMove {
    pub fn new(movement_x: f32, movement_y: f32) -> Self {
        Self {
            movement_x,
            movement_y,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragReport {
    pub node_id: String,
    pub position: (f32, f32),
    pub resolution: Resolution,
}

/// Moves `node_id` by the event's delta and re-resolves every anchor it owns.
pub fn on_pointer_move(store: &mut GraphStore, node_id: &str, event: PointerMove) -> Result<DragReport> {
    let _span = debug_span!(
        "pointer_move",
        node = %node_id,
        dx = event.movement_x,
        dy = event.movement_y
    )
    .entered();

    let node = store.node_mut(node_id)?;
    let x = node.position_x + event.movement_x;
    let y = node.position_y + event.movement_y;
    if !x.is_finite() || !y.is_finite() {
        return Err(GraphError::NonFinitePosition {
            id: node_id.to_string(),
            x,
            y,
        });
    }
    node.set_position(event.movement_x, event.movement_y);
    let position = (node.position_x, node.position_y);

    let anchor_ids: Vec<String> = store
        .anchors(AnchorFilter::by_node(node_id))
        .into_iter()
        .map(|anchor| anchor.id.clone())
        .collect();
    let mut resolution = Resolution::default();
    for anchor_id in &anchor_ids {
        resolution.merge(resolve_anchor(store, anchor_id)?);
    }
    debug!(
        x = position.0,
        y = position.1,
        anchors = anchor_ids.len(),
        recomputed = resolution.recomputed.len(),
        "node moved"
    );

    Ok(DragReport {
        node_id: node_id.to_string(),
        position,
        resolution,
    })
}

/// Tracks which node, if any, the pointer is currently dragging.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    active: Option<String>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_down(&mut self, node_id: &str) {
        debug!(node = %node_id, "drag start");
        self.active = Some(node_id.to_string());
    }

    /// Applies the movement to the dragged node. Returns `None` outside a drag.
    pub fn pointer_move(&self, store: &mut GraphStore, event: PointerMove) -> Result<Option<DragReport>> {
        match self.active.as_deref() {
            Some(node_id) => on_pointer_move(store, node_id, event).map(Some),
            None => Ok(None),
        }
    }

    pub fn pointer_up(&mut self) -> Option<String> {
        let released = self.active.take();
        if let Some(node_id) = released.as_deref() {
            debug!(node = %node_id, "drag end");
        }
        released
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn dragged_node(&self) -> Option<&str> {
        self.active.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Side;
    use crate::ir::{AnchorSpec, EdgeSpec, Node};
    use crate::resolver::resolve_all;

    fn hub_store() -> GraphStore {
        let mut store = GraphStore::new();
        store.add_node(Node::new("hub", 0.0, 0.0, 100.0, 50.0)).unwrap();
        store.add_node(Node::new("east", 300.0, 0.0, 100.0, 50.0)).unwrap();
        store.add_node(Node::new("south", 0.0, 300.0, 100.0, 50.0)).unwrap();
        store.add_edge(EdgeSpec::new("e1", "hub", "east")).unwrap();
        store
            .add_edge(EdgeSpec::new("e2", "hub", "south").anchors(AnchorSpec::Dynamic, AnchorSpec::Side(Side::Top)))
            .unwrap();
        resolve_all(&mut store).unwrap();
        store
    }

    #[test]
    fn pointer_move_shifts_node_and_anchors() {
        let mut store = hub_store();
        let report = on_pointer_move(&mut store, "hub", PointerMove::new(10.0, 5.0)).unwrap();
        assert_eq!(report.position, (10.0, 5.0));
        assert_eq!(store.anchor("e1-source").unwrap().position(), (110.0, 30.0));
        assert_eq!(store.anchor("e2-source").unwrap().position(), (60.0, 55.0));
        // sides unchanged: no hop to the partners
        assert_eq!(report.resolution.recomputed, vec!["e1-source", "e2-source"]);
    }

    #[test]
    fn dragging_past_a_neighbour_flips_both_ends() {
        let mut store = hub_store();
        let report = on_pointer_move(&mut store, "east", PointerMove::new(-600.0, 0.0)).unwrap();
        assert_eq!(report.resolution.recomputed, vec!["e1-target", "e1-source"]);
        assert_eq!(store.anchor("e1-target").unwrap().side(), Some(Side::Right));
        assert_eq!(store.anchor("e1-source").unwrap().side(), Some(Side::Left));
        assert_eq!(store.anchor("e1-source").unwrap().position(), (0.0, 25.0));
    }

    #[test]
    fn moving_fixed_end_reaches_dynamic_partner() {
        let mut store = hub_store();
        on_pointer_move(&mut store, "south", PointerMove::new(400.0, -300.0)).unwrap();
        // south now sits to the right of hub; its fixed top anchor followed it
        assert_eq!(store.anchor("e2-target").unwrap().position(), (450.0, 0.0));
        assert_eq!(store.anchor("e2-source").unwrap().side(), Some(Side::Right));
    }

    #[test]
    fn unknown_node_is_not_found() {
        let mut store = hub_store();
        let err = on_pointer_move(&mut store, "ghost", PointerMove::new(1.0, 1.0)).unwrap_err();
        assert!(matches!(err, GraphError::NotFound { .. }));
    }

    #[test]
    fn non_finite_movement_leaves_store_untouched() {
        let mut store = hub_store();
        let before = store.anchor("e1-target").unwrap().clone();
        for event in [
            PointerMove::new(f32::INFINITY, 0.0),
            PointerMove::new(0.0, f32::NAN),
            PointerMove::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
        ] {
            let err = on_pointer_move(&mut store, "east", event).unwrap_err();
            assert!(matches!(err, GraphError::NonFinitePosition { .. }));
        }
        assert_eq!(store.node("east").unwrap().position_x, 300.0);
        let after = store.anchor("e1-target").unwrap();
        assert_eq!(after.position(), before.position());
        assert_eq!(after.angle, before.angle);
    }

    #[test]
    fn controller_only_moves_while_dragging() {
        let mut store = hub_store();
        let mut controller = DragController::new();
        assert!(controller.pointer_move(&mut store, PointerMove::new(5.0, 5.0)).unwrap().is_none());

        controller.pointer_down("east");
        assert!(controller.is_dragging());
        assert_eq!(controller.dragged_node(), Some("east"));
        controller.pointer_move(&mut store, PointerMove::new(5.0, 0.0)).unwrap();
        controller.pointer_move(&mut store, PointerMove::new(5.0, 0.0)).unwrap();
        assert_eq!(store.node("east").unwrap().position_x, 310.0);

        assert_eq!(controller.pointer_up().as_deref(), Some("east"));
        assert!(!controller.is_dragging());
        controller.pointer_move(&mut store, PointerMove::new(5.0, 0.0)).unwrap();
        assert_eq!(store.node("east").unwrap().position_x, 310.0);
    }
}
