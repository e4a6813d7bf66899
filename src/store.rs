use indexmap::IndexMap;
use tracing::debug;

use crate::error::{EntityKind, GraphError, Result};
use crate::ir::{Anchor, AnchorRole, Edge, EdgeSpec, Node};

/// Optional constraints for [`GraphStore::anchors`]. Both set means both must match.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorFilter<'a> {
    pub edge_id: Option<&'a str>,
    pub node_id: Option<&'a str>,
}

impl<'a> AnchorFilter<'a> {
    pub fn by_edge(edge_id: &'a str) -> Self {
        Self {
            edge_id: Some(edge_id),
            node_id: None,
        }
    }

    pub fn by_node(node_id: &'a str) -> Self {
        Self {
            edge_id: None,
            node_id: Some(node_id),
        }
    }

    fn matches(&self, anchor: &Anchor) -> bool {
        self.edge_id.is_none_or(|id| anchor.edge_id == id)
            && self.node_id.is_none_or(|id| anchor.node_id == id)
    }
}

/// The two anchors of one edge, split into the one asked about and its partner.
#[derive(Debug, Clone, Copy)]
pub struct AnchorPair<'a> {
    pub this: &'a Anchor,
    pub other: &'a Anchor,
}

#[derive(Debug, Clone)]
pub struct GraphStore {
    nodes: IndexMap<String, Node>,
    edges: IndexMap<String, Edge>,
    anchors: IndexMap<String, Anchor>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            anchors: IndexMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: &str) -> Result<&Node> {
        self.nodes
            .get(id)
            .ok_or_else(|| GraphError::not_found(EntityKind::Node, id))
    }

    pub fn node_mut(&mut self, id: &str) -> Result<&mut Node> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::not_found(EntityKind::Node, id))
    }

    pub fn edge(&self, id: &str) -> Result<&Edge> {
        self.edges
            .get(id)
            .ok_or_else(|| GraphError::not_found(EntityKind::Edge, id))
    }

    pub fn anchor(&self, id: &str) -> Result<&Anchor> {
        self.anchors
            .get(id)
            .ok_or_else(|| GraphError::not_found(EntityKind::Anchor, id))
    }

    pub fn anchor_mut(&mut self, id: &str) -> Result<&mut Anchor> {
        self.anchors
            .get_mut(id)
            .ok_or_else(|| GraphError::not_found(EntityKind::Anchor, id))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn anchors_all(&self) -> impl Iterator<Item = &Anchor> {
        self.anchors.values()
    }

    /// Anchors matching `filter`, in the order they were inserted.
    pub fn anchors(&self, filter: AnchorFilter<'_>) -> Vec<&Anchor> {
        self.anchors
            .values()
            .filter(|anchor| filter.matches(anchor))
            .collect()
    }

    /// The two anchors of `edge_id`, in insertion order.
    ///
    /// An edge carrying any other number of anchors is an invariant violation.
    pub fn edge_anchors(&self, edge_id: &str) -> Result<[&Anchor; 2]> {
        let anchors = self.anchors(AnchorFilter::by_edge(edge_id));
        let [first, second] = anchors[..] else {
            return Err(GraphError::InvariantViolation {
                edge_id: edge_id.to_string(),
                detail: format!("expected 2 anchors, found {}", anchors.len()),
            });
        };
        Ok([first, second])
    }

    /// Splits the anchors of `edge_id` into `anchor_id` and its partner.
    pub fn pair(&self, edge_id: &str, anchor_id: &str) -> Result<AnchorPair<'_>> {
        let [first, second] = self.edge_anchors(edge_id)?;
        if first.id == anchor_id {
            Ok(AnchorPair {
                this: first,
                other: second,
            })
        } else if second.id == anchor_id {
            Ok(AnchorPair {
                this: second,
                other: first,
            })
        } else {
            Err(GraphError::InvariantViolation {
                edge_id: edge_id.to_string(),
                detail: format!("anchor {anchor_id} is not attached to this edge"),
            })
        }
    }

    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(GraphError::Duplicate {
                kind: EntityKind::Node,
                id: node.id,
            });
        }
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(node.width) || !valid(node.height) {
            return Err(GraphError::InvalidGeometry {
                id: node.id,
                width: node.width,
                height: node.height,
            });
        }
        if !node.position_x.is_finite() || !node.position_y.is_finite() {
            return Err(GraphError::NonFinitePosition {
                id: node.id,
                x: node.position_x,
                y: node.position_y,
            });
        }
        debug!(node = %node.id, x = node.position_x, y = node.position_y, "add node");
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Removes a node together with every edge (and its anchors) touching it.
    pub fn remove_node(&mut self, id: &str) -> Result<Node> {
        let node = self
            .nodes
            .shift_remove(id)
            .ok_or_else(|| GraphError::not_found(EntityKind::Node, id))?;
        let incident: Vec<String> = self
            .edges
            .values()
            .filter(|edge| edge.source_id == id || edge.target_id == id)
            .map(|edge| edge.id.clone())
            .collect();
        for edge_id in incident {
            self.remove_edge(&edge_id)?;
        }
        debug!(node = %id, "remove node");
        Ok(node)
    }

    /// Adds an edge and its source/sink anchor pair. The anchors start
    /// unresolved; call [`crate::resolver::resolve_edge`] to place them.
    pub fn add_edge(&mut self, spec: EdgeSpec) -> Result<()> {
        if self.edges.contains_key(&spec.id) {
            return Err(GraphError::Duplicate {
                kind: EntityKind::Edge,
                id: spec.id,
            });
        }
        self.node(&spec.source)?;
        self.node(&spec.target)?;

        let source_anchor = Anchor::new(
            &spec.source_anchor_id(),
            &spec.source,
            &spec.id,
            AnchorRole::Source,
            spec.source_anchor.bind(&spec.source),
        );
        let target_anchor = Anchor::new(
            &spec.target_anchor_id(),
            &spec.target,
            &spec.id,
            AnchorRole::Sink,
            spec.target_anchor.bind(&spec.target),
        );
        for anchor in [&source_anchor, &target_anchor] {
            if self.anchors.contains_key(&anchor.id) {
                return Err(GraphError::Duplicate {
                    kind: EntityKind::Anchor,
                    id: anchor.id.clone(),
                });
            }
        }

        debug!(edge = %spec.id, source = %spec.source, target = %spec.target, "add edge");
        self.anchors.insert(source_anchor.id.clone(), source_anchor);
        self.anchors.insert(target_anchor.id.clone(), target_anchor);
        self.edges.insert(
            spec.id.clone(),
            Edge {
                id: spec.id,
                source_id: spec.source,
                target_id: spec.target,
                kind: spec.kind,
                label: spec.label,
            },
        );
        Ok(())
    }

    /// Removes an edge and every anchor attached to it.
    pub fn remove_edge(&mut self, id: &str) -> Result<Edge> {
        let edge = self
            .edges
            .shift_remove(id)
            .ok_or_else(|| GraphError::not_found(EntityKind::Edge, id))?;
        let anchor_ids: Vec<String> = self
            .anchors(AnchorFilter::by_edge(id))
            .into_iter()
            .map(|anchor| anchor.id.clone())
            .collect();
        for anchor_id in anchor_ids {
            self.anchors.shift_remove(&anchor_id);
        }
        debug!(edge = %id, "remove edge");
        Ok(edge)
    }

    /// Inserts a bare anchor without checking the two-anchors-per-edge rule.
    pub fn insert_anchor(&mut self, anchor: Anchor) -> Result<()> {
        if self.anchors.contains_key(&anchor.id) {
            return Err(GraphError::Duplicate {
                kind: EntityKind::Anchor,
                id: anchor.id,
            });
        }
        self.anchors.insert(anchor.id.clone(), anchor);
        Ok(())
    }

    /// Removes a single anchor, leaving its edge as is.
    pub fn remove_anchor(&mut self, id: &str) -> Result<Anchor> {
        self.anchors
            .shift_remove(id)
            .ok_or_else(|| GraphError::not_found(EntityKind::Anchor, id))
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Side;
    use crate::ir::{AnchorSpec, AnchorStrategy};

    fn two_node_store() -> GraphStore {
        let mut store = GraphStore::new();
        store.add_node(Node::new("a", 0.0, 0.0, 100.0, 50.0)).unwrap();
        store.add_node(Node::new("b", 300.0, 0.0, 100.0, 50.0)).unwrap();
        store.add_edge(EdgeSpec::new("e1", "a", "b")).unwrap();
        store
    }

    #[test]
    fn lookups_fail_with_not_found() {
        let store = two_node_store();
        assert!(matches!(
            store.node("zz"),
            Err(GraphError::NotFound { kind: EntityKind::Node, .. })
        ));
        assert!(matches!(
            store.edge("zz"),
            Err(GraphError::NotFound { kind: EntityKind::Edge, .. })
        ));
        assert!(matches!(
            store.anchor("zz"),
            Err(GraphError::NotFound { kind: EntityKind::Anchor, .. })
        ));
    }

    #[test]
    fn add_edge_creates_anchor_pair() {
        let store = two_node_store();
        let anchors = store.anchors(AnchorFilter::by_edge("e1"));
        assert_eq!(anchors.len(), 2);
        assert_eq!(anchors[0].id, "e1-source");
        assert_eq!(anchors[0].node_id, "a");
        assert_eq!(anchors[0].role, AnchorRole::Source);
        assert_eq!(anchors[1].id, "e1-target");
        assert_eq!(anchors[1].role, AnchorRole::Sink);
        assert!(anchors.iter().all(|anchor| anchor.angle.is_none()));
    }

    #[test]
    fn anchors_filter_by_node_and_edge() {
        let mut store = two_node_store();
        store.add_node(Node::new("c", 0.0, 300.0, 100.0, 50.0)).unwrap();
        store
            .add_edge(
                EdgeSpec::new("e2", "a", "c")
                    .anchors(AnchorSpec::Side(Side::Bottom), AnchorSpec::Dynamic),
            )
            .unwrap();

        let on_a: Vec<&str> = store
            .anchors(AnchorFilter::by_node("a"))
            .iter()
            .map(|anchor| anchor.id.as_str())
            .collect();
        assert_eq!(on_a, vec!["e1-source", "e2-source"]);

        let both = AnchorFilter {
            edge_id: Some("e2"),
            node_id: Some("c"),
        };
        let found = store.anchors(both);
        assert_eq!(found.len(), 1);
        assert!(found[0].strategy.is_dynamic());

        let fixed = store.anchor("e2-source").unwrap();
        assert!(matches!(fixed.strategy, AnchorStrategy::Fixed { ref node_id, .. } if node_id == "a"));
    }

    #[test]
    fn pair_orders_self_first() {
        let store = two_node_store();
        let pair = store.pair("e1", "e1-target").unwrap();
        assert_eq!(pair.this.id, "e1-target");
        assert_eq!(pair.other.id, "e1-source");
    }

    #[test]
    fn pair_rejects_malformed_edges() {
        let mut store = two_node_store();
        store.remove_anchor("e1-target").unwrap();
        let err = store.pair("e1", "e1-source").unwrap_err();
        assert!(err.is_invariant_violation());

        let err = store.pair("e1", "stranger").unwrap_err();
        assert!(err.is_invariant_violation());
    }

    #[test]
    fn duplicates_and_bad_sizes_are_rejected() {
        let mut store = two_node_store();
        assert!(matches!(
            store.add_node(Node::new("a", 0.0, 0.0, 10.0, 10.0)),
            Err(GraphError::Duplicate { .. })
        ));
        assert!(matches!(
            store.add_node(Node::new("flat", 0.0, 0.0, 10.0, 0.0)),
            Err(GraphError::InvalidGeometry { .. })
        ));
        assert!(matches!(
            store.add_edge(EdgeSpec::new("e1", "a", "b")),
            Err(GraphError::Duplicate { .. })
        ));
        assert!(matches!(
            store.add_edge(EdgeSpec::new("e9", "a", "missing")),
            Err(GraphError::NotFound { .. })
        ));
        assert_eq!(store.edge_count(), 1);
    }

    #[test]
    fn non_finite_positions_are_rejected() {
        let mut store = GraphStore::new();
        for (x, y) in [(f32::NAN, 0.0), (0.0, f32::INFINITY), (f32::NEG_INFINITY, 1.0)] {
            assert!(matches!(
                store.add_node(Node::new("bad", x, y, 10.0, 10.0)),
                Err(GraphError::NonFinitePosition { .. })
            ));
        }
        assert!(store.is_empty());
    }

    #[test]
    fn removing_node_cascades_to_edges_and_anchors() {
        let mut store = two_node_store();
        store.remove_node("b").unwrap();
        assert_eq!(store.edge_count(), 0);
        assert_eq!(store.anchors_all().count(), 0);
        assert_eq!(store.node_count(), 1);
    }

    #[test]
    fn removal_keeps_insertion_order_of_the_rest() {
        let mut store = two_node_store();
        store.add_node(Node::new("c", 0.0, 300.0, 100.0, 50.0)).unwrap();
        store.add_edge(EdgeSpec::new("e2", "a", "c")).unwrap();
        store.add_edge(EdgeSpec::new("e3", "b", "c")).unwrap();
        store.remove_edge("e1").unwrap();
        store.remove_node("a").unwrap();

        let nodes: Vec<&str> = store.nodes().map(|node| node.id.as_str()).collect();
        assert_eq!(nodes, vec!["b", "c"]);
        let anchors: Vec<&str> = store.anchors_all().map(|anchor| anchor.id.as_str()).collect();
        assert_eq!(anchors, vec!["e3-source", "e3-target"]);
    }

    #[test]
    fn remove_edge_drops_both_anchors() {
        let mut store = two_node_store();
        let edge = store.remove_edge("e1").unwrap();
        assert_eq!(edge.source_id, "a");
        assert!(store.anchors(AnchorFilter::by_edge("e1")).is_empty());
        assert!(store.remove_edge("e1").is_err());
    }
}
