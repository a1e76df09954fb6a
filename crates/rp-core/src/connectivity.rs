//! Room connectivity derived from aperture links.
//!
//! An aperture either joins two rooms or joins one room to the outside of
//! the building. `RoomGraph` turns the registry into an undirected graph
//! with one node per room, a single `Outside` node, and one edge per
//! aperture (weighted with the aperture id), so callers can ask which
//! rooms air can move between.

use crate::id::ShapeId;
use crate::registry::ShapeRegistry;
use petgraph::algo::{connected_components, has_path_connecting};
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;

/// A node of the room graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomNode {
    Room(ShapeId),
    Outside,
}

#[derive(Debug, Clone)]
pub struct RoomGraph {
    graph: UnGraph<RoomNode, ShapeId>,
    index: HashMap<ShapeId, NodeIndex>,
    outside: NodeIndex,
}

impl RoomGraph {
    /// Build the graph from the registry's current rooms and apertures.
    ///
    /// Apertures with no links, or with a link to a room that no longer
    /// exists, contribute no edge.
    pub fn build(registry: &ShapeRegistry) -> Self {
        let mut graph = UnGraph::new_undirected();
        let outside = graph.add_node(RoomNode::Outside);
        let mut index = HashMap::new();

        for room in registry.rooms() {
            index.insert(room.id, graph.add_node(RoomNode::Room(room.id)));
        }

        for aperture in registry.apertures() {
            let rooms = aperture.kind.connected_rooms();
            let nodes: Option<Vec<NodeIndex>> =
                rooms.iter().map(|r| index.get(r).copied()).collect();
            match nodes.as_deref() {
                Some([only]) => {
                    graph.add_edge(*only, outside, aperture.id);
                }
                Some([a, b]) => {
                    graph.add_edge(*a, *b, aperture.id);
                }
                Some(_) => {}
                None => log::debug!("room graph: {} links a missing room, skipped", aperture.id),
            }
        }

        Self {
            graph,
            index,
            outside,
        }
    }

    pub fn room_count(&self) -> usize {
        self.index.len()
    }

    /// Number of apertures that produced an edge.
    pub fn aperture_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Nodes directly reachable from `room` through one aperture.
    /// Empty for unknown rooms.
    pub fn neighbors(&self, room: ShapeId) -> Vec<RoomNode> {
        let Some(&idx) = self.index.get(&room) else {
            return Vec::new();
        };
        self.graph.neighbors(idx).map(|n| self.graph[n]).collect()
    }

    /// Apertures that join `a` and `b` directly.
    pub fn apertures_between(&self, a: RoomNode, b: RoomNode) -> Vec<ShapeId> {
        match (self.node(a), self.node(b)) {
            (Some(ia), Some(ib)) => self
                .graph
                .edges_connecting(ia, ib)
                .map(|e| *e.weight())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Whether some chain of apertures leads from `a` to `b`.
    pub fn is_connected(&self, a: ShapeId, b: ShapeId) -> bool {
        match (self.index.get(&a), self.index.get(&b)) {
            (Some(&ia), Some(&ib)) => has_path_connecting(&self.graph, ia, ib, None),
            _ => false,
        }
    }

    /// Whether `room` can reach the outside through any chain of apertures.
    pub fn reaches_outside(&self, room: ShapeId) -> bool {
        self.index
            .get(&room)
            .is_some_and(|&idx| has_path_connecting(&self.graph, idx, self.outside, None))
    }

    /// Connected components, counting the outside as one node.
    pub fn component_count(&self) -> usize {
        connected_components(&self.graph)
    }

    fn node(&self, n: RoomNode) -> Option<NodeIndex> {
        match n {
            RoomNode::Room(id) => self.index.get(&id).copied(),
            RoomNode::Outside => Some(self.outside),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ShapeType;

    #[test]
    fn two_rooms_and_an_exterior_door() {
        let mut reg = ShapeRegistry::new();
        let hall = reg.add_shape(ShapeType::Room);
        let kitchen = reg.add_shape(ShapeType::Room);
        let cellar = reg.add_shape(ShapeType::Room);
        let inner = reg.add_shape(ShapeType::Aperture);
        let front = reg.add_shape(ShapeType::Aperture);
        reg.link_aperture(inner, &[hall, kitchen]);
        reg.link_aperture(front, &[hall]);

        let g = RoomGraph::build(&reg);
        assert_eq!(g.room_count(), 3);
        assert_eq!(g.aperture_count(), 2);
        assert!(g.is_connected(kitchen, hall));
        assert!(g.reaches_outside(kitchen));
        assert!(!g.reaches_outside(cellar));
        assert_eq!(
            g.apertures_between(RoomNode::Room(hall), RoomNode::Outside),
            vec![front]
        );
        // {outside, hall, kitchen} and {cellar}
        assert_eq!(g.component_count(), 2);
    }

    #[test]
    fn dangling_and_empty_apertures_add_no_edges() {
        let mut reg = ShapeRegistry::new();
        let room = reg.add_shape(ShapeType::Room);
        let other = reg.add_shape(ShapeType::Room);
        let door = reg.add_shape(ShapeType::Aperture);
        let _unlinked = reg.add_shape(ShapeType::Aperture);
        reg.link_aperture(door, &[room, ShapeId::intern("demolished")]);

        let g = RoomGraph::build(&reg);
        assert_eq!(g.aperture_count(), 0);
        assert!(g.neighbors(room).is_empty());
        assert!(!g.is_connected(room, other));
        assert!(g.neighbors(ShapeId::intern("unknown")).is_empty());
    }
}
