//! Junction points and the node arena.

use std::collections::HashMap;
use std::fmt;

use super::types::{ComponentId, NodeId, Point};

/// A junction point, electrically common to every component attached to it.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    point: Point,
    /// `None` while no source reaches the node
    voltage: Option<f64>,
    components: Vec<ComponentId>,
}

impl Node {
    fn new(id: NodeId, point: Point) -> Self {
        Self {
            id,
            point,
            voltage: None,
            components: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn point(&self) -> Point {
        self.point
    }

    pub fn x(&self) -> i32 {
        self.point.x
    }

    pub fn y(&self) -> i32 {
        self.point.y
    }

    /// Voltage at the node; an undriven node reads 0 V.
    pub fn voltage(&self) -> f64 {
        self.voltage.unwrap_or(0.0)
    }

    /// Whether some source currently defines this node's voltage.
    pub fn is_driven(&self) -> bool {
        self.voltage.is_some()
    }

    pub(crate) fn raw_voltage(&self) -> Option<f64> {
        self.voltage
    }

    pub(crate) fn set_voltage(&mut self, voltage: Option<f64>) {
        self.voltage = voltage;
    }

    /// Components directly attached to this node, in attachment order.
    pub fn direct_components(&self) -> &[ComponentId] {
        &self.components
    }

    /// Attach a component. Attaching twice is a no-op.
    pub fn add_component(&mut self, component: ComponentId) {
        if !self.is_connected_to(component) {
            self.components.push(component);
        }
    }

    /// Whether the node lists `component` (node -> component edge only).
    pub fn is_connected_to(&self, component: ComponentId) -> bool {
        self.components.contains(&component)
    }

    /// Drop the node -> component edge. The component side is managed by the
    /// circuit.
    pub fn disconnect_from_component(&mut self, component: ComponentId) {
        self.components.retain(|&c| c != component);
    }

    pub fn is_orphan(&self) -> bool {
        self.components.is_empty()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.voltage {
            Some(v) => write!(f, "Node {} = {:.3} V", self.point, v),
            None => write!(f, "Node {} = undriven", self.point),
        }
    }
}

/// Arena owning every node of a circuit, indexed by coordinates.
///
/// Nodes are created on first request at a coordinate and looked up by
/// coordinate afterwards, so a point never maps to two nodes.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: HashMap<NodeId, Node>,
    by_point: HashMap<Point, NodeId>,
    next_id: usize,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact-match lookup by coordinates.
    pub fn find(&self, point: Point) -> Option<NodeId> {
        self.by_point.get(&point).copied()
    }

    /// Return the node at `point`, creating it first if needed.
    pub fn get_or_insert(&mut self, point: Point) -> NodeId {
        if let Some(id) = self.find(point) {
            return id;
        }
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node::new(id, point));
        self.by_point.insert(point, id);
        tracing::trace!("created node {} at {}", id, point);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Remove the node if nothing is attached to it. Returns whether it was
    /// removed.
    pub fn remove_if_orphan(&mut self, id: NodeId) -> bool {
        match self.nodes.get(&id) {
            Some(node) if node.is_orphan() => {
                let point = node.point();
                self.nodes.remove(&id);
                self.by_point.remove(&point);
                tracing::trace!("pruned orphan node at {}", point);
                true
            }
            _ => false,
        }
    }

    /// Number of nodes in the arena.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes, ordered by coordinates.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        let mut nodes: Vec<&Node> = self.nodes.values().collect();
        nodes.sort_by_key(|n| n.point());
        nodes.into_iter()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.by_point.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_node_per_point() {
        let mut registry = NodeRegistry::new();
        let a = registry.get_or_insert(Point::new(1, 1));
        let b = registry.get_or_insert(Point::new(1, 1));
        let c = registry.get_or_insert(Point::new(1, 2));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(registry.size(), 2);
        assert_eq!(registry.find(Point::new(1, 2)), Some(c));
        assert_eq!(registry.find(Point::new(9, 9)), None);
    }

    #[test]
    fn test_add_component_is_idempotent() {
        let mut registry = NodeRegistry::new();
        let id = registry.get_or_insert(Point::new(0, 0));
        let node = registry.get_mut(id).unwrap();
        node.add_component(ComponentId(3));
        node.add_component(ComponentId(3));
        node.add_component(ComponentId(4));
        assert_eq!(node.direct_components(), &[ComponentId(3), ComponentId(4)]);

        node.disconnect_from_component(ComponentId(3));
        assert!(!node.is_connected_to(ComponentId(3)));
        assert!(node.is_connected_to(ComponentId(4)));
    }

    #[test]
    fn test_only_orphans_are_pruned() {
        let mut registry = NodeRegistry::new();
        let id = registry.get_or_insert(Point::new(2, 2));
        registry.get_mut(id).unwrap().add_component(ComponentId(0));
        assert!(!registry.remove_if_orphan(id));

        registry.get_mut(id).unwrap().disconnect_from_component(ComponentId(0));
        assert!(registry.remove_if_orphan(id));
        assert!(registry.find(Point::new(2, 2)).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_undriven_node_reads_zero() {
        let mut registry = NodeRegistry::new();
        let id = registry.get_or_insert(Point::new(0, 0));
        let node = registry.get_mut(id).unwrap();
        assert!(!node.is_driven());
        assert_eq!(node.voltage(), 0.0);
        node.set_voltage(Some(3.3));
        assert_eq!(node.voltage(), 3.3);
    }
}
