//! Circuit graph structure.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use super::counter::InstanceRegistry;
use super::node::{Node, NodeRegistry};
use super::propagate::WaveReport;
use super::types::{ComponentId, ComponentKind, NodeId, Point};
use crate::components::{Component, SwitchState};
use crate::config::CircuitConfig;
use crate::error::{CircuitError, Result};

/// An ordered collection of components and the nodes joining them.
///
/// The circuit is the aggregate root of the model: it owns every component
/// for its full lifetime and every node in its [`NodeRegistry`]. All edits
/// go through it so that the two directions of each node/component edge stay
/// consistent, and every edit that can change a voltage runs propagation to
/// completion before returning.
///
/// Components are addressed two ways: by positional index (stable only until
/// a removal, which renumbers later entries) and by [`ComponentId`] handle
/// (stable for the component's lifetime).
#[derive(Debug, Default)]
pub struct Circuit {
    /// Component arena, indexed by `ComponentId`
    components: Vec<Option<Component>>,
    /// Positional order of live components
    order: Vec<ComponentId>,
    pub(crate) nodes: NodeRegistry,
    instances: InstanceRegistry,
    pub(crate) config: CircuitConfig,
    pub(crate) next_wave: u64,
}

impl Circuit {
    /// Create an empty circuit with default configuration.
    pub fn new() -> Self {
        Self::with_config(CircuitConfig::default())
    }

    /// Create an empty circuit with custom configuration.
    pub fn with_config(config: CircuitConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Use `instances` for display naming instead of a fresh registry.
    pub fn with_instance_registry(mut self, instances: InstanceRegistry) -> Self {
        self.instances = instances;
        self
    }

    pub fn config(&self) -> &CircuitConfig {
        &self.config
    }

    pub fn instances(&self) -> &InstanceRegistry {
        &self.instances
    }

    // ============ Arena access ============

    pub(crate) fn slot(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.0).and_then(Option::as_ref)
    }

    pub(crate) fn slot_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.components.get_mut(id.0).and_then(Option::as_mut)
    }

    fn live_mut(&mut self, id: ComponentId) -> Result<&mut Component> {
        self.slot_mut(id)
            .ok_or(CircuitError::ComponentNotFound { id })
    }

    /// Look up a component by handle.
    pub fn component(&self, id: ComponentId) -> Result<&Component> {
        self.slot(id).ok_or(CircuitError::ComponentNotFound { id })
    }

    // ============ Collection operations ============

    /// Number of components.
    pub fn size(&self) -> usize {
        self.order.len()
    }

    pub fn len(&self) -> usize {
        self.size()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Handles of all components, in positional order.
    pub fn ids(&self) -> &[ComponentId] {
        &self.order
    }

    /// All components, in positional order.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.order.iter().filter_map(|&id| self.slot(id))
    }

    /// Component at positional index `index`.
    pub fn get(&self, index: usize) -> Result<&Component> {
        let id = self.id_at(index)?;
        self.component(id)
    }

    /// Handle of the component at positional index `index`.
    pub fn id_at(&self, index: usize) -> Result<ComponentId> {
        self.order
            .get(index)
            .copied()
            .ok_or_else(|| CircuitError::index_out_of_range(index, self.order.len()))
    }

    /// Current positional index of a component.
    pub fn index_of(&self, id: ComponentId) -> Option<usize> {
        self.order.iter().position(|&c| c == id)
    }

    /// Append a component and take ownership of it.
    ///
    /// The component is named "<Variant> <n>" from the instance registry
    /// unless it already carries a name. Any terminal bindings it was built
    /// with are dropped: attach it with [`connect`](Self::connect).
    pub fn add_component(&mut self, component: impl Into<Component>) -> ComponentId {
        let mut component = component.into();
        let kind = component.kind();
        let number = self.instances.register(kind);
        if component.name().is_empty() {
            component.set_name(InstanceRegistry::display_name(kind, number));
        }
        for terminal in component.terminals_mut() {
            *terminal = None;
        }

        let id = ComponentId(self.components.len());
        tracing::debug!("added {} as {}", component.name(), id);
        self.components.push(Some(component));
        self.order.push(id);
        id
    }

    /// Add a component and connect it to `points` in one step.
    ///
    /// Nothing is added if the component has fewer terminals than points.
    pub fn place(
        &mut self,
        component: impl Into<Component>,
        points: &[Point],
    ) -> Result<ComponentId> {
        let component = component.into();
        let capacity = component.kind().terminal_count();
        if points.len() > capacity {
            return Err(CircuitError::TerminalsFull {
                component: component.kind().display_name().to_string(),
                capacity,
            });
        }
        let id = self.add_component(component);
        self.connect(id, points)?;
        Ok(id)
    }

    /// Remove the component at positional index `index` and return it.
    ///
    /// The component is disconnected first; later components move down one
    /// position.
    pub fn remove_component(&mut self, index: usize) -> Result<Component> {
        let id = self.id_at(index)?;
        self.remove(id)
    }

    /// Remove a component by handle and return it.
    pub fn remove(&mut self, id: ComponentId) -> Result<Component> {
        self.disconnect(id)?;
        let component = self.components[id.0]
            .take()
            .ok_or(CircuitError::ComponentNotFound { id })?;
        self.order.retain(|&c| c != id);
        self.instances.release(component.kind());
        tracing::debug!("removed {} ({})", component.name(), id);
        Ok(component)
    }

    /// Remove every component and node.
    pub fn remove_components(&mut self) {
        // Handles stay unique: the arena keeps its length.
        for slot in self.components.iter_mut() {
            if let Some(component) = slot.take() {
                self.instances.release(component.kind());
            }
        }
        self.order.clear();
        self.nodes.clear();
        tracing::debug!("cleared circuit");
    }

    // ============ Node queries ============

    /// Node at exactly `point`.
    pub fn find_node(&self, point: Point) -> Option<&Node> {
        self.nodes.find(point).and_then(|id| self.nodes.get(id))
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Number of nodes in the registry.
    pub fn node_count(&self) -> usize {
        self.nodes.size()
    }

    /// All nodes, ordered by coordinates.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Voltage at `point`, or `None` when no node exists there.
    pub fn node_voltage(&self, point: Point) -> Option<f64> {
        self.find_node(point).map(Node::voltage)
    }

    /// Coordinates of every bound terminal of a component, in slot order.
    pub fn terminal_points(&self, id: ComponentId) -> Result<Vec<Point>> {
        let component = self.component(id)?;
        Ok(component
            .nodes()
            .filter_map(|n| self.nodes.get(n).map(Node::point))
            .collect())
    }

    /// Components directly attached at `point`, optionally of one kind only.
    pub fn direct_components_at(
        &self,
        point: Point,
        kind: Option<ComponentKind>,
    ) -> Vec<ComponentId> {
        let Some(node) = self.find_node(point) else {
            return Vec::new();
        };
        node.direct_components()
            .iter()
            .copied()
            .filter(|&id| self.matches_kind(id, kind))
            .collect()
    }

    /// Components attached at `point` directly or through chains of wires
    /// and closed switches.
    ///
    /// Without a kind filter every component is returned, wires included.
    /// A kind filter other than [`ComponentKind::Wire`] leaves the wires
    /// themselves out.
    pub fn connected_components_at(
        &self,
        point: Point,
        kind: Option<ComponentKind>,
    ) -> Vec<ComponentId> {
        let Some(start) = self.nodes.find(point) else {
            return Vec::new();
        };
        let mut queue = VecDeque::from([start]);
        let mut seen_nodes = HashSet::from([start]);
        let mut seen_components = HashSet::new();
        let mut found = Vec::new();

        while let Some(node_id) = queue.pop_front() {
            let Some(node) = self.nodes.get(node_id) else {
                continue;
            };
            for &cid in node.direct_components() {
                if !seen_components.insert(cid) {
                    continue;
                }
                let Some(component) = self.slot(cid) else {
                    continue;
                };
                if component.bridges() {
                    for next in component.nodes() {
                        if seen_nodes.insert(next) {
                            queue.push_back(next);
                        }
                    }
                }
                if self.matches_kind(cid, kind) {
                    found.push(cid);
                }
            }
        }
        found
    }

    fn matches_kind(&self, id: ComponentId, kind: Option<ComponentKind>) -> bool {
        match (self.slot(id), kind) {
            (Some(_), None) => true,
            (Some(c), Some(k)) => c.kind() == k,
            (None, _) => false,
        }
    }

    // ============ Connection management ============

    /// Bind the first free terminal of a component to the node at `point`,
    /// creating the node if needed.
    pub fn add_node(&mut self, id: ComponentId, point: Point) -> Result<()> {
        self.connect(id, &[point])
    }

    /// Bind one terminal per point, in order, then propagate once.
    ///
    /// Fails without changes if the component lacks free terminals for all
    /// points.
    pub fn connect(&mut self, id: ComponentId, points: &[Point]) -> Result<()> {
        let component = self.component(id)?;
        if component.free_slots() < points.len() {
            return Err(CircuitError::TerminalsFull {
                component: component.name().to_string(),
                capacity: component.terminals().len(),
            });
        }
        if points.is_empty() {
            return Ok(());
        }

        let mut touched = Vec::with_capacity(points.len());
        for &point in points {
            touched.push(self.attach(id, point)?);
        }
        tracing::debug!("connected {} at {:?}", id, points);
        self.after_topology_change(id, &touched);
        Ok(())
    }

    /// Unbind every terminal of a component attached at `point`.
    pub fn disconnect_at(&mut self, id: ComponentId, point: Point) -> Result<()> {
        let node = self.bound_node(id, point)?;
        self.detach(id, node);
        tracing::debug!("disconnected {} at {}", id, point);
        self.after_topology_change(id, &[node]);
        Ok(())
    }

    /// Unbind every terminal of a component.
    pub fn disconnect(&mut self, id: ComponentId) -> Result<()> {
        let nodes: Vec<NodeId> = self.component(id)?.nodes().collect();
        for &node in &nodes {
            self.detach(id, node);
        }
        if !nodes.is_empty() {
            tracing::debug!("disconnected {} from {} nodes", id, nodes.len());
            self.after_topology_change(id, &nodes);
        }
        Ok(())
    }

    /// Move the terminals bound at `from` to `to`, keeping their slots.
    ///
    /// Both edge directions are swapped before any propagation runs, so no
    /// wave can observe the component attached to neither or both nodes.
    pub fn reconnect(&mut self, id: ComponentId, from: Point, to: Point) -> Result<()> {
        let old = self.bound_node(id, from)?;
        if from == to {
            return Ok(());
        }
        let new = self.nodes.get_or_insert(to);

        let slots = self.component(id)?.slots_of(old);
        if let Some(node) = self.nodes.get_mut(old) {
            node.disconnect_from_component(id);
        }
        if let Some(node) = self.nodes.get_mut(new) {
            node.add_component(id);
        }
        let component = self.live_mut(id)?;
        for &slot in &slots {
            component.terminals_mut()[slot] = Some(new);
            component.on_detached(slot);
        }
        if self.config.prune_orphan_nodes {
            self.nodes.remove_if_orphan(old);
        }

        tracing::debug!("reconnected {} from {} to {}", id, from, to);
        self.after_topology_change(id, &[old, new]);
        Ok(())
    }

    /// Node bound to one of `id`'s terminals at `point`.
    fn bound_node(&self, id: ComponentId, point: Point) -> Result<NodeId> {
        let component = self.component(id)?;
        self.nodes
            .find(point)
            .filter(|&node| component.is_connected_to(node))
            .ok_or_else(|| CircuitError::not_connected(component.name(), point.x, point.y))
    }

    /// Create both edges between a component's first free slot and the node
    /// at `point`.
    fn attach(&mut self, id: ComponentId, point: Point) -> Result<NodeId> {
        let component = self.component(id)?;
        let slot = component.free_slot().ok_or_else(|| CircuitError::TerminalsFull {
            component: component.name().to_string(),
            capacity: component.terminals().len(),
        })?;
        let node = self.nodes.get_or_insert(point);
        if let Some(n) = self.nodes.get_mut(node) {
            n.add_component(id);
        }
        self.live_mut(id)?.terminals_mut()[slot] = Some(node);
        Ok(node)
    }

    /// Remove both edges between a component and `node`.
    fn detach(&mut self, id: ComponentId, node: NodeId) {
        if let Some(component) = self.slot_mut(id) {
            for slot in component.slots_of(node) {
                component.terminals_mut()[slot] = None;
                component.on_detached(slot);
            }
        }
        if let Some(n) = self.nodes.get_mut(node) {
            n.disconnect_from_component(id);
        }
        if self.config.prune_orphan_nodes {
            self.nodes.remove_if_orphan(node);
        }
    }

    /// Re-propagate after `id` was attached to or detached from `nodes`.
    ///
    /// A source floods its own values from its current terminals; every other
    /// affected net is re-resolved.
    fn after_topology_change(&mut self, id: ComponentId, nodes: &[NodeId]) {
        let mut affected: Vec<NodeId> = nodes.to_vec();
        let is_source = match self.slot(id) {
            Some(component) => {
                affected.extend(component.nodes());
                component.is_source()
            }
            None => false,
        };
        if is_source {
            let driven = self.drive_from(id);
            let covered: HashSet<NodeId> = driven.iter().flat_map(|r| r.nodes.clone()).collect();
            affected.retain(|n| !covered.contains(n));
        }
        self.settle(&affected);
        debug_assert!(super::validate::check_consistency(self).is_ok());
    }

    // ============ Variant mutators ============

    /// Set a resistor's resistance. Voltages are unaffected.
    pub fn set_resistance(&mut self, id: ComponentId, resistance: f64) -> Result<()> {
        self.live_mut(id)?.resistor_mut()?.set_resistance(resistance)
    }

    /// Set a DC source's voltage or a clock's amplitude and propagate it.
    pub fn set_voltage(&mut self, id: ComponentId, voltage: f64) -> Result<Vec<WaveReport>> {
        match self.live_mut(id)? {
            Component::DcVoltage(v) => v.set_voltage(voltage),
            Component::Clock(c) => c.set_voltage(voltage),
            other => return Err(other.wrong_type(ComponentKind::DcVoltage)),
        }
        tracing::debug!("set {} to {} V", id, voltage);
        Ok(self.drive_from(id))
    }

    /// Open a switch, isolating its two sides.
    ///
    /// Both sides keep their current voltages; later changes stop at the
    /// switch.
    pub fn open(&mut self, id: ComponentId) -> Result<()> {
        self.set_switch_state(id, SwitchState::Open)
    }

    /// Close a switch, re-propagating across it.
    pub fn close(&mut self, id: ComponentId) -> Result<()> {
        self.set_switch_state(id, SwitchState::Closed)
    }

    /// Toggle a switch.
    pub fn change_state(&mut self, id: ComponentId) -> Result<()> {
        let state = match self.live_mut(id)?.switch_mut()?.state() {
            SwitchState::Open => SwitchState::Closed,
            SwitchState::Closed => SwitchState::Open,
        };
        self.set_switch_state(id, state)
    }

    fn set_switch_state(&mut self, id: ComponentId, state: SwitchState) -> Result<()> {
        let switch = self.live_mut(id)?.switch_mut()?;
        if switch.state() == state {
            return Ok(());
        }
        switch.set_state(state);
        let nodes: Vec<NodeId> = switch.terminals.iter().flatten().copied().collect();
        tracing::debug!("switch {} {}", id, state);
        // An opened switch leaves each side at its last-known voltage.
        if state == SwitchState::Closed {
            self.settle(&nodes);
        }
        Ok(())
    }

    pub fn set_rotation_angle(&mut self, id: ComponentId, angle: i32) -> Result<()> {
        self.live_mut(id)?.set_rotation_angle(angle);
        Ok(())
    }

    pub fn rotate(&mut self, id: ComponentId, angle: i32) -> Result<()> {
        self.live_mut(id)?.rotate(angle);
        Ok(())
    }

    pub fn set_time_interval(&mut self, id: ComponentId, interval_ms: u64) -> Result<()> {
        self.live_mut(id)?.clock_mut()?.set_time_interval_ms(interval_ms)
    }

    /// Recompute the net at `point` and notify every attached component.
    ///
    /// Edits propagate on their own; this re-runs the same wave on demand.
    /// Returns no reports when there is no node at `point`.
    pub fn update_voltages(&mut self, point: Point) -> Vec<WaveReport> {
        match self.nodes.find(point) {
            Some(node) => self.settle(&[node]),
            None => Vec::new(),
        }
    }

    // ============ Clock ticks ============

    /// Flip a clock's output and propagate the new value.
    ///
    /// This is the callback a host timer invokes once per clock interval.
    pub fn tick(&mut self, id: ComponentId) -> Result<Vec<WaveReport>> {
        self.live_mut(id)?.clock_mut()?.tick();
        tracing::debug!("tick {}", id);
        Ok(self.drive_from(id))
    }

    /// Let `elapsed_ms` pass for every clock and tick those that are due.
    ///
    /// Returns the number of ticks fired. When a clock is due several times
    /// in one call only its final phase is propagated.
    pub fn advance_clocks(&mut self, elapsed_ms: u64) -> usize {
        let mut fired: usize = 0;
        for id in self.order.clone() {
            let due = match self.slot_mut(id) {
                Some(Component::Clock(clock)) => {
                    let due = clock.advance(elapsed_ms);
                    if due % 2 == 1 {
                        clock.tick();
                    }
                    due
                }
                _ => continue,
            };
            if due > 0 {
                fired = fired.saturating_add(usize::try_from(due).unwrap_or(usize::MAX));
                if due % 2 == 1 {
                    self.drive_from(id);
                }
            }
        }
        fired
    }

    // ============ Readers ============

    /// Voltage reading of a component.
    pub fn voltage(&self, id: ComponentId) -> Result<f64> {
        Ok(self.component(id)?.voltage())
    }

    /// Current through a resistor.
    pub fn current(&self, id: ComponentId) -> Result<f64> {
        let component = self.component(id)?;
        component
            .as_resistor()
            .map(|r| r.current())
            .ok_or_else(|| component.wrong_type(ComponentKind::Resistor))
    }

    /// Verify node/component edge symmetry and coordinate uniqueness.
    pub fn check_consistency(&self) -> Result<()> {
        super::validate::check_consistency(self)
    }
}

impl std::ops::Index<usize> for Circuit {
    type Output = Component;

    /// Panics on an out-of-range index; use [`Circuit::get`] to get an error
    /// instead.
    fn index(&self, index: usize) -> &Component {
        match self.get(index) {
            Ok(component) => component,
            Err(e) => panic!("{}", e),
        }
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, &id) in self.order.iter().enumerate() {
            let Some(component) = self.slot(id) else {
                continue;
            };
            write!(f, "{:>3}: {}", index, component)?;
            for terminal in component.terminals() {
                match terminal.and_then(|n| self.nodes.get(n)) {
                    Some(node) => write!(f, " {}", node.point())?,
                    None => write!(f, " -")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Clock, DcVoltage, Ground, Resistor, Switch, Wire};
    use approx::assert_abs_diff_eq;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    /// Ground, 5 V source, wire and 1 kΩ load.
    fn series_circuit() -> (Circuit, ComponentId, ComponentId, ComponentId) {
        let mut circuit = Circuit::new();
        circuit.place(Ground::new(), &[p(0, 0)]).unwrap();
        let src = circuit.place(DcVoltage::new(5.0), &[p(0, 0), p(1, 1)]).unwrap();
        let wire = circuit.place(Wire::new(), &[p(1, 1), p(2, 2)]).unwrap();
        let load = circuit
            .place(Resistor::new(1000.0).unwrap(), &[p(2, 2), p(0, 0)])
            .unwrap();
        (circuit, src, wire, load)
    }

    #[test]
    fn test_components_are_named_per_kind() {
        let mut circuit = Circuit::new();
        let r1 = circuit.add_component(Resistor::default());
        let w1 = circuit.add_component(Wire::new());
        let r2 = circuit.add_component(Resistor::default());
        assert_eq!(circuit.component(r1).unwrap().name(), "Resistor 1");
        assert_eq!(circuit.component(w1).unwrap().name(), "Wire 1");
        assert_eq!(circuit.component(r2).unwrap().name(), "Resistor 2");
        assert_eq!(circuit.instances().count(ComponentKind::Resistor), 2);
    }

    #[test]
    fn test_index_errors_do_not_mutate() {
        let (mut circuit, ..) = series_circuit();
        let before = circuit.size();
        assert_eq!(
            circuit.remove_component(10).unwrap_err(),
            CircuitError::IndexOutOfRange { index: 10, len: before }
        );
        assert!(circuit.get(before).is_err());
        assert_eq!(circuit.size(), before);
        assert_eq!(circuit[0].component_type(), "ground");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_index_operator_panics_out_of_range() {
        let circuit = Circuit::new();
        let _ = &circuit[0];
    }

    #[test]
    fn test_removal_renumbers_positions() {
        let (mut circuit, src, wire, load) = series_circuit();
        assert_eq!(circuit.index_of(load), Some(3));
        let removed = circuit.remove_component(1).unwrap();
        assert_eq!(removed.component_type(), "voltage");
        assert!(removed.terminals().iter().all(Option::is_none));
        assert_eq!(circuit.index_of(wire), Some(1));
        assert_eq!(circuit.index_of(load), Some(2));
        assert!(circuit.component(src).is_err());
        assert_eq!(circuit.instances().count(ComponentKind::DcVoltage), 0);
        assert!(circuit.check_consistency().is_ok());
    }

    #[test]
    fn test_removing_source_undrives_its_net() {
        let (mut circuit, src, _, load) = series_circuit();
        circuit.remove(src).unwrap();
        assert_eq!(circuit.node_voltage(p(2, 2)), Some(0.0));
        assert!(!circuit.find_node(p(2, 2)).unwrap().is_driven());
        assert_eq!(circuit.current(load).unwrap(), 0.0);
    }

    #[test]
    fn test_remove_components_clears_everything() {
        let (mut circuit, ..) = series_circuit();
        circuit.remove_components();
        assert!(circuit.is_empty());
        assert_eq!(circuit.node_count(), 0);
        for kind in ComponentKind::ALL {
            assert_eq!(circuit.instances().count(kind), 0);
        }
    }

    #[test]
    fn test_connect_rejects_too_many_points_without_changes() {
        let mut circuit = Circuit::new();
        let g = circuit.add_component(Ground::new());
        let err = circuit.connect(g, &[p(0, 0), p(1, 1)]).unwrap_err();
        assert!(matches!(err, CircuitError::TerminalsFull { capacity: 1, .. }));
        assert_eq!(circuit.node_count(), 0);
        assert!(circuit.place(Ground::new(), &[p(0, 0), p(1, 1)]).is_err());
        assert_eq!(circuit.size(), 1);
    }

    #[test]
    fn test_add_node_fills_slots_in_order() {
        let mut circuit = Circuit::new();
        let r = circuit.add_component(Resistor::default());
        circuit.add_node(r, p(3, 3)).unwrap();
        circuit.add_node(r, p(4, 4)).unwrap();
        assert_eq!(circuit.terminal_points(r).unwrap(), vec![p(3, 3), p(4, 4)]);
        assert!(matches!(
            circuit.add_node(r, p(5, 5)),
            Err(CircuitError::TerminalsFull { .. })
        ));
    }

    #[test]
    fn test_disconnect_at_removes_both_edges() {
        let (mut circuit, _, wire, _) = series_circuit();
        circuit.disconnect_at(wire, p(1, 1)).unwrap();
        let node = circuit.find_node(p(1, 1)).unwrap();
        assert!(!node.is_connected_to(wire));
        assert_eq!(circuit.component(wire).unwrap().terminals()[0], None);
        assert!(circuit.check_consistency().is_ok());
        assert!(matches!(
            circuit.disconnect_at(wire, p(1, 1)),
            Err(CircuitError::NotConnected { x: 1, y: 1, .. })
        ));
    }

    #[test]
    fn test_disconnecting_wire_undrives_far_side() {
        let (mut circuit, _, wire, load) = series_circuit();
        circuit.disconnect_at(wire, p(1, 1)).unwrap();
        assert_eq!(circuit.node_voltage(p(1, 1)), Some(5.0));
        assert!(!circuit.find_node(p(2, 2)).unwrap().is_driven());
        assert_eq!(circuit.current(load).unwrap(), 0.0);

        circuit.add_node(wire, p(1, 1)).unwrap();
        assert_abs_diff_eq!(circuit.current(load).unwrap(), 0.005, epsilon = 1e-5);
    }

    #[test]
    fn test_orphan_nodes_pruned_or_retained() {
        let mut circuit = Circuit::new();
        let w = circuit.place(Wire::new(), &[p(0, 0), p(1, 0)]).unwrap();
        circuit.disconnect(w).unwrap();
        assert_eq!(circuit.node_count(), 0);

        let mut retaining = Circuit::with_config(CircuitConfig::new().with_prune_orphan_nodes(false));
        let w = retaining.place(Wire::new(), &[p(0, 0), p(1, 0)]).unwrap();
        retaining.disconnect(w).unwrap();
        assert_eq!(retaining.node_count(), 2);
        assert!(retaining.find_node(p(1, 0)).unwrap().is_orphan());
    }

    #[test]
    fn test_reconnect_keeps_slot_and_other_terminal() {
        let mut circuit = Circuit::new();
        let sw = circuit.place(Switch::new(SwitchState::Closed), &[p(1, 1), p(3, 3)]).unwrap();
        circuit.reconnect(sw, p(1, 1), p(2, 2)).unwrap();

        assert_eq!(circuit.terminal_points(sw).unwrap(), vec![p(2, 2), p(3, 3)]);
        assert!(circuit.find_node(p(1, 1)).is_none());
        assert!(circuit.find_node(p(2, 2)).unwrap().is_connected_to(sw));
        assert!(circuit.check_consistency().is_ok());
    }

    #[test]
    fn test_reconnect_requires_existing_terminal() {
        let mut circuit = Circuit::new();
        let r = circuit.place(Resistor::default(), &[p(0, 0), p(1, 0)]).unwrap();
        assert!(matches!(
            circuit.reconnect(r, p(5, 5), p(6, 6)),
            Err(CircuitError::NotConnected { .. })
        ));
        assert!(circuit.find_node(p(6, 6)).is_none());
    }

    #[test]
    fn test_reconnect_onto_other_terminal_node() {
        let mut circuit = Circuit::new();
        let r = circuit.place(Resistor::default(), &[p(0, 0), p(1, 0)]).unwrap();
        circuit.reconnect(r, p(0, 0), p(1, 0)).unwrap();
        assert_eq!(circuit.terminal_points(r).unwrap(), vec![p(1, 0), p(1, 0)]);
        assert_eq!(circuit.node_count(), 1);
        assert_eq!(circuit.find_node(p(1, 0)).unwrap().direct_components(), &[r]);
        assert!(circuit.check_consistency().is_ok());
    }

    #[test]
    fn test_connected_lookup_follows_wires() {
        let (circuit, src, wire, load) = series_circuit();
        let resistors = circuit.connected_components_at(p(1, 1), Some(ComponentKind::Resistor));
        assert_eq!(resistors, vec![load]);
        let direct = circuit.direct_components_at(p(1, 1), Some(ComponentKind::Resistor));
        assert!(direct.is_empty());

        let wires = circuit.connected_components_at(p(2, 2), Some(ComponentKind::Wire));
        assert_eq!(wires, vec![wire]);

        let all = circuit.connected_components_at(p(1, 1), None);
        assert!(all.contains(&src) && all.contains(&wire) && all.contains(&load));
    }

    #[test]
    fn test_connected_lookup_crosses_closed_switch_only() {
        let mut circuit = Circuit::new();
        let sw = circuit
            .place(Switch::new(SwitchState::Open), &[p(0, 0), p(1, 0)])
            .unwrap();
        let load = circuit.place(Resistor::default(), &[p(1, 0), p(2, 0)]).unwrap();
        assert!(circuit
            .connected_components_at(p(0, 0), Some(ComponentKind::Resistor))
            .is_empty());

        circuit.close(sw).unwrap();
        let found = circuit.connected_components_at(p(0, 0), Some(ComponentKind::Resistor));
        assert_eq!(found, vec![load]);
        let all = circuit.connected_components_at(p(0, 0), None);
        assert!(all.contains(&sw) && all.contains(&load));
    }

    #[test]
    fn test_open_keeps_last_known_voltages() {
        let mut circuit = Circuit::new();
        circuit.place(Ground::new(), &[p(0, 0)]).unwrap();
        let src = circuit.place(DcVoltage::new(5.0), &[p(0, 0), p(1, 1)]).unwrap();
        let sw = circuit
            .place(Switch::new(SwitchState::Closed), &[p(1, 1), p(2, 2)])
            .unwrap();
        let load = circuit.place(Resistor::default(), &[p(2, 2), p(0, 0)]).unwrap();

        circuit.open(sw).unwrap();
        assert_eq!(circuit.node_voltage(p(2, 2)), Some(5.0));
        assert_abs_diff_eq!(circuit.current(load).unwrap(), 0.005, epsilon = 1e-5);
        let switch = circuit.component(sw).unwrap().as_switch().unwrap();
        assert_eq!(switch.side_voltage(Switch::RIGHT), 5.0);

        circuit.set_voltage(src, 2.0).unwrap();
        assert_eq!(circuit.node_voltage(p(1, 1)), Some(2.0));
        assert_eq!(circuit.node_voltage(p(2, 2)), Some(5.0));

        circuit.close(sw).unwrap();
        assert_eq!(circuit.node_voltage(p(2, 2)), Some(2.0));
    }

    #[test]
    fn test_advance_clocks_saturates_tick_count() {
        let mut circuit = Circuit::new();
        let clk = circuit
            .place(Clock::new(5.0, 1).unwrap(), &[p(0, 0), p(1, 0)])
            .unwrap();
        assert_eq!(circuit.advance_clocks(u64::MAX), usize::MAX);
        assert_eq!(circuit.voltage(clk).unwrap(), 0.0);
    }

    #[test]
    fn test_wrong_variant_operations() {
        let (mut circuit, src, wire, _) = series_circuit();
        assert!(matches!(
            circuit.current(src),
            Err(CircuitError::WrongComponentType { expected: "resistor", .. })
        ));
        assert!(circuit.set_voltage(wire, 1.0).is_err());
        assert!(circuit.open(wire).is_err());
        assert!(circuit.tick(src).is_err());
        assert!(circuit.set_resistance(src, 10.0).is_err());
    }

    #[test]
    fn test_set_resistance_changes_current() {
        let (mut circuit, _, _, load) = series_circuit();
        circuit.set_resistance(load, 500.0).unwrap();
        assert_abs_diff_eq!(circuit.current(load).unwrap(), 0.01, epsilon = 1e-5);
        assert!(circuit.set_resistance(load, -1.0).is_err());
        assert_eq!(circuit.component(load).unwrap().as_resistor().unwrap().resistance(), 500.0);
    }

    #[test]
    fn test_rotation_has_no_electrical_effect() {
        let (mut circuit, _, wire, load) = series_circuit();
        circuit.rotate(wire, 90).unwrap();
        circuit.rotate(wire, 300).unwrap();
        assert_eq!(circuit.component(wire).unwrap().rotation_angle(), 30);
        circuit.set_rotation_angle(load, -90).unwrap();
        assert_eq!(circuit.component(load).unwrap().rotation_angle(), 270);
        assert_eq!(circuit.node_voltage(p(2, 2)), Some(5.0));
    }

    #[test]
    fn test_advance_clocks_fires_due_ticks() {
        let mut circuit = Circuit::new();
        circuit.place(Ground::new(), &[p(0, 0)]).unwrap();
        let clk = circuit
            .place(Clock::new(5.0, 100).unwrap(), &[p(0, 0), p(1, 0)])
            .unwrap();
        assert_eq!(circuit.node_voltage(p(1, 0)), Some(5.0));

        assert_eq!(circuit.advance_clocks(50), 0);
        assert_eq!(circuit.advance_clocks(60), 1);
        assert_eq!(circuit.node_voltage(p(1, 0)), Some(0.0));
        assert_eq!(circuit.advance_clocks(200), 2);
        assert_eq!(circuit.node_voltage(p(1, 0)), Some(0.0));

        circuit.set_time_interval(clk, 10).unwrap();
        assert!(circuit.set_time_interval(clk, 0).is_err());
    }

    #[test]
    fn test_update_voltages_reruns_net() {
        let (mut circuit, ..) = series_circuit();
        assert!(circuit.update_voltages(p(9, 9)).is_empty());

        let reports = circuit.update_voltages(p(2, 2));
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].voltage, Some(5.0));
        let near = circuit.find_node(p(1, 1)).unwrap().id();
        assert!(reports[0].reached(near));
    }

    #[test]
    fn test_display_lists_components_with_points() {
        let (circuit, ..) = series_circuit();
        let text = circuit.to_string();
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("Wire 1 (1, 1) (2, 2)"));
        assert!(text.contains("DCVoltage 1 [5 V] (0, 0) (1, 1)"));
    }
}
