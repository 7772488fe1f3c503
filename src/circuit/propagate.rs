//! Incremental voltage propagation.
//!
//! A propagation wave starts at one node with one value, writes that value
//! into the node and notifies every component directly attached to it.
//! Pass-through components (wires, closed switches) forward the wave to the
//! node on their other terminal. Each pass-through component forwards at
//! most once per [`WaveId`], which bounds a wave to one pass over the net
//! whatever its shape, loops included.
//!
//! Which value a wave carries depends on the trigger:
//! - a source edit (value change, clock tick, source attached) floods the
//!   source's own terminal values, so the latest event wins on a net with
//!   conflicting drivers;
//! - any other topology edit re-resolves the net: the first defining
//!   terminal found breadth-first from the edited node wins.

use std::collections::{HashSet, VecDeque};

use super::graph::Circuit;
use super::types::{voltages_equal, ComponentId, NodeId, WaveId};

/// Summary of one propagation wave.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveReport {
    pub wave: WaveId,
    /// Node the wave started from
    pub origin: NodeId,
    /// Value written to every reached node (`None` = undriven)
    pub voltage: Option<f64>,
    /// Nodes reached, in visiting order, without repeats
    pub nodes: Vec<NodeId>,
    /// Pass-through components the wave crossed, in crossing order
    pub forwarded: Vec<ComponentId>,
    /// Components notified of the change, once per attached terminal
    pub notified: Vec<ComponentId>,
}

impl WaveReport {
    fn new(wave: WaveId, origin: NodeId, voltage: Option<f64>) -> Self {
        Self {
            wave,
            origin,
            voltage,
            nodes: Vec::new(),
            forwarded: Vec::new(),
            notified: Vec::new(),
        }
    }

    pub fn reached(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }
}

impl Circuit {
    fn next_wave(&mut self) -> WaveId {
        self.next_wave += 1;
        WaveId(self.next_wave)
    }

    /// Find the voltage defined for the net containing `start`.
    ///
    /// Walks the nodes bridged by wires and closed switches breadth-first and
    /// returns the first source terminal value met, or `None` when no source
    /// reaches the net.
    pub(crate) fn resolve(&self, start: NodeId) -> Option<f64> {
        let mut queue = VecDeque::from([start]);
        let mut seen = HashSet::from([start]);
        let mut resolved: Option<(f64, ComponentId)> = None;

        while let Some(node_id) = queue.pop_front() {
            let Some(node) = self.nodes.get(node_id) else {
                continue;
            };
            for &cid in node.direct_components() {
                let Some(component) = self.slot(cid) else {
                    continue;
                };
                for slot in component.slots_of(node_id) {
                    if let Some(v) = component.drive(slot) {
                        match resolved {
                            None => resolved = Some((v, cid)),
                            Some((first, first_id))
                                if !voltages_equal(first, v, self.config.voltage_tolerance) =>
                            {
                                tracing::warn!(
                                    "conflicting drivers on net of {}: {} defines {} V, {} defines {} V",
                                    node.point(),
                                    first_id,
                                    first,
                                    cid,
                                    v
                                );
                            }
                            Some(_) => {}
                        }
                    }
                    if component.bridges() {
                        let other = component.terminals().get(1 - slot.min(1)).copied().flatten();
                        if let Some(next) = other {
                            if seen.insert(next) {
                                queue.push_back(next);
                            }
                        }
                    }
                }
            }
        }

        resolved.map(|(v, _)| v)
    }

    /// Run one propagation wave writing `voltage` from `origin` outwards.
    pub(crate) fn propagate(&mut self, origin: NodeId, voltage: Option<f64>) -> WaveReport {
        let wave = self.next_wave();
        let mut report = WaveReport::new(wave, origin, voltage);
        let mut pending = vec![origin];

        while let Some(node_id) = pending.pop() {
            // A merge point is pushed once per incoming path.
            if report.reached(node_id) {
                continue;
            }
            let attached = match self.nodes.get_mut(node_id) {
                Some(node) => {
                    node.set_voltage(voltage);
                    node.direct_components().to_vec()
                }
                None => continue,
            };
            report.nodes.push(node_id);

            for cid in attached {
                let Some(component) = self.slot_mut(cid) else {
                    continue;
                };
                for slot in component.slots_of(node_id) {
                    report.notified.push(cid);
                    let Some(forward) = component.on_node_changed(slot, voltage, wave) else {
                        continue;
                    };
                    report.forwarded.push(cid);
                    if let Some(next) = component.terminals()[forward] {
                        tracing::trace!("{} forwards {} from {} to {}", cid, wave, node_id, next);
                        pending.push(next);
                    }
                }
            }
        }

        tracing::debug!(
            "{} from {}: {:?} V over {} nodes, {} hops",
            wave,
            origin,
            voltage,
            report.nodes.len(),
            report.forwarded.len()
        );
        report
    }

    /// Re-resolve and propagate the nets containing `nodes`.
    ///
    /// A net reached by an earlier wave of the same call is skipped.
    pub(crate) fn settle(&mut self, nodes: &[NodeId]) -> Vec<WaveReport> {
        let mut covered: HashSet<NodeId> = HashSet::new();
        let mut reports = Vec::new();
        for &node in nodes {
            if covered.contains(&node) || self.nodes.get(node).is_none() {
                continue;
            }
            let voltage = self.resolve(node);
            let report = self.propagate(node, voltage);
            covered.extend(report.nodes.iter().copied());
            reports.push(report);
        }
        reports
    }

    /// Flood the terminal values a source defines.
    pub(crate) fn drive_from(&mut self, id: ComponentId) -> Vec<WaveReport> {
        let Some(component) = self.slot(id) else {
            return Vec::new();
        };
        let driven: Vec<(NodeId, f64)> = component
            .terminals()
            .iter()
            .enumerate()
            .filter_map(|(slot, t)| Some(((*t)?, component.drive(slot)?)))
            .collect();
        driven
            .into_iter()
            .map(|(node, v)| self.propagate(node, Some(v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::circuit::{Circuit, Point};
    use crate::components::{DcVoltage, Ground, Resistor, Switch, SwitchState, Wire};

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_wire_ring_terminates_and_crosses_each_wire_once() {
        let mut circuit = Circuit::new();
        let src = circuit.place(DcVoltage::new(5.0), &[p(0, 0), p(1, 0)]).unwrap();
        let w1 = circuit.place(Wire::new(), &[p(1, 0), p(2, 0)]).unwrap();
        let w2 = circuit.place(Wire::new(), &[p(2, 0), p(2, 1)]).unwrap();
        let w3 = circuit.place(Wire::new(), &[p(2, 1), p(1, 0)]).unwrap();

        let reports = circuit.set_voltage(src, 3.0).unwrap();
        let wave = reports
            .iter()
            .find(|r| r.voltage == Some(3.0))
            .expect("positive terminal wave");

        let mut crossed = wave.forwarded.clone();
        crossed.sort();
        assert_eq!(crossed, vec![w1, w2, w3]);
        for point in [p(1, 0), p(2, 0), p(2, 1)] {
            assert_eq!(circuit.node_voltage(point), Some(3.0));
        }
    }

    #[test]
    fn test_diamond_visits_each_node_once() {
        let mut circuit = Circuit::new();
        circuit.place(Ground::new(), &[p(0, 0)]).unwrap();
        let src = circuit.place(DcVoltage::new(5.0), &[p(0, 0), p(1, 1)]).unwrap();
        circuit.place(Wire::new(), &[p(1, 1), p(2, 0)]).unwrap();
        circuit.place(Wire::new(), &[p(1, 1), p(2, 2)]).unwrap();
        circuit.place(Wire::new(), &[p(2, 0), p(3, 1)]).unwrap();
        circuit.place(Wire::new(), &[p(2, 2), p(3, 1)]).unwrap();
        let load = circuit.place(Resistor::default(), &[p(3, 1), p(0, 0)]).unwrap();

        let reports = circuit.set_voltage(src, 2.0).unwrap();
        let wave = reports.iter().find(|r| r.voltage == Some(2.0)).unwrap();
        assert_eq!(wave.forwarded.len(), 4);
        assert_eq!(wave.nodes.len(), 4);
        approx::assert_abs_diff_eq!(circuit.current(load).unwrap(), 0.002, epsilon = 1e-5);
    }

    #[test]
    fn test_merge_node_components_notified_once_per_wave() {
        let mut circuit = Circuit::new();
        circuit.place(Ground::new(), &[p(0, 0)]).unwrap();
        let src = circuit.place(DcVoltage::new(5.0), &[p(0, 0), p(1, 1)]).unwrap();
        let wires = [
            circuit.place(Wire::new(), &[p(1, 1), p(2, 0)]).unwrap(),
            circuit.place(Wire::new(), &[p(1, 1), p(2, 2)]).unwrap(),
            circuit.place(Wire::new(), &[p(2, 0), p(3, 1)]).unwrap(),
            circuit.place(Wire::new(), &[p(2, 2), p(3, 1)]).unwrap(),
        ];
        let side = circuit.place(Resistor::default(), &[p(2, 0), p(9, 9)]).unwrap();
        let merge = circuit.place(Resistor::default(), &[p(3, 1), p(0, 0)]).unwrap();

        let reports = circuit.set_voltage(src, 2.0).unwrap();
        let wave = reports.iter().find(|r| r.voltage == Some(2.0)).unwrap();
        let hits = |id| wave.notified.iter().filter(|&&c| c == id).count();
        assert_eq!(hits(side), 1);
        assert_eq!(hits(merge), 1);
        for wire in wires {
            assert_eq!(hits(wire), 2);
        }
        assert_eq!(wave.nodes.len(), 4);
    }

    #[test]
    fn test_resolve_ignores_open_switch() {
        let mut circuit = Circuit::new();
        circuit.place(DcVoltage::new(5.0), &[p(0, 0), p(1, 1)]).unwrap();
        circuit.place(Switch::new(SwitchState::Open), &[p(1, 1), p(2, 2)]).unwrap();
        circuit.place(Resistor::default(), &[p(2, 2), p(0, 0)]).unwrap();

        let right = circuit.find_node(p(2, 2)).unwrap().id();
        assert_eq!(circuit.resolve(right), None);
        let left = circuit.find_node(p(1, 1)).unwrap().id();
        assert_eq!(circuit.resolve(left), Some(5.0));
    }
}
