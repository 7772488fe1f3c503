//! Component models for the circuit graph.
//!
//! This module provides models for all supported circuit components:
//! - Linear: Wire, Resistor
//! - Sources: Ground, DC Voltage, Clock
//! - Controls: Switch
//!
//! [`Component`] is a closed enum; each per-variant behaviour (terminal
//! layout, the voltage a terminal is driven to, whether a change is forwarded
//! across the part) is dispatched by matching on it.

mod controls;
mod linear;
mod sources;

pub use controls::{Switch, SwitchState};
pub use linear::{Resistor, Wire};
pub use sources::{Clock, DcVoltage, Ground, POSITIVE, REFERENCE};

use std::fmt;

use crate::circuit::{ComponentKind, NodeId, WaveId};
use crate::error::{CircuitError, Result};

/// A circuit component.
#[derive(Debug, Clone)]
pub enum Component {
    Ground(Ground),
    Wire(Wire),
    Resistor(Resistor),
    Switch(Switch),
    DcVoltage(DcVoltage),
    Clock(Clock),
}

impl Component {
    /// Get the variant tag.
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Ground(_) => ComponentKind::Ground,
            Component::Wire(_) => ComponentKind::Wire,
            Component::Resistor(_) => ComponentKind::Resistor,
            Component::Switch(_) => ComponentKind::Switch,
            Component::DcVoltage(_) => ComponentKind::DcVoltage,
            Component::Clock(_) => ComponentKind::Clock,
        }
    }

    /// Stable string tag ("resistor", "wire", ...).
    pub fn component_type(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Get the component name.
    pub fn name(&self) -> &str {
        match self {
            Component::Ground(g) => &g.name,
            Component::Wire(w) => &w.name,
            Component::Resistor(r) => &r.name,
            Component::Switch(s) => &s.name,
            Component::DcVoltage(v) => &v.name,
            Component::Clock(c) => &c.name,
        }
    }

    /// Give the component a custom name instead of "<Variant> <n>".
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.set_name(name.into());
        self
    }

    pub(crate) fn set_name(&mut self, name: String) {
        match self {
            Component::Ground(g) => g.name = name,
            Component::Wire(w) => w.name = name,
            Component::Resistor(r) => r.name = name,
            Component::Switch(s) => s.name = name,
            Component::DcVoltage(v) => v.name = name,
            Component::Clock(c) => c.name = name,
        }
    }

    fn rotation_mut(&mut self) -> &mut i32 {
        match self {
            Component::Ground(g) => &mut g.rotation,
            Component::Wire(w) => &mut w.rotation,
            Component::Resistor(r) => &mut r.rotation,
            Component::Switch(s) => &mut s.rotation,
            Component::DcVoltage(v) => &mut v.rotation,
            Component::Clock(c) => &mut c.rotation,
        }
    }

    /// Rotation angle in degrees, normalized to `0..360`.
    pub fn rotation_angle(&self) -> i32 {
        match self {
            Component::Ground(g) => g.rotation,
            Component::Wire(w) => w.rotation,
            Component::Resistor(r) => r.rotation,
            Component::Switch(s) => s.rotation,
            Component::DcVoltage(v) => v.rotation,
            Component::Clock(c) => c.rotation,
        }
    }

    pub fn set_rotation_angle(&mut self, angle: i32) {
        *self.rotation_mut() = angle.rem_euclid(360);
    }

    /// Rotate by `angle` degrees relative to the current orientation.
    pub fn rotate(&mut self, angle: i32) {
        let current = self.rotation_angle();
        self.set_rotation_angle(current + angle);
    }

    /// Terminal slots; `None` marks a slot not bound to any node.
    pub fn terminals(&self) -> &[Option<NodeId>] {
        match self {
            Component::Ground(g) => &g.terminals,
            Component::Wire(w) => &w.terminals,
            Component::Resistor(r) => &r.terminals,
            Component::Switch(s) => &s.terminals,
            Component::DcVoltage(v) => &v.terminals,
            Component::Clock(c) => &c.terminals,
        }
    }

    pub(crate) fn terminals_mut(&mut self) -> &mut [Option<NodeId>] {
        match self {
            Component::Ground(g) => &mut g.terminals,
            Component::Wire(w) => &mut w.terminals,
            Component::Resistor(r) => &mut r.terminals,
            Component::Switch(s) => &mut s.terminals,
            Component::DcVoltage(v) => &mut v.terminals,
            Component::Clock(c) => &mut c.terminals,
        }
    }

    /// Nodes the component is attached to, in slot order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.terminals().iter().flatten().copied()
    }

    /// Whether any terminal is bound to `node`.
    pub fn is_connected_to(&self, node: NodeId) -> bool {
        self.nodes().any(|n| n == node)
    }

    /// Slots bound to `node`.
    pub fn slots_of(&self, node: NodeId) -> Vec<usize> {
        self.terminals()
            .iter()
            .enumerate()
            .filter(|(_, t)| **t == Some(node))
            .map(|(slot, _)| slot)
            .collect()
    }

    /// First unbound slot, if any.
    pub fn free_slot(&self) -> Option<usize> {
        self.terminals().iter().position(Option::is_none)
    }

    pub fn free_slots(&self) -> usize {
        self.terminals().iter().filter(|t| t.is_none()).count()
    }

    /// Voltage this component defines at terminal `slot`, if it is a source.
    pub fn drive(&self, slot: usize) -> Option<f64> {
        match self {
            Component::Ground(_) => Some(0.0),
            Component::DcVoltage(v) => Some(v.drive(slot)),
            Component::Clock(c) => Some(c.drive(slot)),
            _ => None,
        }
    }

    /// Whether the component defines the voltage of its terminals.
    pub fn is_source(&self) -> bool {
        matches!(
            self,
            Component::Ground(_) | Component::DcVoltage(_) | Component::Clock(_)
        )
    }

    /// Whether a voltage change on one terminal currently reaches the other.
    pub fn bridges(&self) -> bool {
        match self {
            Component::Wire(_) => true,
            Component::Switch(s) => s.is_closed(),
            _ => false,
        }
    }

    /// Notify the component that the node at `slot` changed during `wave`.
    ///
    /// Returns the slot the change has to be forwarded to.
    pub(crate) fn on_node_changed(
        &mut self,
        slot: usize,
        voltage: Option<f64>,
        wave: WaveId,
    ) -> Option<usize> {
        let other = 1 - slot.min(1);
        match self {
            Component::Wire(w) => w.on_node_changed(voltage, wave).then_some(other),
            Component::Switch(s) => s.on_node_changed(slot, voltage, wave).then_some(other),
            Component::Resistor(r) => {
                r.on_node_changed(slot, voltage);
                None
            }
            Component::Ground(_) | Component::DcVoltage(_) | Component::Clock(_) => None,
        }
    }

    /// Forget the cached voltage of a slot that was just unbound.
    pub(crate) fn on_detached(&mut self, slot: usize) {
        match self {
            Component::Resistor(r) => r.on_node_changed(slot, None),
            Component::Switch(s) => s.side_voltages[slot] = 0.0,
            Component::Wire(w) => w.voltage = 0.0,
            _ => {}
        }
    }

    /// The variant's voltage reading.
    ///
    /// - Ground: 0
    /// - DC voltage / Clock: the current source value
    /// - Wire: the last value carried across
    /// - Switch: the left side's voltage
    /// - Resistor: the drop from terminal 0 to terminal 1
    pub fn voltage(&self) -> f64 {
        match self {
            Component::Ground(g) => g.voltage(),
            Component::Wire(w) => w.voltage(),
            Component::Resistor(r) => r.voltage(),
            Component::Switch(s) => s.voltage(),
            Component::DcVoltage(v) => v.voltage(),
            Component::Clock(c) => c.voltage(),
        }
    }

    pub fn as_resistor(&self) -> Option<&Resistor> {
        match self {
            Component::Resistor(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_switch(&self) -> Option<&Switch> {
        match self {
            Component::Switch(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_wire(&self) -> Option<&Wire> {
        match self {
            Component::Wire(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_clock(&self) -> Option<&Clock> {
        match self {
            Component::Clock(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_dc_voltage(&self) -> Option<&DcVoltage> {
        match self {
            Component::DcVoltage(v) => Some(v),
            _ => None,
        }
    }

    /// Error for an operation that needs a different variant.
    pub(crate) fn wrong_type(&self, expected: ComponentKind) -> CircuitError {
        CircuitError::WrongComponentType {
            component: self.name().to_string(),
            expected: expected.as_str(),
            found: self.component_type(),
        }
    }

    pub(crate) fn resistor_mut(&mut self) -> Result<&mut Resistor> {
        match self {
            Component::Resistor(r) => Ok(r),
            other => Err(other.wrong_type(ComponentKind::Resistor)),
        }
    }

    pub(crate) fn switch_mut(&mut self) -> Result<&mut Switch> {
        match self {
            Component::Switch(s) => Ok(s),
            other => Err(other.wrong_type(ComponentKind::Switch)),
        }
    }

    pub(crate) fn clock_mut(&mut self) -> Result<&mut Clock> {
        match self {
            Component::Clock(c) => Ok(c),
            other => Err(other.wrong_type(ComponentKind::Clock)),
        }
    }
}

impl From<Ground> for Component {
    fn from(g: Ground) -> Self {
        Component::Ground(g)
    }
}

impl From<Wire> for Component {
    fn from(w: Wire) -> Self {
        Component::Wire(w)
    }
}

impl From<Resistor> for Component {
    fn from(r: Resistor) -> Self {
        Component::Resistor(r)
    }
}

impl From<Switch> for Component {
    fn from(s: Switch) -> Self {
        Component::Switch(s)
    }
}

impl From<DcVoltage> for Component {
    fn from(v: DcVoltage) -> Self {
        Component::DcVoltage(v)
    }
}

impl From<Clock> for Component {
    fn from(c: Clock) -> Self {
        Component::Clock(c)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        match self {
            Component::Resistor(r) => write!(f, " [{} Ω, {:.5} A]", r.resistance(), r.current())?,
            Component::Switch(s) => write!(f, " [{}]", s.state())?,
            Component::DcVoltage(v) => write!(f, " [{} V]", v.voltage())?,
            Component::Clock(c) => {
                write!(f, " [{} V, {} ms]", c.voltage(), c.time_interval_ms())?
            }
            Component::Ground(_) | Component::Wire(_) => {}
        }
        Ok(())
    }
}
