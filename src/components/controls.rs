//! Control components: Switch.

use std::fmt;

use crate::circuit::{NodeId, WaveId};

/// Position of a switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchState {
    #[default]
    Open,
    Closed,
}

impl fmt::Display for SwitchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchState::Open => f.write_str("open"),
            SwitchState::Closed => f.write_str("closed"),
        }
    }
}

/// A single-pole switch.
///
/// Closed, it behaves like a wire between its left (slot 0) and right
/// (slot 1) terminals. Open, it breaks the circuit: each side keeps its own
/// last known voltage.
#[derive(Debug, Clone, Default)]
pub struct Switch {
    pub name: String,
    pub rotation: i32,
    pub(crate) terminals: [Option<NodeId>; 2], // [left, right]
    state: SwitchState,
    pub(crate) side_voltages: [f64; 2],
    pub(crate) last_wave: Option<WaveId>,
}

impl Switch {
    pub const LEFT: usize = 0;
    pub const RIGHT: usize = 1;

    pub fn new(state: SwitchState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    pub fn state(&self) -> SwitchState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == SwitchState::Open
    }

    pub fn is_closed(&self) -> bool {
        self.state == SwitchState::Closed
    }

    pub(crate) fn set_state(&mut self, state: SwitchState) {
        self.state = state;
    }

    /// Voltage on the left side. Both sides agree while closed.
    pub fn voltage(&self) -> f64 {
        self.side_voltages[Self::LEFT]
    }

    /// Last known voltage on one side.
    pub fn side_voltage(&self, slot: usize) -> f64 {
        self.side_voltages[slot]
    }

    /// Wave that last crossed the switch.
    pub fn last_wave(&self) -> Option<WaveId> {
        self.last_wave
    }

    /// Record a change at `slot` and report whether it must be forwarded to
    /// the other side.
    pub(crate) fn on_node_changed(
        &mut self,
        slot: usize,
        voltage: Option<f64>,
        wave: WaveId,
    ) -> bool {
        self.side_voltages[slot] = voltage.unwrap_or(0.0);
        if self.is_open() || self.last_wave == Some(wave) {
            return false;
        }
        self.last_wave = Some(wave);
        true
    }
}
