//! Passive two-terminal parts: Wire and Resistor.

use crate::circuit::{NodeId, WaveId};
use crate::error::{CircuitError, Result};
use crate::DEFAULT_RESISTANCE;

/// An ideal conductor.
///
/// A wire bridges its two endpoint nodes into one logical junction: a
/// voltage change on either end is forwarded to the other end.
#[derive(Debug, Clone, Default)]
pub struct Wire {
    pub name: String,
    pub rotation: i32,
    pub(crate) terminals: [Option<NodeId>; 2],
    /// Last value carried across the wire
    pub(crate) voltage: f64,
    /// Wave that last crossed this wire
    pub(crate) last_wave: Option<WaveId>,
}

impl Wire {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node at the end opposite to `slot`.
    pub fn other_terminal(&self, slot: usize) -> Option<NodeId> {
        self.terminals.get(1 - slot.min(1)).copied().flatten()
    }

    /// The most recently propagated voltage.
    pub fn voltage(&self) -> f64 {
        self.voltage
    }

    /// Wave that last crossed the wire.
    pub fn last_wave(&self) -> Option<WaveId> {
        self.last_wave
    }

    /// Record a change on either end and report whether it must be
    /// forwarded to the other end.
    pub(crate) fn on_node_changed(&mut self, voltage: Option<f64>, wave: WaveId) -> bool {
        self.voltage = voltage.unwrap_or(0.0);
        if self.last_wave == Some(wave) {
            return false;
        }
        self.last_wave = Some(wave);
        true
    }
}

/// A linear resistor.
///
/// Terminal 0 is the reference for the sign of the voltage drop and of the
/// current: `current = (V0 - V1) / R`.
#[derive(Debug, Clone)]
pub struct Resistor {
    pub name: String,
    pub rotation: i32,
    pub(crate) terminals: [Option<NodeId>; 2],
    resistance: f64,
    /// Last known voltage at each terminal
    pub(crate) terminal_voltages: [f64; 2],
}

impl Resistor {
    /// Create a new resistor. Rejects zero, negative and non-finite values.
    pub fn new(resistance: f64) -> Result<Self> {
        validate_resistance("resistor", resistance)?;
        Ok(Self {
            name: String::new(),
            rotation: 0,
            terminals: [None; 2],
            resistance,
            terminal_voltages: [0.0; 2],
        })
    }

    pub fn resistance(&self) -> f64 {
        self.resistance
    }

    /// Change the resistance. The old value is kept on error.
    pub fn set_resistance(&mut self, resistance: f64) -> Result<()> {
        validate_resistance(&self.name, resistance)?;
        self.resistance = resistance;
        Ok(())
    }

    /// Voltage drop from terminal 0 to terminal 1.
    pub fn voltage(&self) -> f64 {
        self.terminal_voltages[0] - self.terminal_voltages[1]
    }

    /// Current through the resistor (Ohm's law).
    pub fn current(&self) -> f64 {
        self.voltage() / self.resistance
    }

    pub(crate) fn on_node_changed(&mut self, slot: usize, voltage: Option<f64>) {
        self.terminal_voltages[slot] = voltage.unwrap_or(0.0);
    }
}

impl Default for Resistor {
    fn default() -> Self {
        Self {
            name: String::new(),
            rotation: 0,
            terminals: [None; 2],
            resistance: DEFAULT_RESISTANCE,
            terminal_voltages: [0.0; 2],
        }
    }
}

fn validate_resistance(component: &str, resistance: f64) -> Result<()> {
    if resistance.is_finite() && resistance > 0.0 {
        Ok(())
    } else {
        Err(CircuitError::invalid_resistance(component, resistance))
    }
}
