//! Circuit configuration.

use crate::VOLTAGE_TOLERANCE;

/// Configuration for a [`Circuit`](crate::Circuit).
#[derive(Debug, Clone)]
pub struct CircuitConfig {
    /// Two voltages closer than this are considered equal.
    pub voltage_tolerance: f64,
    /// Drop a node from the registry as soon as its last component detaches.
    pub prune_orphan_nodes: bool,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            voltage_tolerance: VOLTAGE_TOLERANCE,
            prune_orphan_nodes: true,
        }
    }
}

impl CircuitConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the voltage equality tolerance (in volts).
    pub fn with_voltage_tolerance(mut self, tolerance: f64) -> Self {
        self.voltage_tolerance = tolerance;
        self
    }

    /// Keep or prune nodes that no component references any more.
    ///
    /// With pruning disabled, an emptied node keeps its coordinates and
    /// still counts towards [`Circuit::node_count`](crate::Circuit::node_count).
    pub fn with_prune_orphan_nodes(mut self, prune: bool) -> Self {
        self.prune_orphan_nodes = prune;
        self
    }
}
