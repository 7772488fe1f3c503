//! Error types for the wirelogic circuit model.
//!
//! This module provides a unified error type [`CircuitError`] that covers
//! every error condition an edit or query on a [`Circuit`](crate::Circuit)
//! can report. Errors are returned before any mutation takes place.

use thiserror::Error;

use crate::circuit::ComponentId;

/// Result type alias using [`CircuitError`].
pub type Result<T> = std::result::Result<T, CircuitError>;

/// Unified error type for all circuit operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CircuitError {
    // ============ Lookup Errors ============
    /// Positional index past the end of the circuit
    #[error("Index {index} out of range (circuit has {len} components)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Component handle does not refer to a live component
    #[error("Component {id} not found in circuit")]
    ComponentNotFound { id: ComponentId },

    /// Operation only applies to a different component variant
    #[error("Component '{component}' is a {found}, expected {expected}")]
    WrongComponentType {
        component: String,
        expected: &'static str,
        found: &'static str,
    },

    // ============ Parameter Errors ============
    /// Resistance must be finite and strictly positive
    #[error("Invalid resistance {value} for '{component}' (must be finite and > 0)")]
    InvalidResistance { component: String, value: f64 },

    /// Clock interval must be non-zero
    #[error("Invalid clock interval {interval_ms}ms for '{component}'")]
    InvalidTimeInterval { component: String, interval_ms: u64 },

    // ============ Connection Errors ============
    /// Every terminal slot of the component is already bound
    #[error("Component '{component}' has no free terminal (capacity {capacity})")]
    TerminalsFull { component: String, capacity: usize },

    /// Component has no terminal at the given coordinates
    #[error("Component '{component}' is not connected at ({x}, {y})")]
    NotConnected { component: String, x: i32, y: i32 },

    /// Node and component adjacency lists disagree
    #[error("Topology inconsistency: {message}")]
    TopologyInconsistency { message: String },
}

impl CircuitError {
    /// Create an out-of-range error
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Create an invalid resistance error
    pub fn invalid_resistance(component: impl Into<String>, value: f64) -> Self {
        Self::InvalidResistance {
            component: component.into(),
            value,
        }
    }

    /// Create a not-connected error
    pub fn not_connected(component: impl Into<String>, x: i32, y: i32) -> Self {
        Self::NotConnected {
            component: component.into(),
            x,
            y,
        }
    }

    /// Create a topology inconsistency error
    pub fn inconsistency(message: impl Into<String>) -> Self {
        Self::TopologyInconsistency {
            message: message.into(),
        }
    }
}
