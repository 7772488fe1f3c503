//! # Wirelogic Core
//!
//! A logic-level circuit model with incremental voltage propagation.
//!
//! This library provides:
//! - A graph of components (ground, wires, resistors, switches, DC sources,
//!   clocks) joined at coordinate-addressed nodes
//! - Connect / disconnect / reconnect edits that keep both directions of
//!   every node/component edge consistent
//! - Voltage propagation across wires and closed switches, bounded to one
//!   pass per event by propagation wave IDs
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`circuit`] - Nodes, the node arena, the [`Circuit`] aggregate and the
//!   propagation engine
//! - [`components`] - Component variants and their per-variant behaviour
//! - [`config`] - Circuit configuration
//!
//! ## Usage
//!
//! ```
//! use wirelogic_core::{Circuit, Point};
//! use wirelogic_core::components::{DcVoltage, Ground, Resistor, Wire};
//!
//! let mut circuit = Circuit::new();
//! circuit.place(Ground::new(), &[Point::new(0, 0)])?;
//! circuit.place(DcVoltage::new(5.0), &[Point::new(0, 0), Point::new(1, 1)])?;
//! circuit.place(Wire::new(), &[Point::new(1, 1), Point::new(2, 2)])?;
//! let load = circuit.place(Resistor::new(1000.0)?, &[Point::new(2, 2), Point::new(0, 0)])?;
//!
//! assert_eq!(circuit.node_voltage(Point::new(2, 2)), Some(5.0));
//! assert!((circuit.current(load)? - 0.005).abs() < 1e-5);
//! # Ok::<(), wirelogic_core::CircuitError>(())
//! ```
//!
//! ## Propagation Method
//!
//! Voltages are not solved globally. Each edit starts one or more waves:
//!
//! 1. The triggering node gets its value (from the edited source, or from
//!    the first source reachable over wires and closed switches)
//! 2. Every component attached to the node is notified and caches the value
//! 3. Wires and closed switches forward the wave to their other terminal,
//!    at most once per wave
//!
//! Open switches stop a wave. Resistors only observe: their current is the
//! drop between their terminals divided by their resistance.

pub mod circuit;
pub mod components;
pub mod config;
pub mod error;

// Re-export main types for convenience
pub use circuit::{Circuit, ComponentId, ComponentKind, NodeId, Point, WaveReport};
pub use config::CircuitConfig;
pub use error::{CircuitError, Result};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmCircuit;

/// Default resistance in ohms
pub const DEFAULT_RESISTANCE: f64 = 1000.0;

/// Default DC source / clock amplitude in volts
pub const DEFAULT_SOURCE_VOLTAGE: f64 = 5.0;

/// Default clock half-period in milliseconds
pub const DEFAULT_CLOCK_INTERVAL_MS: u64 = 500;

/// Tolerance used when comparing voltages
pub const VOLTAGE_TOLERANCE: f64 = 1e-5;
