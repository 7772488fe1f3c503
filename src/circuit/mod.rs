//! Circuit graph representation.
//!
//! This module owns the node/component graph. The [`Circuit`] struct holds
//! every component and every node, keeps the node -> component and
//! component -> node edges consistent, and re-propagates voltages after each
//! edit.

mod counter;
mod graph;
mod node;
mod propagate;
mod types;
mod validate;

pub use counter::InstanceRegistry;
pub use graph::Circuit;
pub use node::{Node, NodeRegistry};
pub use propagate::WaveReport;
pub use types::*;
pub use validate::check_consistency;
