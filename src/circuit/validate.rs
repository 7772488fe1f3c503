//! Circuit consistency checks.

use crate::error::{CircuitError, Result};

use super::Circuit;

/// Check the structural invariants of a circuit.
///
/// Checks:
/// - Every node is indexed under its own coordinates (one node per point)
/// - Every component terminal refers to a live node that lists the component
/// - Every component listed by a node is live and has a terminal there
///
/// A failure is an internal invariant violation; edits through [`Circuit`]
/// never produce one.
pub fn check_consistency(circuit: &Circuit) -> Result<()> {
    for node in circuit.nodes() {
        if circuit.nodes.find(node.point()) != Some(node.id()) {
            return Err(CircuitError::inconsistency(format!(
                "node {} is not the registered node at {}",
                node.id(),
                node.point()
            )));
        }

        for &cid in node.direct_components() {
            let component = circuit.component(cid).map_err(|_| {
                CircuitError::inconsistency(format!(
                    "node {} lists removed component {}",
                    node.point(),
                    cid
                ))
            })?;
            if !component.is_connected_to(node.id()) {
                return Err(CircuitError::inconsistency(format!(
                    "node {} lists '{}' but the component has no terminal there",
                    node.point(),
                    component.name()
                )));
            }
        }
    }

    for &cid in circuit.ids() {
        let component = circuit.component(cid)?;
        for node_id in component.nodes() {
            match circuit.node(node_id) {
                Some(node) if node.is_connected_to(cid) => {}
                Some(node) => {
                    return Err(CircuitError::inconsistency(format!(
                        "'{}' is attached at {} but the node does not list it",
                        component.name(),
                        node.point()
                    )))
                }
                None => {
                    return Err(CircuitError::inconsistency(format!(
                        "'{}' refers to missing node {}",
                        component.name(),
                        node_id
                    )))
                }
            }
        }
    }

    Ok(())
}
