//! Circuit preparation before pipeline entry.
//!
//! Preparation normalizes an input circuit into the form the pipeline
//! requires: no synchronization markers, and a single canonically-named
//! readout register. Every function here operates on a private copy; the
//! caller's circuit is never mutated. That is a correctness invariant, not
//! an optimization.

use tracing::warn;

use rigel_ir::{Circuit, CregId};

use crate::error::{ProviderError, ProviderResult};

/// The canonical readout register name.
pub const READOUT_REGISTER: &str = "ro";

/// Prepare a circuit for execution: strip barriers (warning when any were
/// present) and normalize the readout register to `ro`.
pub fn prepare_circuit(circuit: &Circuit) -> ProviderResult<Circuit> {
    let (stripped, removed) = strip_barriers(circuit);
    if removed > 0 {
        warn!(
            circuit = circuit.name(),
            removed, "`barrier` has no effect on this backend and will be omitted"
        );
    }
    normalize_readout(&stripped)
}

/// Return a copy of the circuit with every barrier removed, plus the number
/// of barriers that were removed. All other instructions keep their
/// original relative order.
pub fn strip_barriers(circuit: &Circuit) -> (Circuit, usize) {
    let stripped = circuit.filtered(|inst| !inst.is_barrier());
    let removed = circuit.len() - stripped.len();
    (stripped, removed)
}

/// Return a copy of the circuit whose measured register is named `ro`.
///
/// Collects the distinct classical registers referenced by measurements.
/// With zero or one, the result's sole readout register is named `ro`
/// (a no-op when already compliant). With two or more, fails with an
/// unsupported-circuit error listing the offending register names in
/// lexicographic order.
pub fn normalize_readout(circuit: &Circuit) -> ProviderResult<Circuit> {
    let mut referenced: Vec<CregId> = Vec::new();
    for inst in circuit.instructions().iter().filter(|i| i.is_measure()) {
        for clbit in &inst.clbits {
            if !referenced.contains(&clbit.creg) {
                referenced.push(clbit.creg);
            }
        }
    }

    if referenced.len() > 1 {
        let mut names: Vec<String> = referenced
            .iter()
            .filter_map(|id| circuit.creg(*id))
            .map(|reg| reg.name.clone())
            .collect();
        names.sort();
        return Err(ProviderError::UnsupportedCircuit(format!(
            "Multiple readout registers are unsupported; found {}",
            names.join(", ")
        )));
    }

    let mut circuit = circuit.clone();
    if let [id] = referenced[..] {
        let needs_rename = circuit
            .creg(id)
            .is_some_and(|reg| reg.name != READOUT_REGISTER);
        if needs_rename {
            circuit.rename_creg(id, READOUT_REGISTER)?;
        }
    }
    Ok(circuit)
}
