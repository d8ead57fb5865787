//! High-level circuit builder API.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, QuilGate, StandardGate};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClassicalRegister, ClbitRef, CregId, QubitId};

/// A quantum circuit: an ordered sequence of instructions over a fixed set
/// of qubits, plus a table of classical registers for measurement outcomes.
///
/// Classical bits are addressed as `(register, offset)` pairs through the
/// register table, so renaming a register is a single table update and every
/// measurement reference follows automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Number of qubits.
    num_qubits: u32,
    /// Classical registers, in declaration order.
    cregs: Vec<ClassicalRegister>,
    /// Instructions, in program order.
    instructions: Vec<Instruction>,
    /// Compiler rewiring directive, rendered as a PRAGMA.
    rewiring: Option<String>,
    /// Whether to start execution with an active reset.
    active_reset: bool,
}

impl Circuit {
    /// Create a new circuit with the given number of qubits and no
    /// classical registers.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            cregs: vec![],
            instructions: vec![],
            rewiring: None,
            active_reset: false,
        }
    }

    /// Create a circuit with a readout register named `ro` of the given
    /// size.
    pub fn with_readout(name: impl Into<String>, num_qubits: u32, readout_size: u32) -> Self {
        let mut circuit = Self::new(name, num_qubits);
        // A fresh circuit has no registers, so this cannot collide.
        let _ = circuit.add_creg("ro", readout_size);
        circuit
    }

    /// Declare a classical register.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> IrResult<CregId> {
        let name = name.into();
        if self.cregs.iter().any(|r| r.name == name) {
            return Err(IrError::DuplicateRegister(name));
        }
        self.cregs.push(ClassicalRegister::new(name, size));
        Ok(CregId(self.cregs.len() - 1))
    }

    /// Look up a register by name.
    pub fn find_creg(&self, name: &str) -> Option<CregId> {
        self.cregs.iter().position(|r| r.name == name).map(CregId)
    }

    /// Get a register by id.
    pub fn creg(&self, id: CregId) -> Option<&ClassicalRegister> {
        self.cregs.get(id.0)
    }

    /// Rename a register. Measurement references follow automatically since
    /// they address registers by id.
    pub fn rename_creg(&mut self, id: CregId, name: impl Into<String>) -> IrResult<()> {
        let num_cregs = self.cregs.len();
        let reg = self
            .cregs
            .get_mut(id.0)
            .ok_or(IrError::RegisterOutOfRange {
                index: id.0,
                num_cregs,
            })?;
        reg.name = name.into();
        Ok(())
    }

    fn check_qubit(&self, qubit: QubitId) -> IrResult<()> {
        if qubit.0 >= self.num_qubits {
            return Err(IrError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    fn check_clbit(&self, clbit: ClbitRef) -> IrResult<()> {
        let reg = self
            .cregs
            .get(clbit.creg.0)
            .ok_or(IrError::RegisterOutOfRange {
                index: clbit.creg.0,
                num_cregs: self.cregs.len(),
            })?;
        if clbit.offset >= reg.size {
            return Err(IrError::OffsetOutOfRange {
                register: reg.name.clone(),
                offset: clbit.offset,
                size: reg.size,
            });
        }
        Ok(())
    }

    fn push_gate(&mut self, gate: impl Into<Gate>, qubits: &[QubitId]) -> IrResult<&mut Self> {
        let gate = gate.into();
        for &q in qubits {
            self.check_qubit(q)?;
        }
        for (i, &q) in qubits.iter().enumerate() {
            if qubits[..i].contains(&q) {
                return Err(IrError::DuplicateQubit {
                    qubit: q,
                    gate_name: gate.name().to_string(),
                });
            }
        }
        self.instructions
            .push(Instruction::gate(gate, qubits.iter().copied()));
        Ok(self)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply identity gate.
    pub fn i(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::I, &[qubit])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::X, &[qubit])
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::Y, &[qubit])
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::Z, &[qubit])
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::H, &[qubit])
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::S, &[qubit])
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::Sdg, &[qubit])
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::T, &[qubit])
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::Tdg, &[qubit])
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::Rx(theta), &[qubit])
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::Ry(theta), &[qubit])
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::Rz(theta), &[qubit])
    }

    /// Apply phase gate.
    pub fn phase(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::Phase(theta), &[qubit])
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT gate.
    pub fn cnot(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::Cnot, &[control, target])
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::Cz, &[control, target])
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::Swap, &[q1, q2])
    }

    /// Apply iSWAP gate.
    pub fn iswap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::ISwap, &[q1, q2])
    }

    /// Apply controlled-phase gate.
    pub fn cphase(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::CPhase(theta), &[control, target])
    }

    // =========================================================================
    // Quil two-qubit gate family
    // =========================================================================

    /// Apply XY(θ) gate.
    pub fn xy(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.push_gate(QuilGate::XY(theta), &[q1, q2])
    }

    /// Apply XY(θ) under its parametric-iSWAP alias.
    pub fn piswap(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.xy(theta, q1, q2)
    }

    /// Apply PSWAP(θ) gate.
    pub fn pswap(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.push_gate(QuilGate::PSwap(theta), &[q1, q2])
    }

    /// Apply CPHASE00(θ) gate.
    pub fn cphase00(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push_gate(QuilGate::CPhase00(theta), &[control, target])
    }

    /// Apply CPHASE01(θ) gate.
    pub fn cphase01(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push_gate(QuilGate::CPhase01(theta), &[control, target])
    }

    /// Apply CPHASE10(θ) gate.
    pub fn cphase10(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push_gate(QuilGate::CPhase10(theta), &[control, target])
    }

    /// Apply CAN(α, β, γ) gate.
    pub fn can(
        &mut self,
        alpha: f64,
        beta: f64,
        gamma: f64,
        q1: QubitId,
        q2: QubitId,
    ) -> IrResult<&mut Self> {
        self.push_gate(QuilGate::Can(alpha, beta, gamma), &[q1, q2])
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Apply an arbitrary gate.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        let qubits: Vec<_> = qubits.into_iter().collect();
        self.push_gate(gate, &qubits)
    }

    /// Measure a qubit into a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitRef) -> IrResult<&mut Self> {
        self.check_qubit(qubit)?;
        self.check_clbit(clbit)?;
        self.instructions.push(Instruction::measure(qubit, clbit));
        Ok(self)
    }

    /// Measure every qubit into the register at matching offsets.
    pub fn measure_all(&mut self, creg: CregId) -> IrResult<&mut Self> {
        for q in 0..self.num_qubits {
            self.measure(QubitId(q), ClbitRef::new(creg, q))?;
        }
        Ok(self)
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        let qubits: Vec<_> = qubits.into_iter().collect();
        for &q in &qubits {
            self.check_qubit(q)?;
        }
        self.instructions.push(Instruction::barrier(qubits));
        Ok(self)
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = (0..self.num_qubits).map(QubitId).collect();
        self.instructions.push(Instruction::barrier(qubits));
        Ok(self)
    }

    /// Reset a qubit to |0⟩.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.check_qubit(qubit)?;
        self.instructions.push(Instruction::reset(qubit));
        Ok(self)
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    /// Set the compiler rewiring directive, e.g. `"NAIVE"` or `"PARTIAL"`.
    pub fn set_rewiring(&mut self, directive: impl Into<String>) {
        self.rewiring = Some(directive.into());
    }

    /// Enable or disable active qubit reset at the start of execution.
    pub fn set_active_reset(&mut self, enable: bool) {
        self.active_reset = enable;
    }

    /// Get the rewiring directive, if set.
    pub fn rewiring(&self) -> Option<&str> {
        self.rewiring.as_deref()
    }

    /// Whether active reset is enabled.
    pub fn active_reset(&self) -> bool {
        self.active_reset
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Get the classical registers.
    pub fn cregs(&self) -> &[ClassicalRegister] {
        &self.cregs
    }

    /// Get the instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the circuit has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Build a copy of this circuit keeping only instructions matching the
    /// predicate. Registers and metadata carry over unchanged.
    pub fn filtered(&self, keep: impl Fn(&Instruction) -> bool) -> Self {
        Self {
            name: self.name.clone(),
            num_qubits: self.num_qubits,
            cregs: self.cregs.clone(),
            instructions: self
                .instructions
                .iter()
                .filter(|inst| keep(inst))
                .cloned()
                .collect(),
            rewiring: self.rewiring.clone(),
            active_reset: self.active_reset,
        }
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit with measurement into `ro`.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_readout("bell", 2, 2);
        let ro = CregId(0);
        circuit
            .h(QubitId(0))?
            .cnot(QubitId(0), QubitId(1))?
            .measure(QubitId(0), ClbitRef::new(ro, 0))?
            .measure(QubitId(1), ClbitRef::new(ro, 1))?;
        Ok(circuit)
    }

    /// Create a GHZ state circuit with measurement into `ro`.
    pub fn ghz(n: u32) -> IrResult<Self> {
        if n == 0 {
            return Ok(Self::new("ghz_0", 0));
        }
        let mut circuit = Self::with_readout("ghz", n, n);
        circuit.h(QubitId(0))?;
        for i in 0..n - 1 {
            circuit.cnot(QubitId(i), QubitId(i + 1))?;
        }
        circuit.measure_all(CregId(0))?;
        Ok(circuit)
    }
}

/// Iterate gate instructions only, skipping measures, barriers and resets.
pub fn gate_instructions(circuit: &Circuit) -> impl Iterator<Item = &Instruction> {
    circuit
        .instructions()
        .iter()
        .filter(|inst| matches!(inst.kind, InstructionKind::Gate(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test", 3);
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 3);
        assert!(circuit.is_empty());
        assert!(circuit.cregs().is_empty());
    }

    #[test]
    fn test_with_readout() {
        let circuit = Circuit::with_readout("test", 2, 2);
        assert_eq!(circuit.cregs().len(), 1);
        assert_eq!(circuit.cregs()[0].name, "ro");
        assert_eq!(circuit.cregs()[0].size, 2);
    }

    #[test]
    fn test_fluent_api() {
        let mut circuit = Circuit::with_readout("test", 2, 2);
        let ro = CregId(0);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cnot(QubitId(0), QubitId(1))
            .unwrap()
            .measure(QubitId(0), ClbitRef::new(ro, 0))
            .unwrap()
            .measure(QubitId(1), ClbitRef::new(ro, 1))
            .unwrap();
        assert_eq!(circuit.len(), 4);
    }

    #[test]
    fn test_qubit_out_of_range() {
        let mut circuit = Circuit::new("test", 1);
        let err = circuit.h(QubitId(5)).unwrap_err();
        assert!(matches!(err, IrError::QubitOutOfRange { .. }));
    }

    #[test]
    fn test_duplicate_qubit_rejected() {
        let mut circuit = Circuit::new("test", 2);
        let err = circuit.cnot(QubitId(0), QubitId(0)).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
    }

    #[test]
    fn test_measure_bounds() {
        let mut circuit = Circuit::with_readout("test", 2, 1);
        let err = circuit
            .measure(QubitId(0), ClbitRef::new(CregId(0), 3))
            .unwrap_err();
        assert!(matches!(err, IrError::OffsetOutOfRange { .. }));

        let err = circuit
            .measure(QubitId(0), ClbitRef::new(CregId(7), 0))
            .unwrap_err();
        assert!(matches!(err, IrError::RegisterOutOfRange { .. }));
    }

    #[test]
    fn test_duplicate_register_rejected() {
        let mut circuit = Circuit::with_readout("test", 2, 2);
        let err = circuit.add_creg("ro", 1).unwrap_err();
        assert!(matches!(err, IrError::DuplicateRegister(_)));
    }

    #[test]
    fn test_rename_creg_updates_references() {
        let mut circuit = Circuit::new("test", 1);
        let c = circuit.add_creg("answer", 1).unwrap();
        circuit.measure(QubitId(0), ClbitRef::new(c, 0)).unwrap();

        circuit.rename_creg(c, "ro").unwrap();
        assert_eq!(circuit.creg(c).unwrap().name, "ro");
        // The measurement still points at the same register id.
        assert_eq!(circuit.instructions()[0].clbits[0].creg, c);
    }

    #[test]
    fn test_bell_state() {
        let circuit = Circuit::bell().unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.len(), 4);
    }

    #[test]
    fn test_quil_gates_fluent() {
        let mut circuit = Circuit::new("test", 2);
        circuit
            .xy(PI, QubitId(0), QubitId(1))
            .unwrap()
            .pswap(PI / 2.0, QubitId(0), QubitId(1))
            .unwrap()
            .can(0.1, 0.2, 0.3, QubitId(0), QubitId(1))
            .unwrap();
        assert_eq!(circuit.len(), 3);
    }

    #[test]
    fn test_filtered_strips_barriers() {
        let mut circuit = Circuit::new("test", 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.barrier_all().unwrap();
        circuit.x(QubitId(1)).unwrap();

        let no_barriers = circuit.filtered(|inst| !inst.is_barrier());
        assert_eq!(no_barriers.len(), 2);
        assert_eq!(circuit.len(), 3, "original circuit untouched");
    }

    #[test]
    fn test_metadata() {
        let mut circuit = Circuit::new("test", 1);
        assert!(circuit.rewiring().is_none());
        assert!(!circuit.active_reset());

        circuit.set_rewiring("NAIVE");
        circuit.set_active_reset(true);
        assert_eq!(circuit.rewiring(), Some("NAIVE"));
        assert!(circuit.active_reset());
    }
}
