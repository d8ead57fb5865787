//! The local QVM: compiler and executor in one.

use rustc_hash::FxHashMap;
use std::time::Instant;
use tracing::{debug, instrument};

use rigel_provider::{
    BackendConfig, Executable, ProviderError, ProviderResult, QuantumComputer, ReadoutMemory,
};
use rigel_quil::{parse, Program, QuilInstruction};

use crate::error::QvmError;
use crate::statevector::Statevector;
use crate::translate;

/// Default qubit count when configuration does not specify one.
const DEFAULT_NUM_QUBITS: u32 = 8;

/// A local statevector QVM.
///
/// Implements the full compile/link/run contract: `compile` parses Quil
/// source and rewrites it into the native gate set, `link` validates
/// memory references and seals the program, and `run` simulates the
/// program shot by shot with projective measurement.
///
/// As a virtual machine it executes the whole recognized gate set, not
/// just native gates, so programs mutated by pre-execution hooks without
/// nativeness enforcement still run.
pub struct QvmComputer {
    config: BackendConfig,
    num_qubits: u32,
}

impl QvmComputer {
    /// Create a QVM exposing the given number of qubits, named `"{n}q-qvm"`.
    pub fn new(num_qubits: u32) -> Self {
        Self {
            config: BackendConfig::new(format!("{num_qubits}q-qvm")),
            num_qubits,
        }
    }

    /// Create a QVM from configuration, reading `num_qubits` from the
    /// extra fields.
    pub fn from_config(config: BackendConfig) -> Self {
        let num_qubits = config
            .extra
            .get("num_qubits")
            .and_then(serde_json::Value::as_u64)
            .map_or(DEFAULT_NUM_QUBITS, |v| v as u32);
        Self { config, num_qubits }
    }

    /// The backend configuration.
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn check_capacity(&self, program: &Program) -> ProviderResult<()> {
        if let Some(qubit) = program.max_qubit() {
            if qubit >= self.num_qubits {
                return Err(ProviderError::UnsupportedCircuit(format!(
                    "Circuit uses qubit {qubit} but {} exposes only {} qubits",
                    self.config.name, self.num_qubits
                )));
            }
        }
        Ok(())
    }

    fn simulate_shot(&self, program: &Program) -> Result<Vec<u8>, QvmError> {
        let num_qubits = program.max_qubit().map_or(0, |q| q as usize + 1);
        let mut sv = Statevector::new(num_qubits);
        let mut regions: FxHashMap<String, Vec<u8>> = FxHashMap::default();

        for instruction in program.instructions() {
            match instruction {
                QuilInstruction::Declare { name, size } => {
                    regions.insert(name.clone(), vec![0; *size as usize]);
                }
                QuilInstruction::Pragma { .. } => {}
                QuilInstruction::Reset => sv.reset_all(),
                QuilInstruction::ResetQubit { qubit } => sv.reset_qubit(*qubit as usize),
                QuilInstruction::Gate {
                    name,
                    params,
                    qubits,
                } => {
                    let qubits: Vec<usize> = qubits.iter().map(|q| *q as usize).collect();
                    sv.apply_gate(name, params, &qubits)?;
                }
                QuilInstruction::Measure { qubit, target } => {
                    let bit = sv.measure(*qubit as usize);
                    let region = regions
                        .get_mut(&target.name)
                        .ok_or_else(|| QvmError::UndeclaredMemory(target.name.clone()))?;
                    let region_size = region.len() as u32;
                    let slot = region.get_mut(target.index as usize).ok_or(
                        QvmError::MemoryIndexOutOfRange {
                            region: target.name.clone(),
                            index: target.index,
                            size: region_size,
                        },
                    )?;
                    *slot = bit;
                }
            }
        }

        Ok(regions.remove("ro").unwrap_or_default())
    }
}

impl QuantumComputer for QvmComputer {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    #[instrument(skip(self, source))]
    fn compile(&self, source: &str) -> ProviderResult<Program> {
        let program = parse(source)?;
        self.check_capacity(&program)?;
        let native = translate::to_native(&program)?;
        debug!(
            instructions = native.len(),
            "compiled program to native gate set"
        );
        Ok(native)
    }

    fn link(&self, program: &Program) -> ProviderResult<Executable> {
        // Linker-level validation: every measurement must land in declared
        // memory.
        for instruction in program.instructions() {
            if let QuilInstruction::Measure { target, .. } = instruction {
                match program.declared_size(&target.name) {
                    None => {
                        return Err(QvmError::UndeclaredMemory(target.name.clone()).into());
                    }
                    Some(size) if target.index >= size => {
                        return Err(QvmError::MemoryIndexOutOfRange {
                            region: target.name.clone(),
                            index: target.index,
                            size,
                        }
                        .into());
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(Executable::new(program.clone()))
    }

    #[instrument(skip(self, executable))]
    fn run(&self, executable: &Executable, shots: u32) -> ProviderResult<ReadoutMemory> {
        let program = executable.program();
        if let Some(qubit) = program.max_qubit() {
            if qubit >= self.num_qubits {
                return Err(QvmError::TooManyQubits {
                    qubit,
                    num_qubits: self.num_qubits,
                }
                .into());
            }
        }

        let start = Instant::now();
        let mut rows = Vec::with_capacity(shots as usize);
        for _ in 0..shots {
            rows.push(self.simulate_shot(program)?);
        }
        debug!(shots, elapsed = ?start.elapsed(), "simulation completed");

        Ok(ReadoutMemory::new(rows))
    }
}
