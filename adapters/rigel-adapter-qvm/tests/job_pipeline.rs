//! End-to-end tests of the job pipeline against the local QVM.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rigel_adapter_qvm::QvmComputer;
use rigel_ir::{Circuit, ClbitRef, QubitId};
use rigel_provider::{
    enable_active_reset, Backend, Executable, ExecutionOptions, HookChain, ProviderError,
    ProviderResult, QuantumComputer, ReadoutMemory,
};
use rigel_quil::{parse, Program, QuilInstruction};

/// Wraps the QVM, counting wire-contract calls and capturing compile input.
struct RecordingComputer {
    inner: QvmComputer,
    compile_calls: AtomicUsize,
    run_calls: AtomicUsize,
    last_compiled_source: Mutex<Option<String>>,
}

impl RecordingComputer {
    fn new(num_qubits: u32) -> Self {
        Self {
            inner: QvmComputer::new(num_qubits),
            compile_calls: AtomicUsize::new(0),
            run_calls: AtomicUsize::new(0),
            last_compiled_source: Mutex::new(None),
        }
    }

    fn compile_count(&self) -> usize {
        self.compile_calls.load(Ordering::SeqCst)
    }

    fn run_count(&self) -> usize {
        self.run_calls.load(Ordering::SeqCst)
    }
}

impl QuantumComputer for RecordingComputer {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn num_qubits(&self) -> u32 {
        self.inner.num_qubits()
    }

    fn compile(&self, source: &str) -> ProviderResult<Program> {
        self.compile_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_compiled_source.lock().unwrap() = Some(source.to_string());
        self.inner.compile(source)
    }

    fn link(&self, program: &Program) -> ProviderResult<Executable> {
        self.inner.link(program)
    }

    fn run(&self, executable: &Executable, shots: u32) -> ProviderResult<ReadoutMemory> {
        self.run_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.run(executable, shots)
    }
}

/// A circuit measuring every qubit into the readout register, optionally
/// with an H on qubit 0 first.
fn named_circuit(name: &str, num_qubits: u32, readout_name: &str, hadamard: bool) -> Circuit {
    let mut circuit = Circuit::new(name, num_qubits);
    let creg = circuit.add_creg(readout_name, num_qubits).unwrap();
    if hadamard {
        circuit.h(QubitId(0)).unwrap();
    }
    for q in 0..num_qubits {
        circuit.measure(QubitId(q), ClbitRef::new(creg, q)).unwrap();
    }
    circuit
}

fn make_circuit(num_qubits: u32, readout_name: &str, hadamard: bool) -> Circuit {
    named_circuit("test", num_qubits, readout_name, hadamard)
}

#[test]
fn test_run_simple_circuit() {
    let backend = Backend::new(Arc::new(QvmComputer::new(3)));
    let circuit = make_circuit(2, "ro", false);

    let job = backend
        .run_one(&circuit, ExecutionOptions::new().with_shots(10))
        .unwrap();
    assert_eq!(job.status().to_string(), "Running");

    let result = job.result().unwrap();
    assert_eq!(job.status().to_string(), "Done");
    assert_eq!(result.backend_name, "3q-qvm");
    assert_eq!(&result.job_id, job.id());
    assert!(result.success);

    let record = &result.results[0];
    assert_eq!(record.name, "test");
    assert_eq!(record.shots, 10);
    assert_eq!(record.counts.observed(), vec!["00"]);
}

#[test]
fn test_run_multiple_circuits_in_order() {
    let backend = Backend::new(Arc::new(QvmComputer::new(3)));
    let circuit1 = named_circuit("first", 2, "ro", false);
    let circuit2 = named_circuit("second", 3, "ro", false);

    let job = backend
        .run(
            &[circuit1, circuit2],
            ExecutionOptions::new().with_shots(10),
        )
        .unwrap();
    let result = job.result().unwrap();

    assert_eq!(result.results.len(), 2);
    assert_eq!(result.results[0].name, "first");
    assert_eq!(result.results[0].shots, 10);
    assert_eq!(result.results[0].counts.observed(), vec!["00"]);
    assert_eq!(result.results[1].name, "second");
    assert_eq!(result.results[1].shots, 10);
    assert_eq!(result.results[1].counts.observed(), vec!["000"]);
}

#[test]
fn test_superposed_qubit_counts() {
    let backend = Backend::new(Arc::new(QvmComputer::new(2)));
    let circuit = make_circuit(2, "ro", true);

    let job = backend
        .run_one(&circuit, ExecutionOptions::new().with_shots(10))
        .unwrap();
    let result = job.result().unwrap();

    let record = &result.results[0];
    assert_eq!(record.shots, 10);
    assert_eq!(record.memory.len(), 10);
    // Qubit 1 is deterministic, qubit 0 superposed: only "00" and "01".
    for bits in record.counts.observed() {
        assert!(bits == "00" || bits == "01", "unexpected outcome {bits}");
    }
}

#[test]
fn test_superposed_qubit_sees_both_outcomes() {
    let backend = Backend::new(Arc::new(QvmComputer::new(2)));
    let circuit = make_circuit(2, "ro", true);

    let job = backend
        .run_one(&circuit, ExecutionOptions::new().with_shots(1000))
        .unwrap();
    let result = job.result().unwrap();

    // With 1000 shots, missing one side of the superposition is beyond
    // astronomically unlikely.
    assert_eq!(result.results[0].counts.observed(), vec!["00", "01"]);
    assert_eq!(result.results[0].counts.total(), 1000);
}

#[test]
fn test_barrier_stripped_and_original_untouched() {
    let backend = Backend::new(Arc::new(QvmComputer::new(2)));
    let mut circuit = make_circuit(2, "ro", false);
    circuit.barrier_all().unwrap();
    let len_before = circuit.len();

    let job = backend
        .run_one(&circuit, ExecutionOptions::new().with_shots(10))
        .unwrap();

    assert_eq!(circuit.len(), len_before, "caller's circuit not mutated");
    let result = job.result().unwrap();
    assert_eq!(result.results[0].counts.observed(), vec!["00"]);
}

#[test]
fn test_readout_register_renamed() {
    let backend = Backend::new(Arc::new(QvmComputer::new(2)));
    let circuit = make_circuit(2, "not_ro", false);

    let job = backend
        .run_one(&circuit, ExecutionOptions::new().with_shots(10))
        .unwrap();

    assert_eq!(circuit.cregs()[0].name, "not_ro", "caller's circuit kept");
    assert_eq!(job.circuits()[0].cregs()[0].name, "ro");

    let result = job.result().unwrap();
    assert_eq!(result.results[0].counts.observed(), vec!["00"]);
}

#[test]
fn test_multiple_readout_registers_rejected() {
    let backend = Backend::new(Arc::new(QvmComputer::new(2)));
    let mut circuit = Circuit::new("test", 2);
    let c = circuit.add_creg("c", 1).unwrap();
    let c2 = circuit.add_creg("c2", 1).unwrap();
    circuit.measure(QubitId(0), ClbitRef::new(c, 0)).unwrap();
    circuit.measure(QubitId(1), ClbitRef::new(c2, 0)).unwrap();

    let err = backend
        .run_one(&circuit, ExecutionOptions::new())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unsupported circuit: Multiple readout registers are unsupported; found c, c2"
    );
}

#[test]
fn test_oversized_circuit_fails_construction() {
    let backend = Backend::new(Arc::new(QvmComputer::new(2)));
    // Twice as many qubits as the backend exposes.
    let circuit = make_circuit(4, "ro", false);

    let err = backend
        .run_one(&circuit, ExecutionOptions::new())
        .unwrap_err();
    assert!(matches!(err, ProviderError::UnsupportedCircuit(_)));
}

#[test]
fn test_before_compile_hook_sees_emitted_source() {
    let qc = Arc::new(RecordingComputer::new(2));
    let backend = Backend::new(Arc::clone(&qc) as Arc<dyn QuantumComputer>);
    let circuit = make_circuit(2, "ro", true);

    let expected_source =
        "DECLARE ro BIT[2]\nH 0\nMEASURE 0 ro[0]\nMEASURE 1 ro[1]\n".to_string();
    let replacement = "DECLARE ro BIT[2]\nMEASURE 0 ro[0]\nMEASURE 1 ro[1]\n".to_string();
    let sent = replacement.clone();

    let options = ExecutionOptions::new().with_before_compile_hook(move |source: String| {
        assert_eq!(source, expected_source);
        Ok(sent.clone())
    });
    backend.run_one(&circuit, options).unwrap();

    // The compiler received the hook's output.
    let compiled = qc.last_compiled_source.lock().unwrap().clone().unwrap();
    assert_eq!(compiled, replacement);
}

#[test]
fn test_multiple_before_compile_hooks_chain() {
    let qc = Arc::new(RecordingComputer::new(2));
    let backend = Backend::new(Arc::clone(&qc) as Arc<dyn QuantumComputer>);
    let circuit = make_circuit(2, "ro", true);

    let step1 = "DECLARE ro BIT[2]\nMEASURE 0 ro[0]\nMEASURE 1 ro[1]\n".to_string();
    let step2 = "DECLARE ro BIT[2]\nDECLARE x BIT[2]\nMEASURE 0 ro[0]\nMEASURE 1 ro[1]\n"
        .to_string();

    let sent1 = step1.clone();
    let expect1 = step1.clone();
    let sent2 = step2.clone();
    let hooks = HookChain::new()
        .with(move |_| Ok(sent1.clone()))
        .with(move |source: String| {
            assert_eq!(source, expect1);
            Ok(sent2.clone())
        });

    backend
        .run_one(&circuit, ExecutionOptions::new().with_before_compile(hooks))
        .unwrap();

    let compiled = qc.last_compiled_source.lock().unwrap().clone().unwrap();
    assert_eq!(compiled, step2);
}

#[test]
fn test_before_execute_hook_sees_native_program() {
    let qc = Arc::new(RecordingComputer::new(2));
    let backend = Backend::new(Arc::clone(&qc) as Arc<dyn QuantumComputer>);
    let circuit = make_circuit(2, "ro", true);

    // What compile #1 must produce for this circuit.
    let expected_native = parse(
        "DECLARE ro BIT[2]\nRZ(pi) 0\nRX(pi/2) 0\nRZ(pi/2) 0\nRX(-pi/2) 0\nMEASURE 0 ro[0]\nMEASURE 1 ro[1]\n",
    )
    .unwrap();
    let replacement = parse("DECLARE x BIT[1]\n").unwrap();

    let sent = replacement.clone();
    let options = ExecutionOptions::new().with_before_execute_hook(move |program: Program| {
        assert_eq!(program, expected_native);
        Ok(sent.clone())
    });
    let job = backend.run_one(&circuit, options).unwrap();

    assert_eq!(job.programs()[0], replacement);
}

#[test]
fn test_multiple_before_execute_hooks_chain() {
    let backend = Backend::new(Arc::new(QvmComputer::new(2)));
    let circuit = make_circuit(2, "ro", false);

    let step1 = parse("DECLARE x BIT[1]\n").unwrap();
    let step2 = parse("DECLARE x BIT[1]\nDECLARE y BIT[1]\n").unwrap();

    let sent1 = step1.clone();
    let expect1 = step1.clone();
    let sent2 = step2.clone();
    let hooks = HookChain::new()
        .with(move |_| Ok(sent1.clone()))
        .with(move |program: Program| {
            assert_eq!(program, expect1);
            Ok(sent2.clone())
        });

    let job = backend
        .run_one(&circuit, ExecutionOptions::new().with_before_execute(hooks))
        .unwrap();
    assert_eq!(job.programs()[0], step2);
}

#[test]
fn test_ensure_native_recompiles_once_more() {
    let qc = Arc::new(RecordingComputer::new(2));
    let backend = Backend::new(Arc::clone(&qc) as Arc<dyn QuantumComputer>);
    let circuit = make_circuit(2, "ro", true);

    let options = ExecutionOptions::new()
        .with_before_execute_hook(enable_active_reset)
        .with_ensure_native(true);
    let job = backend.run_one(&circuit, options).unwrap();

    assert_eq!(qc.compile_count(), 2, "compile not performed correct number of times");
    assert!(matches!(
        job.programs()[0].instructions()[0],
        QuilInstruction::Reset
    ));
}

#[test]
fn test_ensure_native_ignored_without_pre_execution_hooks() {
    let qc = Arc::new(RecordingComputer::new(2));
    let backend = Backend::new(Arc::clone(&qc) as Arc<dyn QuantumComputer>);
    let circuit = make_circuit(2, "ro", true);

    backend
        .run_one(&circuit, ExecutionOptions::new().with_ensure_native(true))
        .unwrap();

    assert_eq!(qc.compile_count(), 1, "compile not performed correct number of times");
}

#[test]
fn test_ensure_native_false_compiles_once() {
    let qc = Arc::new(RecordingComputer::new(2));
    let backend = Backend::new(Arc::clone(&qc) as Arc<dyn QuantumComputer>);
    let circuit = make_circuit(2, "ro", true);

    let options = ExecutionOptions::new()
        .with_before_execute_hook(enable_active_reset)
        .with_ensure_native(false);
    backend.run_one(&circuit, options).unwrap();

    assert_eq!(qc.compile_count(), 1, "compile not performed correct number of times");
}

#[test]
fn test_result_cached_without_second_execution() {
    let qc = Arc::new(RecordingComputer::new(2));
    let backend = Backend::new(Arc::clone(&qc) as Arc<dyn QuantumComputer>);
    let circuit = make_circuit(2, "ro", true);

    let job = backend
        .run_one(&circuit, ExecutionOptions::new().with_shots(100))
        .unwrap();

    let first = job.result().unwrap();
    let second = job.result().unwrap();

    assert_eq!(first.date, second.date, "Result not cached");
    assert_eq!(first, second);
    assert_eq!(qc.run_count(), 1);
}

#[test]
fn test_cancel_and_submit_unsupported() {
    let backend = Backend::new(Arc::new(QvmComputer::new(2)));
    let circuit = make_circuit(2, "ro", false);
    let job = backend
        .run_one(&circuit, ExecutionOptions::new().with_shots(5))
        .unwrap();

    let err = job.cancel().unwrap_err();
    assert_eq!(err.to_string(), "Cancelling jobs is not supported");
    let err = job.submit().unwrap_err();
    assert!(err.to_string().contains("synchronous request/response"));

    job.result().unwrap();

    // Still unsupported once the job is done.
    assert!(job.cancel().is_err());
    assert!(job.submit().is_err());
}

#[test]
fn test_execution_failure_surfaces_and_is_not_cached() {
    let backend = Backend::new(Arc::new(QvmComputer::new(2)));
    let circuit = make_circuit(2, "ro", false);

    // Rewrite the program so it measures into memory that was never
    // declared; this only blows up at link time, i.e. on the first
    // result() call.
    let broken = parse("MEASURE 0 oops[0]\n").unwrap();
    let options = ExecutionOptions::new().with_before_execute_hook(move |_| Ok(broken.clone()));
    let job = backend.run_one(&circuit, options).unwrap();

    assert_eq!(job.status().to_string(), "Running");
    let err = job.result().unwrap_err();
    assert!(matches!(err, ProviderError::Execution(_)));
    assert_eq!(job.status().to_string(), "Error");
}

#[test]
fn test_rewiring_and_active_reset_metadata_flow_through() {
    let qc = Arc::new(RecordingComputer::new(2));
    let backend = Backend::new(Arc::clone(&qc) as Arc<dyn QuantumComputer>);
    let mut circuit = make_circuit(2, "ro", false);
    circuit.set_rewiring("NAIVE");
    circuit.set_active_reset(true);

    let job = backend
        .run_one(&circuit, ExecutionOptions::new().with_shots(10))
        .unwrap();

    let compiled = qc.last_compiled_source.lock().unwrap().clone().unwrap();
    assert!(compiled.starts_with("PRAGMA INITIAL_REWIRING \"NAIVE\"\nRESET\n"));
    let result = job.result().unwrap();
    assert_eq!(result.results[0].counts.observed(), vec!["00"]);
}

#[test]
fn test_quil_gate_family_end_to_end() {
    let backend = Backend::new(Arc::new(QvmComputer::new(2)));
    // X 0; XY(pi) 0 1 moves the excitation from qubit 0 to qubit 1.
    let mut circuit = Circuit::new("xy", 2);
    let ro = circuit.add_creg("ro", 2).unwrap();
    circuit.x(QubitId(0)).unwrap();
    circuit.xy(std::f64::consts::PI, QubitId(0), QubitId(1)).unwrap();
    circuit.measure(QubitId(0), ClbitRef::new(ro, 0)).unwrap();
    circuit.measure(QubitId(1), ClbitRef::new(ro, 1)).unwrap();

    let job = backend
        .run_one(&circuit, ExecutionOptions::new().with_shots(50))
        .unwrap();
    let result = job.result().unwrap();

    // ro[1] = 1, ro[0] = 0 → bitstring "10".
    assert_eq!(result.results[0].counts.observed(), vec!["10"]);
}
