//! Job result types.

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::job::JobId;
use crate::qpu::ReadoutMemory;

/// Occurrence counts of observed readout bitstrings.
///
/// Bitstrings are oriented with readout offset 0 as the rightmost
/// character, so a superposed qubit measured into `ro[0]` produces "…0"
/// and "…1".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts(FxHashMap<String, u64>);

impl Counts {
    /// Create an empty counts map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation of a bitstring.
    pub fn record(&mut self, bitstring: impl Into<String>) {
        *self.0.entry(bitstring.into()).or_insert(0) += 1;
    }

    /// Get the count for a bitstring (zero if never observed).
    pub fn get(&self, bitstring: &str) -> u64 {
        self.0.get(bitstring).copied().unwrap_or(0)
    }

    /// The most frequently observed bitstring, if any.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.0
            .iter()
            .max_by_key(|(_, count)| **count)
            .map(|(bits, count)| (bits.as_str(), *count))
    }

    /// Observed bitstrings, lexicographically sorted.
    pub fn observed(&self) -> Vec<&str> {
        let mut bits: Vec<_> = self.0.keys().map(String::as_str).collect();
        bits.sort_unstable();
        bits
    }

    /// Iterate over (bitstring, count) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(bits, count)| (bits.as_str(), *count))
    }

    /// Number of distinct bitstrings observed.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of observations.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }
}

impl From<FxHashMap<String, u64>> for Counts {
    fn from(map: FxHashMap<String, u64>) -> Self {
        Self(map)
    }
}

/// Render one readout row as a bitstring, offset 0 rightmost.
pub(crate) fn bitstring(row: &[u8]) -> String {
    row.iter()
        .rev()
        .map(|bit| if *bit == 0 { '0' } else { '1' })
        .collect()
}

/// Outcome record for a single circuit in a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitResult {
    /// Name of the circuit.
    pub name: String,
    /// Whether execution succeeded.
    pub success: bool,
    /// Human-readable status.
    pub status: String,
    /// Number of shots executed.
    pub shots: u32,
    /// Raw per-shot readout rows as bitstrings, in shot order.
    pub memory: Vec<String>,
    /// Derived bitstring occurrence counts.
    pub counts: Counts,
}

impl CircuitResult {
    /// Build a successful record from raw readout memory.
    pub(crate) fn from_memory(name: &str, shots: u32, memory: &ReadoutMemory) -> Self {
        let rows: Vec<String> = memory.rows().iter().map(|row| bitstring(row)).collect();
        let mut counts = Counts::new();
        for row in &rows {
            counts.record(row.clone());
        }
        Self {
            name: name.to_string(),
            success: true,
            status: "Completed successfully".to_string(),
            shots,
            memory: rows,
            counts,
        }
    }
}

/// Aggregated result of one job: per-circuit records in submission order,
/// tagged with the backend and job identity.
///
/// Created once, lazily, on the first result request, and cached by the
/// job thereafter; repeated queries return an equal value with the same
/// `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    /// Name of the backend that executed the job.
    pub backend_name: String,
    /// Identifier of the job that produced this result.
    pub job_id: JobId,
    /// Whether every circuit succeeded.
    pub success: bool,
    /// When the result was computed.
    pub date: DateTime<Utc>,
    /// Per-circuit records, in submission order.
    pub results: Vec<CircuitResult>,
}

impl JobResult {
    /// Counts for the circuit at `index`.
    pub fn counts(&self, index: usize) -> Option<&Counts> {
        self.results.get(index).map(|r| &r.counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_record_and_get() {
        let mut counts = Counts::new();
        counts.record("00");
        counts.record("00");
        counts.record("01");

        assert_eq!(counts.get("00"), 2);
        assert_eq!(counts.get("01"), 1);
        assert_eq!(counts.get("11"), 0);
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.most_frequent(), Some(("00", 2)));
        assert_eq!(counts.observed(), vec!["00", "01"]);
    }

    #[test]
    fn test_bitstring_offset_zero_rightmost() {
        // ro[0] = 1, ro[1] = 0  →  "01"
        assert_eq!(bitstring(&[1, 0]), "01");
        assert_eq!(bitstring(&[0, 1]), "10");
        assert_eq!(bitstring(&[1, 1, 0]), "011");
    }

    #[test]
    fn test_circuit_result_from_memory() {
        let memory = ReadoutMemory::new(vec![vec![0, 0], vec![1, 0], vec![0, 0]]);
        let record = CircuitResult::from_memory("bell", 3, &memory);

        assert!(record.success);
        assert_eq!(record.status, "Completed successfully");
        assert_eq!(record.shots, 3);
        assert_eq!(record.memory, vec!["00", "01", "00"]);
        assert_eq!(record.counts.get("00"), 2);
        assert_eq!(record.counts.get("01"), 1);
    }
}
