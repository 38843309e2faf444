use serde::{Deserialize, Serialize};

use crate::types::identifiers::{BenchmarkName, Division, Family};

/// Outcome reported by a solver, or expected for a benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Sat,
    Unsat,
    /// `starexec-unknown`, `unknown`, `--`, timeouts, empty cells.
    Unknown,
}

impl Verdict {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sat" => Verdict::Sat,
            "unsat" => Verdict::Unsat,
            _ => Verdict::Unknown,
        }
    }

    pub fn is_definite(self) -> bool {
        self != Verdict::Unknown
    }
}

/// One solver run (job pair) on a benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    pub solver: String,
    pub status: Option<String>,
    pub result: Verdict,
    pub expected: Verdict,
    pub cpu_time: Option<f64>,
    pub wallclock_time: Option<f64>,
}

impl JobResult {
    /// A definite answer contradicting a known expected status.
    pub fn is_wrong(&self) -> bool {
        self.result.is_definite() && self.expected.is_definite() && self.result != self.expected
    }

    pub fn is_correct(&self) -> bool {
        self.result.is_definite() && !self.is_wrong()
    }

    pub fn solved_within(&self, seconds: f64) -> bool {
        self.is_correct() && self.wallclock_time.is_some_and(|t| t <= seconds)
    }
}

/// A benchmark together with every job pair the export holds for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub name: BenchmarkName,
    /// First spelling of the path in the export, as written out.
    pub path: String,
    pub division: Division,
    pub family: Family,
    pub results: Vec<JobResult>,
}

impl BenchmarkRecord {
    pub fn expected(&self) -> Verdict {
        self.results
            .iter()
            .map(|r| r.expected)
            .find(|v| v.is_definite())
            .unwrap_or(Verdict::Unknown)
    }
}
