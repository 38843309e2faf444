//! CSV loader for results exports.
//!
//! Header names are normalized (trimmed, lower-cased, spaces replaced by `_`)
//! so both `wallclock time` and `wallclock_time` are accepted. Required
//! columns: benchmark, solver, result, wallclock_time. Optional: expected,
//! cpu_time, status.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::record::{JobResult, Verdict};
use super::{Dataset, DatasetBuilder};
use crate::config::FamilyChoice;

pub const REQUIRED_COLUMNS: [&str; 4] = ["benchmark", "solver", "result", "wallclock_time"];

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("{path}: malformed row at line {line}: {source}")]
    Malformed {
        path: PathBuf,
        line: u64,
        #[source]
        source: csv::Error,
    },
    #[error("{path}: empty benchmark name at line {line}")]
    EmptyBenchmark { path: PathBuf, line: u64 },
}

#[derive(Debug, Deserialize)]
struct RawRow {
    benchmark: String,
    #[serde(default)]
    solver: String,
    #[serde(default)]
    result: String,
    #[serde(default)]
    wallclock_time: Option<f64>,
    #[serde(default)]
    expected: Option<String>,
    #[serde(default)]
    cpu_time: Option<f64>,
    #[serde(default)]
    status: Option<String>,
}

impl RawRow {
    /// Listing rows name a benchmark without any solver run.
    fn into_job(self) -> Option<JobResult> {
        if self.solver.is_empty() {
            return None;
        }
        Some(JobResult {
            solver: self.solver,
            status: self.status.filter(|s| !s.is_empty()),
            result: Verdict::parse(&self.result),
            expected: self
                .expected
                .as_deref()
                .map_or(Verdict::Unknown, Verdict::parse),
            cpu_time: self.cpu_time,
            wallclock_time: self.wallclock_time,
        })
    }
}

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

/// Load a dataset from a CSV reader. `origin` only labels errors.
pub fn load_dataset<R: Read>(
    reader: R,
    origin: &Path,
    family: FamilyChoice,
) -> Result<Dataset, InputError> {
    let malformed = |line: u64, source: csv::Error| InputError::Malformed {
        path: origin.to_path_buf(),
        line,
        source,
    };

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(|e| malformed(1, e))?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        warn!(path = %origin.display(), "empty results file, treating as no benchmarks");
        return Ok(Dataset::empty());
    }

    let normalized: StringRecord = headers.iter().map(normalize_header).collect();
    for column in REQUIRED_COLUMNS {
        if !normalized.iter().any(|h| h == column) {
            return Err(InputError::MissingColumn {
                path: origin.to_path_buf(),
                column,
            });
        }
    }
    csv_reader.set_headers(normalized);

    let mut builder = DatasetBuilder::new(family);
    let mut rows = 0usize;
    for result in csv_reader.deserialize::<RawRow>() {
        let mut row = result.map_err(|e| {
            let line = e.position().map_or(0, |p| p.line());
            malformed(line, e)
        })?;
        rows += 1;

        let benchmark = std::mem::take(&mut row.benchmark);
        builder
            .push(&benchmark, row.into_job())
            .map_err(|_| InputError::EmptyBenchmark {
                path: origin.to_path_buf(),
                // header is line 1
                line: rows as u64 + 1,
            })?;
    }

    let dataset = builder.finish();
    debug!(
        path = %origin.display(),
        rows,
        benchmarks = dataset.len(),
        "loaded results"
    );
    Ok(dataset)
}

/// Load a dataset from a CSV file path.
pub fn load_dataset_file(path: &Path, family: FamilyChoice) -> Result<Dataset, InputError> {
    let file = File::open(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_dataset(file, path, family)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "\
pair id,benchmark,benchmark id,solver,solver id,configuration,status,cpu time,wallclock time,memory usage,result,expected
1,SMT-LIB/QF_BV/sage/app1/a.smt2,10,z3,1,default,complete,0.2,0.2,100,sat,sat
2,SMT-LIB/QF_BV/sage/app1/a.smt2,10,cvc4,2,default,complete,0.4,0.4,100,sat,sat
3,SMT-LIB/QF_BV/sage/app2/b.smt2,11,z3,1,default,timeout (wallclock),1200,1200.1,100,starexec-unknown,unsat
";

    #[test]
    fn rows_fold_into_benchmarks() {
        let dataset = load_dataset(EXPORT.as_bytes(), Path::new("export.csv"), FamilyChoice::Bot).unwrap();
        assert_eq!(dataset.len(), 2);

        let a = dataset.get_str("QF_BV/sage/app1/a.smt2").unwrap();
        assert_eq!(a.path, "SMT-LIB/QF_BV/sage/app1/a.smt2");
        assert_eq!(a.results.len(), 2);
        assert_eq!(a.division.as_str(), "QF_BV");
        assert_eq!(a.family.as_str(), "sage/app1");

        let b = dataset.get_str("QF_BV/sage/app2/b.smt2").unwrap();
        assert_eq!(b.results[0].result, Verdict::Unknown);
        assert_eq!(b.results[0].status.as_deref(), Some("timeout (wallclock)"));
        assert_eq!(b.expected(), Verdict::Unsat);
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = "benchmark,solver,result\nQF_BV/a/x.smt2,z3,sat\n";
        let err = load_dataset(csv.as_bytes(), Path::new("x.csv"), FamilyChoice::Bot).unwrap_err();
        assert!(matches!(err, InputError::MissingColumn { column: "wallclock_time", .. }));
    }

    #[test]
    fn bad_number_is_malformed() {
        let csv = "benchmark,solver,result,wallclock time\nQF_BV/a/x.smt2,z3,sat,fast\n";
        let err = load_dataset(csv.as_bytes(), Path::new("x.csv"), FamilyChoice::Bot).unwrap_err();
        assert!(matches!(err, InputError::Malformed { .. }));
    }

    #[test]
    fn empty_input_is_an_empty_dataset() {
        let dataset = load_dataset("".as_bytes(), Path::new("old.csv"), FamilyChoice::Bot).unwrap();
        assert!(dataset.is_empty());

        let header_only = "benchmark,solver,result,wallclock time\n";
        let dataset = load_dataset(header_only.as_bytes(), Path::new("old.csv"), FamilyChoice::Bot).unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn listing_rows_have_no_results() {
        let csv = "benchmark,solver,result,wallclock_time\na,,,\nb,,,\n";
        let dataset = load_dataset(csv.as_bytes(), Path::new("new.csv"), FamilyChoice::Bot).unwrap();
        assert_eq!(dataset.len(), 2);
        assert!(dataset.iter().all(|r| r.results.is_empty()));
    }

    #[test]
    fn empty_benchmark_cell_is_rejected() {
        let csv = "benchmark,solver,result,wallclock_time\na,z3,sat,0.1\n,z3,sat,0.1\n";
        let err = load_dataset(csv.as_bytes(), Path::new("new.csv"), FamilyChoice::Bot).unwrap_err();
        assert!(matches!(err, InputError::EmptyBenchmark { line: 3, .. }));
    }
}
