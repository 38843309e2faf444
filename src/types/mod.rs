pub mod identifiers;
pub mod selection_result;

pub use identifiers::{BenchmarkName, BenchmarkNameError, ContentDigest, Division, Family};
pub use selection_result::{DivisionSummary, SelectionError, SelectionMetadata, SelectionResult};
