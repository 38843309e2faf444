use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::FamilyChoice;

/// Placeholder used when a benchmark path carries no division component.
pub const NO_DIVISION: &str = "-";

/// Placeholder used when a benchmark sits directly under its division.
pub const NO_FAMILY: &str = "-";

/// Normalized benchmark key.
///
/// Results exports prefix benchmark paths with the platform space
/// (`SMT-LIB/QF_BV/family/x.smt2`). The key starts at the division component,
/// so the same benchmark matches across exports from different spaces.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BenchmarkName(String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BenchmarkNameError {
    #[error("Benchmark name is empty")]
    Empty,
}

impl BenchmarkName {
    pub fn parse(raw: &str) -> Result<Self, BenchmarkNameError> {
        let trimmed = raw.trim().replace('\\', "/");
        let components: Vec<&str> = trimmed
            .split('/')
            .filter(|c| !c.is_empty() && *c != ".")
            .collect();

        if components.is_empty() {
            return Err(BenchmarkNameError::Empty);
        }

        // The file name itself never counts as a division.
        let start = components[..components.len() - 1]
            .iter()
            .position(|c| is_division_component(c))
            .unwrap_or(0);

        Ok(BenchmarkName(components[start..].join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn division(&self) -> Division {
        match self.0.split_once('/') {
            Some((head, _)) if is_division_component(head) => Division(head.to_string()),
            _ => Division(NO_DIVISION.to_string()),
        }
    }

    pub fn family(&self, choice: FamilyChoice) -> Family {
        let below_division = match self.0.split_once('/') {
            Some((head, rest)) if is_division_component(head) => rest,
            _ => self.0.as_str(),
        };

        let family = match choice {
            FamilyChoice::Top => below_division.split_once('/').map(|(top, _)| top),
            FamilyChoice::Bot => below_division.rsplit_once('/').map(|(dir, _)| dir),
        };

        Family(family.unwrap_or(NO_FAMILY).to_string())
    }
}

impl std::fmt::Display for BenchmarkName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A logic is upper-case letters and underscores: `QF_BV`, `UFNIA`, `QF_FPLRA`.
/// Space and root directories such as `SMT-LIB` or `SMTLIB2019` never qualify.
/// An all-letter root like `SMTLIB` is still taken for a logic.
fn is_division_component(component: &str) -> bool {
    component.starts_with(|c: char| c.is_ascii_uppercase())
        && component.chars().all(|c| c.is_ascii_uppercase() || c == '_')
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Division(String);

impl Division {
    pub fn new(name: impl Into<String>) -> Self {
        Division(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_known(&self) -> bool {
        self.0 != NO_DIVISION
    }
}

impl std::fmt::Display for Division {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Family(String);

impl Family {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Content hash of an input or output file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDigest(String);

impl ContentDigest {
    pub fn from_content(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);

        let hash = hasher.finalize();
        let hex = hex::encode(hash);

        ContentDigest(format!("sha256:{hex}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First twelve hex characters, used for temp file names.
    pub fn short(&self) -> &str {
        let hex = self.0.strip_prefix("sha256:").unwrap_or(&self.0);
        &hex[..hex.len().min(12)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_prefix_is_stripped() {
        let name = BenchmarkName::parse("SMT-LIB/QF_BV/sage/app1/x.smt2").unwrap();
        assert_eq!(name.as_str(), "QF_BV/sage/app1/x.smt2");
        assert_eq!(name.division().as_str(), "QF_BV");
    }

    #[test]
    fn versioned_root_is_not_a_division() {
        let name = BenchmarkName::parse("SMTLIB2019/QF_BV/sage/x.smt2").unwrap();
        assert_eq!(name.as_str(), "QF_BV/sage/x.smt2");
        assert_eq!(name.division().as_str(), "QF_BV");
        assert_eq!(name.family(FamilyChoice::Top).as_str(), "sage");
    }

    #[test]
    fn family_top_and_bot() {
        let name = BenchmarkName::parse("QF_BV/sage/app1/x.smt2").unwrap();
        assert_eq!(name.family(FamilyChoice::Top).as_str(), "sage");
        assert_eq!(name.family(FamilyChoice::Bot).as_str(), "sage/app1");
    }

    #[test]
    fn names_without_division() {
        let name = BenchmarkName::parse("a").unwrap();
        assert_eq!(name.as_str(), "a");
        assert!(!name.division().is_known());
        assert_eq!(name.family(FamilyChoice::Bot).as_str(), NO_FAMILY);

        // Upper-case file names are not divisions.
        let name = BenchmarkName::parse("QF_BV").unwrap();
        assert!(!name.division().is_known());
    }

    #[test]
    fn flat_division_has_no_family() {
        let name = BenchmarkName::parse("./QF_LIA/x.smt2").unwrap();
        assert_eq!(name.as_str(), "QF_LIA/x.smt2");
        assert_eq!(name.family(FamilyChoice::Top).as_str(), NO_FAMILY);
    }

    #[test]
    fn empty_names_are_rejected() {
        assert_eq!(BenchmarkName::parse("  "), Err(BenchmarkNameError::Empty));
        assert_eq!(BenchmarkName::parse("//"), Err(BenchmarkNameError::Empty));
    }

    #[test]
    fn digest_is_stable() {
        let a = ContentDigest::from_content(b"a\nb\n");
        let b = ContentDigest::from_content(b"a\nb\n");
        assert_eq!(a, b);
        assert!(a.as_str().starts_with("sha256:"));
        assert_eq!(a.short().len(), 12);
    }
}
