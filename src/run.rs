//! One selection run: load, select, write.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::{ConfigError, FamilyChoice, SelectionConfig};
use crate::dataset::{load_dataset, Dataset, InputError};
use crate::output::manifest::ManifestInputs;
use crate::output::{InputFile, OutputError, SelectionManifest, StagedFile};
use crate::selection::Selector;
use crate::types::identifiers::ContentDigest;
use crate::types::selection_result::{SelectionError, SelectionResult};

#[derive(Debug, Clone)]
pub struct RunRequest {
    pub new_csv: PathBuf,
    /// Absent means no prior benchmarks.
    pub old_csv: Option<PathBuf>,
    pub out: PathBuf,
    pub manifest: Option<PathBuf>,
    pub config: SelectionConfig,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub result: SelectionResult,
    pub digest: ContentDigest,
}

pub fn run(request: &RunRequest) -> Result<RunReport, SelectionError> {
    let config = &request.config;
    config.validate()?;
    if request.manifest.as_deref() == Some(request.out.as_path()) {
        return Err(ConfigError::OutputCollision(request.out.clone()).into());
    }

    let (new, new_file) = read_input(&request.new_csv, config.family)?;
    let (old, old_file) = match &request.old_csv {
        Some(path) => {
            let (dataset, file) = read_input(path, config.family)?;
            (dataset, Some(file))
        }
        None => (Dataset::empty(), None),
    };
    info!(new = new.len(), old = old.len(), seed = config.seed, filter = config.filter, "loaded results");

    let result = Selector::new(config.clone()).select(&new, &old);

    // Stage everything before publishing anything
    let list = StagedFile::stage(&request.out, result.render().as_bytes())?;
    let manifest = match &request.manifest {
        Some(path) => {
            let inputs = ManifestInputs {
                new_csv: new_file,
                old_csv: old_file,
            };
            let manifest = SelectionManifest::new(config, inputs, &result, list.digest().clone());
            let json = manifest.to_json().map_err(OutputError::from)?;
            Some(StagedFile::stage(path, &json)?)
        }
        None => None,
    };

    // Manifest first; a failed list commit removes it again
    if let Some(manifest) = manifest {
        manifest.commit()?;
    }
    let digest = match list.commit() {
        Ok(digest) => digest,
        Err(err) => {
            if let Some(path) = &request.manifest {
                if let Err(cleanup) = fs::remove_file(path) {
                    warn!(manifest = %path.display(), error = %cleanup, "failed to retract manifest");
                }
            }
            return Err(err.into());
        }
    };

    info!(
        selected = result.names.len(),
        out = %request.out.display(),
        digest = digest.as_str(),
        "selection written"
    );
    Ok(RunReport { result, digest })
}

fn read_input(path: &Path, family: FamilyChoice) -> Result<(Dataset, InputFile), InputError> {
    let bytes = fs::read(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = load_dataset(bytes.as_slice(), path, family)?;
    Ok((dataset, InputFile::new(path, &bytes)))
}
