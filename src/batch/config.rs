//! Batch configuration.
//!
//! Loads the analysis batch from TOML: the slice to analyze, the shared
//! constants, optional custom layouts and one entry per configuration run.

use crate::classifier::{FrameLayout, LayoutTable, Slice, Strategy};
use crate::utils::config::{Constants, MIN_HEADER_ROWS};
use crate::utils::error::ConfigurationError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Complete batch file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
    /// Slice the packet metrics are computed for
    pub slice: Slice,

    #[serde(default)]
    pub constants: Constants,

    /// Configuration runs, in presentation order
    #[serde(default, rename = "run")]
    pub runs: Vec<RunConfig>,

    /// Layouts added to the built-in table
    #[serde(default, rename = "layout")]
    pub layouts: Vec<FrameLayout>,
}

/// One configuration: a strategy, a mobility condition and its file set
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RunConfig {
    /// Configuration label, e.g. `2-100-6`
    pub label: String,

    pub strategy: Strategy,

    #[serde(default)]
    pub mobility: bool,

    /// Name of the layout the traces follow
    pub layout: String,

    /// Trace files, concatenated in order
    pub files: Vec<PathBuf>,
}

/// A loaded and validated batch
#[derive(Debug, Clone)]
pub struct Batch {
    pub config: BatchConfig,

    /// Built-in layouts plus the batch's own
    pub layouts: LayoutTable,
}

impl Batch {
    /// Layout of a run, already checked at load time
    pub fn layout_for(&self, run: &RunConfig) -> Result<&FrameLayout, ConfigurationError> {
        self.layouts.get(&run.layout)
    }
}

/// Load a batch from a TOML file
///
/// Relative trace paths are resolved against the batch file's directory.
///
/// # Arguments
/// * `path` - Path to the TOML batch file
///
/// # Errors
/// * `ConfigurationError::IoError` - If file cannot be read
/// * `ConfigurationError::ParseFailed` - If TOML is invalid
/// * Any layout or run validation error, see `parse_batch`
///
/// # Example
/// ```ignore
/// let batch = load_batch("batch.toml")?;
/// ```
pub fn load_batch(path: impl AsRef<Path>) -> Result<Batch, ConfigurationError> {
    let path = path.as_ref();
    info!("Loading batch: {}", path.display());

    let contents = fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

    parse_batch(&contents, base_dir)
}

/// Parse and validate a batch from TOML text
///
/// **Public** - used by `load_batch` and tests
///
/// # Errors
/// * `ConfigurationError::ParseFailed` - invalid TOML or unknown fields values
/// * `ConfigurationError::InvalidConstant` - non-positive constants or too few header rows
/// * `ConfigurationError::DuplicateLayout` - custom layout reuses a name
/// * `ConfigurationError::UnknownLayout` - a run names a missing layout
/// * `ConfigurationError::InvalidRun` - empty file list or strategy mismatch
/// * Layout validation errors from `FrameLayout::validate`
pub fn parse_batch(contents: &str, base_dir: &Path) -> Result<Batch, ConfigurationError> {
    let mut config: BatchConfig = toml::from_str(contents)?;

    validate_constants(&config.constants)?;

    let mut layouts = LayoutTable::reference()?;
    for layout in &config.layouts {
        layouts.insert(layout.clone())?;
    }

    for run in &mut config.runs {
        validate_run(run, &layouts)?;
        run.files = run
            .files
            .iter()
            .map(|file| resolve_path(base_dir, file))
            .collect();
    }

    debug!(
        "Batch: slice {}, {} runs, {} custom layouts",
        config.slice,
        config.runs.len(),
        config.layouts.len()
    );

    Ok(Batch { config, layouts })
}

fn validate_constants(constants: &Constants) -> Result<(), ConfigurationError> {
    if constants.packet_size_bytes == 0 {
        return Err(ConfigurationError::InvalidConstant(
            "packet_size_bytes must be positive".to_string(),
        ));
    }

    if constants.header_rows < MIN_HEADER_ROWS {
        return Err(ConfigurationError::InvalidConstant(format!(
            "header_rows must be at least {}, got {}",
            MIN_HEADER_ROWS, constants.header_rows
        )));
    }

    if !(constants.simulation_time_s > 0.0 && constants.simulation_time_s.is_finite()) {
        return Err(ConfigurationError::InvalidConstant(format!(
            "simulation_time_s must be positive, got {}",
            constants.simulation_time_s
        )));
    }

    Ok(())
}

fn validate_run(run: &RunConfig, layouts: &LayoutTable) -> Result<(), ConfigurationError> {
    let invalid = |reason: String| ConfigurationError::InvalidRun {
        run: run.label.clone(),
        reason,
    };

    if run.files.is_empty() {
        return Err(invalid("no trace files".to_string()));
    }

    let layout = layouts.get(&run.layout)?;
    if layout.strategy != run.strategy {
        return Err(invalid(format!(
            "strategy '{}' does not match layout '{}' ({})",
            run.strategy, layout.name, layout.strategy
        )));
    }

    Ok(())
}

/// Absolute paths are kept, relative ones are joined to the batch directory
fn resolve_path(base_dir: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        base_dir.join(file)
    }
}
