use crate::classifier::Slice;
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// TOML batch file
    pub batch: PathBuf,

    /// Output path for the JSON report
    pub output_json: PathBuf,

    /// Output path for the long-format CSV (optional)
    pub output_csv: Option<PathBuf>,

    /// Overrides the batch file's slice
    pub slice: Option<Slice>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            batch: PathBuf::from("batch.toml"),
            output_json: PathBuf::from("report.json"),
            output_csv: None,
            slice: None,
            print_summary: false,
        }
    }
}
