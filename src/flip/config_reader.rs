use crate::flip::*;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_SUMMARY_OUTPUT: &str = "flip_results.csv";
pub const DEFAULT_DETAILS_OUTPUT: &str = "flip_details.csv";

/// The optional JSON configuration file. Every entry can also be passed on the command line.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlipConfig {
    #[serde(rename = "inputFile")]
    pub input_file: Option<String>,
    #[serde(rename = "inputType")]
    pub input_type: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "summaryOutput")]
    pub summary_output: Option<String>,
    #[serde(rename = "detailsOutput")]
    pub details_output: Option<String>,
    #[serde(rename = "jsonOutput")]
    pub json_output: Option<String>,
    #[serde(rename = "startYear")]
    pub start_year: Option<u32>,
    #[serde(rename = "endYear")]
    pub end_year: Option<u32>,
    #[serde(rename = "majorityThreshold")]
    pub majority_threshold: Option<u32>,
}

pub fn read_config(path: &str) -> FlipResult<FlipConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: FlipConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    Ok(config)
}

/// Paths in the configuration are relative to the directory of the configuration file.
/// `stdout` is kept as is.
pub fn resolve_path(root: &str, path: &str) -> String {
    if path == "stdout" || root.is_empty() || Path::new(path).is_absolute() {
        return path.to_string();
    }
    let p: PathBuf = [root, path].iter().collect();
    p.as_path().display().to_string()
}
