use config::{Config, Environment, File as ConfigFile, FileFormat, FileSourceFile};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

pub const DEFAULT_DATASET_DIR: &str = "dataset";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Directory holding the `*.csv` datasets to summarize.
    pub dataset_dir: String,
    /// Glob patterns matched against file names; matching files are skipped.
    pub ignore_patterns: Vec<String>,
    /// Summarize files on the rayon pool instead of one after another.
    pub parallel: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_dir: DEFAULT_DATASET_DIR.to_string(),
            ignore_patterns: Vec::new(),
            parallel: false,
        }
    }
}

/// Load `Config.toml` (optional) layered under `DATASET_SCOPE_*` environment variables.
pub fn load_configuration() -> Result<AppConfig> {
    load_with(ConfigFile::with_name("Config").required(false))
}

/// Same layering as `load_configuration`, reading an explicit (optional) file.
pub fn load_configuration_from(path: &Path) -> Result<AppConfig> {
    load_with(ConfigFile::from(path).required(false))
}

fn load_with(file: ConfigFile<FileSourceFile, FileFormat>) -> Result<AppConfig> {
    let builder = Config::builder()
        .set_default("dataset_dir", DEFAULT_DATASET_DIR)?
        .set_default("ignore_patterns", Vec::<String>::new())?
        .set_default("parallel", false)?
        .add_source(file)
        .add_source(
            Environment::with_prefix("DATASET_SCOPE")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("ignore_patterns"),
        )
        .build()?;
    Ok(builder.try_deserialize::<AppConfig>()?)
}
