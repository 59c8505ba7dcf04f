//! Battery configuration handling

use indexmap::IndexMap;
use miette::{IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use sqlecho_core::corpus::{CorpusRunConfig, Preprocess};

/// Battery configuration for sqlecho
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Ordered corpus battery
    #[serde(default, rename = "corpus")]
    pub corpora: Vec<CorpusSpec>,
}

/// One corpus: a set of files sharing a comparison mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusSpec {
    pub name: String,

    /// File glob patterns, in order
    #[serde(default)]
    pub files: Vec<String>,

    /// Require deparsed SQL to equal the input verbatim
    #[serde(default)]
    pub compare_query_text: bool,

    /// Request formatted deparser output
    #[serde(default)]
    pub pretty_print: bool,

    /// Per-file raw-text overrides, keyed by file name
    #[serde(default)]
    pub overrides: IndexMap<String, FileOverride>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileOverride {
    /// Skip to the first occurrence of this marker before splitting
    pub skip_to: Option<String>,
}

impl CorpusSpec {
    pub fn run_config(&self) -> CorpusRunConfig {
        CorpusRunConfig {
            compare_query_text: self.compare_query_text,
            pretty_print: self.pretty_print,
        }
    }

    /// Preprocessing override for one file, matched on its file name
    pub fn preprocess_for(&self, path: &Path) -> Option<Preprocess> {
        let file_name = path.file_name()?.to_str()?;
        let file_override = self.overrides.get(file_name)?;
        file_override.skip_to.clone().map(Preprocess::SkipTo)
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path).into_diagnostic()?;
        let config: Config = toml::from_str(&contents).into_diagnostic()?;
        Ok(config)
    }

    /// Try to find and load sqlecho.toml in current directory or parent directories
    pub fn find_and_load() -> Result<Option<Self>> {
        let mut current_dir = std::env::current_dir().into_diagnostic()?;

        loop {
            let config_path = current_dir.join("sqlecho.toml");
            if config_path.exists() {
                return Ok(Some(Self::from_file(&config_path)?));
            }

            // Try parent directory
            if !current_dir.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// The built-in battery matching the shipped corpus/ fixtures
    pub fn default_battery() -> Self {
        let mut lenient_overrides = IndexMap::new();
        lenient_overrides.insert(
            "strings.sql".to_string(),
            FileOverride {
                skip_to: Some("-- bytea".to_string()),
            },
        );

        Config {
            corpora: vec![
                CorpusSpec {
                    name: "strict".to_string(),
                    files: vec!["corpus/strict/*.sql".to_string()],
                    compare_query_text: true,
                    pretty_print: true,
                    overrides: IndexMap::new(),
                },
                CorpusSpec {
                    name: "lenient".to_string(),
                    files: vec!["corpus/lenient/*.sql".to_string()],
                    compare_query_text: false,
                    pretty_print: false,
                    overrides: lenient_overrides,
                },
            ],
        }
    }
}
