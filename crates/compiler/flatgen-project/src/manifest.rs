use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// File name searched for during project discovery
pub const MANIFEST_FILE_NAME: &str = "flatgen.toml";

/// Output representation of the unit register
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmitFormat {
    /// Textual `struct`/`enum` listing
    #[default]
    Listing,
    /// The register serialized as a JSON array of units
    Json,
}

impl fmt::Display for EmitFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listing => write!(f, "listing"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for EmitFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "listing" => Ok(Self::Listing),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown emit format '{other}' (expected 'listing' or 'json')"
            )),
        }
    }
}

/// Contents of a `flatgen.toml` manifest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProjectManifest {
    /// Name of the project
    pub name: String,
    /// Declaration tree to translate (relative to the manifest)
    pub input: PathBuf,
    /// Where to write the output; stdout when absent
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub emit: EmitFormat,
}

impl ProjectManifest {
    /// Load manifest from a file path
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_file_content(&content)
    }

    pub fn from_file_content(content: &str) -> anyhow::Result<Self> {
        let manifest: Self = toml::from_str(content).map_err(|e| {
            tracing::error!("Failed to parse TOML: {}", e);
            e
        })?;
        Ok(manifest)
    }
}
