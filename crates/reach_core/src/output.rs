//! Rendering of policy objects.

use crate::error::{Error, Result};
use std::str::FromStr;
use tsb_model::Object;

/// Output format for rendered policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One YAML document per object (default).
    #[default]
    Yaml,
    /// A JSON array of objects.
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// Renders objects in the given format.
///
/// # Errors
///
/// Returns an error if an object cannot be serialized.
pub fn render(objects: &[Object], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => {
            let documents = objects
                .iter()
                .map(serde_yaml::to_string)
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(documents.join("---\n"))
        }
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(objects)?;
            json.push('\n');
            Ok(json)
        }
    }
}
