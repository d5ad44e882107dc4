//! Settings shared by the drawing workflows.
//!
//! Settings are YAML files; every field has a default, so a settings file
//! only lists what it changes:
//!
//! ```yaml
//! precision: 3
//! layers:
//!   elevation_failed: LABEL-MISSING
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::export::ExportConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Layer names entities are moved to when a workflow cannot process them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerNames {
    /// Points whose nearest label has no readable elevation
    pub elevation_failed: String,
    /// Polygons that cross themselves
    pub self_intersecting: String,
    /// Polygons with no valid offset on one side
    pub offset_failed: String,
}

impl Default for LayerNames {
    fn default() -> Self {
        Self {
            elevation_failed: "ELEV_FAILED".to_string(),
            self_intersecting: "SELF_INTERSECTING".to_string(),
            offset_failed: "OFFSET_FAILED".to_string(),
        }
    }
}

/// Workflow settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed-point digits for printed values and exported coordinates
    pub precision: usize,
    /// Name of the exported FeatureCollection
    pub export_name: String,
    /// Default offset distance (positive = outside)
    pub offset_distance: f64,
    pub layers: LayerNames,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            precision: 4,
            export_name: "slopes-input".to_string(),
            offset_distance: 1.0,
            layers: LayerNames::default(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Export configuration derived from these settings.
    pub fn export_config(&self) -> ExportConfig {
        ExportConfig {
            name: self.export_name.clone(),
            precision: self.precision,
        }
    }
}
