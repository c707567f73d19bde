use std::path::Path;

use serde::Deserialize;

use crate::error::Error;
use crate::model::{PageGeometry, Spacing};

/// Settings fixed for one export.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub geometry: PageGeometry,
    pub spacing: Spacing,
    /// Page background; slices are flattened onto it.
    pub background: [u8; 3],
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::default(),
            spacing: Spacing::default(),
            background: [255, 255, 255],
        }
    }
}

impl ExportConfig {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.geometry.validate()?;
        self.spacing.validate()
    }
}
