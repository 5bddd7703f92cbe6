//! Camera and navigation options with TOML preset support.
//!
//! All tweakable settings (projection, initial pose, navigator tuning,
//! keybindings) are consolidated here. Options serialize to/from TOML so a
//! preset directory can hold named camera setups.

mod camera;
mod keybindings;
mod navigator;

use std::path::Path;

pub use camera::CameraOptions;
pub use keybindings::KeybindingOptions;
pub use navigator::NavigatorOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::KernelError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[navigator]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema)]
#[serde(default)]
pub struct Options {
    /// Camera projection and initial pose.
    pub camera: CameraOptions,
    /// Free-flight navigator tuning.
    pub navigator: NavigatorOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from a TOML string. Missing fields use defaults; the
    /// result is validated before it is returned.
    pub fn from_toml_str(content: &str) -> Result<Self, KernelError> {
        let opts: Self = toml::from_str(content)
            .map_err(|e| KernelError::OptionsParse(e.to_string()))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Check every section for values the camera or navigator would
    /// reject.
    pub fn validate(&self) -> Result<(), KernelError> {
        self.camera.validate()?;
        self.navigator.validate()
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, KernelError> {
        let content =
            std::fs::read_to_string(path).map_err(KernelError::Io)?;
        let opts = Self::from_toml_str(&content)?;
        log::debug!("loaded options from {}", path.display());
        Ok(opts)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), KernelError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| KernelError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(KernelError::Io)?;
        }
        std::fs::write(path, content).map_err(KernelError::Io)
    }

    /// Set one field by name, e.g. `("navigator", "max_speed", 8.0)`, as a
    /// settings panel would. The patched options go through serde and
    /// [`validate`](Self::validate); on any error `self` is unchanged.
    pub fn set_field(
        &mut self,
        section: &str,
        field: &str,
        value: serde_json::Value,
    ) -> Result<(), KernelError> {
        let parse_error = |e: serde_json::Error| {
            KernelError::OptionsParse(e.to_string())
        };
        let mut root = serde_json::to_value(&*self).map_err(parse_error)?;
        let slot = root
            .get_mut(section)
            .and_then(|s| s.get_mut(field))
            .ok_or_else(|| {
                KernelError::OptionsParse(format!(
                    "unknown option {section}.{field}"
                ))
            })?;
        *slot = value;
        let updated: Self = serde_json::from_value(root).map_err(parse_error)?;
        updated.validate()?;
        *self = updated;
        log::debug!("set option {section}.{field}");
        Ok(())
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}
