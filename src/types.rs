//! Session data shared by the language server and the CLI.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_lsp::lsp_types::ClientCapabilities;

use crate::error::SettingsError;

/// Section requested from the client in `workspace/configuration`.
pub const SETTINGS_SECTION: &str = "classpad";

/// Problem limit used before the client has sent any configuration.
pub const DEFAULT_MAX_PROBLEMS: u32 = 1000;

/// Client-side settings for one document (or for all of them, in global scope).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_max_problems")]
    pub max_number_of_problems: u32,
}

fn default_max_problems() -> u32 {
    DEFAULT_MAX_PROBLEMS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_number_of_problems: DEFAULT_MAX_PROBLEMS,
        }
    }
}

impl Settings {
    /// Decode one item of a `workspace/configuration` response.
    ///
    /// A `null` item means the client has nothing configured for the section,
    /// which resolves to the defaults.
    pub fn from_configuration(value: Value) -> Result<Self, SettingsError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        let settings: Settings = serde_json::from_value(value)
            .map_err(|e| SettingsError::Malformed(e.to_string()))?;
        settings.validated()
    }

    /// Decode the payload of `workspace/didChangeConfiguration`.
    ///
    /// Used only in global scope. Anything missing or unusable falls back to
    /// the defaults.
    pub fn from_change_notification(payload: &Value) -> Self {
        payload
            .get(SETTINGS_SECTION)
            .cloned()
            .and_then(|section| Self::from_configuration(section).ok())
            .unwrap_or_default()
    }

    fn validated(self) -> Result<Self, SettingsError> {
        if self.max_number_of_problems == 0 {
            return Err(SettingsError::ZeroProblemLimit);
        }
        Ok(self)
    }
}

/// Optional protocol features the client declared during `initialize`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapabilityFlags {
    /// `workspace/configuration` requests are supported.
    pub configuration: bool,
    pub workspace_folders: bool,
    /// `relatedInformation` on published diagnostics is rendered.
    pub related_information: bool,
}

impl CapabilityFlags {
    pub fn from_client(capabilities: &ClientCapabilities) -> Self {
        let workspace = capabilities.workspace.as_ref();
        Self {
            configuration: workspace.and_then(|w| w.configuration).unwrap_or(false),
            workspace_folders: workspace
                .and_then(|w| w.workspace_folders)
                .unwrap_or(false),
            related_information: capabilities
                .text_document
                .as_ref()
                .and_then(|t| t.publish_diagnostics.as_ref())
                .and_then(|p| p.related_information)
                .unwrap_or(false),
        }
    }
}
