//! Sync-loop configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables for the selection sync loop.
///
/// Deserializes from camelCase JSON so a JS host can pass it straight
/// through; missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncConfig {
    /// Sampling interval for `selectionchange`.
    pub selection_throttle_ms: u64,
    /// Remove native ranges inside the editor when the model selection is
    /// unset.
    pub clear_unset_selection: bool,
    /// Scroll the caret into view after writing the native selection.
    pub scroll_into_view: bool,
    /// Focus the editor root again once a write settles (Gecko drops focus
    /// on some programmatic selection changes).
    pub refocus_after_write: bool,
    /// When a `select` event maps to the current model selection, re-push
    /// the model selection instead of dispatching.
    pub resync_on_equal_select: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            selection_throttle_ms: 100,
            clear_unset_selection: true,
            scroll_into_view: true,
            refocus_after_write: false,
            resync_on_equal_select: true,
        }
    }
}

impl SyncConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SyncConfig = serde_json::from_str(json)?;
        if config.selection_throttle_ms == 0 {
            return Err(ConfigError::ZeroThrottle);
        }
        Ok(config)
    }

    pub fn selection_throttle(&self) -> Duration {
        Duration::from_millis(self.selection_throttle_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_fills_defaults() {
        let config = SyncConfig::from_json(r#"{"selectionThrottleMs": 50}"#).unwrap();
        assert_eq!(config.selection_throttle(), Duration::from_millis(50));
        assert!(config.clear_unset_selection);
        assert!(config.resync_on_equal_select);
        assert!(!config.refocus_after_write);
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(matches!(
            SyncConfig::from_json(r#"{"selectionThrottleMs": 0}"#),
            Err(ConfigError::ZeroThrottle)
        ));
        assert!(matches!(
            SyncConfig::from_json(r#"{"scrollIntoView": "yes"}"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(SyncConfig::default()).unwrap();
        assert_eq!(json["selectionThrottleMs"], 100);
        assert_eq!(json["clearUnsetSelection"], true);
    }
}
