//! Platform detection for browser-specific sync behavior.

use std::sync::OnceLock;

use selvage_core::SyncConfig;

/// Cached platform detection results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Platform {
    pub ios: bool,
    pub mac: bool,
    pub android: bool,
    pub gecko: bool,
}

impl Platform {
    /// Cmd is the primary modifier.
    pub fn is_apple(&self) -> bool {
        self.mac || self.ios
    }
}

static PLATFORM: OnceLock<Platform> = OnceLock::new();

/// Get cached platform info. Detection runs once on first call.
pub fn platform() -> &'static Platform {
    PLATFORM.get_or_init(detect_platform)
}

/// Platform quirks applied on top of a [`SyncConfig`].
pub trait ForPlatform {
    fn for_platform(self, platform: &Platform) -> Self;
}

impl ForPlatform for SyncConfig {
    fn for_platform(mut self, platform: &Platform) -> Self {
        // mobile browsers scroll the caret into view on their own
        if platform.ios || platform.android {
            self.scroll_into_view = false;
        }
        // Gecko drops focus after some programmatic selection writes
        if platform.gecko {
            self.refocus_after_write = true;
        }
        // Android IMEs rewrite the selection representation constantly
        if platform.android {
            self.resync_on_equal_select = false;
        }
        self
    }
}

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
fn detect_platform() -> Platform {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return Platform::default(),
    };

    let navigator = window.navigator();
    let user_agent = navigator.user_agent().unwrap_or_default().to_lowercase();
    let platform_str = navigator.platform().unwrap_or_default().to_lowercase();

    // iPadOS reports a Mac platform but has touch
    let ios = user_agent.contains("iphone")
        || user_agent.contains("ipad")
        || user_agent.contains("ipod")
        || (platform_str.contains("mac") && navigator.max_touch_points() > 0);

    let mac = platform_str.contains("mac") && !ios;
    let android = user_agent.contains("android");
    let gecko = user_agent.contains("gecko/") && !user_agent.contains("like gecko");

    Platform {
        ios,
        mac,
        android,
        gecko,
    }
}

#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
fn detect_platform() -> Platform {
    Platform::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_platform() {
        let android = Platform {
            android: true,
            ..Platform::default()
        };
        let config = SyncConfig::default().for_platform(&android);
        assert!(!config.scroll_into_view);
        assert!(!config.resync_on_equal_select);

        let gecko = Platform {
            gecko: true,
            ..Platform::default()
        };
        assert!(SyncConfig::default().for_platform(&gecko).refocus_after_write);
        assert_eq!(
            SyncConfig::default().for_platform(&Platform::default()),
            SyncConfig::default()
        );
    }
}
