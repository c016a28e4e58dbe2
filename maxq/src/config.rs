use std::path::PathBuf;

use crate::{ErrorAction, ErrorDevice, ErrorItems};

/// Environment variable overriding [`SpiceConfig::content_root`]
pub const CONTENT_ROOT_VAR: &str = "MAXQ_CONTENT_ROOT";

/// Initial settings of a [`SpiceContext`](crate::SpiceContext).
///
/// Relative kernel paths are resolved against `content_root`. The error
/// settings are applied to the toolkit when the context is created; the
/// defaults make the toolkit return silently, so every failure reaches the
/// caller as an [`Error`](crate::Error).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpiceConfig {
    pub content_root: PathBuf,
    pub error_action: ErrorAction,
    pub error_output: ErrorItems,
    pub error_device: ErrorDevice,
}

impl Default for SpiceConfig {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("."),
            error_action: ErrorAction::Return,
            error_output: ErrorItems::empty(),
            error_device: ErrorDevice::Screen,
        }
    }
}

impl SpiceConfig {
    /// Defaults, with the content root taken from `MAXQ_CONTENT_ROOT` if set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(root) = std::env::var_os(CONTENT_ROOT_VAR).filter(|r| !r.is_empty()) {
            config.content_root = PathBuf::from(root);
        }
        config
    }

    pub fn with_content_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.content_root = root.into();
        self
    }
}
