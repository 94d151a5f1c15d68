//! Runtime environment mode.

use serde::{Deserialize, Serialize};

use crate::constants::{PROFILE_DEV, PROFILE_DEVELOPMENT, PROFILE_PRODUCTION};

/// Process-wide environment mode.
///
/// Decides what happens when the cache cannot be reached: development
/// degrades to a placeholder handle, production aborts startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentMode {
    #[default]
    Development,
    Production,
}

impl EnvironmentMode {
    /// Interpret a profile value.
    ///
    /// Unset or blank means development. Any value that is not a
    /// development spelling is treated as production.
    pub fn from_profile(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => EnvironmentMode::Development,
            Some(v)
                if v.eq_ignore_ascii_case(PROFILE_DEV)
                    || v.eq_ignore_ascii_case(PROFILE_DEVELOPMENT) =>
            {
                EnvironmentMode::Development
            }
            Some(_) => EnvironmentMode::Production,
        }
    }

    /// Check if a placeholder handle may stand in for an unreachable cache
    pub fn allows_degraded_cache(&self) -> bool {
        matches!(self, EnvironmentMode::Development)
    }
}

impl std::fmt::Display for EnvironmentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvironmentMode::Development => write!(f, "{}", PROFILE_DEVELOPMENT),
            EnvironmentMode::Production => write!(f, "{}", PROFILE_PRODUCTION),
        }
    }
}
