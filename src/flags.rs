//! Feature flags, resolved once at startup and passed by value.
use serde::{Deserialize, Serialize};

/// Environment variable enabling the enhanced dashboard features.
pub const DASH_PRO_ENV: &str = "NEXT_PUBLIC_DASH_PRO";
/// Environment variable enabling the second-generation UI.
pub const UI_V2_ENV: &str = "NEXT_PUBLIC_UI_V2";

fn default_dash_pro() -> bool {
    true
}

/// `[flags]` table in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureFlags {
    #[serde(default = "default_dash_pro")]
    pub dash_pro: bool,
    #[serde(default)]
    pub ui_v2: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            dash_pro: default_dash_pro(),
            ui_v2: false,
        }
    }
}

/// Any value other than exactly `false` keeps the dashboard features on.
fn parse_dash_pro(value: &str) -> bool {
    value != "false"
}

fn parse_ui_v2(value: &str) -> bool {
    value == "1" || value == "true"
}

impl FeatureFlags {
    /// Flags from an explicit environment snapshot; unset variables take
    /// their defaults.
    #[must_use]
    pub fn from_env_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self::default().with_env_overrides(vars)
    }

    /// Flags from the current process environment.
    #[must_use]
    pub fn from_process_env() -> Self {
        Self::from_env_vars(std::env::vars())
    }

    /// Replace each flag whose variable appears in `vars`.
    #[must_use]
    pub fn with_env_overrides<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            match key.as_ref() {
                DASH_PRO_ENV => self.dash_pro = parse_dash_pro(value.as_ref()),
                UI_V2_ENV => self.ui_v2 = parse_ui_v2(value.as_ref()),
                _ => {}
            }
        }
        self
    }

    /// Pick the v2 variant when the new UI is enabled.
    pub fn select_ui<T>(&self, v2: T, fallback: T) -> T {
        if self.ui_v2 {
            v2
        } else {
            fallback
        }
    }
}
