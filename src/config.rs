use std::env;

use once_cell::sync::Lazy;

/// Environment variable that turns deferred-import classification on for the
/// process. Anything other than a truthy value leaves imports fully eager.
pub const LAZY_IMPORTS_ENV: &str = "THEBES_LAZY_IMPORTS";

static ENV_SWITCH: Lazy<bool> = Lazy::new(|| {
    let value = env::var(LAZY_IMPORTS_ENV).ok();
    parse_switch(value.as_deref())
});

fn parse_switch(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1") | Some("true") | Some("on")
    )
}

/// Process-start-time import configuration.
///
/// The switch is read once; flipping the environment variable after startup
/// has no effect, matching the rule that classification happens once per
/// binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportConfig {
    lazy_imports: bool,
}

impl ImportConfig {
    /// Reads the enable switch from the environment. Default is off: absent
    /// or non-truthy values preserve fully-eager behavior.
    pub fn from_env() -> Self {
        Self {
            lazy_imports: *ENV_SWITCH,
        }
    }

    pub fn enabled() -> Self {
        Self { lazy_imports: true }
    }

    pub fn disabled() -> Self {
        Self {
            lazy_imports: false,
        }
    }

    pub fn lazy_imports(&self) -> bool {
        self.lazy_imports
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self::disabled()
    }
}
