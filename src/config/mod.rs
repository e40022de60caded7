//! Configuration merge system
//!
//! Implements the 4-layer configuration merge:
//! 1. Built-in defaults
//! 2. User config (~/.config/suitekit/config.toml)
//! 3. Project config (suitekit.toml)
//! 4. CLI overrides (--set key=value)
//!
//! Layers are combined with the deep merge from `suitekit-merge`.

mod defaults;
mod effective;
mod settings;

pub use defaults::BuiltinDefaults;
pub use effective::{
    parse_override, parse_overrides, user_config_path, ConfigError, ConfigOrigin, ConfigSource,
    EffectiveConfig, PROJECT_CONFIG_FILE,
};
pub use settings::{PlatformKind, SequenceConfig, ToolConfig};
