//! Platform configuration for the runplane orchestration core.
//!
//! Provides TOML-based configuration with:
//! - `[engine]`: workflow engine endpoint, namespace, auth, TLS policy
//! - `[containers]`: image pull policy and mount paths shared by every container
//! - `[storage]`: the shared volume claim created for each workflow
//! - `[logs]`: orchestrator node name and archived log artifact
//!
//! Config file layering (user config dir + project-local override), with
//! environment overrides for the engine URL and token.

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    LoadedConfig, load_config, load_config_file, load_config_with_options, user_config_dir,
    user_config_path,
};
pub use error::{ConfigError, Result};
pub use types::*;
