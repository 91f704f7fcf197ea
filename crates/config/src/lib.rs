//! Configuration loading, validation and env substitution.
//!
//! Config file: `regina.toml`, searched in `./` then the user config dir
//! (`~/.config/regina/` on Linux). Every string value may reference
//! `${ENV_VAR}` placeholders.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{config_dir, discover_and_load, find_config_file, load_config},
    schema::{BotConfig, ReginaConfig, RelayConfig, SlackConfig, StoreConfig},
    validate::{Diagnostic, Severity, ValidationResult, validate},
};
