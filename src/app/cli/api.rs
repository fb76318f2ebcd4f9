//! Public API exports for the CLI module

pub use crate::app::cli::args::{Args, Command, DEFAULT_SERVE_ADDR};
pub use crate::app::cli::config::{
    apply_overrides, find_config_file, load_config, read_config_file, CONFIG_FILENAME,
};
