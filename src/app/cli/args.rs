//! Command-line arguments
//!
//! Global options come before the command. Anything that also exists in the
//! configuration file overrides the file value when given here.

use crate::core::logging::LogFormat;
use crate::core::version::long_version;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_SERVE_ADDR: &str = "127.0.0.1:5174";

#[derive(Parser, Debug, Clone)]
#[command(name = "verstamp")]
#[command(about = "Version metadata artifacts for web builds")]
#[command(version, long_version = long_version())]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Project root (overrides `root` in the configuration file)
    #[arg(short = 'r', long = "root", value_name = "DIR", global = true)]
    pub root: Option<PathBuf>,

    /// Log level
    #[arg(
        short = 'l',
        long = "log-level",
        value_name = "LEVEL",
        global = true,
        value_parser = ["trace", "debug", "info", "warn", "error", "off"]
    )]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(
        short = 'o',
        long = "log-format",
        value_name = "FORMAT",
        global = true,
        default_value = "text",
        value_parser = ["text", "simple", "ext", "json"]
    )]
    pub log_format: String,

    /// Log file path
    #[arg(short = 'f', long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Force coloured log output
    #[arg(long = "color", global = true, conflicts_with = "no_color")]
    pub color: bool,

    /// Disable coloured log output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run one build pass: write the artifact and the type declaration
    Build {
        /// Build mode recorded in the snapshot
        #[arg(short = 'm', long = "mode", default_value = "production")]
        mode: String,
    },

    /// Serve the version endpoint with live values
    Serve {
        /// Address to listen on
        #[arg(short = 'a', long = "addr", default_value = DEFAULT_SERVE_ADDR)]
        addr: SocketAddr,

        #[arg(short = 'm', long = "mode", default_value = "development")]
        mode: String,
    },

    /// Print the projected artifact without writing anything
    Show {
        #[arg(short = 'm', long = "mode", default_value = "production")]
        mode: String,
    },

    /// Compare a running deployment with the local artifact
    Check {
        /// URL of the deployed version endpoint
        url: String,

        /// Keep polling at this interval (seconds)
        #[arg(short = 'w', long = "watch", value_name = "SECONDS")]
        watch: Option<u64>,
    },
}

impl Args {
    /// Parsed `--log-format`; clap has already restricted the values
    pub fn log_format(&self) -> LogFormat {
        self.log_format.parse().unwrap_or_default()
    }

    /// Colour decision: explicit flags win, otherwise follow the terminal
    pub fn use_color(&self, is_terminal: bool) -> bool {
        match (self.color, self.no_color) {
            (true, _) => true,
            (_, true) => false,
            _ => is_terminal,
        }
    }
}
