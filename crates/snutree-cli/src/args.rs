//! Command-line argument definitions for the snutree CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, the directory schema, the layout seed and logging verbosity.

use clap::{Parser, ValueEnum};
use serde::Deserialize;

/// Directory schemas understood by the CLI.
#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SchemaName {
    /// `name`, `big_name`, `pledge_semester`
    Basic,
    /// `key`, `name`, `big_key`, `pledge_semester`
    Keyed,
    /// `child`, `mother`, `founded`
    Chapter,
    /// Sigma Nu directories keyed by badge; needs a chapter
    Sigmanu,
}

/// Command-line arguments for the snutree family tree tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Member directories (.csv or .toml)
    #[arg(required = true, help = "Paths to the input directories")]
    pub inputs: Vec<String>,

    /// Output path; `.dot` writes DOT source, other extensions run Graphviz
    #[arg(short, long, default_value = "out.dot")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory schema, overriding the configuration file
    #[arg(short, long, value_enum)]
    pub schema: Option<SchemaName>,

    /// Primary chapter for the sigmanu schema
    #[arg(long)]
    pub chapter: Option<String>,

    /// Seed for the layout shuffle, overriding the configuration file
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
