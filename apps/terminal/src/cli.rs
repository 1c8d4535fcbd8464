//! Command-line surface
//!
//! ```text
//! karu [--config <file>] [--db <path>] <command>
//!
//!   dashboard    today's sales, revenue, customers, low stock
//!   products     sellable catalog
//!   customers    customer list
//!   sale         interactive checkout session
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "karu", version, about = "KarU Mart point of sale")]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "KARU_CONFIG")]
    pub config: Option<PathBuf>,

    /// Local database file; overrides the configured path
    #[arg(long, global = true, env = "KARU_DB_PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show the dashboard
    Dashboard,
    /// List sellable products
    Products,
    /// List customers
    Customers,
    /// Start an interactive sale
    Sale,
}
