//! # KarU Terminal Entry Point
//!
//! ## Startup Sequence
//! 1. Parse arguments
//! 2. Initialize tracing (logging)
//! 3. Load configuration layers
//! 4. Connect to the configured backend
//! 5. Run the requested screen

use clap::Parser;

use karu_terminal::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The actual setup is in lib.rs for better testability
    karu_terminal::run(Cli::parse()).await
}
