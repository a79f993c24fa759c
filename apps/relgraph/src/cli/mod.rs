//! # relgraph CLI Module
//!
//! This module implements the CLI interface for relgraph.
//!
//! ## Available Commands
//!
//! - `serve` - Start the HTTP server
//! - `status` - Show graph metrics
//! - `build` - Write the full render document
//! - `view` - Write the render document under a filter state
//! - `facets` - List facet options
//! - `detail` - Show one member's relations by type

mod commands;

use clap::{Args, Parser, Subcommand};
use relgraph::config::{RelgraphConfig, SourceConfig};
use relgraph_core::{RelationType, RelgraphError, StatusFilter};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// relgraph - member relationship graph engine
///
/// Builds a renderable graph from a members/relations snapshot and narrows it
/// with faceted filters.
#[derive(Parser, Debug)]
#[command(name = "relgraph")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file (default: ./relgraph.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Snapshot source flags; each overrides the matching `[source]` key.
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Members JSON file
    #[arg(long, global = true)]
    pub members: Option<PathBuf>,

    /// Relations JSON file
    #[arg(long, global = true)]
    pub relations: Option<PathBuf>,

    /// Patrons JSON file
    #[arg(long, global = true)]
    pub patrons_file: Option<PathBuf>,

    /// Patron referrals JSON file
    #[arg(long, global = true)]
    pub referrals_file: Option<PathBuf>,

    /// Member repository base URL (takes precedence over files)
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

impl SourceArgs {
    pub fn apply(self, source: &mut SourceConfig) {
        if self.members.is_some() {
            source.members = self.members;
        }
        if self.relations.is_some() {
            source.relations = self.relations;
        }
        if self.patrons_file.is_some() {
            source.patrons = self.patrons_file;
        }
        if self.referrals_file.is_some() {
            source.referrals = self.referrals_file;
        }
        if self.api_url.is_some() {
            source.api_url = self.api_url;
        }
    }
}

/// Filter flags for one-shot views, layered over `[filters]`.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// JSON file holding a complete filter state (replaces `[filters]`)
    #[arg(long)]
    pub filters: Option<PathBuf>,

    /// Member status: all, active or inactive
    #[arg(long)]
    pub status: Option<StatusFilter>,

    /// Minimum engagement score (0-100)
    #[arg(long)]
    pub min_score: Option<u8>,

    /// Case-insensitive search on name or email
    #[arg(long)]
    pub search: Option<String>,

    /// Hide a relation type (sponsor, team, custom); repeatable
    #[arg(long)]
    pub hide: Vec<RelationType>,

    /// Restrict a facet, as `facet=value` (e.g. `city=Lyon`); repeatable
    #[arg(long)]
    pub facet: Vec<String>,

    /// Center an ego-network view on this member
    #[arg(long)]
    pub ego: Option<String>,

    /// Merge the patron referral overlay
    #[arg(long)]
    pub show_patrons: bool,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Serve {
        /// Host to bind to (overrides `[server] host`)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides `[server] port`)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show graph metrics
    Status,

    /// Write the full, unfiltered render document
    Build {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the render document under a filter state
    View {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the selectable values of every facet
    Facets,

    /// Show a member's relations grouped by type
    Detail {
        /// Member email
        email: String,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), RelgraphError> {
    let mut config = RelgraphConfig::load(cli.config.as_deref())?;
    cli.source.apply(&mut config.source);
    config.validate()?;

    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Serve { host, port }) => cmd_serve(config, host, port).await,
        Some(Commands::Build { output }) => cmd_build(&config, output.as_deref()).await,
        Some(Commands::View { filters, output }) => {
            cmd_view(&config, &filters, output.as_deref()).await
        }
        Some(Commands::Facets) => cmd_facets(&config, json_mode).await,
        Some(Commands::Detail { email }) => cmd_detail(&config, &email, json_mode).await,
        Some(Commands::Status) | None => cmd_status(&config, json_mode).await,
    }
}
