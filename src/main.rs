//! # docpush CLI
//!
//! Pushes the files of a local folder into a hosted document index, then
//! purges index entries for files that no longer exist locally.
//!
//! ## Usage
//!
//! ```bash
//! # Everything on the command line
//! docpush push -e prod -r us-east-1 -o myorg -s mysource -k $API_KEY -f ./docs
//!
//! # Only markdown, top folder only, bigger batches
//! docpush push -e prod -r us-east-1 -o myorg -s mysource -k $API_KEY \
//!     -f ./docs --include "*.md" --recursive false --batch-size 50
//!
//! # See what would be pushed without touching the index
//! docpush push ... --dry-run
//!
//! # List supported region/environment combinations
//! docpush endpoints
//!
//! # No arguments at all: prompt for every setting
//! docpush
//! ```

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use docpush::client::PushApiClient;
use docpush::config::{CloudEnvironment, PushConfig, Region};
use docpush::endpoints;
use docpush::progress::ProgressMode;
use docpush::prompt;
use docpush::sync;

/// Push the contents of a local folder into a hosted document index.
///
/// Each run pushes every matching file in ordered batches, stamped with a
/// single per-run ordering token, then deletes index entries whose token is
/// older — files removed locally disappear from the index on the next run.
#[derive(Parser)]
#[command(
    name = "docpush",
    about = "Push the contents of a local folder into a hosted document index",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Push a folder's files to the index, then purge stale entries.
    ///
    /// Runs the full pipeline: enumerate, map, batch, upsert, and finally
    /// delete every indexed document this run did not refresh. The purge is
    /// skipped whenever any earlier step fails, so a failed run never
    /// under-populates the index.
    Push(PushArgs),

    /// List supported region/environment combinations and their endpoints.
    Endpoints,
}

/// Flags for `docpush push`.
#[derive(Args)]
struct PushArgs {
    /// Cloud environment: prod or hipaa.
    #[arg(short = 'e', long, value_enum)]
    environment: CloudEnvironment,

    /// Cloud region: us-east-1, eu-west-1 or ap-southeast-2.
    #[arg(short = 'r', long, value_enum)]
    region: Region,

    /// ID of the organization in which to push documents.
    #[arg(short = 'o', long)]
    organization_id: String,

    /// ID of the source in which to push documents.
    #[arg(short = 's', long)]
    source_id: String,

    /// API key to use.
    #[arg(short = 'k', long)]
    api_key: String,

    /// Path of the local folder that contains the documents to index.
    #[arg(short = 'f', long)]
    folder: PathBuf,

    /// Wildcard expression for which matching files will be pushed.
    #[arg(long, default_value = "*")]
    include: String,

    /// Whether to recursively search in sub-folders for files to push.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    recursive: bool,

    /// How many files to push per batch.
    #[arg(long, default_value_t = 10)]
    batch_size: usize,

    /// Enumerate and map files without calling the index at all.
    #[arg(long)]
    dry_run: bool,

    /// Progress reporting on stderr. Defaults to human when stderr is a TTY.
    #[arg(long, value_enum)]
    progress: Option<ProgressMode>,

    /// Override the push API base URL (self-hosted or testing).
    #[arg(long)]
    push_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // No arguments at all: read the configuration interactively, the same
    // fields in the same order as the flags.
    if std::env::args().len() == 1 {
        let config = prompt::read_config_interactively()?;
        return push(config, None, None, false).await;
    }

    let cli = Cli::parse();
    match cli.command {
        Commands::Push(args) => {
            let config = PushConfig {
                environment: args.environment,
                region: args.region,
                organization_id: args.organization_id,
                source_id: args.source_id,
                api_key: args.api_key,
                folder: args.folder,
                include: args.include,
                recursive: args.recursive,
                batch_size: args.batch_size,
            };
            push(config, args.push_url, args.progress, args.dry_run).await
        }
        Commands::Endpoints => {
            endpoints::print_endpoints();
            Ok(())
        }
    }
}

async fn push(
    config: PushConfig,
    push_url_override: Option<String>,
    progress: Option<ProgressMode>,
    dry_run: bool,
) -> anyhow::Result<()> {
    // Configuration problems, including an unsupported region/environment
    // combination, are fatal before any enumeration starts.
    config.validate()?;
    let resolved = endpoints::resolve(config.region, config.environment)?;
    let push_url = push_url_override.unwrap_or_else(|| resolved.push_url.to_string());

    let client = PushApiClient::new(push_url, &config.organization_id, &config.api_key)?;
    let reporter = progress.unwrap_or_else(ProgressMode::default_for_tty).reporter();

    sync::run_sync(&config, client, reporter.as_ref(), dry_run).await?;
    Ok(())
}
