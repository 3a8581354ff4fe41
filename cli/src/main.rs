use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use retitle::{
    enumerate::DEFAULT_PAGE_SIZE, find_section, seasons::season_titles_from_dir, Catalog,
    SeasonOptions, SeasonSync, SyncDriver, SyncOptions,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod report;

use config::{absolute_root, AppConfig, SectionArgs, ServerArgs};

/// Exit status when the run completed but some items could not be updated.
const EXIT_PARTIAL_FAILURE: u8 = 2;

#[derive(Parser)]
#[command(
    name = "retitle",
    about = "Set Plex episode and season titles from file and folder names"
)]
struct Cli {
    #[command(flatten)]
    server: ServerArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List library sections
    Sections,
    /// Set episode titles from media file names
    Episodes {
        #[command(flatten)]
        section: SectionArgs,
        /// Only episodes whose file lies under this directory are updated
        #[arg(long)]
        files_root: PathBuf,
        /// Send updates; without this flag the run only reports planned changes
        #[arg(long)]
        apply: bool,
        /// Ask the server to rescan the section first
        #[arg(long)]
        refresh: bool,
        /// Maximum number of changes, 0 for no limit
        #[arg(long, default_value_t = 0)]
        limit: usize,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
        /// Pause between updates, in milliseconds
        #[arg(long, default_value_t = 250)]
        pace_ms: u64,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set season titles from "Season NN - <Title>" folder names
    Seasons {
        #[command(flatten)]
        section: SectionArgs,
        /// Show title as it appears in the library
        #[arg(long)]
        show_title: String,
        /// Directory holding the season folders
        #[arg(long)]
        seasons_root: PathBuf,
        #[arg(long)]
        apply: bool,
        #[arg(long, default_value_t = 250)]
        pace_ms: u64,
        #[arg(long)]
        json: bool,
    },
}

async fn resolve_section(catalog: &dyn Catalog, args: &SectionArgs) -> Result<String> {
    if let Some(id) = args.section_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        return Ok(id.to_string());
    }
    let Some(library) = args.library.as_deref() else {
        bail!("pass --section-id or --library");
    };
    let section = find_section(catalog, library).await?;
    info!("Library {:?} is section {}", library, section.id);
    Ok(section.id)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout carries only the report.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_args(&cli.server)?;
    let client = config.client()?;

    match cli.command {
        Command::Sections => {
            let sections = client.sections().await.context("listing sections")?;
            print!("{}", report::render_sections(&sections));
            Ok(ExitCode::SUCCESS)
        }
        Command::Episodes {
            section,
            files_root,
            apply,
            refresh,
            limit,
            page_size,
            pace_ms,
            json,
        } => {
            let section_id = resolve_section(&client, &section).await?;
            let root = absolute_root(&files_root)?;
            let options = SyncOptions {
                dry_run: !apply,
                page_size,
                pace: Duration::from_millis(pace_ms),
                limit,
                refresh,
                ..SyncOptions::new(&section_id, &root.to_string_lossy())
            };

            let report = SyncDriver::new(&client, options)
                .run()
                .await
                .context("episode sync aborted")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report::render_sync(&report));
            }
            Ok(exit_code(report.has_failures()))
        }
        Command::Seasons {
            section,
            show_title,
            seasons_root,
            apply,
            pace_ms,
            json,
        } => {
            let section_id = resolve_section(&client, &section).await?;
            let desired = season_titles_from_dir(&seasons_root)?;
            let options = SeasonOptions {
                dry_run: !apply,
                pace: Duration::from_millis(pace_ms),
                ..SeasonOptions::new(&section_id, &show_title)
            };

            let report = SeasonSync::new(&client, options)
                .run(&desired)
                .await
                .context("season sync aborted")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report::render_seasons(&report));
            }
            Ok(exit_code(report.has_failures()))
        }
    }
}

fn exit_code(has_failures: bool) -> ExitCode {
    if has_failures {
        ExitCode::from(EXIT_PARTIAL_FAILURE)
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn episodes_default_to_dry_run() {
        let cli = Cli::try_parse_from([
            "retitle",
            "--server",
            "http://plex:32400",
            "episodes",
            "--section-id",
            "13",
            "--files-root",
            "/data/Shows",
        ])
        .unwrap();
        match cli.command {
            Command::Episodes {
                apply,
                limit,
                page_size,
                ..
            } => {
                assert!(!apply);
                assert_eq!(limit, 0);
                assert_eq!(page_size, DEFAULT_PAGE_SIZE);
            }
            _ => panic!("expected episodes command"),
        }
    }
}
