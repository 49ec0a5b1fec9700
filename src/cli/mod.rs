//! CLI commands implementation.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{load_settings, Settings};
use crate::models::ScanStats;
use crate::parser::LineMapping;
use crate::repository::{
    FahrplanRepository, OptionsRepository, SearchLogRepository, OPTION_EXCLUSION_WORDS,
    OPTION_LINE_MAPPING,
};
use crate::scan::{self, ScanContext};
use crate::server;
use crate::tags::ExclusionList;

#[derive(Parser)]
#[command(name = "fahrplanportal")]
#[command(about = "Transit schedule PDF catalog")]
#[command(version)]
pub struct Cli {
    /// Data directory
    #[arg(long, global = true, env = "FAHRPLANPORTAL_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory, config file and database
    Init,

    /// Start the API server
    Serve {
        /// Bind host (default from config)
        #[arg(long)]
        host: Option<String>,
        /// Bind port (default from config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Scan a schedule-year folder into the catalog
    Scan {
        /// Folder name under the PDF base directory (e.g. "2025")
        folder: String,
        /// Files per chunk
        #[arg(long)]
        chunk_size: Option<usize>,
    },

    /// Import a single PDF by path relative to the PDF base directory
    Import { pdf_path: String },

    /// Refresh PDF status against the filesystem
    Sync,

    /// Copy the staging catalog to the live search table
    Publish,

    /// Show catalog and search statistics
    Status,

    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },

    /// Show or replace the line-number mapping table
    Mapping {
        #[command(subcommand)]
        command: OptionCommands,
    },

    /// Show or replace the tag exclusion words
    Exclusion {
        #[command(subcommand)]
        command: OptionCommands,
    },
}

#[derive(Subcommand)]
enum DbCommands {
    /// Drop and recreate all schedule tables
    Recreate,
    /// Delete every staging record
    Clear,
    /// Delete records whose PDF went missing
    DeleteMissing,
}

#[derive(Subcommand)]
enum OptionCommands {
    /// Print the current text
    Show,
    /// Replace the text from a file
    Set { file: PathBuf },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.data_dir.clone())?;

    match cli.command {
        Commands::Init => init(&settings),
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| settings.host.clone());
            let port = port.unwrap_or(settings.port);
            server::serve(&settings, &host, port).await
        }
        Commands::Scan { folder, chunk_size } => run_scan(&settings, &folder, chunk_size),
        Commands::Import { pdf_path } => import(&settings, &pdf_path),
        Commands::Sync => {
            let repo = FahrplanRepository::new(&settings.db_path())?;
            let outcome = repo.sync(&settings.pdf_base_dir)?;
            println!(
                "{} checked, {} missing, {} restored",
                outcome.checked, outcome.marked_missing, outcome.restored
            );
            Ok(())
        }
        Commands::Publish => {
            let repo = FahrplanRepository::new(&settings.db_path())?;
            let outcome = repo.publish()?;
            println!(
                "{} published, {} previous records backed up",
                style(outcome.published).green(),
                outcome.backed_up
            );
            Ok(())
        }
        Commands::Status => status(&settings),
        Commands::Db { command } => db(&settings, command),
        Commands::Mapping { command } => {
            option_cmd(&settings, command, OPTION_LINE_MAPPING, "mapping entries", |text| {
                LineMapping::parse(text).len()
            })
        }
        Commands::Exclusion { command } => {
            option_cmd(&settings, command, OPTION_EXCLUSION_WORDS, "exclusion words", |text| {
                ExclusionList::parse(text).len()
            })
        }
    }
}

fn init(settings: &Settings) -> anyhow::Result<()> {
    settings.save()?;
    FahrplanRepository::new(&settings.db_path())?;
    OptionsRepository::new(&settings.db_path())?;
    SearchLogRepository::new(&settings.db_path())?;
    println!(
        "{} data directory: {}",
        style("initialized").green(),
        settings.data_dir.display()
    );
    println!("  PDF base directory: {}", settings.pdf_base_dir.display());
    Ok(())
}

fn run_scan(settings: &Settings, folder: &str, chunk_size: Option<usize>) -> anyhow::Result<()> {
    let repo = FahrplanRepository::new(&settings.db_path())?;
    let options = OptionsRepository::new(&settings.db_path())?;
    let mapping = LineMapping::parse(&options.line_mapping()?);
    let exclusion = ExclusionList::parse(&options.exclusion_words()?);
    if mapping.is_empty() {
        println!(
            "{} no line mapping configured; legacy line numbers stay empty",
            style("note:").yellow()
        );
    }

    let ctx = ScanContext {
        repo: &repo,
        mapping: &mapping,
        exclusion: &exclusion,
        max_errors: settings.max_scan_errors,
    };

    let chunk_size = chunk_size.unwrap_or(settings.chunk_size);
    let mut session = scan::start_session(&settings.pdf_base_dir, folder, chunk_size)
        .with_context(|| format!("scanning {}", folder))?;

    let total_chunks = session.total_chunks();
    println!(
        "scanning {} ({} files, {} chunks)",
        style(folder).bold(),
        session.files.len(),
        total_chunks
    );

    let bar = ProgressBar::new(session.files.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut stats = ScanStats::default();
    for chunk_index in 0..total_chunks {
        let outcome = scan::process_chunk(&ctx, &mut session, chunk_index)?;
        stats.imported += outcome.imported;
        stats.skipped += outcome.skipped;
        for (region, count) in &outcome.regions {
            *stats.regions.entry(region.clone()).or_insert(0) += count;
        }
        for error in outcome.errors {
            stats.record_error(error);
        }
        bar.set_position(stats.processed());
        if outcome.aborted {
            bar.abandon_with_message("aborted: error budget exhausted");
            break;
        }
    }
    bar.finish();

    println!(
        "{} imported, {} skipped, {} errors",
        style(stats.imported).green(),
        stats.skipped,
        if stats.error_count > 0 {
            style(stats.error_count).red()
        } else {
            style(stats.error_count).dim()
        }
    );
    for (region, count) in &stats.regions {
        let label = if region.is_empty() { "(root)" } else { region };
        println!("  {}: {}", label, count);
    }

    if !stats.errors.is_empty() {
        println!("\n{}", style("error protocol:").red().bold());
        for error in &stats.errors {
            println!(
                "  {}  {}  [{}]  {}",
                error.occurred_at.format("%Y-%m-%d %H:%M:%S"),
                error.file,
                if error.region.is_empty() { "-" } else { &error.region },
                error.message
            );
        }
    }

    Ok(())
}

fn import(settings: &Settings, pdf_path: &str) -> anyhow::Result<()> {
    let repo = FahrplanRepository::new(&settings.db_path())?;
    let options = OptionsRepository::new(&settings.db_path())?;
    let mapping = LineMapping::parse(&options.line_mapping()?);
    let exclusion = ExclusionList::parse(&options.exclusion_words()?);
    let ctx = ScanContext {
        repo: &repo,
        mapping: &mapping,
        exclusion: &exclusion,
        max_errors: settings.max_scan_errors,
    };

    let fahrplan = scan::import_single(&ctx, &settings.pdf_base_dir, pdf_path)?;
    println!(
        "{} {} (linie {}, {})",
        style("imported").green(),
        fahrplan.dateiname,
        fahrplan.linie_neu,
        fahrplan.titel
    );
    Ok(())
}

fn status(settings: &Settings) -> anyhow::Result<()> {
    let repo = FahrplanRepository::new(&settings.db_path())?;
    let search_log = SearchLogRepository::new(&settings.db_path())?;

    let counts = repo.counts()?;
    println!("{}", style("catalog").bold());
    println!("  staging: {} (OK {}, MISSING {}, IMPORT {})", counts.total, counts.ok, counts.missing, counts.import);
    println!("  live:    {}", counts.live);

    let stats = search_log.stats(5)?;
    println!("{}", style("searches").bold());
    println!("  total: {}", stats.total_searches);
    for term in &stats.top_terms {
        println!("  {} ({}x)", term.term, term.count);
    }
    Ok(())
}

fn db(settings: &Settings, command: DbCommands) -> anyhow::Result<()> {
    let repo = FahrplanRepository::new(&settings.db_path())?;
    match command {
        DbCommands::Recreate => {
            repo.recreate()?;
            println!("{}", style("tables recreated").green());
        }
        DbCommands::Clear => {
            let deleted = repo.clear()?;
            println!("{} records deleted", deleted);
        }
        DbCommands::DeleteMissing => {
            let deleted = repo.delete_missing()?;
            println!("{} missing records deleted", deleted);
        }
    }
    Ok(())
}

fn option_cmd(
    settings: &Settings,
    command: OptionCommands,
    key: &str,
    label: &str,
    count: impl Fn(&str) -> usize,
) -> anyhow::Result<()> {
    let options = OptionsRepository::new(&settings.db_path())?;
    match command {
        OptionCommands::Show => {
            let text = options.get(key)?.unwrap_or_default();
            println!("{}", text);
            eprintln!("{} {}", count(&text), label);
        }
        OptionCommands::Set { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            options.set(key, &text)?;
            println!("{} {} saved", count(&text), label);
        }
    }
    Ok(())
}
