//! dlcman CLI
//!
//! Lists, inspects and toggles feature packs stored as tagged records.

mod settings;

use clap::{Args, Parser, Subcommand};
use config::Config;
use console::style;
use model::{Category, FeaturePack, Record};
use packs::{DlcManager, RecordStore, SqliteStore};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dlcman",
    about = "Feature-pack (DLC) manager for tagged world-book records",
    version,
    author
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Record database path
    #[arg(short, long, global = true)]
    store: Option<PathBuf>,

    /// Document (world book) to operate on
    #[arg(short, long, global = true)]
    document: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Pretend mode (show what would be written without writing)
    #[arg(short, long, global = true)]
    pretend: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List feature packs
    List(ListArgs),

    /// Show one feature pack and its records
    Show(ShowArgs),

    /// Toggle feature packs and save the result
    Toggle(ToggleArgs),

    /// List documents in the record store
    Documents,

    /// Import records from a JSON file
    Import(ImportArgs),

    /// Export a document's records as JSON
    Export,
}

#[derive(Args)]
struct ListArgs {
    /// Only show packs of this category
    #[arg(long, value_enum)]
    category: Option<Category>,
}

#[derive(Args)]
struct ShowArgs {
    /// Pack identity key or label
    pack: String,
}

#[derive(Args)]
struct ToggleArgs {
    /// Packs to toggle, applied in order
    #[arg(required = true)]
    packs: Vec<String>,
}

#[derive(Args)]
struct ImportArgs {
    /// JSON file holding an array of `{"name", "enabled"}` records
    file: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let overrides = settings::Overrides {
        store: cli.store.clone(),
        document: cli.document.clone(),
    };
    let config = match settings::resolve_config(cli.config.as_deref(), overrides) {
        Ok(c) => c,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::List(args) => cmd_list(&config, args).await,
        Commands::Show(args) => cmd_show(&config, args).await,
        Commands::Toggle(args) => cmd_toggle(&config, args, cli.pretend).await,
        Commands::Documents => cmd_documents(&config),
        Commands::Import(args) => cmd_import(&config, args, cli.pretend),
        Commands::Export => cmd_export(&config).await,
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Command result; `Ok(false)` means partial failure already reported
type CmdResult = packs::Result<bool>;

async fn cmd_list(config: &Config, args: ListArgs) -> CmdResult {
    let session = DlcManager::open(config).await?;
    let shown: Vec<&FeaturePack> = session
        .packs()
        .iter()
        .filter(|p| args.category.map_or(true, |c| p.category == c))
        .collect();

    if shown.is_empty() {
        println!("No feature packs in {}", session.document());
        return Ok(true);
    }

    println!(
        "{} feature packs in {}:\n",
        style(shown.len()).bold(),
        style(session.document()).cyan()
    );
    for pack in shown {
        print_pack_line(pack, pack.enabled);
    }

    Ok(true)
}

async fn cmd_show(config: &Config, args: ShowArgs) -> CmdResult {
    let session = DlcManager::open(config).await?;
    let pack = session
        .find(&args.pack)
        .ok_or_else(|| packs::Error::PackNotFound(args.pack.clone()))?;

    println!("{}", style("Feature Pack").bold().underlined());
    println!();
    println!("  {}: {}", style("Label").bold(), pack.label);
    println!("  {}: {}", style("Key").bold(), pack.identity_key);
    println!("  {}: {}", style("Category").bold(), pack.category);
    println!("  {}: {}", style("Enabled").bold(), pack.enabled);
    if !pack.author.is_empty() {
        println!("  {}: {}", style("Author").bold(), pack.author);
    }
    if !pack.info.is_empty() {
        println!("  {}: {}", style("Info").bold(), pack.info);
    }

    print_targets("Excludes", &pack.exclusion_targets);
    print_targets("Replaces", &pack.replacement_targets);
    print_targets("Requires", &pack.prerequisite_targets);

    println!("  {}:", style("Records").bold());
    for member in &pack.members {
        println!("    {} {}", state_marker(member.enabled), member.name);
    }

    Ok(true)
}

async fn cmd_toggle(config: &Config, args: ToggleArgs, pretend: bool) -> CmdResult {
    let mut session = DlcManager::open(config).await?;
    let mut clean = true;

    for query in &args.packs {
        match session.toggle(query) {
            Ok(outcome) if outcome.success => {
                info!("Toggled {}", query);
            }
            Ok(outcome) => {
                clean = false;
                println!(
                    "{} {}: {}",
                    style(">>>").red().bold(),
                    style(query).bold(),
                    outcome.error.unwrap_or_default()
                );
            }
            Err(e @ packs::Error::PackNotFound(_)) => {
                clean = false;
                warn!("{}", e);
            }
            Err(e) => return Err(e),
        }
    }

    let changes = session.selection().changes(session.packs());
    if changes.is_empty() {
        println!("{}", style(">>> Nothing to change").green().bold());
        return Ok(clean);
    }

    println!("{} Pack changes:\n", style(">>>").green().bold());
    for (pack, enabled) in &changes {
        print_pack_line(pack, *enabled);
    }
    println!();

    if pretend {
        let plan = session.plan().await?;
        println!(
            "{} Would write {} record updates:",
            style(">>>").yellow().bold(),
            style(plan.transaction.len()).bold()
        );
        for update in plan.updates() {
            println!("  {} {}", state_marker(update.enabled), update.name);
        }
        return Ok(clean);
    }

    let report = session.save().await?;
    println!(
        "{} Wrote {} record updates to {}",
        style(">>>").green().bold(),
        style(report.written).bold(),
        style(session.document()).cyan()
    );

    Ok(clean)
}

fn cmd_documents(config: &Config) -> CmdResult {
    let store = SqliteStore::open(&config.store.path)?;
    let documents = store.documents()?;

    if documents.is_empty() {
        println!("No documents in {}", config.store.path.display());
        return Ok(true);
    }

    for name in documents {
        let marker = if config.document.as_deref() == Some(name.as_str()) {
            style("*").green().bold()
        } else {
            style(" ")
        };
        println!("{} {}", marker, name);
    }

    Ok(true)
}

fn cmd_import(config: &Config, args: ImportArgs, pretend: bool) -> CmdResult {
    let content = std::fs::read_to_string(&args.file)?;
    let records: Vec<Record> = serde_json::from_str(&content)?;

    let document = match &config.document {
        Some(name) => name.clone(),
        None => args
            .file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| packs::Error::DocumentNotFound(args.file.display().to_string()))?,
    };

    if pretend {
        println!(
            "{} Would import {} records into {}",
            style(">>>").yellow().bold(),
            style(records.len()).bold(),
            style(&document).cyan()
        );
        return Ok(true);
    }

    let store = SqliteStore::open(&config.store.path)?;
    let count = store.import_document(&document, &records)?;
    println!(
        "{} Imported {} records into {}",
        style(">>>").green().bold(),
        style(count).bold(),
        style(&document).cyan()
    );

    Ok(true)
}

async fn cmd_export(config: &Config) -> CmdResult {
    let store = SqliteStore::open(&config.store.path)?.with_document(config.document.clone());
    let document = store.document_handle().await?;
    let records = store.export_document(document.name())?;

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(true)
}

fn state_marker(enabled: bool) -> console::StyledObject<&'static str> {
    if enabled {
        style("[x]").green()
    } else {
        style("[ ]").dim()
    }
}

fn print_pack_line(pack: &FeaturePack, enabled: bool) {
    let author = if pack.author.is_empty() {
        String::new()
    } else {
        format!(" ({})", pack.author)
    };
    println!(
        "{} {} {}{}",
        state_marker(enabled),
        style(format!("{:<9}", pack.category)).cyan(),
        style(&pack.label).bold(),
        style(author).dim()
    );
}

fn print_targets(title: &str, targets: &[String]) {
    if !targets.is_empty() {
        println!("  {}: {}", style(title).bold(), targets.join(", "));
    }
}
