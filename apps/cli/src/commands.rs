//! CLI definition, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use upskill_core::{
    InboxReport, KnownSkills, ManualOutcome, Pipeline, ProgressReporter, ReconcileOutcome,
    RunReport, SkillOutcome,
};
use upskill_extract::SkillExtractor;
use upskill_fetcher::HttpFetcher;
use upskill_shared::{
    AppConfig, SkillLists, StoreCredentials, config_dir, init_config, load_config,
    load_config_from,
};
use upskill_store::NotionStore;

const USAGE: &str = "Usage: upskill <URL_OR_TEXT> [--watch]";

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// upskill: track the skills job postings ask for.
#[derive(Parser)]
#[command(
    name = "upskill",
    version,
    about = "Extract skills from job postings and track your skill gaps.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Posting URL or pasted posting text.
    pub input: Option<String>,

    /// Process the job inbox instead of a single posting.
    #[arg(long)]
    pub watch: bool,

    /// Config file (defaults to ~/.upskill/upskill.toml).
    #[arg(long, global = true, env = "UPSKILL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "upskill=info",
        1 => "upskill=debug",
        _ => "upskill=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    if let Some(Command::Config { action }) = &cli.command {
        return match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(cli.config.as_deref()),
        };
    }

    if cli.watch {
        return cmd_watch(cli.config.as_deref()).await;
    }

    match cli.input.as_deref().map(str::trim) {
        Some(input) if !input.is_empty() => cmd_manual(input, cli.config.as_deref()).await,
        _ => {
            println!("{USAGE}");
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Runtime assembly
// ---------------------------------------------------------------------------

/// Long-lived pieces of a run: loaded once, borrowed by the [`Pipeline`].
struct Runtime {
    extractor: SkillExtractor,
    known: KnownSkills,
    fetcher: HttpFetcher,
    store: NotionStore,
}

impl Runtime {
    fn load(config_path: Option<&Path>) -> Result<Self> {
        let (config, base_dir) = resolve_config(config_path)?;

        let lists = SkillLists::load(&config.skills, &base_dir);
        info!(
            dictionary = lists.dictionary.len(),
            blocklist = lists.blocklist.len(),
            "loaded skill lists"
        );

        let credentials = StoreCredentials::from_env(&config.store)?;

        Ok(Self {
            extractor: SkillExtractor::from_config(&config.skills, &lists),
            known: KnownSkills::new(config.skills.known_skills.iter().cloned()),
            fetcher: HttpFetcher::new(&config.fetch)?,
            store: NotionStore::new(&config.store, credentials)?,
        })
    }

    fn pipeline(&self) -> Pipeline<'_> {
        Pipeline {
            extractor: &self.extractor,
            known: &self.known,
            fetcher: &self.fetcher,
            store: &self.store,
        }
    }
}

/// Load the config and the directory relative list paths resolve against.
fn resolve_config(config_path: Option<&Path>) -> Result<(AppConfig, PathBuf)> {
    match config_path {
        Some(path) => {
            let config = load_config_from(path)?;
            let base = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            Ok((config, base))
        }
        None => Ok((load_config()?, config_dir()?)),
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_manual(input: &str, config_path: Option<&Path>) -> Result<()> {
    let runtime = Runtime::load(config_path)?;
    let reporter = CliProgress::new();

    let outcome = runtime.pipeline().run_manual(input, &reporter).await;
    reporter.finish();

    match outcome? {
        ManualOutcome::BotBlocked { url } => {
            println!("[BLOCK] {url} has bot protection (Cloudflare/Human Check).");
            println!("Fallback: copy the job description text and run:");
            println!("  upskill \"PASTE_JD_TEXT_HERE\"");
        }
        ManualOutcome::NoSkills => {
            println!("No skills detected.");
        }
        ManualOutcome::Completed(report) => {
            print_run(&report);
        }
    }

    Ok(())
}

async fn cmd_watch(config_path: Option<&Path>) -> Result<()> {
    let runtime = Runtime::load(config_path)?;
    let reporter = CliProgress::new();

    let report = runtime.pipeline().run_inbox(&reporter).await;
    reporter.finish();

    print_inbox(&report);
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let (config, base_dir) = resolve_config(config_path)?;
    println!("# list paths resolve against {}", base_dir.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn print_run(report: &RunReport) {
    let skills: Vec<&str> = report.skills.iter().map(|s| s.skill.as_str()).collect();
    let gaps: Vec<&str> = report.gaps().collect();

    println!();
    println!("  Detected: {}", skills.join(", "));
    if !gaps.is_empty() {
        println!("  Gaps:     {}", gaps.join(", "));
    }
    println!("  Source:   {}", report.source);
    println!(
        "  Tracker:  {} created, {} updated, {} already linked",
        report.created(),
        report.updated(),
        report.skipped()
    );

    if report.not_recorded() > 0 {
        println!(
            "  WARNING: {} skill(s) could not be recorded; see log for details",
            report.not_recorded()
        );
    } else {
        println!("  Tracker updated.");
    }
    println!();
}

fn print_inbox(report: &InboxReport) {
    if report.items.is_empty() {
        println!("No new jobs in inbox.");
        return;
    }

    println!();
    for item in &report.items {
        let written = if item.status_written { "" } else { " (status not saved)" };
        println!(
            "  [{}] {}: {}{written}",
            item.status.as_str(),
            item.title,
            item.summary
        );
    }
    println!();
    println!(
        "  {} processed, {} failed",
        report.processed(),
        report.errored()
    );
    println!();
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn item(&self, current: usize, total: usize, title: &str) {
        self.spinner
            .set_message(format!("[{current}/{total}] Processing: {title}"));
    }

    fn skill(&self, outcome: &SkillOutcome) {
        let line = match outcome.outcome {
            ReconcileOutcome::Created => "[CREATE] new entry added".to_string(),
            ReconcileOutcome::Updated { frequency } => format!("[UPDATE] frequency {frequency}"),
            ReconcileOutcome::Skipped => "[SKIP] already linked to this source".to_string(),
            ReconcileOutcome::Unavailable => "[SKIP] tracker unavailable".to_string(),
            ReconcileOutcome::Failed => "[FAIL] write failed".to_string(),
        };
        self.spinner.println(format!("  {}: {line}", outcome.skill));
    }
}
