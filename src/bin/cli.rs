//! yt-bulk
//!
//! Opens a playlist page in Chrome, loads every item and applies "Add to
//! queue" or "Save to a new playlist" to a selection of them.

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use yt_bulk_actions::{
    ActionKind, BrowserSession, BulkSession, ConnectionOptions, LaunchOptions, LogSink, RunConfiguration, RunState,
    ScanOptions, SortOrder, Visibility,
};

#[derive(Parser)]
#[command(name = "yt-bulk")]
#[command(version)]
#[command(about = "Bulk queue or save the videos of a YouTube playlist page", long_about = None)]
struct Cli {
    #[command(flatten)]
    browser: BrowserArgs,

    /// JSON file with run settings; flags take precedence
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct BrowserArgs {
    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H', global = true)]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, global = true, value_name = "PATH")]
    executable_path: Option<PathBuf>,

    /// WebSocket endpoint URL for remote browser connection
    #[arg(long, global = true, value_name = "URL")]
    ws_endpoint: Option<String>,

    /// Persistent browser profile directory (must be signed in)
    #[arg(long, global = true, value_name = "DIR")]
    user_data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Load the whole list and print the items found
    Scan {
        /// Playlist page URL
        url: String,

        /// Print items as JSON
        #[arg(long)]
        json: bool,
    },
    /// Apply an action to the selected items
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Playlist page URL
    url: String,

    #[arg(long, value_enum)]
    action: Option<Action>,

    /// Name of the playlist to create (new-playlist only)
    #[arg(long, value_name = "NAME")]
    playlist_name: Option<String>,

    #[arg(long, value_enum)]
    visibility: Option<VisibilityArg>,

    #[arg(long, value_enum)]
    sort: Option<SortArg>,

    /// Only items whose title contains TERM (case-insensitive)
    #[arg(long, value_name = "TERM")]
    filter: Option<String>,

    /// Only these item positions, as printed by `scan`
    #[arg(long, value_name = "POS,...", value_delimiter = ',')]
    only: Vec<usize>,

    /// Wait after opening an item menu, in ms
    #[arg(long, value_name = "MS", allow_negative_numbers = true)]
    after_menu_open: Option<i64>,

    /// Wait after the final click of an item, in ms
    #[arg(long, value_name = "MS", allow_negative_numbers = true)]
    after_action_click: Option<i64>,

    /// Wait between two items, in ms
    #[arg(long, value_name = "MS", allow_negative_numbers = true)]
    between_items: Option<i64>,

    /// Wait between two dialog steps, in ms
    #[arg(long, value_name = "MS", allow_negative_numbers = true)]
    between_dialog_steps: Option<i64>,

    /// Random extra wait as a percentage of each delay (0-100)
    #[arg(long, value_name = "PERCENT", allow_negative_numbers = true)]
    jitter: Option<i64>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Action {
    /// Add to queue
    Queue,
    /// Create a new playlist and save to it
    NewPlaylist,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VisibilityArg {
    Public,
    Unlisted,
    Private,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    /// Lowest position first
    Oldest,
    /// Highest position first
    Newest,
}

impl RunArgs {
    fn apply(&self, config: &mut RunConfiguration) {
        if let Some(action) = self.action {
            config.action = match action {
                Action::Queue => ActionKind::Enqueue,
                Action::NewPlaylist => ActionKind::CreatePlaylist,
            };
        }
        if let Some(name) = &self.playlist_name {
            config.playlist_name = name.clone();
        }
        if let Some(visibility) = self.visibility {
            config.playlist_visibility = match visibility {
                VisibilityArg::Public => Visibility::Public,
                VisibilityArg::Unlisted => Visibility::Unlisted,
                VisibilityArg::Private => Visibility::Private,
            };
        }
        if let Some(sort) = self.sort {
            config.sort_order = match sort {
                SortArg::Oldest => SortOrder::OldestFirst,
                SortArg::Newest => SortOrder::NewestFirst,
            };
        }
        let delays = &mut config.delays;
        for (flag, slot) in [
            (self.after_menu_open, &mut delays.after_menu_open),
            (self.after_action_click, &mut delays.after_action_click),
            (self.between_items, &mut delays.between_items),
            (self.between_dialog_steps, &mut delays.between_dialog_steps),
        ] {
            if let Some(ms) = flag {
                *slot = ms;
            }
        }
        if let Some(jitter) = self.jitter {
            config.jitter_percent = jitter;
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<RunConfiguration> {
    let Some(path) = path else {
        return Ok(RunConfiguration::default());
    };
    let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid configuration file {}", path.display()))
}

fn open_browser(args: &BrowserArgs) -> anyhow::Result<BrowserSession> {
    if let Some(endpoint) = &args.ws_endpoint {
        log::info!("Connecting to {}", endpoint);
        return Ok(BrowserSession::connect(ConnectionOptions::new(endpoint.clone()))?);
    }

    let mut options = LaunchOptions::new().headless(!args.headed);
    if let Some(path) = &args.executable_path {
        options = options.chrome_path(path);
    }
    if let Some(dir) = &args.user_data_dir {
        options = options.user_data_dir(dir);
    }
    log::info!("Launching browser ({})", if options.headless { "headless" } else { "headed" });
    Ok(BrowserSession::launch(options)?)
}

/// First Ctrl-C stops at the next wait, the second one exits
fn install_stop_handler(state: Arc<RunState>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        eprintln!("Stopping after the current step... (Ctrl-C again to quit)");
        state.request_stop();

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;
    let url = match &cli.command {
        Command::Scan { url, .. } => url.clone(),
        Command::Run(args) => {
            args.apply(&mut config);
            args.url.clone()
        }
    };

    // Fail on a bad configuration before launching anything
    let config = config.sanitized();
    if matches!(cli.command, Command::Run(_)) {
        config.procedure()?;
    }

    let browser = open_browser(&cli.browser)?;
    let page = browser.open(&url)?;

    let state = Arc::new(RunState::new());
    install_stop_handler(state.clone());

    let scan_options = ScanOptions { jitter_percent: config.jitter() / 2.0, ..ScanOptions::default() };
    let mut session = BulkSession::start(page, state, Box::new(LogSink), &scan_options).await?;

    let report = session.scan_report();
    if report.degraded {
        log::warn!("The list did not finish loading; some items may be missing");
    }
    if report.stopped && matches!(cli.command, Command::Run(_)) {
        bail!("Stopped while loading the list");
    }

    match cli.command {
        Command::Scan { json, .. } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&report.items)?);
            } else {
                for item in &report.items {
                    println!(
                        "{:>4}  {:>8}  {:<16}  {}",
                        item.original_position(),
                        item.duration(),
                        item.upload_date(),
                        item.title()
                    );
                }
                println!("{} items", report.items.len());
            }
        }
        Command::Run(args) => {
            let board = session.board_mut();
            if let Some(term) = &args.filter {
                board.filter(term);
            }
            if !args.only.is_empty() {
                board.select_only(&args.only);
            }
            if board.selectable().is_empty() {
                bail!("No items match the selection");
            }

            let summary = session.run(&config).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", summary.message());
            }
        }
    }

    session.dismiss();
    browser.close()?;
    Ok(())
}
