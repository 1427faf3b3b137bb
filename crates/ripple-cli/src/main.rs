//! Ripple CLI
//!
//! CLI tool for inspecting and editing Ripple settings outside the browser.

mod store;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use ripple_core::persist::PersistedSettings;
use ripple_core::{accent_hex, AdVariant, DocumentModel, ResetScope, SettingChange, Session};
use ripple_render::{evaluate, render_ad, render_gate, Entitlement};

use store::FileStore;

type CliSession = Session<DocumentModel, FileStore>;

#[derive(Parser)]
#[command(name = "ripple-cli")]
#[command(about = "Ripple settings inspector and editor")]
struct Cli {
    /// State file holding the persisted settings
    #[arg(long, env = "RIPPLE_STATE", default_value = "ripple-state.json", global = true)]
    state: PathBuf,

    /// Log more (repeat for debug/trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print applied and pending settings as JSON
    Show,

    /// Stage KEY=VALUE changes and commit them
    Apply {
        /// Changes such as theme=White or adsEnabled=false
        #[arg(required = true)]
        changes: Vec<String>,
    },

    /// Reset a group of settings to defaults
    Reset {
        /// appearance, cloaking, security or all
        scope: ResetScope,

        /// Commit the staged reset (implied for `all`)
        #[arg(long)]
        commit: bool,
    },

    /// Turn the developer flag on or off
    DevMode {
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Show the document state the applied settings produce
    Preview,

    /// Print the hex code of an accent color
    Accent { color: String },

    /// Render an ad slot
    RenderAd {
        /// small, medium, large or vertical
        #[arg(long, default_value = "medium")]
        variant: AdVariant,
    },

    /// Render the SnipePlus panel
    RenderGate {
        #[arg(long)]
        logged_in: bool,

        #[arg(long)]
        entitled: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Show => open_read_only(&cli.state).and_then(|s| cmd_show(&s)),
        Commands::Apply { changes } => cmd_apply(&cli.state, &changes),
        Commands::Reset { scope, commit } => cmd_reset(&cli.state, scope, commit),
        Commands::DevMode { state } => cmd_dev_mode(&cli.state, matches!(state, Toggle::On)),
        Commands::Preview => open_read_only(&cli.state).map(|s| cmd_preview(&s)),
        Commands::Accent { color } => {
            println!("{}", accent_hex(&color));
            Ok(())
        }
        Commands::RenderAd { variant } => {
            println!("{}", render_ad(variant));
            Ok(())
        }
        Commands::RenderGate { logged_in, entitled } => {
            cmd_render_gate(&cli.state, Entitlement { logged_in, entitled })
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_session(state: &Path) -> Result<CliSession, String> {
    log::debug!("opening state file {}", state.display());
    let storage = FileStore::open(state)?;
    Ok(Session::start(DocumentModel::new(), Some(storage)))
}

/// Session for commands that only inspect state; the file is never written.
fn open_read_only(state: &Path) -> Result<CliSession, String> {
    log::debug!("reading state file {}", state.display());
    let storage = FileStore::open(state)?;
    Ok(Session::read_only(DocumentModel::new(), &storage))
}

fn cmd_show(session: &CliSession) -> Result<(), String> {
    let store = session.store();
    let report = serde_json::json!({
        "applied": PersistedSettings::from_store(store),
        "pending": store.pending(),
    });
    let text = serde_json::to_string_pretty(&report)
        .map_err(|e| format!("Failed to encode settings: {}", e))?;
    println!("{}", text);
    Ok(())
}

fn parse_changes(changes: &[String]) -> Result<Vec<SettingChange>, String> {
    changes
        .iter()
        .map(|arg| {
            let (key, value) = arg
                .split_once('=')
                .ok_or_else(|| format!("Expected KEY=VALUE, got '{}'", arg))?;
            SettingChange::parse(key.trim(), value).map_err(|e| e.to_string())
        })
        .collect()
}

fn cmd_apply(state: &Path, changes: &[String]) -> Result<(), String> {
    let changes = parse_changes(changes)?;
    let mut session = open_session(state)?;
    for change in changes {
        session.set_pending(change);
    }
    let changed = session.commit();
    if changed.is_empty() {
        println!("No changes");
    } else {
        println!("Applied: {:?}", changed);
    }
    Ok(())
}

fn cmd_reset(state: &Path, scope: ResetScope, commit: bool) -> Result<(), String> {
    let mut session = open_session(state)?;
    session.reset(scope);

    if scope == ResetScope::All {
        println!("Reset all settings to defaults");
    } else if commit {
        let changed = session.commit();
        println!("Reset {:?} settings ({:?})", scope, changed);
    } else {
        let pending = serde_json::to_string_pretty(session.store().pending())
            .map_err(|e| format!("Failed to encode settings: {}", e))?;
        println!("Staged reset of {:?} settings (use --commit to apply):", scope);
        println!("{}", pending);
    }
    Ok(())
}

fn cmd_dev_mode(state: &Path, show: bool) -> Result<(), String> {
    let mut session = open_session(state)?;
    session.set_show_dev_func(show);
    println!("Developer flag: {}", if show { "on" } else { "off" });
    Ok(())
}

fn cmd_preview(session: &CliSession) {
    let doc = session.sink();
    println!("Title:         {:?}", doc.title);
    println!("Favicon:       {}", doc.favicon.as_deref().unwrap_or("(none)"));
    println!("Root classes:  {}", doc.root_classes.join(" "));
    for (name, value) in &doc.style {
        println!("Style:         {}: {}", name, value);
    }
    let applied = session.store().applied();
    if applied.escape_key_enabled {
        println!("Panic key:     {:?} -> {}", applied.escape_key, applied.escape_url);
    }
}

fn cmd_render_gate(state: &Path, entitlement: Entitlement) -> Result<(), String> {
    let session = open_read_only(state)?;
    let view = evaluate(entitlement, session.store().pending());
    println!("{}", render_gate(&view));
    Ok(())
}
