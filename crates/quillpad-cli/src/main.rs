//! Quillpad terminal client
//!
//! Drives the client engine against a live API with a plain-text surface.
//! `open` renders one location and exits; `shell` keeps a session open and
//! reads navigation and actions from stdin.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use quillpad_app::{App, KeyValueStore, Ports};
use quillpad_client::{FileStore, HttpResourceClient};

mod config;
mod shell;
mod terminal;

use config::CliConfig;
use shell::Shell;
use terminal::{BufferEditorFactory, ShellLocation, TerminalSurface};

#[derive(Parser)]
#[command(name = "quillpad")]
#[command(about = "Quillpad - terminal client for the blog API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true, default_value = ".quillpad/config.toml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one location and exit
    Open {
        /// Hash location, e.g. `#posts/hello-world`
        #[arg(default_value = "#/")]
        location: String,
    },

    /// Interactive session
    Shell {
        /// Starting location
        #[arg(default_value = "#/")]
        location: String,
    },
}

/// `RUST_LOG` wins, then `-v`, then the config file's filter.
fn init_logging(verbose: bool, configured: Option<&str>) {
    let fallback = if verbose {
        "debug"
    } else {
        configured.unwrap_or("info")
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_shell(config: &CliConfig, location: &str) -> Result<Shell> {
    let session_path = config.session_path();
    let store: Arc<dyn KeyValueStore> = Arc::new(
        FileStore::open(&session_path)
            .with_context(|| format!("opening session file {}", session_path.display()))?,
    );
    let client = HttpResourceClient::new(&config.app, store.clone())?;
    let location = Arc::new(ShellLocation::at(location));
    let editor = BufferEditorFactory::default();
    let ports = Ports {
        client: Arc::new(client),
        store,
        surface: Arc::new(TerminalSurface::new(std::io::stdout())),
        location: location.clone(),
        editors: Arc::new(editor.clone()),
    };
    Ok(Shell {
        app: App::new(config.app.clone(), ports),
        location,
        editor,
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    init_logging(cli.verbose, config.log_filter.as_deref());
    tracing::debug!(api = %config.app.api_base_url, "Starting quillpad");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building runtime")?;

    match cli.command {
        Commands::Open { location } => {
            let shell = build_shell(&config, &location)?;
            runtime.block_on(shell.app.initialize());
        }
        Commands::Shell { location } => {
            let shell = build_shell(&config, &location)?;
            runtime.block_on(shell.app.initialize());
            println!("Type `help` for commands.");
            // The stdin lock is released between lines; confirmations read it too.
            let mut line = String::new();
            loop {
                line.clear();
                if std::io::stdin().read_line(&mut line).context("reading stdin")? == 0 {
                    break;
                }
                let command = match shell::parse(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(err) => {
                        println!("{err}");
                        continue;
                    }
                };
                match runtime.block_on(shell.execute(command)) {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(err) => println!("error: {err:#}"),
                }
            }
        }
    }

    Ok(())
}
