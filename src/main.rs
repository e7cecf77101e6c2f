//! Draftview CLI
//!
//! Command-line interface for the draft viewer client:
//! - Replay a draft script against the session API
//! - Follow a session that is already running
//! - Fetch a session snapshot
//! - Generate a config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use draftview::realtime::RealtimeListener;
use draftview::{
    ActionDriver, ActionQueue, Config, HttpSessionClient, Session, SessionApi, Viewer,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Parser)]
#[command(name = "draftview")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Replay a scripted card draft and watch it live")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/draftview/config.toml or ./draftview.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Session API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a draft script
    Run {
        /// Path to the script file
        #[arg(short, long)]
        script: PathBuf,
        /// Interval between actions in milliseconds
        #[arg(short, long)]
        delay_ms: Option<u64>,
        /// Keep listening for live updates after the script is done
        #[arg(long)]
        keep_alive: bool,
        /// Do not redraw the viewer on every change
        #[arg(short, long)]
        quiet: bool,
    },

    /// Follow a running session from its current state
    View {
        /// Session id
        session_id: String,
        /// Do not redraw the viewer on every change
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the public state of a session
    Snapshot {
        /// Session id
        session_id: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.base_url {
        config.server.base_url = url.clone();
    }

    match cli.command {
        Commands::Run {
            script,
            delay_ms,
            keep_alive,
            quiet,
        } => {
            if let Some(delay) = delay_ms {
                config.driver.delay_ms = delay;
            }
            draftview::logging::init(&config.logging);
            run_script(&config, &script, keep_alive, quiet).await?;
        }

        Commands::View { session_id, quiet } => {
            draftview::logging::init(&config.logging);
            view_session(&config, &session_id, quiet).await?;
        }

        Commands::Snapshot { session_id } => {
            draftview::logging::init(&config.logging);
            let client = HttpSessionClient::new(config.session_client())?;
            let snapshot = client.snapshot(&session_id).await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }

        Commands::Config { output } => {
            let content = draftview::config::generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

async fn run_script(
    config: &Config,
    script: &PathBuf,
    keep_alive: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    tracing::info!("Draftview v{}", env!("CARGO_PKG_VERSION"));

    let queue = ActionQueue::load(script)?;
    tracing::info!(actions = queue.len(), script = %script.display(), "Loaded script");

    let api = Arc::new(HttpSessionClient::new(config.session_client())?);
    let viewer = Viewer::new(config.viewer());
    let driver = ActionDriver::new(queue, api, viewer.clone(), config.driver_delay());

    let render_task = (!quiet).then(|| spawn_renderer(viewer.clone()));
    let listener_task = spawn_listener(config, viewer.clone(), driver.sessions());

    let report = driver.run().await;
    println!(
        "Script finished: {} executed, {} failed, {} skipped",
        report.executed, report.failed, report.skipped
    );

    if keep_alive {
        tracing::info!("Listening for live updates, press Ctrl+C to exit");
        tokio::select! {
            _ = listener_task => {},
            _ = tokio::signal::ctrl_c() => {},
        }
    } else {
        // let pending image swaps land before the final frame
        tokio::time::sleep(config.viewer().image_swap_delay).await;
        listener_task.abort();
    }

    if let Some(task) = render_task {
        task.abort();
    }
    println!("{}", viewer.render().await);
    Ok(())
}

async fn view_session(config: &Config, session_id: &str, quiet: bool) -> anyhow::Result<()> {
    let client = HttpSessionClient::new(config.session_client())?;
    let page = client
        .viewer_page(session_id)
        .await
        .with_context(|| format!("loading viewer for session {}", session_id))?;

    let viewer = Viewer::new(config.viewer());
    viewer.set_viewer_link(client.viewer_url(session_id)).await;
    viewer.load_page(&page).await;
    println!("{}", viewer.render().await);

    if page.finished {
        return Ok(());
    }

    let render_task = (!quiet).then(|| spawn_renderer(viewer.clone()));
    let listener = RealtimeListener::new(config.realtime(), viewer.clone());

    tokio::select! {
        result = listener.run(session_id) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Real-time listener stopped");
            }
        }
        _ = tokio::signal::ctrl_c() => {},
    }

    if let Some(task) = render_task {
        task.abort();
    }
    println!("{}", viewer.render().await);
    Ok(())
}

/// Redraw the viewer whenever it changes
fn spawn_renderer(viewer: Viewer) -> JoinHandle<()> {
    let mut changes = viewer.subscribe();
    tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            println!("{}", viewer.render().await);
        }
    })
}

/// Start a listener for each session the driver creates.
///
/// Completes when the active listener stops (draft finished or reconnects
/// exhausted) or the driver goes away.
fn spawn_listener(
    config: &Config,
    viewer: Viewer,
    mut sessions: watch::Receiver<Option<Session>>,
) -> JoinHandle<()> {
    let realtime = config.realtime();

    tokio::spawn(async move {
        let mut current: Option<JoinHandle<()>> = None;

        loop {
            tokio::select! {
                changed = sessions.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let Some(session) = sessions.borrow_and_update().clone() else {
                        continue;
                    };

                    if let Some(previous) = current.take() {
                        previous.abort();
                    }

                    let listener = RealtimeListener::new(realtime.clone(), viewer.clone());
                    current = Some(tokio::spawn(async move {
                        if let Err(e) = listener.run(&session.session_id).await {
                            tracing::error!(error = %e, "Real-time listener stopped");
                        }
                    }));
                }
                _ = async {
                    match current.as_mut() {
                        Some(handle) => {
                            let _ = handle.await;
                        }
                        None => std::future::pending::<()>().await,
                    }
                } => {
                    return;
                }
            }
        }

        if let Some(handle) = current {
            let _ = handle.await;
        }
    })
}
