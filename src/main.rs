//! Autotris runner (default binary).
//!
//! Runs one session with gravity and, unless `TETRIS_AI_DISABLED` is set,
//! autoplay driven by the TCP recommender. On an interactive terminal keys
//! are read in raw mode (`t` toggles autoplay, `r` restarts, `q` quits);
//! otherwise the runner plays until Ctrl-C. The final board and score are
//! printed on exit.

use std::io::IsTerminal;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::terminal;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use autotris::adapter::{RecommenderConfig, TcpRecommender};
use autotris::core::{GameConfig, GameState};
use autotris::engine::{drive_gravity, AutoplayConfig, Orchestrator, SharedSession};
use autotris::input::{map_key, KeyCommand};
use autotris::types::{GameAction, TICK_MS};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let session = SharedSession::new(GameState::new(GameConfig::from_env()));
    info!(seed = session.with_game(|game| game.seed()), "session started");

    let gravity = tokio::spawn(drive_gravity(
        session.clone(),
        Duration::from_millis(u64::from(TICK_MS)),
    ));

    let recommender = TcpRecommender::from_env();
    let addr = recommender.config().addr();
    let orchestrator = Orchestrator::new(session.clone(), recommender, AutoplayConfig::from_env());
    if RecommenderConfig::is_disabled() {
        info!("autoplay disabled");
    } else {
        info!(%addr, "autoplay enabled");
        orchestrator.toggle_autoplay();
    }

    let result = if std::io::stdin().is_terminal() {
        run_interactive(&orchestrator).await
    } else {
        tokio::signal::ctrl_c().await.map_err(Into::into)
    };

    orchestrator.shutdown();
    gravity.abort();

    let board = session.with_game(|game| game.board().to_string());
    println!("{board}final score: {}", session.score());
    result
}

/// Restores cooked mode when dropped.
struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

async fn run_interactive(orchestrator: &Orchestrator<TcpRecommender>) -> Result<()> {
    let _raw = RawModeGuard::enter()?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let reader = tokio::task::spawn_blocking(move || read_keys(tx));
    let session = orchestrator.session();

    while let Some(command) = rx.recv().await {
        match command {
            KeyCommand::Quit => break,
            KeyCommand::ToggleAutoplay => {
                orchestrator.toggle_autoplay();
            }
            // Restart behaves like a button: always available.
            KeyCommand::Game(GameAction::Restart) => {
                orchestrator.restart();
            }
            KeyCommand::Game(action) => {
                if let Err(reason) = session.apply_manual(action) {
                    debug!(%reason, action = action.as_str(), "input ignored");
                }
            }
        }
    }

    drop(rx);
    reader.await?
}

/// Blocking key reader; stops on quit or once the receiver is gone.
fn read_keys(tx: mpsc::UnboundedSender<KeyCommand>) -> Result<()> {
    loop {
        if !event::poll(Duration::from_millis(100))? {
            if tx.is_closed() {
                return Ok(());
            }
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if let Some(command) = map_key(key) {
                let quit = command == KeyCommand::Quit;
                if tx.send(command).is_err() || quit {
                    return Ok(());
                }
            }
        }
    }
}
