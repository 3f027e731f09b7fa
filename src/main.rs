//! Fedimint wallet demo - terminal front end for an e-cash wallet client
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Wallet Layer (Tokio) - async calls into the wallet bridge

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use base64::Engine;
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;

use fedimint_tui_demo::config::Config;
use fedimint_tui_demo::messages::ui_events::{key_to_ui_event, InputMode};
use fedimint_tui_demo::messages::{RenderState, UiEvent, WalletCommand, WalletResponse};
use fedimint_tui_demo::models::Outcome;
use fedimint_tui_demo::wallet::{RpcWalletClient, WalletActor};
use fedimint_tui_demo::{ui, AppActor};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading config")?;

    // Initialize logging to file
    let directory = config
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| ".".into());
    let file_name = config
        .log_file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "fedimint-tui-demo.log".into());
    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    tracing::info!(bridge = %config.bridge_url, wallet = %config.wallet_name, "Starting");

    // Connect before touching the terminal so errors print normally
    let client = RpcWalletClient::connect(&config.bridge_url)
        .await
        .with_context(|| format!("connecting to wallet bridge at {}", config.bridge_url))?;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let _terminal_guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (wallet_cmd_tx, wallet_cmd_rx) = mpsc::unbounded_channel::<WalletCommand>();
    let (wallet_resp_tx, wallet_resp_rx) = mpsc::unbounded_channel::<WalletResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn wallet actor
    let wallet_actor = WalletActor::new(Arc::new(client), wallet_resp_tx);
    let wallet_task = tokio::spawn(wallet_actor.run(wallet_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(&config, wallet_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, wallet_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    // Let the wallet actor release the balance subscription
    let _ = tokio::time::timeout(Duration::from_millis(500), wallet_task).await;
    tracing::info!("Exiting");

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| ui::draw(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            let ui_event = match event::read()? {
                Event::Key(key) => key_to_ui_event(
                    key,
                    current_state.active_panel,
                    current_state.input_mode,
                    current_state.show_help,
                ),
                Event::Paste(text) if current_state.input_mode == InputMode::Editing => {
                    Some(UiEvent::Paste(text))
                }
                _ => None,
            };

            if let Some(event) = ui_event {
                if matches!(event, UiEvent::Quit) {
                    let _ = ui_tx.send(event);
                    break;
                }
                if matches!(event, UiEvent::CopyInvoice) {
                    if let Err(e) = copy_invoice(&current_state) {
                        tracing::warn!(error = %e, "Copying invoice to clipboard failed");
                    }
                }
                let _ = ui_tx.send(event);
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

/// Put the generated invoice on the system clipboard via OSC 52
fn copy_invoice(state: &RenderState) -> io::Result<()> {
    if let Outcome::Success(created) = &state.invoice.outcome {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&created.invoice);
        let mut stdout = io::stdout();
        write!(stdout, "\x1b]52;c;{}\x07", encoded)?;
        stdout.flush()?;
    }
    Ok(())
}
