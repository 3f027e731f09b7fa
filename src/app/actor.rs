//! App actor - message loop processing UI events and wallet responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::config::Config;
use crate::messages::{RenderState, UiEvent, WalletCommand, WalletResponse};

/// App actor that processes UI events and wallet responses
pub struct AppActor {
    state: AppState,
    wallet_tx: mpsc::UnboundedSender<WalletCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        config: &Config,
        wallet_tx: mpsc::UnboundedSender<WalletCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(config),
            wallet_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut wallet_rx: mpsc::UnboundedReceiver<WalletResponse>,
    ) {
        // Send initial render state and try to reattach an existing client
        let _ = self.render_tx.send(self.state.to_render_state());
        self.send(self.state.startup_command());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        self.send(WalletCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = wallet_rx.recv() => {
                    if let Some(cmd) = self.state.handle_response(response) {
                        self.send(cmd);
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    fn send(&self, cmd: WalletCommand) {
        tracing::debug!(?cmd, "Wallet command");
        let _ = self.wallet_tx.send(cmd);
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Panel navigation
            UiEvent::SelectPanel(panel) => self.state.select_panel(panel),
            UiEvent::NextPanel => self.state.next_panel(),
            UiEvent::PrevPanel => self.state.prev_panel(),
            UiEvent::NextField => self.state.next_field(),
            UiEvent::PrevField => self.state.prev_field(),

            // Input editing
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Paste(text) => self.state.paste(&text),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),

            // Wallet actions
            UiEvent::Submit => {
                if let Some(cmd) = self.state.submit() {
                    self.send(cmd);
                }
            }
            UiEvent::CheckOpen => {
                let cmd = self.state.check_open();
                self.send(cmd);
            }
            UiEvent::CopyInvoice => self.state.copy_invoice(),

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}
