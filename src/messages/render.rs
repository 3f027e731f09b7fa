//! Render state - data structure sent from App layer to UI for rendering

use crate::app::AppState;
use crate::config::Config;
use crate::messages::ui_events::{InputMode, Panel};
use crate::models::{
    CreatedInvoice, FederationPreview, Form, ParsedInviteCode, ParsedInvoice, WalletStatus,
};

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub show_help: bool,

    // Shared wallet state
    pub wallet: WalletStatus,

    // Panels
    pub join: Form<FederationPreview>,
    pub invoice: Form<CreatedInvoice>,
    pub redeem: Form<String>,
    pub pay: Form<String>,
    pub invite: Form<ParsedInviteCode>,
    pub bolt11: Form<ParsedInvoice>,

    /// One-line feedback shown in the status bar
    pub notice: Option<String>,
}

impl Default for RenderState {
    fn default() -> Self {
        AppState::new(&Config::default()).to_render_state()
    }
}
