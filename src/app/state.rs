//! App state - pure data structure with no I/O logic

use std::time::Duration;

use crate::config::Config;
use crate::messages::ui_events::{InputMode, Panel};
use crate::messages::{RenderState, WalletCommand};
use crate::models::{
    CreatedInvoice, FederationPreview, Field, Form, ParsedInviteCode, ParsedInvoice, WalletStatus,
};

/// Main application state - pure data, no I/O
pub struct AppState {
    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub show_help: bool,

    // Mirrors the wallet client
    pub wallet: WalletStatus,

    // One form per panel
    pub join: Form<FederationPreview>,
    pub invoice: Form<CreatedInvoice>,
    pub redeem: Form<String>,
    pub pay: Form<String>,
    pub invite: Form<ParsedInviteCode>,
    pub bolt11: Form<ParsedInvoice>,

    pub notice: Option<String>,

    // Settings
    pub wallet_name: String,
    pub join_settle: Duration,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        AppState {
            active_panel: Panel::Status,
            input_mode: InputMode::Normal,
            cursor_position: 0,
            show_help: false,
            wallet: WalletStatus::default(),
            join: Form::new(vec![
                Field::new("Wallet Name:", "Enter wallet name...").with_value(&config.wallet_name),
                Field::new("Invite Code:", "Invite Code...").with_value(&config.invite_code),
            ]),
            invoice: Form::new(vec![
                Field::amount("Amount (sats):", "Enter amount"),
                Field::new("Description:", "Enter description"),
            ]),
            redeem: Form::new(vec![Field::new("Ecash:", "Long ecash string...")]),
            pay: Form::new(vec![Field::new("Invoice:", "lnbc...")]),
            invite: Form::new(vec![Field::new("Invite Code:", "Enter invite code...")]),
            bolt11: Form::new(vec![Field::new("Invoice:", "Enter invoice...")]),
            notice: None,
            wallet_name: config.wallet_name.clone(),
            join_settle: Duration::from_millis(config.join_settle_ms),
        }
    }

    /// Command issued once at startup to reattach an existing client
    pub fn startup_command(&self) -> WalletCommand {
        WalletCommand::OpenExisting {
            name: self.wallet_name.clone(),
        }
    }

    /// Fields and selected field index of a panel
    pub fn fields(&self, panel: Panel) -> Option<(&[Field], usize)> {
        match panel {
            Panel::Status => None,
            Panel::Join => Some((self.join.fields.as_slice(), self.join.active_field)),
            Panel::Invoice => Some((self.invoice.fields.as_slice(), self.invoice.active_field)),
            Panel::Redeem => Some((self.redeem.fields.as_slice(), self.redeem.active_field)),
            Panel::Pay => Some((self.pay.fields.as_slice(), self.pay.active_field)),
            Panel::InviteCode => Some((self.invite.fields.as_slice(), self.invite.active_field)),
            Panel::Bolt11 => Some((self.bolt11.fields.as_slice(), self.bolt11.active_field)),
        }
    }

    pub fn fields_mut(&mut self, panel: Panel) -> Option<(&mut Vec<Field>, &mut usize)> {
        match panel {
            Panel::Status => None,
            Panel::Join => Some((&mut self.join.fields, &mut self.join.active_field)),
            Panel::Invoice => Some((&mut self.invoice.fields, &mut self.invoice.active_field)),
            Panel::Redeem => Some((&mut self.redeem.fields, &mut self.redeem.active_field)),
            Panel::Pay => Some((&mut self.pay.fields, &mut self.pay.active_field)),
            Panel::InviteCode => Some((&mut self.invite.fields, &mut self.invite.active_field)),
            Panel::Bolt11 => Some((&mut self.bolt11.fields, &mut self.bolt11.active_field)),
        }
    }

    /// Get the current input field content
    pub fn current_input(&self) -> &str {
        self.fields(self.active_panel)
            .and_then(|(fields, active)| fields.get(active))
            .map(|field| field.value.as_str())
            .unwrap_or("")
    }

    /// Get mutable reference to current input field
    pub fn current_input_mut(&mut self) -> Option<&mut String> {
        let panel = self.active_panel;
        self.fields_mut(panel)
            .and_then(|(fields, active)| fields.get_mut(*active))
            .map(|field| &mut field.value)
    }

    /// Join inputs are locked once a federation has been joined
    pub fn is_editable(&self, panel: Panel) -> bool {
        panel.has_fields() && !(panel == Panel::Join && self.wallet.open)
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            active_panel: self.active_panel,
            input_mode: self.input_mode,
            cursor_position: self.cursor_position,
            show_help: self.show_help,
            wallet: self.wallet.clone(),
            join: self.join.clone(),
            invoice: self.invoice.clone(),
            redeem: self.redeem.clone(),
            pay: self.pay.clone(),
            invite: self.invite.clone(),
            bolt11: self.bolt11.clone(),
            notice: self.notice.clone(),
        }
    }
}
