//! Command handlers - business logic for processing UI events and wallet responses

use std::time::Duration;

use crate::app::AppState;
use crate::messages::ui_events::{InputMode, Panel};
use crate::messages::{WalletCommand, WalletResponse};

impl AppState {
    // ========================
    // Navigation
    // ========================

    pub fn select_panel(&mut self, panel: Panel) {
        self.input_mode = InputMode::Normal;
        self.active_panel = panel;
        self.cursor_position = self.current_input().len();
    }

    pub fn next_panel(&mut self) {
        self.select_panel(self.active_panel.next());
    }

    pub fn prev_panel(&mut self) {
        self.select_panel(self.active_panel.prev());
    }

    pub fn next_field(&mut self) {
        let panel = self.active_panel;
        if let Some((fields, active)) = self.fields_mut(panel) {
            if !fields.is_empty() {
                *active = (*active + 1) % fields.len();
            }
        }
        self.cursor_position = self.current_input().len();
    }

    pub fn prev_field(&mut self) {
        let panel = self.active_panel;
        if let Some((fields, active)) = self.fields_mut(panel) {
            if !fields.is_empty() {
                *active = active.checked_sub(1).unwrap_or(fields.len() - 1);
            }
        }
        self.cursor_position = self.current_input().len();
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        if self.is_editable(self.active_panel) {
            self.input_mode = InputMode::Editing;
            self.cursor_position = self.current_input().len();
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn move_cursor_left(&mut self) {
        let input = self.current_input();
        if self.cursor_position > 0 {
            let new_pos = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = self.current_input();
        if self.cursor_position < input.len() {
            let new_pos = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
            self.cursor_position = new_pos;
        }
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor_pos = self.cursor_position;
        if let Some(input) = self.current_input_mut() {
            if cursor_pos <= input.len() {
                input.insert(cursor_pos, c);
                self.cursor_position = cursor_pos + c.len_utf8();
            }
        }
    }

    /// Insert pasted text at the cursor, dropping line breaks
    pub fn paste(&mut self, text: &str) {
        if self.input_mode != InputMode::Editing {
            return;
        }
        let text: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        let cursor_pos = self.cursor_position;
        if let Some(input) = self.current_input_mut() {
            if cursor_pos <= input.len() {
                input.insert_str(cursor_pos, &text);
                self.cursor_position = cursor_pos + text.len();
            }
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let cursor_pos = self.cursor_position;
            let mut new_pos = cursor_pos;
            if let Some(input) = self.current_input_mut() {
                let prev_pos = input[..cursor_pos]
                    .char_indices()
                    .last()
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                input.remove(prev_pos);
                new_pos = prev_pos;
            }
            self.cursor_position = new_pos;
        }
    }

    // ========================
    // Wallet actions
    // ========================

    /// Submit the active panel's form.
    ///
    /// Returns the wallet command to run, or `None` when the form is
    /// pending, disabled, or failed validation.
    pub fn submit(&mut self) -> Option<WalletCommand> {
        self.stop_editing();
        self.notice = None;

        match self.active_panel {
            Panel::Status => Some(self.check_open()),
            Panel::Join => {
                if self.wallet.open || !self.join.begin() {
                    return None;
                }
                Some(WalletCommand::JoinFederation {
                    name: self.join.value(0).to_string(),
                    invite_code: self.join.value(1).to_string(),
                })
            }
            Panel::Invoice => {
                if !self.invoice.begin() {
                    return None;
                }
                // Validated as a whole number by begin()
                let amount_sats = self.invoice.value(0).trim().parse().unwrap_or_default();
                Some(WalletCommand::CreateInvoice {
                    amount_sats,
                    description: self.invoice.value(1).to_string(),
                })
            }
            Panel::Redeem => {
                if !self.redeem.begin() {
                    return None;
                }
                Some(WalletCommand::RedeemEcash {
                    token: self.redeem.value(0).to_string(),
                })
            }
            Panel::Pay => {
                if !self.pay.begin() {
                    return None;
                }
                Some(WalletCommand::PayInvoice {
                    invoice: self.pay.value(0).to_string(),
                })
            }
            Panel::InviteCode => {
                if !self.invite.begin() {
                    return None;
                }
                Some(WalletCommand::ParseInviteCode {
                    invite_code: self.invite.value(0).to_string(),
                })
            }
            Panel::Bolt11 => {
                if !self.bolt11.begin() {
                    return None;
                }
                Some(WalletCommand::ParseBolt11Invoice {
                    invoice: self.bolt11.value(0).to_string(),
                })
            }
        }
    }

    /// Re-read the open flag right away
    pub fn check_open(&self) -> WalletCommand {
        WalletCommand::CheckOpen { after: Duration::ZERO }
    }

    /// Note a copy of the generated invoice; the UI layer does the copying
    pub fn copy_invoice(&mut self) {
        if self.invoice.outcome.success().is_some() {
            self.notice = Some(String::from("Invoice copied to clipboard"));
        }
    }

    /// Update the open flag, subscribing or releasing the balance feed on change
    pub fn set_open(&mut self, open: bool) -> Option<WalletCommand> {
        if self.wallet.open == open {
            return None;
        }
        self.wallet.open = open;
        if open {
            if self.active_panel == Panel::Join {
                self.stop_editing();
            }
            Some(WalletCommand::SubscribeBalance)
        } else {
            Some(WalletCommand::UnsubscribeBalance)
        }
    }

    // ========================
    // Wallet responses
    // ========================

    pub fn handle_response(&mut self, response: WalletResponse) -> Option<WalletCommand> {
        match response {
            WalletResponse::OpenAttempted { open } => {
                self.wallet.open_attempted = true;
                self.set_open(open)
            }
            WalletResponse::OpenStatus { open } => self.set_open(open),
            WalletResponse::JoinFinished(result) => {
                let joined = result.is_ok();
                self.join.finish(result);
                if joined {
                    // Give the wallet a moment before re-reading the open flag
                    Some(WalletCommand::CheckOpen { after: self.join_settle })
                } else {
                    None
                }
            }
            WalletResponse::InvoiceCreated(result) => {
                self.invoice.finish(result);
                None
            }
            WalletResponse::EcashRedeemed(result) => {
                self.redeem.finish(result.map(|()| String::from("Redeemed!")));
                None
            }
            WalletResponse::InvoicePaid(result) => {
                self.pay.finish(result.map(|()| String::from("Paid!")));
                None
            }
            WalletResponse::InviteCodeParsed(result) => {
                self.invite.finish(result);
                None
            }
            WalletResponse::InvoiceParsed(result) => {
                self.bolt11.finish(result);
                None
            }
            WalletResponse::Balance { sats, open } => {
                let command = self.set_open(open);
                self.wallet.balance_sats = sats;
                self.wallet.balance_updated_at = Some(chrono::Local::now());
                command
            }
        }
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }
}
