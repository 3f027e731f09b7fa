//! Wallet messages - communication between App and Wallet layers

use std::time::Duration;

use crate::models::{CreatedInvoice, FederationPreview, ParsedInviteCode, ParsedInvoice};

/// Commands sent from App layer to Wallet layer
#[derive(Debug, Clone, PartialEq)]
pub enum WalletCommand {
    /// Reattach to a previously joined client at startup
    OpenExisting { name: String },
    /// Query the open flag after `after` has elapsed
    CheckOpen { after: Duration },
    /// Preview, then join a federation
    JoinFederation { invite_code: String, name: String },
    CreateInvoice { amount_sats: u64, description: String },
    RedeemEcash { token: String },
    PayInvoice { invoice: String },
    ParseInviteCode { invite_code: String },
    ParseBolt11Invoice { invoice: String },

    /// Start forwarding balance updates
    SubscribeBalance,
    /// Release the balance subscription
    UnsubscribeBalance,

    /// Shutdown the wallet actor
    Shutdown,
}

/// Responses sent from Wallet layer to App layer.
///
/// Failures carry the error's display text, ready to show in the panel.
#[derive(Debug, Clone, PartialEq)]
pub enum WalletResponse {
    /// Startup reattach attempt answered
    OpenAttempted { open: bool },
    OpenStatus { open: bool },
    JoinFinished(Result<FederationPreview, String>),
    InvoiceCreated(Result<CreatedInvoice, String>),
    EcashRedeemed(Result<(), String>),
    InvoicePaid(Result<(), String>),
    InviteCodeParsed(Result<ParsedInviteCode, String>),
    InvoiceParsed(Result<ParsedInvoice, String>),
    /// Balance update from the subscription, with the open flag re-read
    Balance { sats: u64, open: bool },
}
