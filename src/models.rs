use serde::{Deserialize, Serialize};

use crate::constants::MAX_INVOICE_SATS;

/// Federation details fetched before joining
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FederationPreview {
    /// Raw federation config as returned by the wallet
    #[serde(default)]
    pub config: serde_json::Value,
    pub federation_id: String,
}

/// Fields decoded from an invite code
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParsedInviteCode {
    pub federation_id: String,
    pub url: String,
}

/// Fields decoded from a bolt11 invoice
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParsedInvoice {
    /// Amount in sats
    pub amount: u64,
    /// Expiry in seconds
    pub expiry: u64,
    #[serde(default)]
    pub memo: String,
}

/// Invoice generated by the lightning module
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreatedInvoice {
    pub invoice: String,
    #[serde(default)]
    pub operation_id: Option<String>,
}

/// Kind of value a form field accepts
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldKind {
    Text,
    /// Whole number of sats
    Amount,
}

/// A single required text input
#[derive(Clone, Debug)]
pub struct Field {
    pub label: &'static str,
    pub placeholder: &'static str,
    pub value: String,
    pub kind: FieldKind,
}

impl Field {
    pub fn new(label: &'static str, placeholder: &'static str) -> Self {
        Field {
            label,
            placeholder,
            value: String::new(),
            kind: FieldKind::Text,
        }
    }

    pub fn amount(label: &'static str, placeholder: &'static str) -> Self {
        Field {
            kind: FieldKind::Amount,
            ..Field::new(label, placeholder)
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Check the field the way a required form input would
    pub fn validate(&self) -> Result<(), String> {
        if self.value.is_empty() {
            return Err(format!("{} is required", self.label.trim_end_matches(':')));
        }
        if self.kind == FieldKind::Amount {
            let sats = self
                .value
                .trim()
                .parse::<u64>()
                .map_err(|_| String::from("Amount must be a whole number of sats"))?;
            if sats > MAX_INVOICE_SATS {
                return Err(format!("Amount must be at most {} sats", MAX_INVOICE_SATS));
            }
        }
        Ok(())
    }
}

/// Result of the last submission of a panel
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<T> {
    Idle,
    Success(T),
    Error(String),
}

impl<T> Outcome<T> {
    pub fn success(&self) -> Option<&T> {
        match self {
            Outcome::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Transient state of one panel's form
#[derive(Clone, Debug)]
pub struct Form<T> {
    pub fields: Vec<Field>,
    pub active_field: usize,
    pub pending: bool,
    pub outcome: Outcome<T>,
}

impl<T> Form<T> {
    pub fn new(fields: Vec<Field>) -> Self {
        Form {
            fields,
            active_field: 0,
            pending: false,
            outcome: Outcome::Idle,
        }
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.as_str()).unwrap_or("")
    }

    /// Validate and mark the form as in flight.
    ///
    /// Returns false when the submission must not reach the wallet: a call
    /// is already pending, or a field failed validation (in which case the
    /// failure becomes the form's error).
    pub fn begin(&mut self) -> bool {
        if self.pending {
            return false;
        }
        if let Some(message) = self.fields.iter().find_map(|f| f.validate().err()) {
            self.outcome = Outcome::Error(message);
            return false;
        }
        self.outcome = Outcome::Idle;
        self.pending = true;
        true
    }

    pub fn finish(&mut self, result: Result<T, String>) {
        self.pending = false;
        self.outcome = match result {
            Ok(value) => Outcome::Success(value),
            Err(message) => Outcome::Error(message),
        };
    }
}

/// Wallet state shared by every panel
#[derive(Clone, Debug, Default)]
pub struct WalletStatus {
    pub open: bool,
    /// Set once the startup reattach attempt has answered
    pub open_attempted: bool,
    pub balance_sats: u64,
    pub balance_updated_at: Option<chrono::DateTime<chrono::Local>>,
}
