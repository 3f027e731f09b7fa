//! Scriptable in-memory wallet for tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::models::{CreatedInvoice, FederationPreview, ParsedInviteCode, ParsedInvoice};
use crate::wallet::client::{BalanceCallback, Subscription, WalletClient};
use crate::wallet::WalletError;

/// A wallet whose answers are set up front by the test.
///
/// `join_error` / `preview_error` make those calls reject with the given
/// message. A successful join opens the wallet.
#[derive(Default)]
pub struct MockWallet {
    pub open: AtomicBool,
    pub reattach: AtomicBool,
    pub join_error: Mutex<Option<String>>,
    pub preview_error: Mutex<Option<String>>,
    pub parsed_invite: Mutex<Option<ParsedInviteCode>>,
    pub joins: AtomicUsize,
    pub unsubscribes: Arc<AtomicUsize>,
    callback: Arc<Mutex<Option<BalanceCallback>>>,
}

impl MockWallet {
    pub fn new() -> Arc<Self> {
        Arc::new(MockWallet::default())
    }

    pub fn failing_join(message: &str) -> Arc<Self> {
        let wallet = MockWallet::default();
        *wallet.join_error.lock().unwrap() = Some(message.to_string());
        Arc::new(wallet)
    }

    pub fn is_subscribed(&self) -> bool {
        self.callback.lock().unwrap().is_some()
    }

    /// Invoke the registered balance callback
    pub fn emit_balance(&self, sats: u64) {
        if let Some(callback) = self.callback.lock().unwrap().as_ref() {
            callback(sats);
        }
    }

    fn reject(slot: &Mutex<Option<String>>) -> Result<(), WalletError> {
        match slot.lock().unwrap().clone() {
            Some(message) => Err(WalletError::Rpc(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl WalletClient for MockWallet {
    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    async fn open(&self, _name: &str) -> Result<bool, WalletError> {
        let found = self.reattach.load(Ordering::SeqCst);
        if found {
            self.open.store(true, Ordering::SeqCst);
        }
        Ok(found)
    }

    async fn join_federation(&self, _invite_code: &str, _name: &str) -> Result<(), WalletError> {
        self.joins.fetch_add(1, Ordering::SeqCst);
        Self::reject(&self.join_error)?;
        self.open.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn preview_federation(&self, _invite_code: &str) -> Result<FederationPreview, WalletError> {
        Self::reject(&self.preview_error)?;
        Ok(FederationPreview {
            config: serde_json::json!({ "global": { "meta": { "federation_name": "Mock" } } }),
            federation_id: String::from("mock-federation"),
        })
    }

    async fn parse_invite_code(&self, _invite_code: &str) -> Result<ParsedInviteCode, WalletError> {
        self.parsed_invite
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| WalletError::Rpc(String::from("invalid invite code")))
    }

    async fn parse_bolt11_invoice(&self, _invoice: &str) -> Result<ParsedInvoice, WalletError> {
        Ok(ParsedInvoice {
            amount: 21,
            expiry: 3600,
            memo: String::from("coffee"),
        })
    }

    async fn redeem_ecash(&self, _token: &str) -> Result<(), WalletError> {
        Ok(())
    }

    async fn pay_invoice(&self, _invoice: &str) -> Result<(), WalletError> {
        Ok(())
    }

    async fn create_invoice(
        &self,
        amount_sats: u64,
        _description: &str,
    ) -> Result<CreatedInvoice, WalletError> {
        Ok(CreatedInvoice {
            invoice: format!("lnmock{}", amount_sats),
            operation_id: None,
        })
    }

    fn subscribe_balance(&self, callback: BalanceCallback) -> Subscription {
        *self.callback.lock().unwrap() = Some(callback);
        let slot = self.callback.clone();
        let unsubscribes = self.unsubscribes.clone();
        Subscription::new(move || {
            unsubscribes.fetch_add(1, Ordering::SeqCst);
            *slot.lock().unwrap() = None;
        })
    }
}
