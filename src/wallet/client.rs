//! The wallet client capability the panels call into

use async_trait::async_trait;

use crate::models::{CreatedInvoice, FederationPreview, ParsedInviteCode, ParsedInvoice};
use crate::wallet::WalletError;

/// Callback receiving balance updates in sats
pub type BalanceCallback = Box<dyn Fn(u64) + Send + Sync>;

/// Handle to a live subscription.
///
/// The release action runs exactly once, either through
/// [`Subscription::unsubscribe`] or when the handle is dropped.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Subscription {
            release: Some(Box::new(release)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Operations offered by the external e-cash / Lightning wallet
#[async_trait]
pub trait WalletClient: Send + Sync {
    /// Whether a client is currently open
    fn is_open(&self) -> bool;

    /// Reattach to an existing client, returns whether one was found
    async fn open(&self, name: &str) -> Result<bool, WalletError>;

    /// Join the federation behind `invite_code` under wallet `name`
    async fn join_federation(&self, invite_code: &str, name: &str) -> Result<(), WalletError>;

    async fn preview_federation(&self, invite_code: &str) -> Result<FederationPreview, WalletError>;

    async fn parse_invite_code(&self, invite_code: &str) -> Result<ParsedInviteCode, WalletError>;

    async fn parse_bolt11_invoice(&self, invoice: &str) -> Result<ParsedInvoice, WalletError>;

    // Mint module

    async fn redeem_ecash(&self, token: &str) -> Result<(), WalletError>;

    // Lightning module

    async fn pay_invoice(&self, invoice: &str) -> Result<(), WalletError>;

    async fn create_invoice(
        &self,
        amount_sats: u64,
        description: &str,
    ) -> Result<CreatedInvoice, WalletError>;

    // Balance module

    /// Register `callback` for balance updates until the returned handle is released
    fn subscribe_balance(&self, callback: BalanceCallback) -> Subscription;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_subscription_releases_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let sub = Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        sub.unsubscribe();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscription_releases_on_drop() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        {
            let _sub = Subscription::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
