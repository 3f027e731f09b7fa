//! Wallet actor - runs wallet client calls in the Tokio async runtime

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{WalletCommand, WalletResponse};
use crate::wallet::client::{Subscription, WalletClient};
use crate::wallet::WalletError;

/// Wallet actor that executes wallet commands against a [`WalletClient`]
pub struct WalletActor {
    client: Arc<dyn WalletClient>,
    response_tx: mpsc::UnboundedSender<WalletResponse>,
    active_calls: JoinSet<()>,
    balance_subscription: Option<Subscription>,
}

impl WalletActor {
    pub fn new(
        client: Arc<dyn WalletClient>,
        response_tx: mpsc::UnboundedSender<WalletResponse>,
    ) -> Self {
        WalletActor {
            client,
            response_tx,
            active_calls: JoinSet::new(),
            balance_subscription: None,
        }
    }

    /// Run the wallet actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<WalletCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(WalletCommand::Shutdown) | None => break,
                        Some(cmd) => self.handle_command(cmd),
                    }
                }

                // Reap finished calls
                Some(result) = self.active_calls.join_next() => {
                    if let Err(e) = result {
                        if e.is_panic() {
                            tracing::error!(error = %e, "Wallet call panicked");
                        }
                    }
                }
            }
        }

        if let Some(subscription) = self.balance_subscription.take() {
            subscription.unsubscribe();
        }
        self.active_calls.abort_all();
        tracing::info!("Wallet actor stopped");
    }

    /// Spawn `call` and forward its response
    fn spawn_call<F>(&mut self, call: F)
    where
        F: Future<Output = WalletResponse> + Send + 'static,
    {
        let response_tx = self.response_tx.clone();
        self.active_calls.spawn(async move {
            let _ = response_tx.send(call.await);
        });
    }

    fn handle_command(&mut self, cmd: WalletCommand) {
        let client = self.client.clone();
        match cmd {
            WalletCommand::OpenExisting { name } => {
                self.spawn_call(async move {
                    if client.is_open() {
                        tracing::info!("Wallet is already open");
                        return WalletResponse::OpenAttempted { open: true };
                    }
                    let open = match client.open(&name).await {
                        Ok(true) => {
                            tracing::info!(%name, "Opened existing wallet client");
                            true
                        }
                        Ok(false) => {
                            tracing::info!(%name, "No existing wallet client to open");
                            false
                        }
                        Err(e) => {
                            tracing::info!(%name, error = %e, "No existing client found, join a federation");
                            false
                        }
                    };
                    WalletResponse::OpenAttempted { open }
                });
            }

            WalletCommand::CheckOpen { after } => {
                self.spawn_call(async move {
                    if !after.is_zero() {
                        tokio::time::sleep(after).await;
                    }
                    WalletResponse::OpenStatus { open: client.is_open() }
                });
            }

            WalletCommand::JoinFederation { invite_code, name } => {
                self.spawn_call(async move {
                    tracing::info!(%invite_code, %name, "Joining federation");
                    let result = async {
                        let preview = client.preview_federation(&invite_code).await?;
                        tracing::info!(
                            federation_id = %preview.federation_id,
                            config = %preview.config,
                            "Previewed federation"
                        );
                        client.join_federation(&invite_code, &name).await?;
                        Ok::<_, WalletError>(preview)
                    }
                    .await
                    .map_err(|e| {
                        tracing::warn!(error = %e, "Error joining federation");
                        e.to_string()
                    });
                    WalletResponse::JoinFinished(result)
                });
            }

            WalletCommand::CreateInvoice { amount_sats, description } => {
                self.spawn_call(async move {
                    let result = client.create_invoice(amount_sats, &description).await;
                    if let Err(e) = &result {
                        tracing::error!(error = %e, "Error generating Lightning invoice");
                    }
                    WalletResponse::InvoiceCreated(result.map_err(|e| e.to_string()))
                });
            }

            WalletCommand::RedeemEcash { token } => {
                self.spawn_call(async move {
                    let result = client.redeem_ecash(&token).await;
                    if let Err(e) = &result {
                        tracing::warn!(error = %e, "Error redeeming ecash");
                    }
                    WalletResponse::EcashRedeemed(result.map_err(|e| e.to_string()))
                });
            }

            WalletCommand::PayInvoice { invoice } => {
                self.spawn_call(async move {
                    let result = client.pay_invoice(&invoice).await;
                    if let Err(e) = &result {
                        tracing::warn!(error = %e, "Error paying lightning invoice");
                    }
                    WalletResponse::InvoicePaid(result.map_err(|e| e.to_string()))
                });
            }

            WalletCommand::ParseInviteCode { invite_code } => {
                self.spawn_call(async move {
                    let result = client.parse_invite_code(&invite_code).await;
                    if let Err(e) = &result {
                        tracing::warn!(error = %e, "Error parsing invite code");
                    }
                    WalletResponse::InviteCodeParsed(result.map_err(|e| e.to_string()))
                });
            }

            WalletCommand::ParseBolt11Invoice { invoice } => {
                self.spawn_call(async move {
                    let result = client.parse_bolt11_invoice(&invoice).await;
                    if let Err(e) = &result {
                        tracing::warn!(error = %e, "Error parsing lightning invoice");
                    }
                    WalletResponse::InvoiceParsed(result.map_err(|e| e.to_string()))
                });
            }

            WalletCommand::SubscribeBalance => {
                let response_tx = self.response_tx.clone();
                let status = client.clone();
                let subscription = client.subscribe_balance(Box::new(move |sats| {
                    // The first update doubles as an open check
                    let _ = response_tx.send(WalletResponse::Balance {
                        sats,
                        open: status.is_open(),
                    });
                }));
                tracing::debug!("Subscribed to balance");
                // Replacing an older subscription releases it
                self.balance_subscription = Some(subscription);
            }

            WalletCommand::UnsubscribeBalance => {
                if let Some(subscription) = self.balance_subscription.take() {
                    tracing::debug!("Unsubscribing from balance");
                    subscription.unsubscribe();
                }
            }

            WalletCommand::Shutdown => {}
        }
    }
}
