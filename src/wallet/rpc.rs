//! Wallet client backed by a JSON-RPC bridge hosting the wallet library

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::{mpsc, oneshot};

use crate::constants::MSATS_PER_SAT;
use crate::models::{CreatedInvoice, FederationPreview, ParsedInviteCode, ParsedInvoice};
use crate::wallet::client::{BalanceCallback, Subscription, WalletClient};
use crate::wallet::transport::{self, Outgoing, RpcRequest};
use crate::wallet::WalletError;

/// [`WalletClient`] talking to a wallet bridge over WebSocket
pub struct RpcWalletClient {
    outgoing: mpsc::UnboundedSender<Outgoing>,
    next_request_id: AtomicU64,
    /// Name of the opened client, `None` until open or join succeeds
    client_name: RwLock<Option<String>>,
}

impl RpcWalletClient {
    pub async fn connect(url: &str) -> Result<Self, WalletError> {
        let outgoing = transport::connect(url).await?;
        Ok(Self::with_transport(outgoing))
    }

    fn with_transport(outgoing: mpsc::UnboundedSender<Outgoing>) -> Self {
        RpcWalletClient {
            outgoing,
            next_request_id: AtomicU64::new(1),
            client_name: RwLock::new(None),
        }
    }

    fn request(&self, kind: &str, payload: Value) -> RpcRequest {
        RpcRequest {
            request_id: self.next_request_id.fetch_add(1, Ordering::Relaxed),
            kind: kind.to_string(),
            payload,
        }
    }

    async fn call(&self, kind: &str, payload: Value) -> Result<Value, WalletError> {
        let request = self.request(kind, payload);
        let (reply, reply_rx) = oneshot::channel();
        tracing::debug!(id = request.request_id, kind, "Wallet call");
        self.outgoing
            .send(Outgoing::Call { request, reply })
            .map_err(|_| WalletError::Disconnected)?;
        reply_rx.await.map_err(|_| WalletError::Disconnected)?
    }

    async fn call_as<T: DeserializeOwned>(&self, kind: &str, payload: Value) -> Result<T, WalletError> {
        let value = self.call(kind, payload).await?;
        Ok(serde_json::from_value(value)?)
    }

    fn client_name(&self) -> Option<String> {
        self.client_name
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set_client_name(&self, name: &str) {
        *self
            .client_name
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(name.to_string());
    }

    fn module_payload(&self, module: &str, method: &str, payload: Value) -> Result<Value, WalletError> {
        let client_name = self.client_name().ok_or(WalletError::NotOpen)?;
        Ok(json!({
            "client_name": client_name,
            "module": module,
            "method": method,
            "payload": payload,
        }))
    }

    async fn module_call(&self, module: &str, method: &str, payload: Value) -> Result<Value, WalletError> {
        let payload = self.module_payload(module, method, payload)?;
        self.call("client_rpc", payload).await
    }
}

#[async_trait]
impl WalletClient for RpcWalletClient {
    fn is_open(&self) -> bool {
        self.client_name().is_some()
    }

    async fn open(&self, name: &str) -> Result<bool, WalletError> {
        let opened: bool = self.call_as("open", json!({ "client_name": name })).await?;
        if opened {
            self.set_client_name(name);
        }
        Ok(opened)
    }

    async fn join_federation(&self, invite_code: &str, name: &str) -> Result<(), WalletError> {
        let result = self
            .call("join", json!({ "invite_code": invite_code, "client_name": name }))
            .await?;
        tracing::info!(%result, "Join federation result");
        self.set_client_name(name);
        Ok(())
    }

    async fn preview_federation(&self, invite_code: &str) -> Result<FederationPreview, WalletError> {
        self.call_as("preview_federation", json!({ "invite_code": invite_code }))
            .await
    }

    async fn parse_invite_code(&self, invite_code: &str) -> Result<ParsedInviteCode, WalletError> {
        self.call_as("parse_invite_code", json!({ "invite_code": invite_code }))
            .await
    }

    async fn parse_bolt11_invoice(&self, invoice: &str) -> Result<ParsedInvoice, WalletError> {
        self.call_as("parse_bolt11_invoice", json!({ "invoice": invoice }))
            .await
    }

    async fn redeem_ecash(&self, token: &str) -> Result<(), WalletError> {
        let result = self
            .module_call(
                "mint",
                "reissue_external_notes",
                json!({ "oob_notes": token, "extra_meta": {} }),
            )
            .await?;
        tracing::info!(%result, "Redeem ecash result");
        Ok(())
    }

    async fn pay_invoice(&self, invoice: &str) -> Result<(), WalletError> {
        let result = self
            .module_call(
                "ln",
                "pay_bolt11_invoice",
                json!({ "maybe_gateway": null, "invoice": invoice, "extra_meta": {} }),
            )
            .await?;
        tracing::info!(%result, "Pay invoice result");
        Ok(())
    }

    async fn create_invoice(
        &self,
        amount_sats: u64,
        description: &str,
    ) -> Result<CreatedInvoice, WalletError> {
        let amount_msats = amount_sats
            .checked_mul(MSATS_PER_SAT)
            .ok_or(WalletError::AmountTooLarge(amount_sats))?;
        let value = self
            .module_call(
                "ln",
                "create_bolt11_invoice",
                json!({
                    "amount": amount_msats,
                    "description": description,
                    "expiry_time": null,
                    "extra_meta": {},
                    "gateway": null,
                }),
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    fn subscribe_balance(&self, callback: BalanceCallback) -> Subscription {
        let payload = match self.module_payload("", "subscribe_balance", json!({})) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "Balance subscription skipped");
                return Subscription::new(|| {});
            }
        };

        let request = self.request("client_rpc", payload);
        let id = request.request_id;
        let (updates, mut updates_rx) = mpsc::unbounded_channel();
        if self.outgoing.send(Outgoing::Stream { request, updates }).is_err() {
            tracing::warn!("Balance subscription failed: bridge disconnected");
            return Subscription::new(|| {});
        }

        let forward = tokio::spawn(async move {
            while let Some(update) = updates_rx.recv().await {
                let msats = update.and_then(|value| Ok(serde_json::from_value::<u64>(value)?));
                match msats {
                    Ok(msats) => callback(msats / MSATS_PER_SAT),
                    Err(e) => {
                        tracing::warn!(id, error = %e, "Balance subscription ended");
                        break;
                    }
                }
            }
        });

        let outgoing = self.outgoing.clone();
        Subscription::new(move || {
            tracing::debug!(id, "Unsubscribing from balance");
            let _ = outgoing.send(Outgoing::Cancel(id));
            forward.abort();
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::{SinkExt, StreamExt};
    use std::sync::atomic::AtomicU64 as Counter;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio_tungstenite::tungstenite::Message;

    /// Start a bridge that answers each request with `answer(request)`
    async fn spawn_bridge<F>(answer: F) -> String
    where
        F: Fn(&Value) -> Vec<Value> + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            while let Some(Ok(Message::Text(text))) = ws.next().await {
                let request: Value = serde_json::from_str(&text).unwrap();
                for frame in answer(&request) {
                    ws.send(Message::Text(frame.to_string())).await.unwrap();
                }
            }
        });
        format!("ws://{}", addr)
    }

    #[tokio::test]
    async fn test_open_marks_client_open() {
        let url = spawn_bridge(|request| {
            assert_eq!(request["type"], "open");
            assert_eq!(request["payload"]["client_name"], "fm-client");
            vec![json!({ "request_id": request["request_id"], "type": "data", "data": true })]
        })
        .await;

        let client = RpcWalletClient::connect(&url).await.unwrap();
        assert!(!client.is_open());
        assert!(client.open("fm-client").await.unwrap());
        assert!(client.is_open());
    }

    #[tokio::test]
    async fn test_parse_invite_code_decodes_fields() {
        let url = spawn_bridge(|request| {
            vec![json!({
                "request_id": request["request_id"],
                "type": "data",
                "data": { "federation_id": "abc", "url": "wss://x" },
            })]
        })
        .await;

        let client = RpcWalletClient::connect(&url).await.unwrap();
        let parsed = client.parse_invite_code("fed11...").await.unwrap();
        assert_eq!(parsed.federation_id, "abc");
        assert_eq!(parsed.url, "wss://x");
    }

    #[tokio::test]
    async fn test_bridge_error_message_passes_through() {
        let url = spawn_bridge(|request| {
            vec![json!({
                "request_id": request["request_id"],
                "type": "error",
                "error": "Invalid invite code",
            })]
        })
        .await;

        let client = RpcWalletClient::connect(&url).await.unwrap();
        let err = client.join_federation("bogus", "fm-client").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid invite code");
        assert!(!client.is_open());
    }

    #[tokio::test]
    async fn test_module_calls_require_open_client() {
        let (outgoing, _rx) = mpsc::unbounded_channel();
        let client = RpcWalletClient::with_transport(outgoing);
        let err = client.redeem_ecash("token").await.unwrap_err();
        assert!(matches!(err, WalletError::NotOpen));
    }

    #[tokio::test]
    async fn test_create_invoice_rejects_overflowing_amount() {
        let (outgoing, mut outgoing_rx) = mpsc::unbounded_channel();
        let client = RpcWalletClient::with_transport(outgoing);
        client.set_client_name("fm-client");

        let err = client.create_invoice(18_446_744_073_709_552, "x").await.unwrap_err();
        assert!(matches!(err, WalletError::AmountTooLarge(18_446_744_073_709_552)));
        // Nothing reached the bridge
        assert!(outgoing_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_create_invoice_sends_msats() {
        let url = spawn_bridge(|request| {
            let id = &request["request_id"];
            match request["type"].as_str() {
                Some("join") => vec![json!({ "request_id": id, "type": "data", "data": null })],
                Some("client_rpc") => {
                    assert_eq!(request["payload"]["module"], "ln");
                    assert_eq!(request["payload"]["payload"]["amount"], 21_000);
                    vec![json!({
                        "request_id": id,
                        "type": "data",
                        "data": { "operation_id": "op1", "invoice": "lntbs210n1..." },
                    })]
                }
                _ => vec![],
            }
        })
        .await;

        let client = RpcWalletClient::connect(&url).await.unwrap();
        client.join_federation("fed11...", "fm-client").await.unwrap();
        let created = client.create_invoice(21, "coffee").await.unwrap();
        assert_eq!(created.invoice, "lntbs210n1...");
        assert_eq!(created.operation_id.as_deref(), Some("op1"));
    }

    #[tokio::test]
    async fn test_balance_stream_converts_to_sats() {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen_requests = requests.clone();
        let url = spawn_bridge(move |request| {
            seen_requests.lock().unwrap().push(request.clone());
            let id = &request["request_id"];
            match request["type"].as_str() {
                Some("open") => vec![json!({ "request_id": id, "type": "data", "data": true })],
                Some("client_rpc") => vec![
                    json!({ "request_id": id, "type": "data", "data": 1_000_000 }),
                    json!({ "request_id": id, "type": "data", "data": 2_500_000 }),
                ],
                _ => vec![],
            }
        })
        .await;

        let client = RpcWalletClient::connect(&url).await.unwrap();
        client.open("fm-client").await.unwrap();

        let last = Arc::new(Counter::new(0));
        let seen = last.clone();
        let subscription = client.subscribe_balance(Box::new(move |sats| {
            seen.store(sats, Ordering::SeqCst);
        }));

        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while last.load(Ordering::SeqCst) != 2500 && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(last.load(Ordering::SeqCst), 2500);

        let stream_id = requests
            .lock()
            .unwrap()
            .iter()
            .find(|r| r["type"] == "client_rpc")
            .map(|r| r["request_id"].clone())
            .unwrap();
        assert_eq!(requests.lock().unwrap().last().unwrap()["payload"]["method"], "subscribe_balance");

        subscription.unsubscribe();

        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        let unsubscribed = || {
            requests
                .lock()
                .unwrap()
                .iter()
                .any(|r| r["type"] == "unsubscribe" && r["request_id"] == stream_id)
        };
        while !unsubscribed() && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(unsubscribed());
    }
}
