//! WebSocket JSON-RPC transport to the wallet bridge
//!
//! One background task owns the socket. Callers hand it [`Outgoing`]
//! requests over a channel; answers are routed back by `request_id`.

use std::collections::HashMap;

use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::wallet::WalletError;

pub type CallReply = oneshot::Sender<Result<Value, WalletError>>;
pub type StreamUpdates = mpsc::UnboundedSender<Result<Value, WalletError>>;

/// A request frame sent to the bridge
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest {
    pub request_id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub payload: Value,
}

/// Frame kinds the bridge answers with
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    Data,
    Error,
    End,
}

/// A response frame received from the bridge
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    pub request_id: u64,
    #[serde(rename = "type")]
    pub kind: ResponseKind,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub error: Option<String>,
}

/// Work handed to the connection task
pub enum Outgoing {
    /// Single-shot call, resolved by the first `data` frame
    Call { request: RpcRequest, reply: CallReply },
    /// Streaming call, every `data` frame is forwarded
    Stream { request: RpcRequest, updates: StreamUpdates },
    /// Stop a stream and tell the bridge to unsubscribe
    Cancel(u64),
}

enum Pending {
    Call(CallReply),
    Stream(StreamUpdates),
}

/// Requests waiting for an answer, keyed by request id
#[derive(Default)]
struct PendingTable {
    entries: HashMap<u64, Pending>,
}

impl PendingTable {
    fn insert(&mut self, id: u64, pending: Pending) {
        self.entries.insert(id, pending);
    }

    fn remove(&mut self, id: u64) -> bool {
        self.entries.remove(&id).is_some()
    }

    fn dispatch(&mut self, response: RpcResponse) {
        let id = response.request_id;
        match response.kind {
            ResponseKind::Data => match self.entries.remove(&id) {
                Some(Pending::Call(reply)) => {
                    let _ = reply.send(Ok(response.data));
                }
                Some(Pending::Stream(updates)) => {
                    // Keep the stream unless its receiver is gone
                    if updates.send(Ok(response.data)).is_ok() {
                        self.entries.insert(id, Pending::Stream(updates));
                    }
                }
                None => tracing::debug!(id, "Data for unknown request"),
            },
            ResponseKind::Error => {
                let message = response
                    .error
                    .unwrap_or_else(|| String::from("Unknown wallet error"));
                match self.entries.remove(&id) {
                    Some(Pending::Call(reply)) => {
                        let _ = reply.send(Err(WalletError::Rpc(message)));
                    }
                    Some(Pending::Stream(updates)) => {
                        let _ = updates.send(Err(WalletError::Rpc(message)));
                    }
                    None => tracing::debug!(id, %message, "Error for unknown request"),
                }
            }
            ResponseKind::End => {
                if let Some(Pending::Call(reply)) = self.entries.remove(&id) {
                    let _ = reply.send(Ok(Value::Null));
                }
            }
        }
    }

    fn fail(pending: Pending, error: WalletError) {
        match pending {
            Pending::Call(reply) => {
                let _ = reply.send(Err(error));
            }
            Pending::Stream(updates) => {
                let _ = updates.send(Err(error));
            }
        }
    }

    fn fail_all(&mut self) {
        for (_, pending) in self.entries.drain() {
            Self::fail(pending, WalletError::Disconnected);
        }
    }
}

/// Connect to the bridge and spawn the task serving the socket
pub async fn connect(url: &str) -> Result<mpsc::UnboundedSender<Outgoing>, WalletError> {
    let (ws_stream, _response) = connect_async(url).await?;
    tracing::info!(url, "Connected to wallet bridge");

    let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();
    tokio::spawn(run_connection(ws_stream, outgoing_rx));
    Ok(outgoing_tx)
}

async fn run_connection<S>(ws_stream: S, mut outgoing_rx: mpsc::UnboundedReceiver<Outgoing>)
where
    S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
        + futures_util::Sink<Message, Error = tokio_tungstenite::tungstenite::Error>
        + Unpin,
{
    let (mut write, mut read) = ws_stream.split();
    let mut pending = PendingTable::default();

    loop {
        tokio::select! {
            biased;

            outgoing = outgoing_rx.recv() => {
                let (id, frame) = match outgoing {
                    Some(Outgoing::Call { request, reply }) => {
                        pending.insert(request.request_id, Pending::Call(reply));
                        (request.request_id, serde_json::to_string(&request))
                    }
                    Some(Outgoing::Stream { request, updates }) => {
                        pending.insert(request.request_id, Pending::Stream(updates));
                        (request.request_id, serde_json::to_string(&request))
                    }
                    Some(Outgoing::Cancel(id)) => {
                        if !pending.remove(id) {
                            continue;
                        }
                        let unsubscribe = RpcRequest {
                            request_id: id,
                            kind: String::from("unsubscribe"),
                            payload: Value::Null,
                        };
                        (id, serde_json::to_string(&unsubscribe))
                    }
                    None => {
                        // Every client handle is gone
                        let _ = write.close().await;
                        pending.fail_all();
                        return;
                    }
                };

                let frame = match frame {
                    Ok(frame) => frame,
                    Err(e) => {
                        if let Some(entry) = pending.entries.remove(&id) {
                            PendingTable::fail(entry, WalletError::Decode(e));
                        }
                        continue;
                    }
                };

                tracing::trace!(id, %frame, "Sending bridge frame");
                if let Err(e) = write.send(Message::Text(frame)).await {
                    tracing::error!(id, error = %e, "Bridge send failed");
                    pending.fail_all();
                    return;
                }
            }

            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<RpcResponse>(&text) {
                            Ok(response) => pending.dispatch(response),
                            Err(e) => tracing::warn!(error = %e, %text, "Unreadable bridge frame"),
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = write.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let reason = frame
                            .map(|f| format!("{}: {}", f.code, f.reason))
                            .unwrap_or_else(|| "Connection closed".to_string());
                        tracing::warn!(%reason, "Wallet bridge closed the connection");
                        pending.fail_all();
                        return;
                    }
                    Some(Ok(_)) => {
                        // Binary, pong and raw frames carry nothing for us
                    }
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "Bridge receive error");
                        pending.fail_all();
                        return;
                    }
                    None => {
                        tracing::warn!("Wallet bridge stream ended");
                        pending.fail_all();
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> RpcResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_request_serializes_type_field() {
        let request = RpcRequest {
            request_id: 3,
            kind: "open".to_string(),
            payload: serde_json::json!({ "client_name": "fm-client" }),
        };
        let json: Value = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "open");
        assert_eq!(json["request_id"], 3);
        assert_eq!(json["payload"]["client_name"], "fm-client");

        let bare = RpcRequest { request_id: 4, kind: "unsubscribe".to_string(), payload: Value::Null };
        let json: Value = serde_json::to_value(&bare).unwrap();
        assert!(json.get("payload").is_none());
    }

    #[test]
    fn test_call_resolves_on_data() {
        let mut table = PendingTable::default();
        let (tx, mut rx) = oneshot::channel();
        table.insert(1, Pending::Call(tx));

        table.dispatch(response(r#"{"request_id": 1, "type": "data", "data": true}"#));

        assert_eq!(rx.try_recv().unwrap().unwrap(), Value::Bool(true));
        assert!(table.entries.is_empty());
    }

    #[test]
    fn test_call_rejects_with_bridge_message() {
        let mut table = PendingTable::default();
        let (tx, mut rx) = oneshot::channel();
        table.insert(2, Pending::Call(tx));

        table.dispatch(response(r#"{"request_id": 2, "type": "error", "error": "invalid invite code"}"#));

        let err = rx.try_recv().unwrap().unwrap_err();
        assert_eq!(err.to_string(), "invalid invite code");
    }

    #[test]
    fn test_call_resolves_null_on_end() {
        let mut table = PendingTable::default();
        let (tx, mut rx) = oneshot::channel();
        table.insert(5, Pending::Call(tx));

        table.dispatch(response(r#"{"request_id": 5, "type": "end"}"#));

        assert_eq!(rx.try_recv().unwrap().unwrap(), Value::Null);
    }

    #[test]
    fn test_stream_keeps_receiving_until_end() {
        let mut table = PendingTable::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        table.insert(7, Pending::Stream(tx));

        table.dispatch(response(r#"{"request_id": 7, "type": "data", "data": 1000}"#));
        table.dispatch(response(r#"{"request_id": 7, "type": "data", "data": 2000}"#));
        table.dispatch(response(r#"{"request_id": 7, "type": "end"}"#));

        assert_eq!(rx.try_recv().unwrap().unwrap(), serde_json::json!(1000));
        assert_eq!(rx.try_recv().unwrap().unwrap(), serde_json::json!(2000));
        assert!(table.entries.is_empty());
        // Sender dropped on end
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_stream_error_ends_stream() {
        let mut table = PendingTable::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        table.insert(9, Pending::Stream(tx));

        table.dispatch(response(r#"{"request_id": 9, "type": "data", "data": 1000}"#));
        table.dispatch(response(r#"{"request_id": 9, "type": "error", "error": "client closed"}"#));

        assert_eq!(rx.try_recv().unwrap().unwrap(), serde_json::json!(1000));
        assert!(matches!(rx.try_recv().unwrap(), Err(WalletError::Rpc(m)) if m == "client closed"));
        assert!(table.entries.is_empty());
        // Later frames for the id go nowhere
        table.dispatch(response(r#"{"request_id": 9, "type": "data", "data": 2000}"#));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_disconnect_fails_everything_pending() {
        let mut table = PendingTable::default();
        let (call_tx, mut call_rx) = oneshot::channel();
        let (stream_tx, mut stream_rx) = mpsc::unbounded_channel();
        table.insert(1, Pending::Call(call_tx));
        table.insert(2, Pending::Stream(stream_tx));

        table.fail_all();

        assert!(matches!(call_rx.try_recv().unwrap(), Err(WalletError::Disconnected)));
        assert!(matches!(stream_rx.try_recv().unwrap(), Err(WalletError::Disconnected)));
    }
}
