//! Errors surfaced by wallet client calls

use tokio_tungstenite::tungstenite;

/// Errors returned by a [`WalletClient`](super::WalletClient)
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// The wallet rejected the call; the message is shown as-is
    #[error("{0}")]
    Rpc(String),
    /// Could not reach the wallet bridge
    #[error("Connection failed: {0}")]
    Connect(#[from] tungstenite::Error),
    /// The bridge went away while a call was pending
    #[error("Wallet bridge disconnected")]
    Disconnected,
    /// The bridge answered with something we could not decode
    #[error("Invalid response from wallet: {0}")]
    Decode(#[from] serde_json::Error),
    /// The amount cannot be expressed in millisatoshis
    #[error("Amount of {0} sats is too large")]
    AmountTooLarge(u64),
    /// A module call was made before a client was opened or joined
    #[error("Wallet is not open")]
    NotOpen,
}
