//! Wallet layer - calls into the external wallet client
//!
//! The Wallet actor receives wallet commands and sends back responses.
//! The client itself sits behind the [`WalletClient`] trait.

pub mod actor;
pub mod client;
pub mod error;
pub mod rpc;
pub mod transport;

#[cfg(test)]
pub mod mock;

pub use actor::WalletActor;
pub use client::{BalanceCallback, Subscription, WalletClient};
pub use error::WalletError;
pub use rpc::RpcWalletClient;
