//! # Fedimint Wallet Demo
//!
//! A terminal front end for a Fedimint e-cash wallet client.
//!
//! ## Features
//! - Wallet status with a live balance feed
//! - Join a federation by invite code
//! - Generate, pay and parse Lightning invoices
//! - Redeem e-cash notes
//! - Parse invite codes
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Wallet Layer (Tokio runtime, WebSocket bridge to the wallet)

pub mod app;
pub mod config;
pub mod constants;
pub mod messages;
pub mod models;
pub mod ui;
pub mod wallet;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use config::Config;
pub use messages::{RenderState, UiEvent, WalletCommand, WalletResponse};
pub use models::{Field, Form, Outcome, WalletStatus};
pub use wallet::{RpcWalletClient, WalletActor, WalletClient, WalletError};
