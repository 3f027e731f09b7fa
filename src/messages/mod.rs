//! Message types for inter-layer communication in the actor-based architecture.
//!
//! This module defines all messages that flow between the UI, App, and Wallet layers.

pub mod ui_events;
pub mod wallet;
pub mod render;

pub use ui_events::UiEvent;
pub use wallet::{WalletCommand, WalletResponse};
pub use render::RenderState;
