//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Invite code of the public mutinynet test federation
pub const TESTNET_FEDERATION_CODE: &str = "fed11qgqrgvnhwden5te0v9k8q6rp9ekh2arfdeukuet595cr2ttpd3jhq6rzve6zuer9wchxvetyd938gcewvdhk6tcqqysptkuvknc7erjgf4em3zfh90kffqf9srujn6q53d6r056e4apze5cw27h75";

/// Wallet name used when none is configured
pub const DEFAULT_WALLET_NAME: &str = "fm-client";

/// Default address of the wallet bridge
pub const DEFAULT_BRIDGE_URL: &str = "ws://127.0.0.1:8175";

/// Environment variable overriding the configured bridge address
pub const BRIDGE_URL_ENV: &str = "FEDIMINT_BRIDGE_URL";

/// Default log file, relative to the working directory
pub const DEFAULT_LOG_FILE: &str = "fedimint-tui-demo.log";

/// Delay between a successful join and the follow-up open check
pub const DEFAULT_JOIN_SETTLE_MS: u64 = 1000;

/// The bridge counts amounts in millisatoshis
pub const MSATS_PER_SAT: u64 = 1000;

/// Largest invoice amount whose msat value fits in a `u64`
pub const MAX_INVOICE_SATS: u64 = u64::MAX / MSATS_PER_SAT;

/// Faucet paying test invoices on mutinynet
pub const FAUCET_URL: &str = "https://faucet.mutinynet.com/";

/// Application name
pub const APP_NAME: &str = "Fedimint Wallet Demo";
