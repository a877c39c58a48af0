//! toncenter v3 backend for the tontrace kernel.
//!
//! [`ToncenterClient`] implements [`tontrace_kernel::TraceApi`] over HTTP,
//! and [`config`] resolves the network, credentials and polling defaults a
//! caller needs to build one.

pub mod client;
pub mod config;
pub mod network;

pub use client::{ClientConfig, PENDING_TRACES_PATH, ToncenterClient, TRACES_PATH};
pub use config::{
    API_KEY_ENV, ConfigError, ConfigFile, DEFAULT_CONFIG_FILE, Overrides, Settings, WatchSettings,
};
pub use network::Network;
