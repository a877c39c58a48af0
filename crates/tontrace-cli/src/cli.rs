use clap::{Args, Parser, Subcommand, ValueEnum};
use tontrace_toncenter::Network;

#[derive(Parser)]
#[command(
    name = "tontrace",
    about = "tontrace: normalized hashing and trace status for TON external messages",
    version
)]
pub struct Cli {
    /// Log at debug level (TONTRACE_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the normalized lookup hash of a signed message
    Hash {
        #[command(flatten)]
        message: MessageArgs,

        /// Drop the state-init before hashing (needed for deploy messages on toncenter)
        ///
        /// toncenter keys a wallet's first, deploying transfer with its
        /// state-init dropped. Under the default `preserve` policy the hash of
        /// such a message never matches an indexed trace, so it stays pending.
        #[arg(long)]
        discard_state_init: bool,

        /// Path to a tontrace.toml config file
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode a signed message and show its header fields
    Decode {
        #[command(flatten)]
        message: MessageArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve the trace status of a signed message once
    Status {
        #[command(flatten)]
        message: MessageArgs,

        #[command(flatten)]
        network: NetworkArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Poll the trace status until it is final
    Watch {
        #[command(flatten)]
        message: MessageArgs,

        #[command(flatten)]
        network: NetworkArgs,

        /// Delay between polls in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Give up after this many polls
        #[arg(long)]
        max_polls: Option<u32>,

        /// Also stop once an action of this type has succeeded
        #[arg(long)]
        until_action: Option<String>,

        /// Output one JSON object per poll
        #[arg(long)]
        json: bool,
    },

    /// Run the MCP server over stdio
    McpServe {
        #[command(flatten)]
        network: NetworkArgs,

        /// Server name reported at initialize
        #[arg(long, default_value = "tontrace")]
        server_name: String,

        /// Server version reported at initialize
        #[arg(long, default_value = env!("CARGO_PKG_VERSION"))]
        server_version: String,
    },
}

/// Where the signed message comes from.
#[derive(Args, Debug, Clone)]
pub struct MessageArgs {
    /// Base64-encoded bag of cells
    #[arg(long, conflicts_with = "boc_file", required_unless_present = "boc_file")]
    pub boc: Option<String>,

    /// File holding the bag of cells, raw or base64
    #[arg(long)]
    pub boc_file: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct NetworkArgs {
    /// Path to a tontrace.toml config file
    #[arg(long)]
    pub config: Option<String>,

    /// Network preset
    #[arg(long)]
    pub network: Option<NetworkArg>,

    /// Indexer base URL (overrides the network preset)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// toncenter API key (falls back to TONCENTER_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Drop the state-init before hashing (needed for deploy messages on toncenter)
    ///
    /// toncenter keys a wallet's first, deploying transfer with its
    /// state-init dropped. Under the default `preserve` policy the hash of
    /// such a message never matches an indexed trace, so it stays pending.
    #[arg(long)]
    pub discard_state_init: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum NetworkArg {
    Mainnet,
    Testnet,
}

impl From<NetworkArg> for Network {
    fn from(value: NetworkArg) -> Self {
        match value {
            NetworkArg::Mainnet => Network::Mainnet,
            NetworkArg::Testnet => Network::Testnet,
        }
    }
}
