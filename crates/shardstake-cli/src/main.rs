//! Shardstake CLI - encode, decode and inspect shard stake state.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod input;
mod output;

use commands::{decode, digest, encode, get_peer, Keys, Kind};

#[derive(Parser)]
#[command(name = "shardstake")]
#[command(about = "Canonical encoding and inspection of shard stake state")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON array of records as canonical hex
    Encode {
        /// Collection kind
        #[arg(long, value_enum)]
        kind: Kind,
        /// Public key scheme
        #[arg(long, value_enum, default_value_t = Keys::Standard)]
        keys: Keys,
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
    },
    /// Decode canonical hex and print its records
    Decode {
        /// Collection kind
        #[arg(long, value_enum)]
        kind: Kind,
        /// Public key scheme
        #[arg(long, value_enum, default_value_t = Keys::Standard)]
        keys: Keys,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Reject collections declaring more than N entries
        #[arg(long)]
        max_entries: Option<u64>,
        /// Input hex file (or stdin if not provided)
        input: Option<String>,
    },
    /// Print the SHA-256 digest of the canonical encoding
    Digest {
        /// Collection kind
        #[arg(long, value_enum)]
        kind: Kind,
        /// Public key scheme
        #[arg(long, value_enum, default_value_t = Keys::Standard)]
        keys: Keys,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Reject collections declaring more than N entries
        #[arg(long)]
        max_entries: Option<u64>,
        /// Input hex file (or stdin if not provided)
        input: Option<String>,
    },
    /// Look up one peer in an encoded epoch view
    GetPeer {
        /// Hex public key of the peer
        #[arg(long)]
        pubkey: String,
        /// Public key scheme
        #[arg(long, value_enum, default_value_t = Keys::Standard)]
        keys: Keys,
        /// Reject collections declaring more than N entries
        #[arg(long)]
        max_entries: Option<u64>,
        /// Input hex file (or stdin if not provided)
        input: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Encode { kind, keys, input } => encode::run(kind, keys, input),
        Commands::Decode {
            kind,
            keys,
            json,
            max_entries,
            input,
        } => decode::run(kind, keys, json, max_entries, input),
        Commands::Digest {
            kind,
            keys,
            json,
            max_entries,
            input,
        } => digest::run(kind, keys, json, max_entries, input),
        Commands::GetPeer {
            pubkey,
            keys,
            max_entries,
            input,
        } => get_peer::run(pubkey, keys, max_entries, input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
