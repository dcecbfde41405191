//! Build the raffle participant pool for one token of a multi-token contract
//!
//! Usage: cargo run --bin participants -- [--token-id 5] [--output ./participants]

use std::{
    io::{self, Write},
    path::PathBuf,
    process,
};

use anyhow::Result;
use clap::Parser;
use num::BigUint;

use participant_pool::{
    config::{Network, Settings},
    owners::{alchemy::AlchemyClient, token_id},
    pipeline,
};

#[derive(Parser, Debug)]
#[command(name = "participants", about = "Write one line per token unit owned to the participant pool file")]
struct Args {
    /// Contract to list owners for
    #[arg(long)]
    contract: Option<String>,

    /// Token ID, decimal or 0x-prefixed hex
    #[arg(long, value_parser = token_id_arg)]
    token_id: Option<BigUint>,

    /// Pool file, overwritten on every run
    #[arg(long)]
    output: Option<PathBuf>,

    /// Network slug, overrides ALCHEMY_NETWORK
    #[arg(long)]
    network: Option<Network>,
}

fn token_id_arg(raw: &str) -> std::result::Result<BigUint, String> {
    token_id::parse_arg(raw).map_err(|e| e.to_string())
}

async fn run(args: Args) -> Result<()> {
    let mut settings = Settings::from_env()?;
    if let Some(contract) = args.contract {
        settings.contract_address = contract;
    }
    if let Some(id) = args.token_id {
        settings.token_id = id;
    }
    if let Some(output) = args.output {
        settings.output_path = output;
    }
    if let Some(network) = args.network {
        settings.network = network;
    }
    log::debug!("[MAIN] {:?}", settings);

    let source = AlchemyClient::new(&settings)?;
    let summary = pipeline::run(&settings, &source).await?;

    // spot check
    println!("{}", serde_json::to_string_pretty(&summary.entries)?);
    Ok(())
}

/// Exit status for a finished run: 0 on success, 1 after printing the
/// error chain to `err_out`.
fn exit_status(outcome: Result<()>, err_out: &mut dyn Write) -> i32 {
    match outcome {
        Ok(()) => 0,
        Err(e) => {
            let _ = writeln!(err_out, "❌ {e:#}");
            1
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let outcome = run(args).await;
    process::exit(exit_status(outcome, &mut io::stderr()));
}
