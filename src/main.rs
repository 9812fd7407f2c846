//! # accounts-engine
//! Application reads account operations from input csv file, applies them concurrently through the
//! account engine and prints resulting account states to output.
//!
//! ## Input format
//! csv with columns `type`, `account`, `amount`, `kind`
//!
//! ```csv
//! type,account,amount,kind
//! open,1,100.0,savings
//! withdraw,1,25.5,
//! lock,1,,
//! ```
//!
//! Logs go to stderr, filtered with `RUST_LOG`.

#![deny(missing_docs)]

use accounts_engine::{
    config::EngineConfig,
    csv::{self, RawOperation},
    engine::Engine,
    store::InMemoryStore,
    AccountId,
};
use anyhow::Context;
use futures::StreamExt;
use std::{collections::BTreeMap, env, sync::Arc};
use tokio::{
    io::{stdout, BufReader},
    spawn,
    sync::mpsc::{channel, Receiver, Sender},
};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

async fn read_ops_from_file(filename: String, sender: Sender<RawOperation>) -> anyhow::Result<()> {
    let f = tokio::fs::File::open(&filename)
        .await
        .with_context(|| format!("access input file {filename}"))?;

    let bf = BufReader::new(f);
    csv::deserialize_operations_from_csv_reader(bf, sender)
        .await
        .context("improper content of file")
}

type GroupedRawOperation = (AccountId, Vec<RawOperation>);

async fn group_by_account(
    input: Receiver<RawOperation>,
    output: Sender<GroupedRawOperation>,
) -> anyhow::Result<()> {
    let mut input = input;
    let mut per_account = BTreeMap::new();

    while let Some(raw_op) = input.recv().await {
        per_account
            .entry(raw_op.account)
            .or_insert_with(Vec::new)
            .push(raw_op);
    }

    for account_id_and_ops in per_account {
        output
            .send(account_id_and_ops)
            .await
            .context("account operations receiver closed")?;
    }
    Ok(())
}

async fn apply_account_ops(
    input: Vec<GroupedRawOperation>,
    engine: Arc<Engine<InMemoryStore>>,
) -> anyhow::Result<()> {
    for (_account_id, raw_ops) in input {
        for raw_op in raw_ops {
            // rejected rows are already reported by the engine
            let _ = raw_op.apply(&*engine).await;
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // CLI handle
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        return Err(anyhow::Error::msg("expected exactly one path to csv file"));
    }

    let config = EngineConfig::from_env()?;
    info!(exclusive_wait = ?config.exclusive_wait, "starting accounts engine");
    let engine = Arc::new(Engine::in_memory(&config));

    // read data from csv file
    let (tx_raw_ops, rx_raw_ops) = channel(8192);
    let task_read_csv = spawn(read_ops_from_file(args[1].clone(), tx_raw_ops));

    // group operations by account identifier
    let (tx_ops_per_account, rx_ops_per_account) = channel(8192);
    let task_group_by_account = spawn(group_by_account(rx_raw_ops, tx_ops_per_account));

    // split accounts into chunks, each chunk applied by its own task on the shared engine
    let mut chunked_account_ops = ReceiverStream::new(rx_ops_per_account).chunks(64);
    let mut apply_tasks = Vec::with_capacity(128);
    while let Some(chunk) = chunked_account_ops.next().await {
        apply_tasks.push(spawn(apply_account_ops(chunk, engine.clone())));
    }

    // await for each task to complete and handle it errors if occurred
    task_read_csv.await??;
    task_group_by_account.await??;
    for task in apply_tasks {
        task.await??;
    }

    let accounts = engine.accounts().await;
    if accounts.is_empty() {
        warn!("no accounts were opened");
    }
    csv::summarize_accounts(tokio_stream::iter(accounts), stdout())
        .await
        .context("failed to save output")?;

    Ok(())
}
