//! Serves a widget over stdio.
//!
//! Every line on stdin is a message posted by the widget window, every response posted back to it
//! is written to stdout as a single JSON line. Logs go to stderr.

use alloy_primitives::{Address, ChainId};
use clap::Parser;
use eyre::{Result, WrapErr};
use std::{
    io::{BufRead, BufReader, Read},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};
use tokio::{
    io::AsyncWriteExt,
    sync::mpsc::{UnboundedReceiver, unbounded_channel},
};
use tracing_subscriber::EnvFilter;
use widget_bridge::{Bridge, BridgeConfig, MessageBus, WalletApi};

#[derive(Clone, Debug, Parser)]
#[command(name = "widget-bridge", version, about = "Wallet RPC bridge for an embedded widget")]
struct Args {
    /// Path to the config file.
    #[arg(long, short, value_name = "PATH", default_value = BridgeConfig::FILE_NAME)]
    config: PathBuf,

    /// The account exposed to the widget.
    #[arg(long, value_name = "ADDRESS")]
    account: Option<Address>,

    /// The chain the session starts on.
    #[arg(long, value_name = "CHAIN_ID")]
    chain_id: Option<ChainId>,

    /// Seconds a request may take before it fails, `0` disables the limit.
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

impl Args {
    /// Loads the config file and applies the command line overrides.
    fn config(&self) -> Result<BridgeConfig> {
        let mut config = BridgeConfig::load_with_file(&self.config)
            .wrap_err_with(|| format!("failed to load {}", self.config.display()))?;
        if let Some(account) = self.account {
            config = config.with_account(account);
        }
        if let Some(chain_id) = self.chain_id {
            config = config.with_chain_id(chain_id);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_request_timeout((timeout > 0).then(|| Duration::from_secs(timeout)));
        }
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = args.config()?;
    tracing::debug!(?config, "loaded config");

    let bus = Arc::new(MessageBus::new());
    let (widget, mut inbox) = bus.open_window();
    let bridge =
        Bridge::spawn(WalletApi::from_config(&config), bus.clone(), widget, config.request_timeout());

    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(message) = inbox.recv().await {
            let mut line = serde_json::to_vec(&message)?;
            line.push(b'\n');
            stdout.write_all(&line).await?;
            stdout.flush().await?;
        }
        Ok::<_, eyre::Report>(())
    });

    let mut lines = spawn_line_reader(std::io::stdin())?;
    let read = {
        let bus = bus.clone();
        async move {
            while let Some(line) = lines.recv().await {
                let line = line?;
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match serde_json::from_str(line) {
                    Ok(message) => {
                        bus.dispatch(widget, message);
                    }
                    Err(err) => tracing::warn!(%err, "ignoring malformed input line"),
                }
            }
            Ok::<_, eyre::Report>(())
        }
    };

    tokio::select! {
        res = read => {
            res.wrap_err("failed to read stdin")?;
            bridge.shutdown().await;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted, disposing bridge");
            bridge.dispose();
        }
    }

    bus.close_window(widget);
    writer.await??;
    Ok(())
}

/// Reads `input` line by line on its own thread.
///
/// A read blocked on that thread does not keep the runtime from shutting down after Ctrl-C.
fn spawn_line_reader<R: Read + Send + 'static>(
    input: R,
) -> Result<UnboundedReceiver<std::io::Result<String>>> {
    let (tx, rx) = unbounded_channel();
    std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in BufReader::new(input).lines() {
                let failed = line.is_err();
                if tx.send(line).is_err() || failed {
                    break;
                }
            }
        })
        .wrap_err("failed to spawn stdin reader")?;
    Ok(rx)
}
