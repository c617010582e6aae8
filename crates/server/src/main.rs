// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! weaved: serve static files and embedded-code pages

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;
use weave_exec::ProcessRunner;
use weave_server::{bind, logging, Listener, Renderer, Settings};

#[derive(Parser)]
#[command(name = "weaved", version, about = "Serve static files and embedded-code pages")]
struct Cli {
    /// Settings file (default: $WEAVE_CONFIG, ./weave.toml, then the user config dir)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Document root
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (0 picks a free port)
    #[arg(short, long)]
    port: Option<u16>,
}

impl Cli {
    fn apply(self, settings: &mut Settings) {
        if let Some(root) = self.root {
            settings.root = root;
        }
        if let Some(host) = self.host {
            settings.host = host;
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    cli.apply(&mut settings);
    settings.resolve_root().context("resolving document root")?;

    // NOTE(lifetime): flushes the file writer on drop
    let _log_guard = logging::init(&settings).context("initializing logging")?;

    let runner = ProcessRunner::new(settings.interpreter.clone())
        .with_program_args(settings.interpreter_args.clone())
        .with_timeout(settings.script_timeout());
    let tcp = bind(&settings).await?;
    let address = tcp.local_addr().context("reading bound address")?;
    info!(%address, root = %settings.root.display(), interpreter = %runner.program(), "serving");
    println!("READY {address}");

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, shutting down");
                shutdown.cancel();
            }
        }
    });

    Listener::new(tcp, Renderer::new(runner, settings), shutdown).run().await;
    Ok(())
}
