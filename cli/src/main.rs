//! Interactive terminal client for the to-do service.
//!
//! Reads one command per line from stdin, runs requests on the blocking
//! pool and redraws the screen whenever a command, a response or the toast
//! timer changes something.

mod command;
mod frontend;
mod transport;

use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tokio::sync::mpsc;
use todo_core::{App, ClientConfig, TodoClient};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::frontend::{Flow, Frontend};
use crate::transport::Transport;

#[derive(Debug, Parser)]
#[command(name = "todo", version, about = "Manage your to-do list from the terminal")]
struct Cli {
    /// Base URL of the to-do API. Falls back to TODO_API_URL, then localhost.
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = match cli.api_url {
        Some(api_url) => ClientConfig { api_url },
        None => ClientConfig::from_env(),
    };
    info!(api_url = %config.api_url, "starting");

    let mut frontend = Frontend::new(App::new(TodoClient::new(&config.api_url)));
    let transport = Transport::new();
    let (done_tx, mut done_rx) = mpsc::unbounded_channel();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    draw(&mut stdout, &frontend).await?;
    loop {
        let deadline = frontend.toast_deadline();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                let flow = match command::parse(&line) {
                    Ok(Some(command)) => frontend.handle(command),
                    Ok(None) => Flow::Continue(Vec::new()),
                    Err(err) => {
                        frontend.reject(err);
                        Flow::Continue(Vec::new())
                    }
                };
                match flow {
                    Flow::Quit => break,
                    Flow::Continue(dispatches) => {
                        for dispatch in dispatches {
                            transport.spawn(dispatch, done_tx.clone());
                        }
                    }
                }
            }
            Some((id, outcome)) = done_rx.recv() => {
                for dispatch in frontend.on_completion(id, outcome) {
                    transport.spawn(dispatch, done_tx.clone());
                }
            }
            _ = expire(deadline), if deadline.is_some() => {
                if !frontend.tick(Instant::now()) {
                    continue;
                }
            }
        }
        draw(&mut stdout, &frontend).await?;
    }

    info!(pending = frontend.app().pending_requests(), "exiting");
    Ok(())
}

async fn expire(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

async fn draw(stdout: &mut Stdout, frontend: &Frontend) -> anyhow::Result<()> {
    let screen = format!("\n{frontend}> ");
    stdout
        .write_all(screen.as_bytes())
        .await
        .context("failed to write to stdout")?;
    stdout.flush().await.context("failed to flush stdout")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_flag_is_optional() {
        let cli = Cli::try_parse_from(["todo"]).unwrap();
        assert_eq!(cli.api_url, None);

        let cli = Cli::try_parse_from(["todo", "--api-url", "http://127.0.0.1:9000"]).unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://127.0.0.1:9000"));
    }
}
