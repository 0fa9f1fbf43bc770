use crate::command::{Command, execute};
use crate::render::render_state;
use anyhow::{Context, Result};
use catalog_engine::CatalogEngine;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

/// Runs one interactive session: loads the first page, applies each input
/// line as a command, and sends every settled snapshot and command message
/// to `output`.
///
/// At end of input (or `quit`) a pending search is applied rather than
/// dropped, and the session returns only after the last snapshot was sent.
pub async fn run_session<R>(
    engine: CatalogEngine,
    input: R,
    output: UnboundedSender<String>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut updates = engine.subscribe();
    let snapshots = output.clone();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            if !state.is_loading() && snapshots.send(render_state(&state)).is_err() {
                break;
            }
        }
    });

    engine.refresh().await;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        if line.trim().is_empty() {
            continue;
        }
        let message = match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => {
                debug!(?command, "running command");
                match execute(&engine, command).await {
                    Ok(message) => message,
                    Err(err) => Some(format!("error: {err:#}")),
                }
            }
            Err(err) => Some(err.to_string()),
        };
        if let Some(message) = message {
            let _ = output.send(message);
        }
    }

    if engine.flush_pending_search().await {
        debug!("applied pending search before exit");
    }
    engine.shutdown();
    // Dropping the last handle closes the state channel, which ends the
    // printer once it has sent the final snapshot.
    drop(engine);
    printer.await.context("snapshot printer failed")?;
    info!("session ended");
    Ok(())
}
