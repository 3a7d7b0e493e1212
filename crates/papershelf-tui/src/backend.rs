use std::sync::Arc;

use papershelf_core::CatalogBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::tui_event::{BackendCommand, BackendEvent};

/// Receive commands until the channel closes or `cancel` fires.
///
/// Each command runs as its own task so a slow read never blocks the next
/// one; overlapping completions are reconciled by the session, not here.
pub async fn run(
    catalog: Arc<dyn CatalogBackend>,
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    event_tx: mpsc::UnboundedSender<BackendEvent>,
    cancel: CancellationToken,
) {
    tracing::info!(backend = catalog.name(), "backend task started");
    loop {
        let cmd = tokio::select! {
            _ = cancel.cancelled() => break,
            cmd = cmd_rx.recv() => match cmd {
                Some(cmd) => cmd,
                None => break,
            },
        };
        let catalog = Arc::clone(&catalog);
        let tx = event_tx.clone();
        tokio::spawn(async move {
            let event = execute(catalog.as_ref(), cmd).await;
            // The receiver is gone only during shutdown.
            let _ = tx.send(event);
        });
    }
    tracing::info!("backend task stopped");
}

async fn execute(catalog: &dyn CatalogBackend, cmd: BackendCommand) -> BackendEvent {
    match cmd {
        BackendCommand::Fetch(request) => {
            let outcome = catalog.fetch(&request.descriptor).await;
            BackendEvent::FetchComplete {
                ticket: request.ticket,
                outcome,
            }
        }
        BackendCommand::Upload(submission) => {
            tracing::info!(title = %submission.title, file = %submission.file_name(), "uploading");
            let outcome = catalog.upload(submission.clone()).await;
            BackendEvent::UploadComplete {
                submission,
                outcome,
            }
        }
    }
}
