//! Background worker that talks to the filter backend.

use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    service::FilterService,
    submit::{Submission, SubmitError},
};

/// Commands sent from the UI to the worker.
#[derive(Debug)]
pub enum WorkerCmd {
    /// Send a validated submission to the backend.
    Submit(Submission),
}

/// Events emitted by the worker for UI updates.
#[derive(Clone, Debug)]
pub enum WorkerEvent {
    /// Round trip for submission `id` completed (either way).
    Finished {
        id: Uuid,
        result: Result<Vec<u8>, SubmitError>,
    },
}

/// Main worker loop: handle commands sequentially until the UI hangs up.
pub async fn run(
    mut rx: mpsc::Receiver<WorkerCmd>,
    tx: mpsc::Sender<WorkerEvent>,
    service: Arc<dyn FilterService>,
) {
    tracing::info!("worker started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            WorkerCmd::Submit(Submission { id, request }) => {
                tracing::info!("submission {id} start");
                let result = service.filter_driver(request).await;
                match &result {
                    Ok(bytes) => tracing::info!("submission {id} done: {} bytes", bytes.len()),
                    Err(SubmitError::Service { status, message }) => {
                        tracing::error!("submission {id} rejected ({status}): {message}")
                    }
                    Err(e) => tracing::error!("submission {id} failed: {e}"),
                }
                if tx.send(WorkerEvent::Finished { id, result }).await.is_err() {
                    tracing::warn!("UI closed before submission {id} was reported");
                    break;
                }
            }
        }
    }

    tracing::info!("worker stopped");
}
