use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use directory_logging::{directory_error, directory_info};

use crate::fetch::{ReqwestUserSource, SourceSettings, UserSource};
use crate::{EngineEvent, FailureKind, FetchError, PageNumber};

enum EngineCommand {
    RequestPage { page: PageNumber },
}

/// Runs page fetches on a background tokio runtime.
///
/// Requests go in through [`EngineHandle::request_page`]; completions come
/// back as [`EngineEvent`]s polled from the owning thread.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: SourceSettings) -> Result<Self, FetchError> {
        let source = ReqwestUserSource::new(settings)?;
        Ok(Self::with_source(Arc::new(source)))
    }

    pub fn with_source(source: Arc<dyn UserSource>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    directory_error!("Engine runtime failed to start: {}", err);
                    reject_all(cmd_rx, event_tx, &err.to_string());
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let source = source.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(handle_command(source, command, event_tx));
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn request_page(&self, page: PageNumber) {
        let _ = self.cmd_tx.send(EngineCommand::RequestPage { page });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    source: Arc<dyn UserSource>,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::RequestPage { page } => {
            // A panicking source must still complete the page, or the caller
            // stays in its loading state.
            let fetch = tokio::spawn(async move { source.fetch_page(page).await });
            let result = match fetch.await {
                Ok(result) => result,
                Err(err) => Err(FetchError::new(
                    FailureKind::Network,
                    format!("page task aborted: {err}"),
                )),
            };
            match &result {
                Ok(fetched) => directory_info!(
                    "Page {} fetched: {} records, {} total pages",
                    page,
                    fetched.records.len(),
                    fetched.total_pages
                ),
                Err(err) => directory_error!("Page {} failed: {}", page, err),
            }
            let _ = event_tx.send(EngineEvent::PageCompleted { page, result });
        }
    }
}

fn reject_all(
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
    reason: &str,
) {
    while let Ok(EngineCommand::RequestPage { page }) = cmd_rx.recv() {
        let result = Err(FetchError::new(FailureKind::Network, reason));
        let _ = event_tx.send(EngineEvent::PageCompleted { page, result });
    }
}
