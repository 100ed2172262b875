use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use topo_cells_server::error::{TopoApiError, TopoApiResult};
use topo_cells_server::repositories::CellRepository;

#[derive(Clone)]
enum Response {
    Cells(Vec<String>),
    Failure(String),
}

/// Mock cell repository for testing.
///
/// Serves whatever response was configured last, optionally after a delay,
/// and counts how many times it was asked.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockCellRepository {
    response: Arc<Mutex<Response>>,
    delay: Arc<Mutex<Option<Duration>>>,
    calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockCellRepository {
    /// Create a repository that reports no cells.
    pub fn new() -> Self {
        Self {
            response: Arc::new(Mutex::new(Response::Cells(Vec::new()))),
            delay: Arc::new(Mutex::new(None)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a repository that reports `cells`.
    pub fn with_cells(cells: &[&str]) -> Self {
        let repo = Self::new();
        repo.set_cells(cells);
        repo
    }

    /// Report `cells` from now on.
    pub fn set_cells(&self, cells: &[&str]) {
        let cells = cells.iter().map(|s| s.to_string()).collect();
        *self.response.lock().unwrap() = Response::Cells(cells);
    }

    /// Fail every call from now on with an HTTP error carrying `message`.
    pub fn set_failure(&self, message: &str) {
        *self.response.lock().unwrap() = Response::Failure(message.to_string());
    }

    /// Sleep for `delay` inside every call.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Number of times `known_cells` was called.
    pub fn get_call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Reset the call count.
    pub fn reset_call_count(&self) {
        self.calls.store(0, Ordering::SeqCst);
    }
}

impl Default for MockCellRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CellRepository for MockCellRepository {
    async fn known_cells(&self) -> TopoApiResult<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let response = self.response.lock().unwrap().clone();
        match response {
            Response::Cells(cells) => Ok(cells),
            Response::Failure(message) => Err(TopoApiError::HttpError(message)),
        }
    }
}
