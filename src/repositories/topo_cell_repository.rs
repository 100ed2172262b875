use crate::client::AsyncTopoClient;
use crate::error::TopoApiResult;
use crate::repositories::traits::CellRepository;
use async_trait::async_trait;
use std::sync::Arc;

/// Cell repository backed by the topology service API.
///
/// Delegates to the AsyncTopoClient, keeping the cache independent of
/// the underlying HTTP client.
pub struct TopoCellRepository {
    client: Arc<dyn AsyncTopoClient>,
}

impl TopoCellRepository {
    /// Create a new TopoCellRepository with the given client.
    pub fn new(client: Arc<dyn AsyncTopoClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CellRepository for TopoCellRepository {
    async fn known_cells(&self) -> TopoApiResult<Vec<String>> {
        self.client.get_known_cells().await
    }
}
