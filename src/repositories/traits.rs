use crate::error::TopoApiResult;
use async_trait::async_trait;

/// Source of the known cells of a topology.
///
/// Abstracts over where the cell list comes from, enabling different
/// implementations (topology API client, mock, static list).
#[async_trait]
pub trait CellRepository: Send + Sync {
    /// Fetch the current cell names, in the order the source keeps them.
    async fn known_cells(&self) -> TopoApiResult<Vec<String>>;
}
