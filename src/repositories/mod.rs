mod topo_cell_repository;
mod traits;

pub use topo_cell_repository::TopoCellRepository;
pub use traits::CellRepository;
