pub mod mock_cell_repository;

pub use mock_cell_repository::MockCellRepository;
