//! Data models for topology entities served to clients.

pub mod known_cells;

pub use known_cells::KnownCells;
