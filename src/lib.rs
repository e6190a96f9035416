pub mod board;
pub mod config;
pub mod errors;
pub mod logging;
pub mod store;

pub use board::{BoardState, Card, Column, DetailedStatus, KanbanBoard};
pub use errors::{BoardError, StoreError};
