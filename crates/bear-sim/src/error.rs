use bear_core::{CellState, GridError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("no empty cell found for {state} after {attempts} attempts")]
    PlacementExhausted { state: CellState, attempts: usize },

    #[error("scenario has no {0} cell")]
    MissingCell(CellState),

    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    #[error("failed to spawn simulation worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("simulation worker panicked")]
    WorkerPanicked,
}

pub type SimResult<T> = Result<T, SimError>;
