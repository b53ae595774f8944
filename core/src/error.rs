use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Cell is already occupied")]
    CellOccupied,
    #[error("Board does not describe a reachable position")]
    InvalidBoard,
    #[error("Mines were already placed on this board")]
    MinesAlreadyPlaced,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;
