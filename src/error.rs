use thiserror::Error;

use crate::engine::EngineError;
use crate::stats::StatsError;

/// Top-level error for workbench runners and the CLI.
#[derive(Error, Debug)]
pub enum WorkbenchError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error("report output failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid input range [{low}, {up}]")]
    InputRange { low: f64, up: f64 },
}

pub type WorkbenchResult<T> = Result<T, WorkbenchError>;
