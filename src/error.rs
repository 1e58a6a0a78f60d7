use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

use crate::perf::{Method, Metric};

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("No {metric} series for method '{method}' at payload size '{payload}'")]
    MissingSeries {
        payload: String,
        method: Method,
        metric: Metric,
    },
    #[error("The {method} {metric} series for payload size '{payload}' has {actual} points, expected {expected}")]
    LengthMismatch {
        payload: String,
        method: Method,
        metric: Metric,
        expected: usize,
        actual: usize,
    },
    #[error("No parallelism levels to plot")]
    EmptyAxis,
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid results file name: {0}")]
    InvalidResultFile(String),
    #[error("Results file {file} uses different parallelism levels")]
    AxisMismatch { file: String },
}

impl<E> From<DrawingAreaErrorKind<E>> for PlotError
where
    E: std::error::Error + Send + Sync,
{
    fn from(error: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Draw(error.to_string())
    }
}
