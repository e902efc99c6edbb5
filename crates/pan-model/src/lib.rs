//! Shared data model for Panair decks and solver output.
//!
//! A [`Network`] is the input-side geometry (columns of points written into the
//! `POINTS` block), a [`NetworkGrid`] is the dense output-side view used for
//! visualization. Both use the solver's 1-based (row, column) addressing in text
//! form and 0-based indices in memory.

mod grid;
mod network;

pub use grid::{NamedField, NetworkGrid};
pub use network::{Network, Point3};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("network '{name}': column {column} has {found} points, expected {expected}")]
    RaggedNetwork {
        name: String,
        column: usize,
        expected: usize,
        found: usize,
    },

    #[error("scalar field '{name}' is {found_rows}x{found_cols}, grid is {rows}x{cols}")]
    FieldShape {
        name: String,
        rows: usize,
        cols: usize,
        found_rows: usize,
        found_cols: usize,
    },
}
