//! Readers for Panair output and structured grid export.
//!
//! This crate provides:
//! - **Report sections** (`panair.out`): marker-delimited block lookup and numeric tables
//! - **Force/moment summary** (`ffmf`) at its fixed line offsets
//! - **Run status** (`panair.err`)
//! - **Surface samples** (`agps`) tagged by network, column and row
//! - **Grid reconstruction** of dense per-network arrays from those samples
//! - **VTK/VTS export** for ParaView visualization

pub mod agps;
pub mod error;
pub mod ffmf;
pub mod grid;
mod output;
pub mod report;
pub mod status;
pub mod vtk_writer;

pub use agps::{TableCursor, TaggedSample, parse_agps, parse_sample_lines};
pub use error::{IoError, Result};
pub use ffmf::{ForcesAndMoments, parse_ffmf};
pub use grid::{Coverage, reconstruct_grids, scalar_field_name};
pub use output::{FORCES_FILE, OutputFiles, REPORT_FILE, SAMPLES_FILE, STATUS_FILE};
pub use report::{OFFBODY_SECTION, locate_block, offbody_data, parse_table};
pub use status::{ABORT_KEYWORD, RunStatus, parse_status};
pub use vtk_writer::{StructuredGridWriter, VtkFormat, export_grids, export_input_networks};
