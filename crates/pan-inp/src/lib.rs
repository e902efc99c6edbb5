//! Panair input deck writer.
//!
//! - [`format`]: fixed-width field encoding (10-column fields, adaptive precision)
//! - [`deck`]: block builders and the ordered deck they are stored in
//! - [`case`]: JSON case files rendered into a deck

pub mod case;
pub mod deck;
pub mod format;

pub use case::{CaseConfig, CaseError};
pub use deck::{
    BLOCK_DELIMITER, END_MARKER, InputBlock, InputDeck, PrintoutControl, ReferenceData,
    TrailingWake,
};
pub use format::{
    FIELD_WIDTH, FieldSpec, FormatError, field_spec, format_coord, format_header,
    format_input_line, format_label, format_option, format_point,
};
