//! Fixed-width field encoding for Panair input decks.
//!
//! Every field in a deck occupies exactly [`FIELD_WIDTH`] columns and is
//! left-justified. The deck format has no exponent notation for coordinates,
//! so the number of decimals shrinks as the magnitude grows:
//!
//! | magnitude          | decimals (positive) | decimals (negative) |
//! |--------------------|---------------------|---------------------|
//! | `< 10`             | 8                   | 7                   |
//! | `10 ..< 100`       | 7                   | 6                   |
//! | `100 ..< 1000`     | 6                   | 5                   |
//! | `1000 ..< 10000`   | 5                   | 4                   |
//! | `10000 ..< 100000` | 4                   | 3                   |
//!
//! Anything at or above `100000` cannot be written.

use std::fmt::Display;

use pan_model::Point3;
use thiserror::Error;

/// Width of every deck field, in characters.
pub const FIELD_WIDTH: usize = 10;

const BASE_PRECISION: usize = 8;
const MAGNITUDE_LIMIT: f64 = 100_000.0;
const MAGNITUDE_STEPS: [f64; 4] = [10.0, 100.0, 1_000.0, 10_000.0];

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum FormatError {
    #[error("value {value} cannot be represented in a {width}-character field")]
    Unrepresentable { value: f64, width: usize },
}

/// Number of decimals and total width used to render one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub precision: usize,
    pub width: usize,
}

/// Precision rule for a coordinate field.
///
/// The sign bit costs one column (negative zero included) and each magnitude
/// step at 10, 100, 1000 and 10000 costs another.
pub fn field_spec(value: f64) -> Result<FieldSpec, FormatError> {
    let magnitude = value.abs();
    if !value.is_finite() || magnitude >= MAGNITUDE_LIMIT {
        return Err(FormatError::Unrepresentable {
            value,
            width: FIELD_WIDTH,
        });
    }

    let mut precision = BASE_PRECISION;
    if value.is_sign_negative() {
        precision -= 1;
    }
    precision -= MAGNITUDE_STEPS.iter().filter(|&&step| magnitude >= step).count();

    Ok(FieldSpec {
        precision,
        width: FIELD_WIDTH,
    })
}

/// Render a coordinate with as many decimals as fit in the field.
pub fn format_coord(value: f64) -> Result<String, FormatError> {
    let spec = field_spec(value)?;
    let mut precision = spec.precision;

    loop {
        let text = format!("{value:<width$.precision$}", width = spec.width);
        if text.len() <= spec.width {
            return Ok(text);
        }
        // Rounding carried into a new integer digit (9.999999999 -> 10.00000000).
        if precision == 0 {
            return Err(FormatError::Unrepresentable {
                value,
                width: spec.width,
            });
        }
        precision -= 1;
    }
}

/// Three coordinate fields, no separators.
pub fn format_point(point: Point3) -> Result<String, FormatError> {
    let mut out = String::with_capacity(3 * FIELD_WIDTH);
    for c in point {
        out.push_str(&format_coord(c)?);
    }
    Ok(out)
}

/// Render an option or scalar input value.
///
/// Values are written in their shortest plain decimal form (`1.0`, `0.5`,
/// `-3.25`), never with an exponent.
/// When that does not fit, the coordinate precision rule takes over.
pub fn format_option(value: impl Into<f64>) -> Result<String, FormatError> {
    let value = value.into();
    if !value.is_finite() {
        return Err(FormatError::Unrepresentable {
            value,
            width: FIELD_WIDTH,
        });
    }

    let mut text = value.to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    if text.len() <= FIELD_WIDTH {
        Ok(format!("{text:<width$}", width = FIELD_WIDTH))
    } else {
        format_coord(value)
    }
}

/// Left-justify a label into one field. Longer labels are kept whole.
pub fn format_label(label: impl Display) -> String {
    format!("{:<width$}", label.to_string(), width = FIELD_WIDTH)
}

/// Header line: the first label is marked with `=`.
pub fn format_header<I, S>(labels: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut header = header_fields(labels);
    header.push('\n');
    header
}

/// Value line made of option fields.
pub fn format_input_line(values: &[f64]) -> Result<String, FormatError> {
    let mut line = String::with_capacity(values.len() * FIELD_WIDTH + 1);
    for &v in values {
        line.push_str(&format_option(v)?);
    }
    line.push('\n');
    Ok(line)
}

pub(crate) fn header_fields<I, S>(labels: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut header = String::new();
    for (i, label) in labels.into_iter().enumerate() {
        if i == 0 {
            header.push_str(&format_label(format!("={}", label.as_ref())));
        } else {
            header.push_str(&format_label(label.as_ref()));
        }
    }
    header
}
