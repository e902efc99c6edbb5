//! Surface sample file (`agps`) parser.
//!
//! After a 6-line heading, the file is a sequence of
//!
//! ```text
//! n1c1
//!  irow     x          y          z          cp
//!     1  0.000000   0.000000   0.000000  -0.12345
//!     2  0.100000   0.000000   0.000000  -0.10000
//! n1c2
//! ...
//! *eof
//! ```
//!
//! A `n<network>c<column>` line selects the network and column that the
//! following data rows belong to, until the next such line.

use pan_model::Point3;
use tracing::debug;

use crate::error::{IoError, Result, parse_number};

const HEADING_LINES: usize = 6;
const EOF_MARKER: &str = "*eof";
const ROW_HEADER: &str = " irow";

/// One surface point, tagged with its 1-based network, column and row.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedSample {
    pub network: u32,
    pub column: u32,
    pub row: u32,
    pub point: Point3,
    /// Pressure coefficient for each solution case.
    pub scalars: Vec<f64>,
}

/// Network and column that data rows are currently attributed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCursor {
    pub network: Option<u32>,
    pub column: Option<u32>,
}

impl TableCursor {
    fn select(&mut self, network: u32, column: u32) {
        self.network = Some(network);
        self.column = Some(column);
    }

    fn context(&self) -> Option<(u32, u32)> {
        self.network.zip(self.column)
    }
}

enum LineKind<'a> {
    Context { network: u32, column: u32 },
    Skip,
    Data(&'a str),
}

/// Parse a complete `agps` file, heading included.
pub fn parse_agps(text: &str) -> Result<Vec<TaggedSample>> {
    let samples = parse_numbered(
        text.lines()
            .enumerate()
            .skip(HEADING_LINES)
            .map(|(i, line)| (i + 1, line)),
    )?;
    debug!(samples = samples.len(), "agps parsed");
    Ok(samples)
}

/// Parse sample lines that carry no file heading.
pub fn parse_sample_lines<'a, I>(lines: I) -> Result<Vec<TaggedSample>>
where
    I: IntoIterator<Item = &'a str>,
{
    parse_numbered(lines.into_iter().enumerate().map(|(i, line)| (i + 1, line)))
}

fn parse_numbered<'a>(lines: impl Iterator<Item = (usize, &'a str)>) -> Result<Vec<TaggedSample>> {
    let mut cursor = TableCursor::default();
    let mut samples = Vec::new();

    for (line_no, line) in lines {
        match classify(line, line_no)? {
            LineKind::Context { network, column } => cursor.select(network, column),
            LineKind::Skip => {}
            LineKind::Data(row) => {
                let (network, column) = cursor.context().ok_or_else(|| {
                    IoError::MalformedReport(format!(
                        "line {line_no}: data row before any network/column line"
                    ))
                })?;
                samples.push(parse_row(row, line_no, network, column)?);
            }
        }
    }

    Ok(samples)
}

fn classify(line: &str, line_no: usize) -> Result<LineKind<'_>> {
    if line.starts_with('n') {
        let (network, column) = parse_context(line.trim_end()).ok_or_else(|| {
            IoError::MalformedReport(format!(
                "line {line_no}: expected 'n<network>c<column>', found '{}'",
                line.trim_end()
            ))
        })?;
        return Ok(LineKind::Context { network, column });
    }
    if line.starts_with(EOF_MARKER) || line.starts_with(ROW_HEADER) || line.trim().is_empty() {
        return Ok(LineKind::Skip);
    }
    Ok(LineKind::Data(line))
}

fn parse_context(line: &str) -> Option<(u32, u32)> {
    let (network, column) = line.strip_prefix('n')?.split_once('c')?;
    Some((network.trim().parse().ok()?, column.trim().parse().ok()?))
}

fn parse_row(line: &str, line_no: usize, network: u32, column: u32) -> Result<TaggedSample> {
    let mut tokens = line.split_whitespace();
    let row_token = tokens.next().unwrap_or_default();
    let row = row_token
        .parse::<u32>()
        .map_err(|_| IoError::NonNumericToken {
            line: line_no,
            token: row_token.to_string(),
        })?;

    let values = tokens
        .map(|token| parse_number(token, line_no))
        .collect::<Result<Vec<f64>>>()?;
    if values.len() < 4 {
        return Err(IoError::MalformedReport(format!(
            "line {line_no}: expected x, y, z and at least one scalar, found {} values",
            values.len()
        )));
    }

    Ok(TaggedSample {
        network,
        column,
        row,
        point: [values[0], values[1], values[2]],
        scalars: values[3..].to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const AGPS: &str = "\
 panair agps file
 heading 1
 heading 2
 heading 3
 heading 4
 heading 5
n1c1
 irow    x         y         z         cp
    1  0.0000    0.0000    0.0000   -0.1000
    2  1.0000    0.0000    0.0000   -0.2000
n1c2
 irow    x         y         z         cp
    1  0.0000    1.0000    0.0000   -0.3000
    2  1.0000    1.0000    0.0000   -0.4000
n2c1
 irow    x         y         z         cp
    1  5.0000    0.0000    0.0000    0.5000
*eof
";

    #[test]
    fn context_lines_tag_following_rows() {
        let samples = parse_sample_lines(["n1c2", "1 0.0 0.0 0.0 0.5", "2 1.0 0.0 0.0 0.7"])
            .expect("samples should parse");
        assert_eq!(samples.len(), 2);
        assert!(samples.iter().all(|s| s.network == 1 && s.column == 2));
        assert_eq!(samples[0].row, 1);
        assert_eq!(samples[1].row, 2);
        assert_eq!(samples[1].point, [1.0, 0.0, 0.0]);
        assert_eq!(samples[1].scalars, [0.7]);
    }

    #[test]
    fn parses_full_file_after_heading() {
        let samples = parse_agps(AGPS).expect("agps should parse");
        assert_eq!(samples.len(), 5);
        assert_eq!(
            samples[2],
            TaggedSample {
                network: 1,
                column: 2,
                row: 1,
                point: [0.0, 1.0, 0.0],
                scalars: vec![-0.3],
            }
        );
        assert_eq!(samples[4].network, 2);
        assert_eq!(samples[4].scalars, [0.5]);
    }

    #[test]
    fn multi_case_rows_keep_every_scalar() {
        let samples = parse_sample_lines(["n3c1", "  4  1.0 2.0 3.0 -0.1 -0.2 -0.3"]).unwrap();
        assert_eq!(samples[0].row, 4);
        assert_eq!(samples[0].scalars, [-0.1, -0.2, -0.3]);
    }

    #[test]
    fn row_before_context_is_malformed() {
        let err = parse_sample_lines(["1 0.0 0.0 0.0 0.5"]).expect_err("should fail");
        assert!(matches!(err, IoError::MalformedReport(_)));
    }

    #[test]
    fn bad_context_line_is_malformed() {
        let err = parse_sample_lines(["network one"]).expect_err("should fail");
        assert!(matches!(err, IoError::MalformedReport(_)));
    }

    #[test]
    fn non_numeric_row_index_is_reported() {
        let err = parse_sample_lines(["n1c1", "x 0.0 0.0 0.0 0.5"]).expect_err("should fail");
        assert!(matches!(err, IoError::NonNumericToken { line: 2, .. }));
    }

    #[test]
    fn short_rows_are_malformed() {
        let err = parse_sample_lines(["n1c1", "1 0.0 0.0"]).expect_err("should fail");
        assert!(matches!(err, IoError::MalformedReport(_)));
    }
}
