//! Sections of the `panair.out` report.
//!
//! The report is a flat listing. Named sections are bracketed by marker lines
//! containing `0*b*<name>` and `0*e*<name>`; tabular sections hold
//! whitespace-separated numbers, one record per line.

use nalgebra::DMatrix;

use crate::error::{IoError, Result, parse_number};

/// Section holding the off-body flow properties.
pub const OFFBODY_SECTION: &str = "off-body";

/// Column headings at the top of the off-body section.
const OFFBODY_HEADING_LINES: usize = 6;

/// Lines strictly between the begin and end markers of section `name`.
///
/// The end marker is searched from the begin marker onwards. A missing marker
/// means the report is not what we expect and is an error.
pub fn locate_block<'a>(report: &'a str, name: &str) -> Result<Vec<&'a str>> {
    locate_section(report, name).map(|(_, lines)| lines)
}

/// Like [`locate_block`], also returning the 1-based report line number of the
/// first line inside the section.
fn locate_section<'a>(report: &'a str, name: &str) -> Result<(usize, Vec<&'a str>)> {
    let begin = format!("0*b*{name}");
    let end = format!("0*e*{name}");
    let lines: Vec<&str> = report.lines().collect();

    let start = lines
        .iter()
        .position(|line| line.contains(&begin))
        .ok_or_else(|| {
            IoError::MalformedReport(format!("section '{name}' has no '{begin}' marker"))
        })?;
    let stop = lines[start..]
        .iter()
        .position(|line| line.contains(&end))
        .map(|offset| start + offset)
        .ok_or_else(|| {
            IoError::MalformedReport(format!("section '{name}' has no '{end}' marker"))
        })?;

    let section = lines.get(start + 1..stop).map(<[_]>::to_vec).unwrap_or_default();
    Ok((start + 2, section))
}

/// Parse whitespace-separated numbers into a matrix, one row per line.
///
/// Blank lines are skipped. Every row must have as many columns as the first.
pub fn parse_table<I, S>(lines: I) -> Result<DMatrix<f64>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parse_table_from(lines, 1)
}

/// Table parsing where the first line is line `first_line` of the enclosing file.
fn parse_table_from<I, S>(lines: I, first_line: usize) -> Result<DMatrix<f64>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut values = Vec::new();
    let mut width: Option<usize> = None;
    let mut rows = 0usize;

    for (index, line) in lines.into_iter().enumerate() {
        let line_no = first_line + index;
        let tokens: Vec<&str> = line.as_ref().split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }

        match width {
            None => width = Some(tokens.len()),
            Some(expected) if expected != tokens.len() => {
                return Err(IoError::RaggedTable {
                    line: line_no,
                    expected,
                    found: tokens.len(),
                });
            }
            Some(_) => {}
        }

        for token in tokens {
            values.push(parse_number(token, line_no)?);
        }
        rows += 1;
    }

    Ok(DMatrix::from_row_slice(rows, width.unwrap_or(0), &values))
}

/// Off-body flow properties: one row per sample point.
pub fn offbody_data(report: &str) -> Result<DMatrix<f64>> {
    let (first_line, section) = locate_section(report, OFFBODY_SECTION)?;
    if section.len() < OFFBODY_HEADING_LINES {
        return Err(IoError::MalformedReport(format!(
            "section '{OFFBODY_SECTION}' has {} lines, expected at least {OFFBODY_HEADING_LINES} heading lines",
            section.len()
        )));
    }
    parse_table_from(
        &section[OFFBODY_HEADING_LINES..],
        first_line + OFFBODY_HEADING_LINES,
    )
}
