//! Force and moment summary (`ffmf`).
//!
//! The integrated coefficients sit at fixed line offsets of the summary: line
//! 17 (0-based) carries `... cl cdi cy fx fy fz` in tokens 3..=8 and line 18
//! carries `mx my mz area`. Any change in the upstream layout breaks this.

use serde::{Deserialize, Serialize};

use crate::error::{IoError, Result, parse_number};

const FORCE_LINE: usize = 17;
const MOMENT_LINE: usize = 18;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForcesAndMoments {
    pub cl: f64,
    pub cdi: f64,
    pub cy: f64,
    pub fx: f64,
    pub fy: f64,
    pub fz: f64,
    pub mx: f64,
    pub my: f64,
    pub mz: f64,
    pub area: f64,
}

pub fn parse_ffmf(text: &str) -> Result<ForcesAndMoments> {
    let lines: Vec<&str> = text.lines().collect();
    let forces = numeric_line(&lines, FORCE_LINE)?;
    let moments = numeric_line(&lines, MOMENT_LINE)?;

    let force = |i: usize| token_at(&forces, FORCE_LINE, i);
    let moment = |i: usize| token_at(&moments, MOMENT_LINE, i);

    Ok(ForcesAndMoments {
        cl: force(3)?,
        cdi: force(4)?,
        cy: force(5)?,
        fx: force(6)?,
        fy: force(7)?,
        fz: force(8)?,
        mx: moment(0)?,
        my: moment(1)?,
        mz: moment(2)?,
        area: moment(3)?,
    })
}

fn numeric_line(lines: &[&str], index: usize) -> Result<Vec<f64>> {
    let line = lines.get(index).ok_or_else(|| {
        IoError::MalformedReport(format!(
            "force summary has {} lines, expected at least {}",
            lines.len(),
            index + 1
        ))
    })?;
    line.split_whitespace()
        .map(|token| parse_number(token, index + 1))
        .collect()
}

fn token_at(values: &[f64], line: usize, index: usize) -> Result<f64> {
    values.get(index).copied().ok_or_else(|| {
        IoError::MalformedReport(format!(
            "force summary line {} has {} values, expected at least {}",
            line + 1,
            values.len(),
            index + 1
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ffmf() -> String {
        let mut text = String::new();
        for i in 0..FORCE_LINE {
            text.push_str(&format!(" heading line {i}\n"));
        }
        text.push_str("   1   0.0000   0.0000   0.1250   0.0040   0.0000   0.0040   0.0000   0.1250\n");
        text.push_str("   0.0100  -0.0300   0.0000   2.0000\n");
        text.push_str(" trailer\n");
        text
    }

    #[test]
    fn reads_coefficients_at_fixed_offsets() {
        let ffmf = parse_ffmf(&sample_ffmf()).expect("ffmf should parse");
        assert_eq!(ffmf.cl, 0.125);
        assert_eq!(ffmf.cdi, 0.004);
        assert_eq!(ffmf.cy, 0.0);
        assert_eq!(ffmf.fx, 0.004);
        assert_eq!(ffmf.fz, 0.125);
        assert_eq!(ffmf.mx, 0.01);
        assert_eq!(ffmf.my, -0.03);
        assert_eq!(ffmf.area, 2.0);
    }

    #[test]
    fn short_file_is_malformed() {
        let err = parse_ffmf("only\nthree\nlines\n").expect_err("should fail");
        assert!(matches!(err, IoError::MalformedReport(_)));
    }

    #[test]
    fn missing_tokens_are_malformed() {
        let mut text = sample_ffmf();
        text = text.replace("   0.0100  -0.0300   0.0000   2.0000\n", "   0.0100\n");
        assert!(matches!(parse_ffmf(&text), Err(IoError::MalformedReport(_))));
    }

    #[test]
    fn serializes_as_named_coefficients() {
        let ffmf = parse_ffmf(&sample_ffmf()).unwrap();
        let json = serde_json::to_value(ffmf).expect("serialize");
        assert_eq!(json["cl"], 0.125);
        assert_eq!(json["area"], 2.0);
    }
}
