//! Run status from `panair.err`.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::{IoError, Result};

/// First token of the last line when the solver gave up.
pub const ABORT_KEYWORD: &str = "ABORT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    Aborted,
}

impl RunStatus {
    pub fn is_success(self) -> bool {
        self == RunStatus::Completed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Completed => "completed",
            RunStatus::Aborted => "aborted",
        }
    }
}

impl Display for RunStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A run aborted when the last line of the error log starts with `ABORT`.
pub fn parse_status(text: &str) -> Result<RunStatus> {
    let last = text
        .lines()
        .last()
        .ok_or_else(|| IoError::MalformedReport("run status file is empty".to_string()))?;
    let first = last.split_whitespace().next().ok_or_else(|| {
        IoError::MalformedReport("last line of run status file is blank".to_string())
    })?;

    Ok(if first == ABORT_KEYWORD {
        RunStatus::Aborted
    } else {
        RunStatus::Completed
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abort_keyword_on_last_line_means_failure() {
        let status = parse_status("warning: something\nABORT  in subroutine xyz\n").unwrap();
        assert_eq!(status, RunStatus::Aborted);
        assert!(!status.is_success());
    }

    #[test]
    fn any_other_last_line_means_success() {
        let status = parse_status("ABORT earlier\n   normal termination\n").unwrap();
        assert_eq!(status, RunStatus::Completed);
        assert!(status.is_success());
        assert_eq!(status.to_string(), "completed");
    }

    #[test]
    fn keyword_must_be_a_whole_token() {
        assert_eq!(parse_status("ABORTED?\n").unwrap(), RunStatus::Completed);
    }

    #[test]
    fn empty_or_blank_status_is_malformed() {
        assert!(matches!(parse_status(""), Err(IoError::MalformedReport(_))));
        assert!(matches!(
            parse_status("done\n   \n"),
            Err(IoError::MalformedReport(_))
        ));
    }
}
