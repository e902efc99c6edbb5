use std::fs;
use std::path::{Path, PathBuf};

use nalgebra::DMatrix;
use pan_model::NetworkGrid;
use tracing::debug;

use crate::agps::{TaggedSample, parse_agps};
use crate::error::{IoError, Result};
use crate::ffmf::{ForcesAndMoments, parse_ffmf};
use crate::grid::{Coverage, reconstruct_grids};
use crate::report::offbody_data;
use crate::status::{RunStatus, parse_status};
use crate::vtk_writer::{VtkFormat, export_grids};

pub const REPORT_FILE: &str = "panair.out";
pub const FORCES_FILE: &str = "ffmf";
pub const STATUS_FILE: &str = "panair.err";
pub const SAMPLES_FILE: &str = "agps";

/// Files a Panair run leaves in its working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFiles {
    directory: PathBuf,
}

impl OutputFiles {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn offbody_data(&self) -> Result<DMatrix<f64>> {
        offbody_data(&self.read(REPORT_FILE)?)
    }

    pub fn forces_and_moments(&self) -> Result<ForcesAndMoments> {
        parse_ffmf(&self.read(FORCES_FILE)?)
    }

    pub fn run_status(&self) -> Result<RunStatus> {
        parse_status(&self.read(STATUS_FILE)?)
    }

    pub fn check_successful(&self) -> Result<bool> {
        Ok(self.run_status()?.is_success())
    }

    pub fn parse_agps(&self) -> Result<Vec<TaggedSample>> {
        parse_agps(&self.read(SAMPLES_FILE)?)
    }

    pub fn network_grids(&self, coverage: Coverage) -> Result<Vec<NetworkGrid>> {
        reconstruct_grids(&self.parse_agps()?, coverage)
    }

    /// Write one `.vts` file per network into the run directory.
    pub fn export_vtk(&self, prefix: &str, coverage: Coverage) -> Result<Vec<PathBuf>> {
        let grids = self.network_grids(coverage)?;
        Ok(export_grids(&grids, &self.directory, prefix, VtkFormat::Xml)?)
    }

    fn read(&self, name: &str) -> Result<String> {
        let path = self.directory.join(name);
        debug!(path = %path.display(), "reading solver output");
        fs::read_to_string(&path).map_err(|source| IoError::Read { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AGPS: &str = "h\nh\nh\nh\nh\nh\nn1c1\n 1 0 0 0 0.1\n 2 1 0 0 0.2\nn1c2\n 1 0 1 0 0.3\n 2 1 1 0 0.4\n*eof\n";

    fn run_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join(SAMPLES_FILE), AGPS).expect("write agps");
        fs::write(dir.path().join(STATUS_FILE), "solution complete\n").expect("write err");
        dir
    }

    #[test]
    fn reads_status_and_grids_from_run_directory() {
        let dir = run_dir();
        let output = OutputFiles::new(dir.path());

        assert!(output.check_successful().expect("status readable"));
        let grids = output.network_grids(Coverage::Dense).expect("grids");
        assert_eq!(grids.len(), 1);
        assert_eq!(grids[0].shape(), (2, 2));
    }

    #[test]
    fn exports_vts_per_network() {
        let dir = run_dir();
        let output = OutputFiles::new(dir.path());
        let written = output.export_vtk("panair", Coverage::Dense).expect("export");
        assert_eq!(written, [dir.path().join("panair_network1.vts")]);
        assert!(written[0].exists());
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = run_dir();
        let output = OutputFiles::new(dir.path());
        let err = output.forces_and_moments().expect_err("ffmf missing");
        match err {
            IoError::Read { path, source } => {
                assert!(path.ends_with(FORCES_FILE));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
