//! JSON case files.
//!
//! A case file lists the blocks of one deck. Every block is optional; the ones
//! present are rendered in the order Panair expects them, regardless of their
//! order in the file.
//!
//! ```json
//! {
//!   "title": { "title": "wing", "info": "sample run" },
//!   "mach": 1.5,
//!   "angles_of_attack": { "reference": 0.0, "angles": [0.0, 2.0] },
//!   "points": [
//!     { "kt": 1, "networks": [ { "name": "upper", "columns": [[[0,0,0],[1,0,0]]] } ] }
//!   ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use pan_model::{ModelError, Network, Point3};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::deck::{InputDeck, PrintoutControl, ReferenceData, TrailingWake};
use crate::format::FormatError;

#[derive(Error, Debug)]
pub enum CaseError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid case file: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleConfig {
    pub title: String,
    #[serde(default)]
    pub info: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymmetryConfig {
    pub xzpln: i32,
    pub xypln: i32,
}

/// Reference angle plus one angle per solution case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleSweep {
    pub reference: f64,
    pub angles: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub name: String,
    /// Points of each column, ordered by row.
    pub columns: Vec<Vec<Point3>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsConfig {
    pub kt: i32,
    pub networks: Vec<NetworkConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WakesConfig {
    pub kt: i32,
    #[serde(default)]
    pub matchw: i32,
    pub wakes: Vec<TrailingWake>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowFieldConfig {
    pub nflowv: i32,
    pub tpoff: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaseConfig {
    pub title: Option<TitleConfig>,
    pub datacheck: Option<i32>,
    pub symmetric: Option<SymmetryConfig>,
    pub mach: Option<f64>,
    pub cases: Option<i32>,
    pub angles_of_attack: Option<AngleSweep>,
    pub yaw_angle: Option<AngleSweep>,
    pub reference_data: Option<ReferenceData>,
    pub printout: Option<PrintoutControl>,
    pub points: Vec<PointsConfig>,
    pub trailing_wakes: Vec<WakesConfig>,
    pub flow_field: Option<FlowFieldConfig>,
    pub offbody_points: Option<Vec<Point3>>,
}

impl CaseConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CaseError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CaseError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, CaseError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Render every configured block into a new deck.
    pub fn to_deck(&self) -> Result<InputDeck, CaseError> {
        let mut deck = InputDeck::new();

        if let Some(t) = &self.title {
            deck.title(&t.title, &t.info);
        }
        if let Some(ndtchk) = self.datacheck {
            deck.datacheck(ndtchk)?;
        }
        if let Some(s) = self.symmetric {
            deck.symmetric(s.xzpln, s.xypln)?;
        }
        if let Some(amach) = self.mach {
            deck.mach(amach)?;
        }
        if let Some(nacase) = self.cases {
            deck.cases(nacase)?;
        }
        if let Some(sweep) = &self.angles_of_attack {
            deck.angles_of_attack(sweep.reference, &sweep.angles)?;
        }
        if let Some(sweep) = &self.yaw_angle {
            deck.yaw_angle(sweep.reference, &sweep.angles)?;
        }
        if let Some(reference) = &self.reference_data {
            deck.reference_data(reference)?;
        }
        if let Some(printout) = &self.printout {
            deck.printout(printout)?;
        }
        for block in &self.points {
            let networks = block
                .networks
                .iter()
                .map(|n| Network::from_columns(n.name.clone(), n.columns.clone()))
                .collect::<Result<Vec<_>, _>>()?;
            deck.points(block.kt, &networks)?;
        }
        for block in &self.trailing_wakes {
            deck.trailing_wake_networks(block.kt, block.matchw, &block.wakes)?;
        }
        if let Some(f) = self.flow_field {
            deck.flow_field_properties(f.nflowv, f.tpoff)?;
        }
        if let Some(points) = &self.offbody_points {
            deck.offbody_points(points)?;
        }

        debug!(blocks = deck.len(), "case rendered");
        Ok(deck)
    }

    /// Input networks in deck order, for visualizing the geometry.
    pub fn networks(&self) -> Result<Vec<Network>, ModelError> {
        self.points
            .iter()
            .flat_map(|block| block.networks.iter())
            .map(|n| Network::from_columns(n.name.clone(), n.columns.clone()))
            .collect()
    }
}
