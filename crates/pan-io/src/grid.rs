//! Dense per-network grids rebuilt from tagged samples.

use std::collections::BTreeMap;

use nalgebra::DMatrix;
use pan_model::NetworkGrid;
use tracing::{debug, warn};

use crate::agps::TaggedSample;
use crate::error::{IoError, Result};

/// What to do with grid cells no sample was written to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Coverage {
    /// Every cell must be sampled.
    #[default]
    Dense,
    /// Unsampled cells stay at 0.0.
    AllowSparse,
}

/// Name of scalar field `index` out of `count` per-case pressure coefficients.
pub fn scalar_field_name(index: usize, count: usize) -> String {
    if count == 1 {
        "CP".to_string()
    } else {
        format!("CP{}", index + 1)
    }
}

/// Group samples by network and scatter each group into a dense grid.
///
/// The extent of a network is its largest row and column index. Grids are
/// returned in ascending network order.
pub fn reconstruct_grids(samples: &[TaggedSample], coverage: Coverage) -> Result<Vec<NetworkGrid>> {
    let mut by_network: BTreeMap<u32, Vec<&TaggedSample>> = BTreeMap::new();
    for sample in samples {
        if sample.row == 0 || sample.column == 0 {
            return Err(IoError::MalformedReport(format!(
                "network {}: row and column indices are 1-based, found row {} column {}",
                sample.network, sample.row, sample.column
            )));
        }
        by_network.entry(sample.network).or_default().push(sample);
    }

    by_network
        .into_iter()
        .map(|(network, group)| reconstruct_network(network, &group, coverage))
        .collect()
}

fn reconstruct_network(
    network: u32,
    samples: &[&TaggedSample],
    coverage: Coverage,
) -> Result<NetworkGrid> {
    let rows = samples.iter().map(|s| s.row as usize).max().unwrap_or(0);
    let columns = samples.iter().map(|s| s.column as usize).max().unwrap_or(0);
    let scalar_count = samples.first().map(|s| s.scalars.len()).unwrap_or(0);

    let mut grid = NetworkGrid::zeros(network, rows, columns);
    let mut fields = vec![DMatrix::<f64>::zeros(rows, columns); scalar_count];
    let mut sampled = vec![false; rows * columns];

    for sample in samples {
        if sample.scalars.len() != scalar_count {
            return Err(IoError::MalformedReport(format!(
                "network {network}: row {} column {} has {} scalars, expected {scalar_count}",
                sample.row,
                sample.column,
                sample.scalars.len()
            )));
        }
        let (r, c) = (sample.row as usize - 1, sample.column as usize - 1);
        grid.set_point(r, c, sample.point);
        for (field, &value) in fields.iter_mut().zip(&sample.scalars) {
            field[(r, c)] = value;
        }
        sampled[c * rows + r] = true;
    }

    let missing = sampled.iter().filter(|&&hit| !hit).count();
    if missing > 0 {
        match coverage {
            Coverage::Dense => {
                return Err(IoError::IncompleteGrid {
                    network,
                    missing,
                    total: sampled.len(),
                });
            }
            Coverage::AllowSparse => {
                warn!(network, missing, total = sampled.len(), "unsampled grid cells left at zero");
            }
        }
    }

    for (index, values) in fields.into_iter().enumerate() {
        grid.add_field(scalar_field_name(index, scalar_count), values)?;
    }

    debug!(network, rows, columns, "network grid rebuilt");
    Ok(grid)
}
