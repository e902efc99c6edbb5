use nalgebra::DMatrix;

use crate::{ModelError, Network};

/// A scalar field sampled at every grid point.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedField {
    pub name: String,
    pub values: DMatrix<f64>,
}

/// Dense `rows x columns` view of one network.
///
/// Cell `(r, c)` holds the point of 1-based row `r + 1` in column `c + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkGrid {
    /// 1-based network id as written by the solver.
    pub network: u32,
    pub x: DMatrix<f64>,
    pub y: DMatrix<f64>,
    pub z: DMatrix<f64>,
    pub fields: Vec<NamedField>,
}

impl NetworkGrid {
    /// Zero-filled grid of the given extent.
    pub fn zeros(network: u32, rows: usize, columns: usize) -> Self {
        Self {
            network,
            x: DMatrix::zeros(rows, columns),
            y: DMatrix::zeros(rows, columns),
            z: DMatrix::zeros(rows, columns),
            fields: Vec::new(),
        }
    }

    /// Grid view of an input network, used to visualize the mesh before a run.
    pub fn from_network(network: u32, input: &Network) -> Self {
        let mut grid = Self::zeros(network, input.rows(), input.columns());
        for col in 0..input.columns() {
            for (row, p) in input.column(col).iter().enumerate() {
                grid.set_point(row, col, *p);
            }
        }
        grid
    }

    pub fn shape(&self) -> (usize, usize) {
        self.x.shape()
    }

    pub fn rows(&self) -> usize {
        self.x.nrows()
    }

    pub fn columns(&self) -> usize {
        self.x.ncols()
    }

    pub fn set_point(&mut self, row: usize, col: usize, p: [f64; 3]) {
        self.x[(row, col)] = p[0];
        self.y[(row, col)] = p[1];
        self.z[(row, col)] = p[2];
    }

    pub fn point(&self, row: usize, col: usize) -> [f64; 3] {
        [self.x[(row, col)], self.y[(row, col)], self.z[(row, col)]]
    }

    /// Attach a scalar field. Its shape must match the coordinate arrays.
    pub fn add_field(
        &mut self,
        name: impl Into<String>,
        values: DMatrix<f64>,
    ) -> Result<(), ModelError> {
        let name = name.into();
        let (rows, cols) = self.shape();
        if values.shape() != (rows, cols) {
            return Err(ModelError::FieldShape {
                name,
                rows,
                cols,
                found_rows: values.nrows(),
                found_cols: values.ncols(),
            });
        }
        self.fields.push(NamedField { name, values });
        Ok(())
    }

    pub fn field(&self, name: &str) -> Option<&DMatrix<f64>> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_from_network_transposes_columns() {
        let net = Network::from_columns(
            "upper",
            vec![
                vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]],
                vec![[0.0, 1.0, 0.5], [1.0, 1.0, 0.5], [2.0, 1.0, 0.5]],
            ],
        )
        .expect("network should build");

        let grid = NetworkGrid::from_network(1, &net);
        assert_eq!(grid.shape(), (3, 2));
        assert_eq!(grid.point(1, 1), [1.0, 1.0, 0.5]);
        assert_eq!(grid.x[(2, 0)], 2.0);
    }

    #[test]
    fn add_field_checks_shape() {
        let mut grid = NetworkGrid::zeros(2, 2, 3);
        grid.add_field("CP", DMatrix::from_element(2, 3, 0.25))
            .expect("matching field");
        assert_eq!(grid.field("CP").map(|m| m[(1, 2)]), Some(0.25));

        let err = grid
            .add_field("CP2", DMatrix::zeros(3, 2))
            .expect_err("mismatched field");
        assert!(matches!(err, ModelError::FieldShape { found_rows: 3, .. }));
    }
}
