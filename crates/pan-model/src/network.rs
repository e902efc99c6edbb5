use crate::ModelError;

/// Cartesian coordinates of one network point.
pub type Point3 = [f64; 3];

/// Input geometry for one surface or wake patch.
///
/// Points are stored column by column. `rows` is the number of points in each
/// column (Panair's `nm`), `columns` is the number of columns (`nn`).
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    pub name: String,
    rows: usize,
    columns: usize,
    points: Vec<Point3>,
}

impl Network {
    /// Build a network from its columns. Every column must hold the same
    /// number of points.
    pub fn from_columns(
        name: impl Into<String>,
        columns: Vec<Vec<Point3>>,
    ) -> Result<Self, ModelError> {
        let name = name.into();
        let rows = columns.first().map(Vec::len).unwrap_or(0);
        let mut points = Vec::with_capacity(rows * columns.len());

        for (index, column) in columns.iter().enumerate() {
            if column.len() != rows {
                return Err(ModelError::RaggedNetwork {
                    name,
                    column: index,
                    expected: rows,
                    found: column.len(),
                });
            }
            points.extend_from_slice(column);
        }

        Ok(Self {
            name,
            rows,
            columns: columns.len(),
            points,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points of column `col` (0-based), ordered by row.
    pub fn column(&self, col: usize) -> &[Point3] {
        let start = col * self.rows;
        &self.points[start..start + self.rows]
    }

    pub fn point(&self, row: usize, col: usize) -> Point3 {
        self.points[col * self.rows + row]
    }

    pub fn iter_columns(&self) -> impl Iterator<Item = &[Point3]> {
        (0..self.columns).map(move |col| self.column(col))
    }
}
