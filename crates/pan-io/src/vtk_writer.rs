///! Structured grid export for ParaView.
///!
///! Writes one [`NetworkGrid`] per file, either as legacy VTK (`.vtk`) or as
///! XML structured grid (`.vts`).
///!
///! ## Point Order
///!
///! VTK structured grids vary the first index fastest. The first index is the
///! network row and the second the network column, so points are written
///! column by column with rows running inside each column. The third extent is
///! always 1: networks are surfaces.
///!
///! ## Usage
///!
///! ```rust,no_run
///! use pan_io::{Coverage, OutputFiles, StructuredGridWriter};
///!
///! let output = OutputFiles::new("run");
///! for grid in output.network_grids(Coverage::Dense)? {
///!     let writer = StructuredGridWriter::new(&grid);
///!     writer.write_vts(format!("panair_network{}.vts", grid.network))?;
///! }
///! # Ok::<(), Box<dyn std::error::Error>>(())
///! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use nalgebra::DMatrix;
use pan_model::{Network, NetworkGrid};
use tracing::info;

/// Structured grid output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VtkFormat {
    /// Legacy ASCII `.vtk`
    Legacy,
    /// XML `.vts`
    Xml,
}

impl VtkFormat {
    pub fn extension(self) -> &'static str {
        match self {
            VtkFormat::Legacy => "vtk",
            VtkFormat::Xml => "vts",
        }
    }
}

/// Writer for a single network grid
pub struct StructuredGridWriter<'a> {
    grid: &'a NetworkGrid,
}

impl<'a> StructuredGridWriter<'a> {
    pub fn new(grid: &'a NetworkGrid) -> Self {
        Self { grid }
    }

    pub fn write<P: AsRef<Path>>(&self, path: P, format: VtkFormat) -> io::Result<()> {
        match format {
            VtkFormat::Legacy => self.write_vtk(path),
            VtkFormat::Xml => self.write_vts(path),
        }
    }

    /// Write legacy VTK format file
    pub fn write_vtk<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        self.write_vtk_to(&mut file)?;
        file.flush()
    }

    /// Write XML structured grid file
    pub fn write_vts<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        self.write_vts_to(&mut file)?;
        file.flush()
    }

    pub fn write_vtk_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let (rows, columns) = self.grid.shape();
        let count = rows * columns;

        writeln!(out, "# vtk DataFile Version 3.0")?;
        writeln!(out, "Panair network {}", self.grid.network)?;
        writeln!(out, "ASCII")?;
        writeln!(out, "DATASET STRUCTURED_GRID")?;
        writeln!(out, "DIMENSIONS {rows} {columns} 1")?;

        writeln!(out, "POINTS {count} double")?;
        self.for_each_point(|r, c| {
            let [x, y, z] = self.grid.point(r, c);
            writeln!(out, "{x} {y} {z}")
        })?;

        if self.grid.fields.is_empty() {
            return Ok(());
        }

        writeln!(out, "POINT_DATA {count}")?;
        for field in &self.grid.fields {
            writeln!(out, "SCALARS {} double 1", field.name)?;
            writeln!(out, "LOOKUP_TABLE default")?;
            write_scalars(out, &field.values, "")?;
        }

        Ok(())
    }

    pub fn write_vts_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let (rows, columns) = self.grid.shape();
        let extent = format!(
            "0 {} 0 {} 0 0",
            rows.saturating_sub(1),
            columns.saturating_sub(1)
        );

        writeln!(out, "<?xml version=\"1.0\"?>")?;
        writeln!(
            out,
            "<VTKFile type=\"StructuredGrid\" version=\"1.0\" byte_order=\"LittleEndian\">"
        )?;
        writeln!(out, "  <StructuredGrid WholeExtent=\"{extent}\">")?;
        writeln!(out, "    <Piece Extent=\"{extent}\">")?;

        match self.grid.fields.first() {
            Some(first) => writeln!(out, "      <PointData Scalars=\"{}\">", first.name)?,
            None => writeln!(out, "      <PointData>")?,
        }
        for field in &self.grid.fields {
            writeln!(
                out,
                "        <DataArray type=\"Float64\" Name=\"{}\" format=\"ascii\">",
                field.name
            )?;
            write_scalars(out, &field.values, "          ")?;
            writeln!(out, "        </DataArray>")?;
        }
        writeln!(out, "      </PointData>")?;

        writeln!(out, "      <Points>")?;
        writeln!(
            out,
            "        <DataArray type=\"Float64\" NumberOfComponents=\"3\" format=\"ascii\">"
        )?;
        self.for_each_point(|r, c| {
            let [x, y, z] = self.grid.point(r, c);
            writeln!(out, "          {x} {y} {z}")
        })?;
        writeln!(out, "        </DataArray>")?;
        writeln!(out, "      </Points>")?;

        writeln!(out, "    </Piece>")?;
        writeln!(out, "  </StructuredGrid>")?;
        writeln!(out, "</VTKFile>")?;
        Ok(())
    }

    fn for_each_point<F>(&self, mut f: F) -> io::Result<()>
    where
        F: FnMut(usize, usize) -> io::Result<()>,
    {
        let (rows, columns) = self.grid.shape();
        for c in 0..columns {
            for r in 0..rows {
                f(r, c)?;
            }
        }
        Ok(())
    }
}

/// Scalars in point order (rows fastest). `DMatrix` storage is column-major,
/// which is exactly that order.
fn write_scalars<W: Write>(out: &mut W, values: &DMatrix<f64>, indent: &str) -> io::Result<()> {
    for v in values.iter() {
        writeln!(out, "{indent}{v}")?;
    }
    Ok(())
}

/// Write one file per grid as `<dir>/<prefix>_network<id>.<ext>`.
pub fn export_grids(
    grids: &[NetworkGrid],
    dir: impl AsRef<Path>,
    prefix: &str,
    format: VtkFormat,
) -> io::Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(grids.len());
    for grid in grids {
        let path = dir.join(format!(
            "{prefix}_network{}.{}",
            grid.network,
            format.extension()
        ));
        StructuredGridWriter::new(grid).write(&path, format)?;
        info!(path = %path.display(), network = grid.network, "grid exported");
        written.push(path);
    }
    Ok(written)
}

/// Export input geometry, numbering networks from 1 in the given order.
pub fn export_input_networks(
    networks: &[Network],
    dir: impl AsRef<Path>,
    prefix: &str,
    format: VtkFormat,
) -> io::Result<Vec<PathBuf>> {
    let grids: Vec<NetworkGrid> = (1u32..)
        .zip(networks)
        .map(|(id, network)| NetworkGrid::from_network(id, network))
        .collect();
    export_grids(&grids, dir, prefix, format)
}
