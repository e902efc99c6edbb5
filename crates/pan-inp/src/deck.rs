//! Panair input deck assembly.
//!
//! An [`InputDeck`] keeps rendered blocks in insertion order. Each builder
//! method renders one block; calling it again replaces the text but keeps the
//! block where it was first inserted. The deck is serialized as
//!
//! ```text
//! $<BLOCK NAME>
//! <block body>
//! ...
//! $end
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use pan_inp::InputDeck;
//!
//! let mut deck = InputDeck::new();
//! deck.title("test case", "wing alone");
//! deck.mach(1.5)?;
//! deck.angles_of_attack(0.0, &[-1.0, 0.0, 1.0])?;
//! assert!(deck.render().ends_with("$end"));
//! # Ok::<(), pan_inp::FormatError>(())
//! ```

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use pan_model::{Network, Point3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::format::{
    FormatError, format_header, format_input_line, format_label, format_option, format_point,
    header_fields,
};

/// Character that opens every block.
pub const BLOCK_DELIMITER: char = '$';
/// Literal written after the last block.
pub const END_MARKER: &str = "$end";

/// Column at which network and wake names start on their header lines.
const NAME_COLUMN: usize = 61;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBlock {
    pub name: String,
    pub text: String,
}

/// Reference geometry for force and moment coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    pub xref: f64,
    pub yref: f64,
    pub zref: f64,
    pub sref: f64,
    pub bref: f64,
    pub cref: f64,
    pub dref: f64,
}

/// Printout flags of the `PRINTOUT CONTROL` block. All default to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintoutControl {
    pub isings: i32,
    pub igeomp: i32,
    pub isingp: i32,
    pub icontp: i32,
    pub ibconp: i32,
    pub iedgep: i32,
    pub ipraic: i32,
    pub nexdgn: i32,
    pub ioutpr: i32,
    pub ifmcpr: i32,
    pub icostp: i32,
}

/// One trailing wake network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailingWake {
    /// Name of the wake network.
    pub name: String,
    /// Name of the network the wake is shed from.
    pub inat: String,
    /// Edge of `inat` the wake attaches to.
    pub insd: i32,
    /// x coordinate the wake extends to.
    pub xwake: f64,
    pub twake: i32,
}

/// Ordered collection of rendered input blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputDeck {
    blocks: Vec<InputBlock>,
    index: HashMap<String, usize>,
}

impl InputDeck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a rendered block. An existing block of the same name is replaced
    /// in place.
    pub fn insert_block(&mut self, name: impl Into<String>, text: impl Into<String>) {
        let name = name.into();
        let text = text.into();

        if let Some(&position) = self.index.get(&name) {
            debug!(block = %name, position, "replacing input block");
            self.blocks[position].text = text;
            return;
        }

        debug!(block = %name, position = self.blocks.len(), "adding input block");
        self.index.insert(name.clone(), self.blocks.len());
        self.blocks.push(InputBlock { name, text });
    }

    pub fn block(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .map(|&position| self.blocks[position].text.as_str())
    }

    pub fn blocks(&self) -> &[InputBlock] {
        &self.blocks
    }

    pub fn block_names(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|b| b.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Serialize the whole deck.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            out.push(BLOCK_DELIMITER);
            out.push_str(&block.name);
            out.push('\n');
            out.push_str(&block.text);
        }
        out.push_str(END_MARKER);
        out
    }

    pub fn write(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        ensure_parent_dir(path)?;
        fs::write(path, self.render())?;
        info!(path = %path.display(), blocks = self.blocks.len(), "input deck written");
        Ok(())
    }

    pub fn title(&mut self, title: &str, info: &str) {
        self.insert_block("TITLE", format!("{title}\n{info}\n"));
    }

    pub fn datacheck(&mut self, ndtchk: i32) -> Result<(), FormatError> {
        let text = format_header(["ndtchk"]) + &format_input_line(&[ndtchk.into()])?;
        self.insert_block("DATACHECK", text);
        Ok(())
    }

    pub fn symmetric(&mut self, xzpln: i32, xypln: i32) -> Result<(), FormatError> {
        let text = format_header(["xzpln", "xypln"])
            + &format_input_line(&[xzpln.into(), xypln.into()])?;
        self.insert_block("SYMMETRIC", text);
        Ok(())
    }

    pub fn mach(&mut self, amach: f64) -> Result<(), FormatError> {
        let text = format_header(["amach"]) + &format_input_line(&[amach])?;
        self.insert_block("MACH NUMBER", text);
        Ok(())
    }

    pub fn cases(&mut self, nacase: i32) -> Result<(), FormatError> {
        let text = format_header(["nacase"]) + &format_input_line(&[nacase.into()])?;
        self.insert_block("CASES", text);
        Ok(())
    }

    /// `alpc` is the compressibility angle of attack, `alphas` one angle per case.
    pub fn angles_of_attack(&mut self, alpc: f64, alphas: &[f64]) -> Result<(), FormatError> {
        let text = angle_sweep("alpc", "alpha", alpc, alphas)?;
        self.insert_block("ANGLES OF ATTACK", text);
        Ok(())
    }

    pub fn yaw_angle(&mut self, betc: f64, betas: &[f64]) -> Result<(), FormatError> {
        let text = angle_sweep("betc", "beta", betc, betas)?;
        self.insert_block("YAW ANGLE", text);
        Ok(())
    }

    pub fn reference_data(&mut self, r: &ReferenceData) -> Result<(), FormatError> {
        let mut text = format_header(["xref", "yref", "zref"]);
        text += &format_input_line(&[r.xref, r.yref, r.zref])?;
        text += &format_header(["sref", "bref", "cref", "dref"]);
        text += &format_input_line(&[r.sref, r.bref, r.cref, r.dref])?;
        self.insert_block("REFERENCE DATA", text);
        Ok(())
    }

    pub fn printout(&mut self, p: &PrintoutControl) -> Result<(), FormatError> {
        let mut text = format_header(["isings", "igeomp", "isingp", "icontp", "ibconp", "iedgep"]);
        text += &format_input_line(&[
            p.isings.into(),
            p.igeomp.into(),
            p.isingp.into(),
            p.icontp.into(),
            p.ibconp.into(),
            p.iedgep.into(),
        ])?;
        text += &format_header(["ipraic", "nexdgn", "ioutpr", "ifmcpr", "icostp"]);
        text += &format_input_line(&[
            p.ipraic.into(),
            p.nexdgn.into(),
            p.ioutpr.into(),
            p.ifmcpr.into(),
            p.icostp.into(),
        ])?;
        self.insert_block("PRINTOUT CONTROL", text);
        Ok(())
    }

    /// Surface networks of boundary condition type `kt`.
    pub fn points(&mut self, kt: i32, networks: &[Network]) -> Result<(), FormatError> {
        let mut text = format_header(["kn"]);
        text += &format_input_line(&[networks.len() as f64])?;
        text += &format_header(["kt"]);
        text += &format_input_line(&[kt.into()])?;
        for network in networks {
            text += &network_record(network)?;
        }
        self.insert_block(format!("POINTS kt={kt}"), text);
        Ok(())
    }

    pub fn trailing_wake_networks(
        &mut self,
        kt: i32,
        matchw: i32,
        wakes: &[TrailingWake],
    ) -> Result<(), FormatError> {
        let mut text = format_header(["kn"]);
        text += &format_input_line(&[wakes.len() as f64])?;
        text += &format_header(["kt", "matchw"]);
        text += &format_input_line(&[kt.into(), matchw.into()])?;
        for wake in wakes {
            text += &wake_record(wake)?;
        }
        self.insert_block(format!("TRAILING matchw={matchw}"), text);
        Ok(())
    }

    pub fn flow_field_properties(&mut self, nflowv: i32, tpoff: i32) -> Result<(), FormatError> {
        let text = format_header(["nflowv", "tpoff"])
            + &format_input_line(&[nflowv.into(), tpoff.into()])?;
        self.insert_block("FLOW-FIELD PROPERTIES", text);
        Ok(())
    }

    /// Points where the solver samples the flow field away from the surface.
    pub fn offbody_points(&mut self, points: &[Point3]) -> Result<(), FormatError> {
        let mut text = format_header(["isk1"]);
        text += &format_input_line(&[points.len() as f64])?;
        text += &format_header(["xof", "yof", "zof", "xof", "yof", "zof"]);
        text += &pack_points(points)?;
        self.insert_block("XYZ OF OFF-BODY POINTS", text);
        Ok(())
    }
}

fn angle_sweep(
    reference_label: &str,
    label: &str,
    reference: f64,
    angles: &[f64],
) -> Result<String, FormatError> {
    let mut text = format_header([reference_label]);
    text += &format_input_line(&[reference])?;
    text += &format_header((0..angles.len()).map(|i| format!("{label}({i})")));
    text += &format_input_line(angles)?;
    Ok(text)
}

/// Header line whose trailing name starts at [`NAME_COLUMN`].
fn named_header(labels: &[&str], name: &str) -> String {
    format!(
        "{:<width$}{name}\n",
        header_fields(labels.iter().copied()),
        width = NAME_COLUMN
    )
}

fn network_record(network: &Network) -> Result<String, FormatError> {
    let mut text = named_header(&["nm", "nn"], &network.name);
    text += &format_input_line(&[network.rows() as f64, network.columns() as f64])?;
    for column in network.iter_columns() {
        text += &pack_points(column)?;
    }
    Ok(text)
}

fn wake_record(wake: &TrailingWake) -> Result<String, FormatError> {
    let mut text = named_header(&["inat", "insd", "xwake", "twake"], &wake.name);
    text += &format_label(&wake.inat);
    text += &format_option(wake.insd)?;
    text += &format_option(wake.xwake)?;
    text += &format_option(wake.twake)?;
    text.push('\n');
    Ok(text)
}

/// Two points per line. A record with an odd number of points gets its
/// dangling line closed, so every record ends on a line boundary.
fn pack_points(points: &[Point3]) -> Result<String, FormatError> {
    let mut text = String::new();
    for (i, p) in points.iter().enumerate() {
        text += &format_point(*p)?;
        if (i + 1) % 2 == 0 {
            text.push('\n');
        }
    }
    if points.len() % 2 != 0 {
        text.push('\n');
    }
    Ok(text)
}

fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_network(name: &str, rows: usize, columns: usize) -> Network {
        let cols = (0..columns)
            .map(|c| (0..rows).map(|r| [r as f64, c as f64, 0.0]).collect())
            .collect();
        Network::from_columns(name, cols).expect("network should build")
    }

    #[test]
    fn renders_blocks_in_insertion_order() {
        let mut deck = InputDeck::new();
        deck.title("test case", "Ted");
        deck.datacheck(0).unwrap();
        deck.symmetric(1, 0).unwrap();
        deck.mach(1.5).unwrap();

        let names: Vec<&str> = deck.block_names().collect();
        assert_eq!(names, ["TITLE", "DATACHECK", "SYMMETRIC", "MACH NUMBER"]);

        let text = deck.render();
        assert!(text.starts_with("$TITLE\ntest case\nTed\n$DATACHECK\n=ndtchk   \n0.0       \n"));
        assert!(text.contains("$MACH NUMBER\n=amach    \n1.5       \n"));
        assert!(text.ends_with("$end"));
    }

    #[test]
    fn rebuilding_a_block_keeps_its_position() {
        let mut deck = InputDeck::new();
        deck.mach(0.5).unwrap();
        deck.cases(1).unwrap();
        deck.mach(2.0).unwrap();

        let names: Vec<&str> = deck.block_names().collect();
        assert_eq!(names, ["MACH NUMBER", "CASES"]);
        assert_eq!(deck.block("MACH NUMBER"), Some("=amach    \n2.0       \n"));
        assert_eq!(deck.len(), 2);
    }

    #[test]
    fn angle_sweep_numbers_headers_from_zero() {
        let mut deck = InputDeck::new();
        deck.angles_of_attack(0.0, &[-1.0, 0.0, 1.0]).unwrap();
        assert_eq!(
            deck.block("ANGLES OF ATTACK").unwrap(),
            "=alpc     \n0.0       \n=alpha(0) alpha(1)  alpha(2)  \n-1.0      0.0       1.0       \n"
        );
    }

    #[test]
    fn network_record_packs_two_points_per_line() {
        let mut deck = InputDeck::new();
        deck.points(1, &[flat_network("upper", 3, 2)]).unwrap();
        let text = deck.block("POINTS kt=1").unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "=kn       ");
        assert_eq!(lines[1], "1.0       ");
        assert_eq!(lines[2], "=kt       ");
        assert_eq!(lines[3], "1.0       ");
        assert_eq!(lines[4].len(), 61 + "upper".len());
        assert!(lines[4].starts_with("=nm       nn        "));
        assert!(lines[4].ends_with("upper"));
        assert_eq!(lines[5], "3.0       2.0       ");
        // 3 points per column: one full line and one half line per column.
        assert_eq!(lines.len(), 6 + 4);
        assert_eq!(lines[6].len(), 60);
        assert_eq!(lines[7].len(), 30);
        assert_eq!(&lines[8][..30], "0.000000001.000000000.00000000");
    }

    #[test]
    fn even_columns_need_no_closing_line() {
        let mut deck = InputDeck::new();
        deck.points(1, &[flat_network("lower", 4, 3)]).unwrap();
        let body_lines = deck.block("POINTS kt=1").unwrap().lines().count() - 6;
        assert_eq!(body_lines, 3 * 2);
    }

    #[test]
    fn points_block_name_tracks_kt() {
        let mut deck = InputDeck::new();
        deck.points(1, &[]).unwrap();
        deck.points(18, &[]).unwrap();
        let names: Vec<&str> = deck.block_names().collect();
        assert_eq!(names, ["POINTS kt=1", "POINTS kt=18"]);
        assert_eq!(
            deck.block("POINTS kt=18").unwrap(),
            "=kn       \n0.0       \n=kt       \n18.0      \n"
        );
    }

    #[test]
    fn wake_record_layout() {
        let mut deck = InputDeck::new();
        let wakes = [TrailingWake {
            name: "left".to_string(),
            inat: "upper".to_string(),
            insd: 3,
            xwake: 10.0,
            twake: 0,
        }];
        deck.trailing_wake_networks(18, 0, &wakes).unwrap();
        let text = deck.block("TRAILING matchw=0").unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[2], "=kt       matchw    ");
        assert_eq!(lines[3], "18.0      0.0       ");
        assert!(lines[4].starts_with("=inat     insd      xwake     twake     "));
        assert!(lines[4].ends_with("left"));
        assert_eq!(lines[5], "upper     3.0       10.0      0.0       ");
    }

    #[test]
    fn offbody_points_close_odd_record() {
        let mut deck = InputDeck::new();
        let points = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
        deck.offbody_points(&points).unwrap();
        let text = deck.block("XYZ OF OFF-BODY POINTS").unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "3.0       ");
        assert_eq!(lines[2], "=xof      yof       zof       xof       yof       zof       ");
        assert_eq!(lines.len(), 5);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn empty_offbody_list_is_header_only() {
        let mut deck = InputDeck::new();
        deck.offbody_points(&[]).unwrap();
        assert_eq!(deck.block("XYZ OF OFF-BODY POINTS").unwrap().lines().count(), 3);
    }

    #[test]
    fn unrepresentable_coordinate_aborts_block() {
        let mut deck = InputDeck::new();
        let err = deck
            .offbody_points(&[[250_000.0, 0.0, 0.0]])
            .expect_err("too large");
        assert!(matches!(err, FormatError::Unrepresentable { .. }));
        assert!(deck.is_empty());
    }

    #[test]
    fn reference_and_printout_blocks() {
        let mut deck = InputDeck::new();
        deck.reference_data(&ReferenceData {
            xref: 0.0,
            yref: 0.0,
            zref: 0.0,
            sref: 2.0,
            bref: 2.0,
            cref: 1.0,
            dref: 2.0,
        })
        .unwrap();
        deck.printout(&PrintoutControl {
            ioutpr: 1,
            ..Default::default()
        })
        .unwrap();

        let reference = deck.block("REFERENCE DATA").unwrap();
        assert!(reference.starts_with("=xref     yref      zref      \n"));
        assert!(reference.ends_with("2.0       2.0       1.0       2.0       \n"));

        let printout = deck.block("PRINTOUT CONTROL").unwrap();
        assert_eq!(printout.lines().count(), 4);
        assert!(printout.ends_with("0.0       0.0       1.0       0.0       0.0       \n"));
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("case.INP");
        let mut deck = InputDeck::new();
        deck.title("t", "i");
        deck.write(&path).expect("deck should write");
        let text = fs::read_to_string(&path).expect("deck readable");
        assert_eq!(text, "$TITLE\nt\ni\n$end");
    }
}
