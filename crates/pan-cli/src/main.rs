use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pan_inp::CaseConfig;
use pan_io::{Coverage, OutputFiles, RunStatus, VtkFormat, export_input_networks};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_DECK: &str = "panair.inp";

#[derive(Parser, Debug)]
#[command(name = "pan-cli", version)]
#[command(about = "Build Panair input decks and read solver output")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a JSON case file into an input deck
    Build {
        case: PathBuf,

        /// Deck path (defaults to panair.inp next to the case file)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the input networks as .vts files next to the deck
        #[arg(long)]
        geometry: bool,
    },
    /// Report whether a run completed or aborted
    Status { dir: PathBuf },
    /// Print the force and moment summary as JSON
    Forces { dir: PathBuf },
    /// Print the off-body point table
    Offbody { dir: PathBuf },
    /// Write one .vts file per surface network
    ExportVtk {
        dir: PathBuf,

        #[arg(long, default_value = "panair")]
        prefix: String,

        /// Zero-fill networks with missing samples instead of failing
        #[arg(long)]
        allow_sparse: bool,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn deck_path(case: &Path, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| case.with_file_name(DEFAULT_DECK))
}

fn build(case: &Path, output: Option<PathBuf>, geometry: bool) -> Result<()> {
    let config = CaseConfig::from_file(case)
        .with_context(|| format!("failed to load case {}", case.display()))?;
    let deck = config.to_deck().context("failed to render input deck")?;

    let path = deck_path(case, output);
    deck.write(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    if geometry {
        let dir = path.parent().unwrap_or(Path::new("."));
        let networks = config.networks().context("invalid network in case")?;
        let written = export_input_networks(&networks, dir, "geometry", VtkFormat::Xml)
            .context("failed to export input geometry")?;
        info!(files = written.len(), "input geometry exported");
    }
    Ok(())
}

fn status(dir: &Path) -> Result<ExitCode> {
    let status = OutputFiles::new(dir)
        .run_status()
        .context("failed to read run status")?;
    println!("{status}");
    Ok(match status {
        RunStatus::Completed => ExitCode::SUCCESS,
        RunStatus::Aborted => ExitCode::from(1),
    })
}

fn forces(dir: &Path) -> Result<()> {
    let ffmf = OutputFiles::new(dir)
        .forces_and_moments()
        .context("failed to read force and moment summary")?;
    println!("{}", serde_json::to_string_pretty(&ffmf)?);
    Ok(())
}

fn offbody(dir: &Path) -> Result<()> {
    let table = OutputFiles::new(dir)
        .offbody_data()
        .context("failed to read off-body table")?;
    for row in table.row_iter() {
        let fields: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        println!("{}", fields.join(" "));
    }
    Ok(())
}

fn export_vtk(dir: &Path, prefix: &str, allow_sparse: bool) -> Result<()> {
    let coverage = if allow_sparse {
        Coverage::AllowSparse
    } else {
        Coverage::Dense
    };
    let output = OutputFiles::new(dir);
    run_completed(&output);
    let written = output
        .export_vtk(prefix, coverage)
        .context("failed to export network grids")?;
    for path in &written {
        println!("{}", path.display());
    }
    Ok(())
}

/// Whether the run is known to have completed. Anything else is logged, but
/// export still goes ahead with whatever samples exist.
fn run_completed(output: &OutputFiles) -> bool {
    let dir = output.directory().display();
    match output.run_status() {
        Ok(RunStatus::Completed) => true,
        Ok(RunStatus::Aborted) => {
            warn!(dir = %dir, "run aborted; exporting whatever samples exist");
            false
        }
        Err(err) => {
            warn!(dir = %dir, error = %err, "run status unknown; exporting whatever samples exist");
            false
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Build {
            case,
            output,
            geometry,
        } => build(&case, output, geometry)?,
        Command::Status { dir } => return status(&dir),
        Command::Forces { dir } => forces(&dir)?,
        Command::Offbody { dir } => offbody(&dir)?,
        Command::ExportVtk {
            dir,
            prefix,
            allow_sparse,
        } => export_vtk(&dir, &prefix, allow_sparse)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    init_logging();
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
