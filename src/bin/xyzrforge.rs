use std::fs::File;
use std::io::{self as stdio, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use is_terminal::IsTerminal;

use xyzr_forge::db::{AtomTypeLibrary, locate_table};
use xyzr_forge::io::{StructureFormat, open_source};
use xyzr_forge::{ConvertConfig, FilterConfig, convert};

#[derive(Parser, Debug)]
#[command(
    name = "xyzrforge",
    about = "Extract x, y, z coordinates and atom radii from PDB, mmCIF, or PDBML structure files and write xyzr records to stdout.",
    version,
    author
)]
struct Cli {
    /// Use explicit hydrogen radii instead of the default united-atom radii.
    #[arg(short = 'H', long)]
    hydrogens: bool,
    /// Path to the atmtypenumbers table. Defaults to the first readable file
    /// among $XYZRFORGE_TABLE, a file beside the executable, or
    /// ./atmtypenumbers.
    #[arg(short = 't', long = "table", value_name = "FILE")]
    table: Option<PathBuf>,
    /// Force the input format instead of inferring it from the extension.
    #[arg(short = 'f', long = "format", value_enum)]
    format: Option<FormatArg>,
    /// Output file path. When omitted, stdout is used.
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Exclude residues classified as ions.
    #[arg(long)]
    exclude_ions: bool,
    /// Exclude non-polymer ligands.
    #[arg(long)]
    exclude_ligands: bool,
    /// Exclude residues composed solely of HETATM records.
    #[arg(long)]
    exclude_hetatm: bool,
    /// Exclude water molecules / solvent.
    #[arg(long)]
    exclude_water: bool,
    /// Exclude nucleic-acid residues.
    #[arg(long)]
    exclude_nucleic_acids: bool,
    /// Exclude amino-acid residues.
    #[arg(long)]
    exclude_amino_acids: bool,
    /// Input structure file, gzip-decompressed when the path ends in .gz.
    /// When omitted, stdin is read as PDB unless --format says otherwise.
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,
}

/// Formats accepted by `--format`, mirroring the library's format tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    #[value(name = "pdb")]
    Pdb,
    #[value(name = "mmcif", alias = "cif")]
    Mmcif,
    #[value(name = "pdbxml", alias = "pdbml")]
    Pdbml,
}

impl From<FormatArg> for StructureFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Pdb => StructureFormat::Pdb,
            FormatArg::Mmcif => StructureFormat::Mmcif,
            FormatArg::Pdbml => StructureFormat::Pdbml,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let table_path =
        locate_table(cli.table.as_deref()).context("Failed to locate the atom-type table")?;
    let library = AtomTypeLibrary::load(&table_path)
        .with_context(|| format!("Failed to load atom-type table {}", table_path.display()))?;
    for warning in library.warnings() {
        eprintln!(
            "xyzrforge: error in library file {}: {}",
            table_path.display(),
            warning
        );
    }

    let format = match cli.format {
        Some(explicit) => StructureFormat::from(explicit),
        None => cli
            .input
            .as_deref()
            .map(StructureFormat::from_path)
            .unwrap_or(StructureFormat::Pdb),
    };

    let config = ConvertConfig {
        format,
        use_united: !cli.hydrogens,
        filters: FilterConfig {
            exclude_ions: cli.exclude_ions,
            exclude_ligands: cli.exclude_ligands,
            exclude_hetatm: cli.exclude_hetatm,
            exclude_water: cli.exclude_water,
            exclude_nucleic_acids: cli.exclude_nucleic_acids,
            exclude_amino_acids: cli.exclude_amino_acids,
        },
    };

    let (reader, label): (Box<dyn BufRead>, String) = match &cli.input {
        Some(path) => (
            open_source(path)
                .with_context(|| format!("Failed to open input file {}", path.display()))?,
            path.display().to_string(),
        ),
        None => {
            let stdin = stdio::stdin();
            if stdin.is_terminal() {
                bail!(
                    "No input file provided and stdin is a TTY. Provide a structure file or pipe one into xyzrforge."
                );
            }
            (Box::new(BufReader::new(stdin.lock())), "<stdin>".to_string())
        }
    };

    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(stdio::stdout().lock())),
    };

    let stderr = stdio::stderr();
    let mut diag = stderr.lock();

    convert(&library, reader, &label, &config, &mut out, &mut diag)
        .with_context(|| format!("Failed to convert {} input from {}", config.format, label))?;
    out.flush().context("Failed to flush output")?;

    Ok(())
}
