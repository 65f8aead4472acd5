use crate::io::error::Error;
use flate2::read::GzDecoder;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

/// Structure formats the conversion engine can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureFormat {
    /// Fixed-column PDB (80-column ATOM/HETATM records).
    Pdb,
    /// mmCIF `loop_`/tag/row grammar.
    Mmcif,
    /// PDBML, the XML encoding of PDB data.
    Pdbml,
}

impl StructureFormat {
    /// Infers a format from a file path extension, stripping a trailing
    /// `.gz` first. Unknown extensions (and extension-less paths) default to
    /// PDB, matching what most pipelines pipe through stdin.
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        let name = name.strip_suffix(".gz").unwrap_or(&name);

        match name.rsplit_once('.').map(|(_, ext)| ext) {
            Some("pdb" | "ent" | "brk" | "pdb1") => StructureFormat::Pdb,
            Some("cif" | "mmcif") => StructureFormat::Mmcif,
            Some("xml" | "pdbxml" | "pdbml") => StructureFormat::Pdbml,
            _ => StructureFormat::Pdb,
        }
    }
}

impl fmt::Display for StructureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureFormat::Pdb => write!(f, "PDB"),
            StructureFormat::Mmcif => write!(f, "mmCIF"),
            StructureFormat::Pdbml => write!(f, "PDBML"),
        }
    }
}

impl FromStr for StructureFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdb" => Ok(StructureFormat::Pdb),
            "mmcif" | "cif" => Ok(StructureFormat::Mmcif),
            "pdbxml" | "pdbml" | "xml" => Ok(StructureFormat::Pdbml),
            other => Err(format!("Invalid structure format: {}", other)),
        }
    }
}

/// Returns true when the path names a gzip-compressed file.
pub fn is_gzip_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}

/// Opens a structure file for reading, transparently decompressing when the
/// path ends in `.gz`.
pub fn open_source(path: &Path) -> Result<Box<dyn BufRead>, Error> {
    let file = File::open(path).map_err(|e| Error::from_io(e, Some(path.to_path_buf())))?;

    if is_gzip_path(path) {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
