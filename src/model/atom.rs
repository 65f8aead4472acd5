//! Flat atom record shared by every format extractor.
//!
//! This module defines the smallest unit of work in `xyzr-forge`. Records are
//! instantiated by the IO readers, grouped into residues by the classifier,
//! and finally matched against the atom-type library when rendered as xyzr
//! output. Atom-name normalization lives here because every extractor must
//! apply it before a record is built, never after.

use super::types::RecordKind;
use smol_str::SmolStr;
use std::fmt;

/// One decoded atom occurrence, immutable after creation.
///
/// Coordinates are validated at extraction time; a record only exists when
/// all three parsed. String fields keep whatever the source supplied (trimmed
/// where the format grammar says so) except `atom_name`, which is always the
/// normalized label produced by [`normalize_atom_name`].
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// Cartesian coordinates in ångströms.
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Residue name as it appears in the source (e.g. `ALA`, `HOH`).
    pub residue_name: SmolStr,
    /// Normalized atom label (hydrogens collapse to `H`).
    pub atom_name: SmolStr,
    /// Chain identifier, possibly empty.
    pub chain_id: SmolStr,
    /// Residue number as text; may carry an insertion-code suffix.
    pub residue_number: SmolStr,
    /// ATOM, HETATM, or anything else a `group_PDB` cell supplied.
    pub record_kind: RecordKind,
    /// Best-effort element symbol, uppercased, possibly empty.
    pub element: SmolStr,
    /// 1-based source line (PDB, mmCIF) or element ordinal (PDBML).
    pub source_line: usize,
}

impl fmt::Display for AtomRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} [{:.3}, {:.3}, {:.3}]",
            self.record_kind, self.residue_name, self.residue_number, self.atom_name, self.x, self.y, self.z
        )
    }
}

/// Collapses a raw atom-name field into a canonical, pattern-matchable label.
///
/// Hydrogen names are numbered inconsistently across structures (` HB2`,
/// `1HB`, `HD21`, deuterium `D` variants); they all collapse to `H`. The
/// decision looks at the first two characters of the RAW field, right-padded,
/// so that mercury (`HG` in columns 13-14) is not mistaken for a gamma
/// hydrogen. Everything else is trimmed and stripped of interior spaces.
pub fn normalize_atom_name(raw: &str) -> SmolStr {
    let mut padded = raw.chars().chain([' ', ' ']);
    let first = padded.next().unwrap_or(' ');
    let second = padded.next().unwrap_or(' ');

    if (first == ' ' || first.is_ascii_digit()) && matches!(second, 'H' | 'h' | 'D' | 'd') {
        return SmolStr::new_static("H");
    }
    if matches!(first, 'H' | 'h') && !matches!(second, 'G' | 'g') {
        return SmolStr::new_static("H");
    }

    let stripped: String = raw.trim().chars().filter(|c| *c != ' ').collect();
    SmolStr::new(stripped)
}
