//! Residue classification derived from aggregated per-atom evidence.
//!
//! Classification needs residue-complete information: whether a residue is a
//! lone ion or a multi-atom ligand is only knowable after every member atom
//! has been seen, which is why the extractors materialize their full output
//! before this pass runs.

use crate::model::atom::AtomRecord;
use crate::model::residue::{ResidueInfo, ResidueKey};
use smol_str::SmolStr;
use std::collections::HashMap;

/// Residue names treated as solvent.
const WATER_NAMES: &[&str] = &[
    "HOH", "H2O", "DOD", "WAT", "SOL", "TIP", "TIP3", "TIP3P", "TIP4", "TIP4P", "TIP5P", "SPC",
    "OH2",
];

/// Standard and commonly aliased amino-acid residue names.
const AMINO_ACID_RESIDUES: &[&str] = &[
    "ALA", "ARG", "ASN", "ASP", "ASX", "CYS", "GLN", "GLU", "GLX", "GLY", "HIS", "HID", "HIE",
    "HIP", "HISN", "HISL", "ILE", "LEU", "LYS", "MET", "MSE", "PHE", "PRO", "SER", "THR", "TRP",
    "TYR", "VAL", "SEC", "PYL", "ASH", "GLH",
];

/// Standard and modified nucleic-acid residue names.
const NUCLEIC_ACID_RESIDUES: &[&str] = &[
    "A", "C", "G", "U", "I", "DA", "DG", "DC", "DT", "DI", "ADE", "GUA", "CYT", "URI", "THY",
    "PSU", "OMC", "OMU", "OMG", "5IU", "H2U", "M2G", "7MG", "1MA", "1MG", "2MG",
];

/// Residue names that always classify as ions.
const ION_RESIDUES: &[&str] = &[
    "NA", "K", "MG", "MN", "FE", "ZN", "CU", "CA", "CL", "BR", "I", "LI", "CO", "NI", "HG", "CD",
    "SR", "CS", "BA", "YB", "MO", "RU", "OS", "IR", "AU", "AG", "PT", "TI", "AL", "GA", "V", "W",
    "ZN2", "FE2",
];

/// Element symbols that mark a single-atom residue as an ion.
const ION_ELEMENTS: &[&str] = &[
    "NA", "K", "MG", "MN", "FE", "ZN", "CU", "CA", "CL", "BR", "I", "LI", "CO", "NI", "HG", "CD",
    "SR", "CS", "BA", "YB", "MO", "RU", "OS", "IR", "AU", "AG", "PT", "TI", "AL", "GA", "V", "W",
];

fn is_water_name(name: &str) -> bool {
    WATER_NAMES.contains(&name) || name.starts_with("HOH") || name.starts_with("TIP")
}

fn is_amino_name(name: &str) -> bool {
    AMINO_ACID_RESIDUES.contains(&name)
}

fn is_nucleic_name(name: &str) -> bool {
    NUCLEIC_ACID_RESIDUES.contains(&name) || looks_like_nucleic(name)
}

/// Short-code heuristic for nucleotides the fixed set does not list: a
/// one-letter base code, or a two-letter deoxy code (`D` + base).
fn looks_like_nucleic(name: &str) -> bool {
    let mut chars = name.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(first), None, _) => matches!(first, 'A' | 'C' | 'G' | 'U' | 'I' | 'T'),
        (Some('D'), Some(second), None) => matches!(second, 'A' | 'C' | 'G' | 'U' | 'T'),
        _ => false,
    }
}

/// Ion detection: a fixed residue-name set, plus a heuristic accepting any
/// single-atom residue whose element (or name) is a known ion element. The
/// heuristic can misclassify a lone non-ion atom (e.g. a single-carbon
/// pseudo-atom); that boundary is inherited behavior and is kept as-is.
fn is_ion(info: &ResidueInfo, upper_name: &str) -> bool {
    if ION_RESIDUES.contains(&upper_name) {
        return true;
    }
    if info.atom_count <= 1 {
        if info
            .elements
            .iter()
            .any(|element| ION_ELEMENTS.contains(&element.as_str()))
        {
            return true;
        }
        if ION_ELEMENTS.contains(&upper_name) {
            return true;
        }
    }
    false
}

/// Groups atoms by [`ResidueKey`] and derives the classification flags in a
/// single pass plus one finalization sweep.
pub fn classify_residues(atoms: &[AtomRecord]) -> HashMap<ResidueKey, ResidueInfo> {
    let mut residues: HashMap<ResidueKey, ResidueInfo> = HashMap::new();

    for atom in atoms {
        let key = ResidueKey::for_atom(atom);
        let info = residues
            .entry(key)
            .or_insert_with(|| ResidueInfo::new(&atom.residue_name));

        info.atom_count += 1;
        if !atom.element.is_empty() {
            info.elements
                .insert(SmolStr::new(atom.element.to_ascii_uppercase()));
        }
        if atom.record_kind.is_atom() {
            info.is_polymer = true;
        }
        if !atom.record_kind.is_hetatm() {
            info.hetatm_only = false;
        }
    }

    for info in residues.values_mut() {
        let upper_name = info.name.trim().to_ascii_uppercase();
        if is_amino_name(&upper_name) || NUCLEIC_ACID_RESIDUES.contains(&upper_name.as_str()) {
            info.is_polymer = true;
        }
        let ion = is_ion(info, &upper_name);
        info.is_water = is_water_name(&upper_name);
        info.is_amino_acid = is_amino_name(&upper_name);
        info.is_nucleic_acid = is_nucleic_name(&upper_name);
        info.is_ion = ion;
        info.is_ligand = !info.is_polymer && !info.is_water && !info.is_ion;
    }

    residues
}
