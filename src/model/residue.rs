use super::atom::AtomRecord;
use smol_str::SmolStr;
use std::collections::HashSet;

/// Identity of a residue across every supported source format.
///
/// Two atoms with the same key are assumed to belong to the same physical
/// residue. Chain and residue names are case-normalized and the number is
/// trimmed so that fixed-column and token-based formats agree on identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResidueKey {
    pub chain_id: SmolStr,
    pub residue_number: SmolStr,
    pub residue_name: SmolStr,
}

impl ResidueKey {
    pub fn for_atom(atom: &AtomRecord) -> Self {
        Self {
            chain_id: SmolStr::new(atom.chain_id.to_ascii_uppercase()),
            residue_number: SmolStr::new(atom.residue_number.trim()),
            residue_name: SmolStr::new(atom.residue_name.to_ascii_uppercase()),
        }
    }
}

/// Aggregate evidence over all atoms sharing a [`ResidueKey`], plus the
/// classification flags derived from it once aggregation is complete.
///
/// `hetatm_only` is tracked separately from the class flags because the
/// hetatm-exclusion filter operates on record provenance, not chemistry.
#[derive(Debug, Clone)]
pub struct ResidueInfo {
    pub name: SmolStr,
    pub atom_count: usize,
    pub hetatm_only: bool,
    pub is_polymer: bool,
    pub elements: HashSet<SmolStr>,
    pub is_water: bool,
    pub is_amino_acid: bool,
    pub is_nucleic_acid: bool,
    pub is_ion: bool,
    pub is_ligand: bool,
}

impl ResidueInfo {
    pub fn new(name: &str) -> Self {
        Self {
            name: SmolStr::new(name),
            atom_count: 0,
            hetatm_only: true,
            is_polymer: false,
            elements: HashSet::new(),
            is_water: false,
            is_amino_acid: false,
            is_nucleic_acid: false,
            is_ion: false,
            is_ligand: false,
        }
    }
}
