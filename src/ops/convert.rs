//! The structure-to-xyzr pipeline: extract, classify, filter, resolve, emit.

use crate::db::AtomTypeLibrary;
use crate::io::{Error, StructureFormat, read_mmcif_atoms, read_pdb_atoms, read_pdbml_atoms};
use crate::model::residue::ResidueKey;
use crate::ops::classify::classify_residues;
use crate::ops::filter::{FilterConfig, is_excluded};
use std::io::{BufRead, Write};

/// Per-invocation settings for [`convert`].
#[derive(Debug, Clone, Copy)]
pub struct ConvertConfig {
    pub format: StructureFormat,
    /// Use united-atom radii (the default) or explicit-hydrogen radii.
    pub use_united: bool,
    pub filters: FilterConfig,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            format: StructureFormat::Pdb,
            use_united: true,
            filters: FilterConfig::default(),
        }
    }
}

/// Runs the full conversion over one source.
///
/// Extraction materializes the complete atom set first because classification
/// needs residue-complete evidence; filtering and emission then run as a
/// second pass in input encounter order. Atoms matching no library pattern
/// are reported to `diag` but still emitted with the fallback radius — one
/// unresolvable atom never aborts the batch. `source_label` only decorates
/// diagnostics; it is whatever the caller wants the user to see.
pub fn convert<R, W, D>(
    library: &AtomTypeLibrary,
    reader: R,
    source_label: &str,
    config: &ConvertConfig,
    out: &mut W,
    diag: &mut D,
) -> Result<(), Error>
where
    R: BufRead,
    W: Write,
    D: Write,
{
    let atoms = match config.format {
        StructureFormat::Pdb => read_pdb_atoms(reader)?,
        StructureFormat::Mmcif => read_mmcif_atoms(reader)?,
        StructureFormat::Pdbml => read_pdbml_atoms(reader)?,
    };
    if atoms.is_empty() {
        return Ok(());
    }

    let residues = classify_residues(&atoms);

    for atom in &atoms {
        let info = residues.get(&ResidueKey::for_atom(atom));
        if is_excluded(info, &config.filters) {
            continue;
        }

        let (type_id, radius) =
            library.resolve(&atom.residue_name, &atom.atom_name, config.use_united);
        if type_id.is_none() {
            writeln!(
                diag,
                "xyzrforge: file {} line {} residue {} atom pattern {} {} was not found in {}",
                source_label,
                atom.source_line,
                atom.residue_number,
                atom.residue_name,
                atom.atom_name,
                library.path().display()
            )
            .map_err(|e| Error::from_io(e, None))?;
        }

        writeln!(out, "{:8.3} {:8.3} {:8.3} {}", atom.x, atom.y, atom.z, radius)
            .map_err(|e| Error::from_io(e, None))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write as _};
    use tempfile::NamedTempFile;

    const TABLE: &str = "\
radius 1 C 1.70 1.90
radius 2 O 1.52 1.48
radius 3 N 1.55 1.64
radius 4 H 1.20 0.00
* H 4
* N.* 3
* C.* 1
* O.* 2
";

    const STRUCTURE: &str = "\
ATOM      1  N   ALA A   1      11.104   6.134  -6.504  1.00  0.00           N
ATOM      2  CA  ALA A   1      11.639   6.071  -5.147  1.00  0.00           C
HETATM    3  O   HOH A 201      10.000  20.000  30.000  1.00  0.00           O
HETATM    4 NA    NA A 301       5.000   5.000   5.000  1.00  0.00          NA
";

    fn library(table: &str) -> (AtomTypeLibrary, NamedTempFile) {
        let mut file = NamedTempFile::new().expect("temp table");
        file.write_all(table.as_bytes()).expect("write table");
        let library = AtomTypeLibrary::load(file.path()).expect("load table");
        (library, file)
    }

    fn run(table: &str, structure: &str, config: &ConvertConfig) -> (String, String) {
        let (library, _guard) = library(table);
        let mut out = Vec::new();
        let mut diag = Vec::new();
        convert(
            &library,
            Cursor::new(structure),
            "<test>",
            config,
            &mut out,
            &mut diag,
        )
        .expect("convert");
        (
            String::from_utf8(out).expect("utf8 out"),
            String::from_utf8(diag).expect("utf8 diag"),
        )
    }

    fn line_count(text: &str) -> usize {
        text.lines().count()
    }

    #[test]
    fn emits_fixed_precision_records_in_encounter_order() {
        let (out, diag) = run(TABLE, STRUCTURE, &ConvertConfig::default());
        assert!(diag.is_empty(), "unexpected diagnostics: {diag}");

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "  11.104    6.134   -6.504 1.64");
        assert_eq!(lines[1], "  11.639    6.071   -5.147 1.90");
        assert_eq!(lines[2], "  10.000   20.000   30.000 1.48");
    }

    #[test]
    fn explicit_hydrogen_mode_switches_radius_table() {
        let config = ConvertConfig {
            use_united: false,
            ..Default::default()
        };
        let (out, _) = run(TABLE, STRUCTURE, &config);
        assert_eq!(out.lines().next().unwrap(), "  11.104    6.134   -6.504 1.55");
    }

    #[test]
    fn water_exclusion_drops_the_water_atom() {
        let config = ConvertConfig {
            filters: FilterConfig {
                exclude_water: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let (out, _) = run(TABLE, STRUCTURE, &config);
        assert_eq!(line_count(&out), 3);
        assert!(!out.contains("  20.000"));
    }

    #[test]
    fn hetatm_exclusion_drops_water_and_ion() {
        let config = ConvertConfig {
            filters: FilterConfig {
                exclude_hetatm: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let (out, _) = run(TABLE, STRUCTURE, &config);
        assert_eq!(line_count(&out), 2);
    }

    #[test]
    fn enabling_more_exclusions_never_increases_emitted_count() {
        let mut configs = Vec::new();
        let mut filters = FilterConfig::default();
        configs.push(filters);
        filters.exclude_water = true;
        configs.push(filters);
        filters.exclude_ions = true;
        configs.push(filters);
        filters.exclude_amino_acids = true;
        configs.push(filters);
        filters.exclude_hetatm = true;
        filters.exclude_ligands = true;
        filters.exclude_nucleic_acids = true;
        configs.push(filters);

        let mut previous = usize::MAX;
        for filters in configs {
            let config = ConvertConfig {
                filters,
                ..Default::default()
            };
            let (out, _) = run(TABLE, STRUCTURE, &config);
            let count = line_count(&out);
            assert!(
                count <= previous,
                "adding exclusions increased the count: {count} > {previous}"
            );
            previous = count;
        }
    }

    #[test]
    fn unmatched_atom_emits_fallback_radius_and_diagnostic() {
        let table = "radius 1 C 1.70\n* C.* 1\n";
        let (out, diag) = run(table, STRUCTURE, &ConvertConfig::default());

        assert_eq!(line_count(&out), 4, "unmatched atoms must still be emitted");
        assert!(out.lines().next().unwrap().ends_with(" 0.01"));
        assert!(diag.contains("atom pattern ALA N"));
        assert!(diag.contains("<test>"));
        assert!(diag.contains("line 1"));
    }

    #[test]
    fn empty_source_produces_no_output() {
        let (out, diag) = run(TABLE, "REMARK nothing here\n", &ConvertConfig::default());
        assert!(out.is_empty());
        assert!(diag.is_empty());
    }

    #[test]
    fn mmcif_sources_convert_through_the_same_pipeline() {
        let structure = "\
loop_
_atom_site.group_PDB
_atom_site.label_atom_id
_atom_site.label_comp_id
_atom_site.auth_asym_id
_atom_site.auth_seq_id
_atom_site.Cartn_x
_atom_site.Cartn_y
_atom_site.Cartn_z
_atom_site.type_symbol
ATOM CA ALA A 1 11.639 6.071 -5.147 C
";
        let config = ConvertConfig {
            format: StructureFormat::Mmcif,
            ..Default::default()
        };
        let (out, _) = run(TABLE, structure, &config);
        assert_eq!(out, "  11.639    6.071   -5.147 1.90\n");
    }
}
