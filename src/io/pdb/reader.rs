use crate::io::error::Error;
use crate::model::atom::{AtomRecord, normalize_atom_name};
use crate::model::types::RecordKind;
use smol_str::SmolStr;
use std::io::BufRead;

/// Decodes fixed-column PDB text into a flat atom-record list.
///
/// The source is streamed line by line; only `ATOM` and `HETATM` records are
/// considered. Records whose coordinate fields are blank or unparsable are
/// dropped without a diagnostic — numeric garbage in one record must not
/// discard an otherwise valid structure.
pub fn read<R: BufRead>(reader: R) -> Result<Vec<AtomRecord>, Error> {
    let mut atoms = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::from_io(e, None))?;
        let line_number = index + 1;

        let kind = RecordKind::from_field(field(&line, 0, 6));
        if kind == RecordKind::Other {
            continue;
        }

        let x_raw = field(&line, 30, 38).trim();
        let y_raw = field(&line, 38, 46).trim();
        let z_raw = field(&line, 46, 54).trim();
        if x_raw.is_empty() || y_raw.is_empty() || z_raw.is_empty() {
            continue;
        }
        let (Ok(x), Ok(y), Ok(z)) = (
            x_raw.parse::<f64>(),
            y_raw.parse::<f64>(),
            z_raw.parse::<f64>(),
        ) else {
            continue;
        };

        let atom_name_raw = field(&line, 12, 16);
        let residue_name = field(&line, 17, 20).trim();
        let chain_id = field(&line, 21, 22).trim();
        let residue_number = field(&line, 22, 26).trim();

        let element = if line.len() >= 78 {
            field(&line, 76, 78).trim().to_ascii_uppercase()
        } else {
            String::new()
        };
        let element = if element.is_empty() {
            element_from_name(atom_name_raw)
        } else {
            element
        };

        atoms.push(AtomRecord {
            x,
            y,
            z,
            residue_name: SmolStr::new(residue_name),
            atom_name: normalize_atom_name(atom_name_raw),
            chain_id: SmolStr::new(chain_id),
            residue_number: SmolStr::new(residue_number),
            record_kind: kind,
            element: SmolStr::new(element),
            source_line: line_number,
        });
    }

    Ok(atoms)
}

/// Byte-offset slice that tolerates short lines and returns `""` past the end.
fn field(line: &str, start: usize, end: usize) -> &str {
    if start >= line.len() {
        return "";
    }
    let end = end.min(line.len());
    line.get(start..end).unwrap_or("")
}

/// Fallback element derivation when columns 77-78 are absent: keep the
/// letters of the atom-name field, uppercase, first two characters.
fn element_from_name(atom_name: &str) -> String {
    atom_name
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .take(2)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const ALA_LINE: &str =
        "ATOM      2  CA  ALA A   1      11.618   9.504  12.279  1.00  0.00           C";

    #[test]
    fn reads_atom_record_fields_from_fixed_columns() {
        let atoms = read(Cursor::new(ALA_LINE)).expect("read pdb");
        assert_eq!(atoms.len(), 1);

        let atom = &atoms[0];
        assert_eq!(atom.residue_name, "ALA");
        assert_eq!(atom.atom_name, "CA");
        assert_eq!(atom.chain_id, "A");
        assert_eq!(atom.residue_number, "1");
        assert_eq!(atom.record_kind, RecordKind::Atom);
        assert_eq!(atom.element, "C");
        assert_eq!(atom.source_line, 1);
        assert!((atom.x - 11.618).abs() < 1e-9);
        assert!((atom.y - 9.504).abs() < 1e-9);
        assert!((atom.z - 12.279).abs() < 1e-9);
    }

    #[test]
    fn ignores_non_atom_records() {
        let text = "HEADER    HYDROLASE\nREMARK   2\nTER\nEND\n";
        let atoms = read(Cursor::new(text)).expect("read pdb");
        assert!(atoms.is_empty());
    }

    #[test]
    fn reads_hetatm_records_with_kind() {
        let line = "HETATM  100  O   HOH A 201      10.000  20.000  30.000  1.00  0.00           O";
        let atoms = read(Cursor::new(line)).expect("read pdb");
        assert_eq!(atoms.len(), 1);
        assert_eq!(atoms[0].record_kind, RecordKind::Hetatm);
        assert_eq!(atoms[0].residue_name, "HOH");
    }

    #[test]
    fn skips_record_with_blank_coordinate_silently() {
        let blank_x =
            "ATOM      2  CA  ALA A   1               9.504  12.279  1.00  0.00           C";
        let atoms = read(Cursor::new(format!("{}\n{}", blank_x, ALA_LINE))).expect("read pdb");
        assert_eq!(atoms.len(), 1);
        assert_eq!(atoms[0].source_line, 2);
    }

    #[test]
    fn skips_record_with_unparsable_coordinate() {
        let bad_y =
            "ATOM      2  CA  ALA A   1      11.618  xx.xxx  12.279  1.00  0.00           C";
        let atoms = read(Cursor::new(bad_y)).expect("read pdb");
        assert!(atoms.is_empty());
    }

    #[test]
    fn skips_truncated_atom_record() {
        let atoms = read(Cursor::new("ATOM      2  CA  ALA A   1")).expect("read pdb");
        assert!(atoms.is_empty());
    }

    #[test]
    fn derives_element_from_atom_name_when_column_is_missing() {
        let short = "ATOM      2  CA  ALA A   1      11.618   9.504  12.279";
        let atoms = read(Cursor::new(short)).expect("read pdb");
        assert_eq!(atoms.len(), 1);
        assert_eq!(atoms[0].element, "CA");
    }

    #[test]
    fn normalizes_hydrogen_atom_names() {
        let line = "ATOM      3 1HB  ALA A   1      11.618   9.504  12.279  1.00  0.00           H";
        let atoms = read(Cursor::new(line)).expect("read pdb");
        assert_eq!(atoms[0].atom_name, "H");
    }
}
