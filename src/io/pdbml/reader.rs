use crate::io::error::Error;
use crate::model::atom::{AtomRecord, normalize_atom_name};
use crate::model::types::RecordKind;
use quick_xml::Reader;
use quick_xml::events::Event;
use smol_str::SmolStr;
use std::collections::HashMap;
use std::io::BufRead;

/// Decodes PDBML (the XML encoding of PDB data) into a flat atom-record list.
///
/// Every element whose local name is `atom_site` is one candidate record;
/// namespace prefixes are ignored and the comparison is case-insensitive.
/// Direct children supply the fields, named like the mmCIF `_atom_site` tags.
/// Elements lacking any of the three coordinates are skipped; malformed XML
/// is a fatal parse error.
pub fn read<R: BufRead>(mut reader: R) -> Result<Vec<AtomRecord>, Error> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| Error::from_io(e, None))?;
    parse(&text)
}

fn parse(text: &str) -> Result<Vec<AtomRecord>, Error> {
    let mut xml = Reader::from_str(text);
    let mut atoms = Vec::new();
    let mut ordinal = 0;

    loop {
        match xml.read_event().map_err(|e| Error::from_xml(e, None))? {
            Event::Start(start) if is_atom_site(start.name().local_name().as_ref()) => {
                let fields = read_atom_site(&mut xml)?;
                ordinal += 1;
                if let Some(atom) = fields_to_atom(&fields, ordinal) {
                    atoms.push(atom);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(atoms)
}

fn is_atom_site(local_name: &[u8]) -> bool {
    local_name.eq_ignore_ascii_case(b"atom_site")
}

/// Collects the child elements of one `atom_site` into a field map keyed by
/// lowercased local name. Self-closing children record an empty value.
fn read_atom_site(xml: &mut Reader<&[u8]>) -> Result<HashMap<String, String>, Error> {
    let mut fields = HashMap::new();

    loop {
        match xml.read_event().map_err(|e| Error::from_xml(e, None))? {
            Event::Start(start) => {
                let key = String::from_utf8_lossy(start.name().local_name().as_ref())
                    .to_ascii_lowercase();
                let value = read_element_text(xml)?;
                fields.insert(key, value);
            }
            Event::Empty(empty) => {
                let key = String::from_utf8_lossy(empty.name().local_name().as_ref())
                    .to_ascii_lowercase();
                fields.insert(key, String::new());
            }
            Event::End(_) => break,
            Event::Eof => {
                return Err(Error::parse(
                    "PDBML",
                    None,
                    0,
                    "unexpected end of document inside atom_site element",
                ));
            }
            _ => {}
        }
    }

    Ok(fields)
}

fn read_element_text(xml: &mut Reader<&[u8]>) -> Result<String, Error> {
    let mut value = String::new();
    let mut depth = 0usize;

    loop {
        match xml.read_event().map_err(|e| Error::from_xml(e, None))? {
            Event::Text(text) => {
                value.push_str(&text.unescape().map_err(|e| Error::from_xml(e, None))?);
            }
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Event::Eof => {
                return Err(Error::parse(
                    "PDBML",
                    None,
                    0,
                    "unexpected end of document inside atom_site field",
                ));
            }
            _ => {}
        }
    }

    Ok(value.trim().to_string())
}

fn field<'a>(fields: &'a HashMap<String, String>, candidates: &[&str]) -> &'a str {
    for key in candidates {
        if let Some(value) = fields.get(*key) {
            if !value.is_empty() {
                return value;
            }
        }
    }
    ""
}

fn fields_to_atom(fields: &HashMap<String, String>, ordinal: usize) -> Option<AtomRecord> {
    let x_raw = field(fields, &["cartn_x"]);
    let y_raw = field(fields, &["cartn_y"]);
    let z_raw = field(fields, &["cartn_z"]);
    if x_raw.is_empty() || y_raw.is_empty() || z_raw.is_empty() {
        return None;
    }
    let x = x_raw.parse::<f64>().ok()?;
    let y = y_raw.parse::<f64>().ok()?;
    let z = z_raw.parse::<f64>().ok()?;

    let residue_name = field(fields, &["label_comp_id", "auth_comp_id"]);
    let atom_label = field(fields, &["label_atom_id", "auth_atom_id", "type_symbol"]);

    let mut residue_number = field(fields, &["auth_seq_id", "label_seq_id"]).to_string();
    let insertion = field(fields, &["pdbx_pdb_ins_code"]);
    if !insertion.is_empty() && insertion != "." && insertion != "?" {
        residue_number.push_str(insertion);
    }

    let chain_id = field(fields, &["auth_asym_id", "label_asym_id"]);
    let record = field(fields, &["group_pdb"]);
    let record_kind = if record.is_empty() {
        RecordKind::Atom
    } else {
        RecordKind::from_field(record)
    };
    let element = field(fields, &["type_symbol"]).to_ascii_uppercase();

    Some(AtomRecord {
        x,
        y,
        z,
        residue_name: SmolStr::new(residue_name),
        atom_name: normalize_atom_name(atom_label),
        chain_id: SmolStr::new(chain_id),
        residue_number: SmolStr::new(residue_number),
        record_kind,
        element: SmolStr::new(element),
        source_line: ordinal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const NAMESPACED_DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<PDBx:datablock xmlns:PDBx="http://pdbml.pdb.org/schema/pdbx-v50.xsd">
  <PDBx:atom_siteCategory>
    <PDBx:atom_site id="1">
      <PDBx:group_PDB>ATOM</PDBx:group_PDB>
      <PDBx:label_atom_id>CA</PDBx:label_atom_id>
      <PDBx:label_comp_id>ALA</PDBx:label_comp_id>
      <PDBx:auth_asym_id>A</PDBx:auth_asym_id>
      <PDBx:auth_seq_id>1</PDBx:auth_seq_id>
      <PDBx:Cartn_x>11.618</PDBx:Cartn_x>
      <PDBx:Cartn_y>9.504</PDBx:Cartn_y>
      <PDBx:Cartn_z>12.279</PDBx:Cartn_z>
      <PDBx:type_symbol>C</PDBx:type_symbol>
    </PDBx:atom_site>
    <PDBx:atom_site id="2">
      <PDBx:group_PDB>HETATM</PDBx:group_PDB>
      <PDBx:label_atom_id>O</PDBx:label_atom_id>
      <PDBx:label_comp_id>HOH</PDBx:label_comp_id>
      <PDBx:auth_asym_id>A</PDBx:auth_asym_id>
      <PDBx:auth_seq_id>201</PDBx:auth_seq_id>
      <PDBx:Cartn_x>10.0</PDBx:Cartn_x>
      <PDBx:Cartn_y>20.0</PDBx:Cartn_y>
      <PDBx:Cartn_z>30.0</PDBx:Cartn_z>
      <PDBx:type_symbol>O</PDBx:type_symbol>
    </PDBx:atom_site>
  </PDBx:atom_siteCategory>
</PDBx:datablock>
"#;

    #[test]
    fn reads_namespaced_atom_site_elements() {
        let atoms = read(Cursor::new(NAMESPACED_DOC)).expect("read pdbml");
        assert_eq!(atoms.len(), 2);

        let ala = &atoms[0];
        assert_eq!(ala.residue_name, "ALA");
        assert_eq!(ala.atom_name, "CA");
        assert_eq!(ala.chain_id, "A");
        assert_eq!(ala.residue_number, "1");
        assert_eq!(ala.record_kind, RecordKind::Atom);
        assert!((ala.x - 11.618).abs() < 1e-9);

        assert_eq!(atoms[1].record_kind, RecordKind::Hetatm);
        assert_eq!(atoms[1].source_line, 2);
    }

    #[test]
    fn skips_elements_without_full_coordinates() {
        let text = r#"<root>
  <atom_site>
    <label_comp_id>LIG</label_comp_id>
    <Cartn_x>1.0</Cartn_x>
    <Cartn_y>2.0</Cartn_y>
  </atom_site>
  <atom_site>
    <label_comp_id>LIG</label_comp_id>
    <label_atom_id>C1</label_atom_id>
    <Cartn_x>1.0</Cartn_x>
    <Cartn_y>2.0</Cartn_y>
    <Cartn_z>3.0</Cartn_z>
  </atom_site>
</root>"#;
        let atoms = read(Cursor::new(text)).expect("read pdbml");
        assert_eq!(atoms.len(), 1);
        assert_eq!(atoms[0].atom_name, "C1");
    }

    #[test]
    fn falls_back_to_type_symbol_for_atom_label() {
        let text = r#"<root><atom_site>
  <label_comp_id>FE</label_comp_id>
  <type_symbol>FE</type_symbol>
  <Cartn_x>1.0</Cartn_x>
  <Cartn_y>2.0</Cartn_y>
  <Cartn_z>3.0</Cartn_z>
</atom_site></root>"#;
        let atoms = read(Cursor::new(text)).expect("read pdbml");
        assert_eq!(atoms[0].atom_name, "FE");
        assert_eq!(atoms[0].element, "FE");
    }

    #[test]
    fn malformed_xml_is_a_fatal_error() {
        let text = "<root><atom_site><Cartn_x>1.0</atom_site>";
        assert!(read(Cursor::new(text)).is_err());
    }

    #[test]
    fn record_kind_defaults_to_atom_when_group_is_absent() {
        let text = r#"<root><atom_site>
  <label_atom_id>CA</label_atom_id>
  <label_comp_id>GLY</label_comp_id>
  <Cartn_x>1.0</Cartn_x>
  <Cartn_y>2.0</Cartn_y>
  <Cartn_z>3.0</Cartn_z>
</atom_site></root>"#;
        let atoms = read(Cursor::new(text)).expect("read pdbml");
        assert_eq!(atoms[0].record_kind, RecordKind::Atom);
    }
}
