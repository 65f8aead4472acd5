use crate::io::error::Error;
use crate::model::atom::{AtomRecord, normalize_atom_name};
use crate::model::types::RecordKind;
use smol_str::SmolStr;
use std::collections::HashMap;
use std::io::BufRead;

/// Alias chains consulted per field, in priority order. Cells holding `.` or
/// `?` count as absent and fall through to the next candidate.
const RESIDUE_TAGS: &[&str] = &["_atom_site.label_comp_id", "_atom_site.auth_comp_id"];
const ATOM_TAGS: &[&str] = &["_atom_site.label_atom_id", "_atom_site.auth_atom_id"];
const SEQ_TAGS: &[&str] = &["_atom_site.auth_seq_id", "_atom_site.label_seq_id"];
const CHAIN_TAGS: &[&str] = &["_atom_site.auth_asym_id", "_atom_site.label_asym_id"];
const COORD_TAGS: &[&str] = &[
    "_atom_site.cartn_x",
    "_atom_site.cartn_y",
    "_atom_site.cartn_z",
];

/// Decodes mmCIF text into a flat atom-record list.
///
/// The grammar is not line-local (logical rows span physical lines), so the
/// whole document is buffered before scanning. Every `_atom_site` loop in
/// the file contributes to one atom set; loops describing other categories
/// are skipped wholesale. A loop that declares atom sites but lacks any of
/// the three Cartesian coordinate tags is a fatal format error, while a data
/// row whose token count does not match the column count is dropped and
/// parsing continues with the next row.
pub fn read<R: BufRead>(mut reader: R) -> Result<Vec<AtomRecord>, Error> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| Error::from_io(e, None))?;
    parse(&text)
}

fn parse(text: &str) -> Result<Vec<AtomRecord>, Error> {
    let lines: Vec<&str> = text.lines().collect();
    let mut atoms = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let trimmed = lines[i].trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || !trimmed.eq_ignore_ascii_case("loop_")
        {
            i += 1;
            continue;
        }
        i += 1;

        let mut tags: Vec<String> = Vec::new();
        while i < lines.len() {
            let current = lines[i].trim();
            if current.is_empty() || current.starts_with('#') {
                i += 1;
                continue;
            }
            if current.starts_with('_') {
                tags.push(current.to_ascii_lowercase());
                i += 1;
                continue;
            }
            break;
        }
        if tags.is_empty() {
            continue;
        }

        if !tags.iter().any(|tag| tag.starts_with("_atom_site.")) {
            i = skip_data_rows(&lines, i);
            continue;
        }

        let tag_index: HashMap<&str, usize> = tags
            .iter()
            .enumerate()
            .map(|(idx, tag)| (tag.as_str(), idx))
            .collect();

        let missing: Vec<&str> = COORD_TAGS
            .iter()
            .copied()
            .filter(|tag| !tag_index.contains_key(tag))
            .collect();
        if !missing.is_empty() {
            return Err(Error::parse(
                "mmCIF",
                None,
                i + 1,
                format!(
                    "_atom_site loop is missing required columns ({})",
                    missing.join(", ")
                ),
            ));
        }

        while i < lines.len() {
            let current = lines[i].trim();
            if current.is_empty() || current.starts_with('#') {
                i += 1;
                continue;
            }
            if is_section_boundary(current) {
                break;
            }

            let row_start = i;
            let (values, consumed) = collect_row(&lines, i, tags.len());
            i = row_start + consumed;

            if values.len() != tags.len() {
                continue;
            }
            if let Some(atom) = row_to_atom(&values, &tag_index, row_start + 1) {
                atoms.push(atom);
            }
        }
    }

    Ok(atoms)
}

fn is_section_boundary(trimmed: &str) -> bool {
    let lower = trimmed.to_ascii_lowercase();
    trimmed.starts_with('_') || lower.starts_with("loop_") || lower.starts_with("data_")
}

fn skip_data_rows(lines: &[&str], mut i: usize) -> usize {
    while i < lines.len() {
        let current = lines[i].trim();
        if current.is_empty() || current.starts_with('#') {
            i += 1;
            continue;
        }
        if is_section_boundary(current) {
            break;
        }
        i += 1;
    }
    i
}

/// Collects one logical row, spanning physical lines until the running token
/// count reaches the declared column count or a section boundary interrupts.
fn collect_row(lines: &[&str], start: usize, expected: usize) -> (Vec<String>, usize) {
    let mut values = Vec::new();
    let mut idx = start;
    let mut consumed = 0;

    while idx < lines.len() {
        let trimmed = lines[idx].trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            if consumed == 0 {
                idx += 1;
                consumed += 1;
                continue;
            }
            break;
        }
        if consumed > 0 && is_section_boundary(trimmed) {
            break;
        }
        values.extend(tokenize(trimmed));
        consumed += 1;
        idx += 1;
        if values.len() >= expected {
            break;
        }
    }

    if consumed == 0 {
        consumed = 1;
    }
    (values, consumed)
}

/// Whitespace tokenizer with CIF quoting: a quote opens a token only at the
/// token start, so primed atom names such as `O2'` stay literal.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quote: Option<char> = None;

    for c in line.chars() {
        match in_quote {
            Some(q) => {
                if c == q {
                    in_quote = None;
                } else {
                    current.push(c);
                }
            }
            None => {
                if c.is_whitespace() {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                } else if (c == '\'' || c == '"') && current.is_empty() {
                    in_quote = Some(c);
                } else {
                    current.push(c);
                }
            }
        }
    }
    if !current.is_empty() || in_quote.is_some() {
        tokens.push(current);
    }
    tokens
}

fn cell<'a>(values: &'a [String], tag_index: &HashMap<&str, usize>, candidates: &[&str]) -> &'a str {
    for tag in candidates {
        if let Some(&idx) = tag_index.get(tag) {
            let value = values[idx].as_str();
            if value != "." && value != "?" {
                return value;
            }
        }
    }
    ""
}

fn row_to_atom(
    values: &[String],
    tag_index: &HashMap<&str, usize>,
    line_number: usize,
) -> Option<AtomRecord> {
    let x_raw = cell(values, tag_index, &[COORD_TAGS[0]]);
    let y_raw = cell(values, tag_index, &[COORD_TAGS[1]]);
    let z_raw = cell(values, tag_index, &[COORD_TAGS[2]]);
    if x_raw.is_empty() || y_raw.is_empty() || z_raw.is_empty() {
        return None;
    }
    let x = x_raw.parse::<f64>().ok()?;
    let y = y_raw.parse::<f64>().ok()?;
    let z = z_raw.parse::<f64>().ok()?;

    let residue_name = cell(values, tag_index, RESIDUE_TAGS);
    let mut atom_label = cell(values, tag_index, ATOM_TAGS);
    if atom_label.is_empty() {
        atom_label = cell(values, tag_index, &["_atom_site.type_symbol"]);
    }

    let mut residue_number = cell(values, tag_index, SEQ_TAGS).to_string();
    let insertion = cell(values, tag_index, &["_atom_site.pdbx_pdb_ins_code"]);
    if !insertion.is_empty() {
        residue_number.push_str(insertion);
    }

    let chain_id = cell(values, tag_index, CHAIN_TAGS);
    let record = cell(values, tag_index, &["_atom_site.group_pdb"]);
    let record_kind = if record.is_empty() {
        RecordKind::Atom
    } else {
        RecordKind::from_field(record)
    };
    let element = cell(values, tag_index, &["_atom_site.type_symbol"]).to_ascii_uppercase();

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
        source_line: line_number,
    })
}
