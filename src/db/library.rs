//! Atom-type pattern library backed by the `atmtypenumbers` table.
//!
//! The table carries two record shapes: `radius` lines binding a type id to
//! explicit and united-atom radius values, and pattern lines binding a
//! residue/atom name pair to a type id. Pattern order is load-bearing: rules
//! are evaluated in declaration order and the first match wins, which is how
//! the table expresses overrides. Replacing the ordered scan with a keyed
//! lookup would change which radius wins for overlapping patterns.

use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Radius text used when an id has no radius entry or no pattern matches.
pub const FALLBACK_RADIUS: &str = "0.01";

#[derive(Debug, Error)]
pub enum Error {
    #[error("atom-type table '{path}' could not be read: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid radius entry in '{path}' line {line_number}: {details}")]
    InvalidRadius {
        path: PathBuf,
        line_number: usize,
        details: String,
    },

    #[error("invalid pattern entry in '{path}' line {line_number}: {details}")]
    InvalidPattern {
        path: PathBuf,
        line_number: usize,
        details: String,
    },

    #[error(
        "unable to locate an atom-type table; searched the --table override, \
         the XYZRFORGE_TABLE environment variable, the executable directory, \
         and the working directory"
    )]
    TableNotFound,
}

/// Recoverable problem noticed while loading: a pattern references a type id
/// that never received a `radius` entry. The id is given the fallback radius
/// and loading continues, so one pass over the diagnostics shows every gap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    pub line_number: usize,
    pub residue_pattern: String,
    pub atom_pattern: String,
    pub type_id: String,
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "entry {} {} {} has no corresponding radius value (line {})",
            self.residue_pattern, self.atom_pattern, self.type_id, self.line_number
        )
    }
}

#[derive(Debug)]
struct AtomTypePattern {
    residue: Regex,
    atom: Regex,
    type_id: String,
}

/// Loaded radius data plus the ordered residue/atom matching rules.
#[derive(Debug)]
pub struct AtomTypeLibrary {
    path: PathBuf,
    explicit_radii: HashMap<String, String>,
    united_radii: HashMap<String, String>,
    patterns: Vec<AtomTypePattern>,
    warnings: Vec<LoadWarning>,
}

impl AtomTypeLibrary {
    /// Loads a table from disk. Malformed radius or pattern entries are fatal;
    /// a pattern referencing an undefined id is collected as a [`LoadWarning`]
    /// instead so the caller can report every gap in one pass.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut library = Self {
            path: path.to_path_buf(),
            explicit_radii: HashMap::new(),
            united_radii: HashMap::new(),
            patterns: Vec::new(),
            warnings: Vec::new(),
        };

        for (index, raw_line) in text.lines().enumerate() {
            let line_number = index + 1;
            let line = raw_line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields[0] == "radius" {
                library.add_radius(&fields, line_number)?;
            } else {
                library.add_pattern(&fields, line_number)?;
            }
        }

        Ok(library)
    }

    /// Path the table was loaded from, for diagnostics.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Recoverable problems noticed while loading, in file order.
    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Resolves a (residue, atom) pair to a type id and radius text.
    ///
    /// Patterns are scanned in declaration order; the first rule whose atom
    /// and residue expressions both match the whole name wins. When nothing
    /// matches, `(None, FALLBACK_RADIUS)` is returned and the caller decides
    /// how to report it — resolution itself never fails.
    pub fn resolve(&self, residue_name: &str, atom_name: &str, use_united: bool) -> (Option<&str>, &str) {
        for pattern in &self.patterns {
            if pattern.atom.is_match(atom_name) && pattern.residue.is_match(residue_name) {
                let table = if use_united {
                    &self.united_radii
                } else {
                    &self.explicit_radii
                };
                let radius = table
                    .get(&pattern.type_id)
                    .map(String::as_str)
                    .unwrap_or(FALLBACK_RADIUS);
                return (Some(pattern.type_id.as_str()), radius);
            }
        }
        (None, FALLBACK_RADIUS)
    }

    /// `radius <id> <label> <explicit> [<united>]` — the label field is kept
    /// for humans and never interpreted. The explicit value must be numeric;
    /// a missing or non-numeric united value falls back to the explicit text.
    fn add_radius(&mut self, fields: &[&str], line_number: usize) -> Result<(), Error> {
        if fields.len() < 4 {
            return Err(Error::InvalidRadius {
                path: self.path.clone(),
                line_number,
                details: format!("expected at least 4 fields, found {}", fields.len()),
            });
        }

        let type_id = fields[1];
        let explicit = fields[3];
        if explicit.parse::<f64>().is_err() {
            return Err(Error::InvalidRadius {
                path: self.path.clone(),
                line_number,
                details: format!("explicit radius '{}' is not numeric", explicit),
            });
        }

        let united = match fields.get(4) {
            Some(value) if value.parse::<f64>().is_ok() => value,
            _ => &explicit,
        };

        self.explicit_radii
            .insert(type_id.to_string(), explicit.to_string());
        self.united_radii
            .insert(type_id.to_string(), united.to_string());
        Ok(())
    }

    /// `<residue-pattern> <atom-pattern> <id>` — `*` as the residue pattern
    /// means "match anything" and `_` in the atom pattern is a literal space.
    /// Both fields compile to anchored whole-string matchers.
    fn add_pattern(&mut self, fields: &[&str], line_number: usize) -> Result<(), Error> {
        if fields.len() < 3 {
            return Err(Error::InvalidPattern {
                path: self.path.clone(),
                line_number,
                details: format!("expected at least 3 fields, found {}", fields.len()),
            });
        }

        let residue_text = if fields[0] == "*" { ".*" } else { fields[0] };
        let atom_text = fields[1].replace('_', " ");

        let residue = compile_anchored(residue_text, &self.path, line_number)?;
        let atom = compile_anchored(&atom_text, &self.path, line_number)?;

        let type_id = fields[2].to_string();
        if !self.explicit_radii.contains_key(&type_id) {
            self.warnings.push(LoadWarning {
                line_number,
                residue_pattern: fields[0].to_string(),
                atom_pattern: fields[1].to_string(),
                type_id: type_id.clone(),
            });
            self.explicit_radii
                .entry(type_id.clone())
                .or_insert_with(|| FALLBACK_RADIUS.to_string());
            self.united_radii
                .entry(type_id.clone())
                .or_insert_with(|| FALLBACK_RADIUS.to_string());
        }

        self.patterns.push(AtomTypePattern {
            residue,
            atom,
            type_id,
        });
        Ok(())
    }
}

fn compile_anchored(pattern: &str, path: &Path, line_number: usize) -> Result<Regex, Error> {
    Regex::new(&format!("^{}$", pattern)).map_err(|e| Error::InvalidPattern {
        path: path.to_path_buf(),
        line_number,
        details: format!("'{}' is not a valid pattern: {}", pattern, e),
    })
}
