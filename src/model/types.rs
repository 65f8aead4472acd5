use std::fmt;

/// Record classification carried by every decoded atom.
///
/// PDB sources only ever produce `Atom` or `Hetatm`; mmCIF and PDBML sources
/// may carry arbitrary `group_PDB` values, which map to `Other` so the
/// classifier can still distinguish "not a polymer record" from "explicitly a
/// heteroatom record".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Atom,
    Hetatm,
    Other,
}

impl RecordKind {
    /// Maps a raw record field (`ATOM`, `HETATM`, anything else) to a kind.
    pub fn from_field(field: &str) -> Self {
        let trimmed = field.trim();
        if trimmed.eq_ignore_ascii_case("ATOM") {
            RecordKind::Atom
        } else if trimmed.eq_ignore_ascii_case("HETATM") {
            RecordKind::Hetatm
        } else {
            RecordKind::Other
        }
    }

    pub fn is_atom(self) -> bool {
        self == RecordKind::Atom
    }

    pub fn is_hetatm(self) -> bool {
        self == RecordKind::Hetatm
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Atom => "ATOM",
            RecordKind::Hetatm => "HETATM",
            RecordKind::Other => "OTHER",
        };
        write!(f, "{}", name)
    }
}
