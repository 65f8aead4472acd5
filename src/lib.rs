//! # xyzr-forge
//!
//! **xyzr-forge** converts experimental macromolecular structure files into the
//! flat xyzr records (x, y, z, radius) consumed by molecular-surface and
//! volume calculators. The crate favors deterministic two-pass processing,
//! strong typing, and clean error surfaces so conversion pipelines remain
//! auditable from parsing to emission.
//!
//! ## Features
//!
//! - **Multi-format extraction** – Buffered readers for fixed-column PDB,
//!   mmCIF `loop_` tables, and PDBML documents decode into one uniform
//!   [`AtomRecord`] stream, with transparent gzip decompression.
//! - **Residue classification** – Atoms aggregate into [`ResidueInfo`]
//!   entries whose water/ion/amino/nucleic/ligand flags derive from
//!   residue-complete evidence, including the inherited single-atom ion
//!   heuristic.
//! - **Declarative radius assignment** – The `atmtypenumbers` table compiles
//!   into an ordered, first-match-wins pattern list with explicit and
//!   united-atom radius values and a diagnostic-backed fallback.
//! - **Compositional filtering** – Six independent residue-class exclusions
//!   combine freely; filtering is a pure predicate over classification.

mod model;

pub mod db;
pub mod io;
pub mod ops;

pub use model::atom::{AtomRecord, normalize_atom_name};
pub use model::residue::{ResidueInfo, ResidueKey};
pub use model::types::RecordKind;

pub use ops::{ConvertConfig, FilterConfig, classify_residues, convert, is_excluded};
