pub mod atom;
pub mod residue;
pub mod types;
