mod error;
mod mmcif;
mod pdb;
mod pdbml;
mod source;

pub use pdb::reader::read as read_pdb_atoms;

pub use mmcif::reader::read as read_mmcif_atoms;

pub use pdbml::reader::read as read_pdbml_atoms;

pub use source::{StructureFormat, is_gzip_path, open_source};

pub use error::Error;
