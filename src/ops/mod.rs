mod classify;
mod convert;
mod filter;

pub use classify::classify_residues;
pub use convert::{ConvertConfig, convert};
pub use filter::{FilterConfig, is_excluded};
