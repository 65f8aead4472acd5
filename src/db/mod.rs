mod library;
mod locate;

pub use library::{AtomTypeLibrary, Error, FALLBACK_RADIUS, LoadWarning};
pub use locate::{TABLE_ENV_VAR, TABLE_FILE_NAME, locate_table};
