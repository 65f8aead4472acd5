//! Resolution of the `atmtypenumbers` table location.

use super::library::Error;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable consulted when no explicit override is given.
pub const TABLE_ENV_VAR: &str = "XYZRFORGE_TABLE";

/// Default file name searched beside the executable and in the working
/// directory.
pub const TABLE_FILE_NAME: &str = "atmtypenumbers";

/// Locates the atom-type table. Candidates are tried in priority order: the
/// explicit override, `$XYZRFORGE_TABLE`, a file beside the executable, then
/// one in the working directory. The first existing file wins; if none
/// exists the run cannot proceed and [`Error::TableNotFound`] is returned.
pub fn locate_table(override_path: Option<&Path>) -> Result<PathBuf, Error> {
    let mut candidates: Vec<PathBuf> = Vec::new();

    if let Some(path) = override_path {
        candidates.push(path.to_path_buf());
    }
    if let Some(value) = env::var_os(TABLE_ENV_VAR) {
        if !value.is_empty() {
            candidates.push(PathBuf::from(value));
        }
    }
    if let Some(exe_dir) = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(exe_dir.join(TABLE_FILE_NAME));
    }
    if let Ok(cwd) = env::current_dir() {
        candidates.push(cwd.join(TABLE_FILE_NAME));
    }

    candidates
        .into_iter()
        .find(|candidate| candidate.is_file())
        .ok_or(Error::TableNotFound)
}
