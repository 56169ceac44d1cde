//! Location of bundled runtime data (sample documents and `palaver.toml`).

use std::env;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Name of the engine configuration file inside the data directory.
pub const CONFIG_FILE: &str = "palaver.toml";

/// Cached path to the directory containing the engine's runtime data files.
static DATA_ROOT: LazyLock<PathBuf> = LazyLock::new(detect_data_root);

/// Construct a data path relative to the resolved data root.
pub fn data_path(relative: impl AsRef<Path>) -> PathBuf {
    DATA_ROOT.join(relative)
}

/// Default location of the engine configuration file.
pub fn default_config_path() -> PathBuf {
    data_path(CONFIG_FILE)
}

/// Resolve the most likely location of the runtime data directory.
fn detect_data_root() -> PathBuf {
    let exe_dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));

    candidate_roots(exe_dir.as_deref())
        .into_iter()
        .find(|candidate| candidate.is_dir())
        .unwrap_or_else(|| PathBuf::from("palaver_engine/data"))
}

/// Workspace layout first, then a flattened `data/`, then the same two beside the executable.
fn candidate_roots(exe_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from("palaver_engine/data"), PathBuf::from("data")];

    if let Some(dir) = exe_dir {
        candidates.push(dir.join("palaver_engine/data"));
        candidates.push(dir.join("data"));

        if let Some(parent) = dir.parent() {
            candidates.push(parent.join("palaver_engine/data"));
            candidates.push(parent.join("data"));
        }
    }
    candidates
}
