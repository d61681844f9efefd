use std::path::{Path, PathBuf};

/// The directory holding `.studio/`: `--root`/`STUDIO_ROOT` if given, else the
/// nearest ancestor of the working directory that has one, else the working
/// directory itself (so `studio init` creates it there).
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_upward(&cwd).unwrap_or(cwd)
}

fn find_upward(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(studio_core::paths::STUDIO_DIR).is_dir())
        .map(Path::to_path_buf)
}
