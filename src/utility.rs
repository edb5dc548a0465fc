use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn find_files_with_extension<P: AsRef<Path>>(dir: P, ext: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(ext) {
            files.push(path.to_path_buf());
        }
    }
    // shard order must be stable across runs
    files.sort();
    Ok(files)
}
