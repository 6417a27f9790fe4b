use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

/// Absolute paths are kept. Relative or missing names resolve against the
/// current working directory, falling back to `default_name`.
pub fn resolve_in_working_dir(
    file_name: Option<&Path>,
    default_name: &str,
    purpose: &str,
) -> io::Result<PathBuf> {
    if let Some(path) = file_name.filter(|path| path.is_absolute()) {
        return Ok(path.to_path_buf());
    }
    let root_dir = std::env::current_dir()?;
    info!(dir = %root_dir.display(), purpose, "resolving file against working directory");
    let name = match file_name {
        Some(name) if !name.as_os_str().is_empty() => name.to_path_buf(),
        _ => PathBuf::from(default_name),
    };
    Ok(root_dir.join(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_path_is_kept() {
        let absolute = std::env::temp_dir().join("out.txt");
        let resolved = resolve_in_working_dir(Some(&absolute), "default.txt", "test").unwrap();
        assert_eq!(resolved, absolute);
    }

    #[test]
    fn missing_name_falls_back_to_default_in_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            resolve_in_working_dir(None, "default.txt", "test").unwrap(),
            cwd.join("default.txt")
        );
        assert_eq!(
            resolve_in_working_dir(Some(Path::new("sub/x.txt")), "default.txt", "test").unwrap(),
            cwd.join("sub/x.txt")
        );
    }
}
