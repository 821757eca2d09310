use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Turns an event name into a single path component.
pub fn sanitize_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    match cleaned.trim() {
        "" | "." | ".." => "_".to_string(),
        trimmed => trimmed.to_string(),
    }
}

pub fn create_path_with_extension(base_path: &Path, expected_ext: &str) -> PathBuf {
    if base_path.extension().is_some_and(|ext| ext == expected_ext) {
        base_path.to_path_buf()
    } else {
        base_path.with_extension(expected_ext)
    }
}

pub fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory {}", parent.display()))?;
    }
    fs::write(path, data).with_context(|| format!("Cannot write {}", path.display()))?;
    log::trace!("Wrote {} bytes to {}", data.len(), path.display());

    Ok(())
}

/// Writes next to `path` first and renames over it, so a failed write leaves
/// the original intact.
pub fn replace_file(path: &Path, data: &[u8]) -> Result<()> {
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    write_file(&temp_path, data)?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e).with_context(|| format!("Cannot replace {}", path.display()));
    }

    Ok(())
}

#[test]
fn test_sanitize_component() {
    assert_eq!(sanitize_component("Play_Music"), "Play_Music");
    assert_eq!(sanitize_component("sfx/hit:1"), "sfx_hit_1");
    assert_eq!(sanitize_component(".."), "_");
    assert_eq!(sanitize_component("  "), "_");
}

#[test]
fn test_create_path_with_extension() {
    assert_eq!(
        create_path_with_extension(Path::new("out/1234.wem"), "ogg"),
        PathBuf::from("out/1234.ogg")
    );
    assert_eq!(
        create_path_with_extension(Path::new("a.ogg"), "ogg"),
        PathBuf::from("a.ogg")
    );
}
