//! Recursive discovery of font and background files.
use crate::error::{Result, SynthError};
use image::ImageFormat;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const FONT_EXTENSIONS: &[&str] = &[".ttf", ".otf"];

/// Files under `dir` whose name ends with one of `extensions`, compared
/// case-insensitively. Results are sorted for reproducible sampling.
pub fn list_files(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let wanted: Vec<String> = extensions.iter().map(|e| e.to_lowercase()).collect();
    let mut out = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
            SynthError::io(path, source)
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if wanted.iter().any(|ext| name.ends_with(ext.as_str())) {
            out.push(entry.into_path());
        }
    }
    out.sort();
    Ok(out)
}

pub fn find_fonts(dir: &Path) -> Result<Vec<PathBuf>> {
    list_files(dir, FONT_EXTENSIONS)
}

/// Every extension the `image` crate can decode, with a leading dot.
pub fn image_extensions() -> Vec<String> {
    ImageFormat::all()
        .filter(|f| f.reading_enabled())
        .flat_map(|f| f.extensions_str().iter())
        .map(|ext| format!(".{ext}"))
        .collect()
}

pub fn find_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let exts = image_extensions();
    let refs: Vec<&str> = exts.iter().map(String::as_str).collect();
    list_files(dir, &refs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn matches_extensions_case_insensitively_and_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("Sans.TTF"), b"").unwrap();
        fs::write(nested.join("serif.otf"), b"").unwrap();
        fs::write(nested.join("notes.txt"), b"").unwrap();

        let fonts = find_fonts(dir.path()).unwrap();
        let names: Vec<String> = fonts
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"Sans.TTF".to_string()));
        assert!(names.contains(&"serif.otf".to_string()));
    }

    #[test]
    fn image_discovery_uses_codec_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bg.PNG"), b"").unwrap();
        fs::write(dir.path().join("bg.jpeg"), b"").unwrap();
        fs::write(dir.path().join("readme.md"), b"").unwrap();
        assert_eq!(find_images(dir.path()).unwrap().len(), 2);
    }

    #[test]
    fn missing_directory_is_an_error() {
        assert!(list_files(Path::new("/definitely/not/here"), &[".ttf"]).is_err());
    }
}
