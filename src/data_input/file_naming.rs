// src/data_input/file_naming.rs

use std::path::Path;

/// Data file name for a device code and file number, e.g. `h1m_007.dat`.
pub fn make_filename(device: &str, filenum: u32) -> String {
    format!("{device}_{filenum:03}.dat")
}

/// File name without directories and without anything after the first dot.
pub fn file_stem_label(filename: &str) -> String {
    let name = Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());
    name.split('.').next().unwrap_or_default().to_string()
}

/// Whether a table key refers to `filename` (full name or stem).
pub fn matches_file(key: &str, filename: &str) -> bool {
    let key = key.trim();
    if key.is_empty() {
        return false;
    }
    key == filename || file_stem_label(key) == file_stem_label(filename)
}

/// Root name used for output images built from several files.
pub fn figure_root_name(device: &str, filenums: &[u32]) -> String {
    match (filenums.first(), filenums.last()) {
        (Some(first), Some(last)) if first != last => format!("{device}_{first:03}-{last:03}"),
        (Some(first), _) => format!("{device}_{first:03}"),
        _ => device.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_filename() {
        assert_eq!(make_filename("h1m", 7), "h1m_007.dat");
        assert_eq!(make_filename("NMR", 1234), "NMR_1234.dat");
    }

    #[test]
    fn test_stem_label() {
        assert_eq!(file_stem_label("data/h1m_007.dat"), "h1m_007");
        assert_eq!(file_stem_label("a.b.c"), "a");
        assert_eq!(file_stem_label("plain"), "plain");
    }

    #[test]
    fn test_matches_file() {
        assert!(matches_file("h1m_007", "runs/h1m_007.dat"));
        assert!(matches_file("h1m_007.dat", "h1m_007.dat"));
        assert!(!matches_file("h1m_008", "h1m_007.dat"));
        assert!(!matches_file("", "h1m_007.dat"));
    }

    #[test]
    fn test_figure_root_name() {
        assert_eq!(figure_root_name("h1m", &[1, 2, 5]), "h1m_001-005");
        assert_eq!(figure_root_name("h1m", &[3]), "h1m_003");
        assert_eq!(figure_root_name("h1m", &[]), "h1m");
    }
}
