//! File listing and natural-order sorting helpers.

use crate::error::Result;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

/// Compares strings in natural order: runs of digits compare as integers,
/// everything else compares lexicographically.
pub fn natural_less(a: &str, b: &str) -> Ordering {
    let chunks_a = chunked(a);
    let chunks_b = chunked(b);
    for (ca, cb) in chunks_a.iter().zip(chunks_b.iter()) {
        if ca == cb {
            continue;
        }
        return match (ca.parse::<u64>(), cb.parse::<u64>()) {
            (Ok(na), Ok(nb)) => na.cmp(&nb),
            _ => ca.cmp(cb),
        };
    }
    chunks_a.len().cmp(&chunks_b.len())
}

/// Sorts paths in natural order of their string form.
pub fn natural_sort(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| natural_less(&a.to_string_lossy(), &b.to_string_lossy()));
}

fn chunked(s: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut digits = None;
    for (i, c) in s.char_indices() {
        let d = c.is_ascii_digit();
        if digits.is_some() && digits != Some(d) {
            chunks.push(&s[start..i]);
            start = i;
        }
        digits = Some(d);
    }
    if start < s.len() {
        chunks.push(&s[start..]);
    }
    chunks
}

/// Lists the regular files directly under `dir`, naturally sorted.
pub fn list_file_paths(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            paths.push(entry.path());
        }
    }
    natural_sort(&mut paths);
    Ok(paths)
}

/// Base file name of a path as a string.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_chunks_compare_as_integers() {
        let mut v: Vec<PathBuf> = ["img10.png", "img2.png", "img1.png"]
            .iter()
            .map(PathBuf::from)
            .collect();
        natural_sort(&mut v);
        let names: Vec<_> = v.iter().map(|p| p.to_string_lossy().into_owned()).collect();
        assert_eq!(names, ["img1.png", "img2.png", "img10.png"]);
    }

    #[test]
    fn mixed_prefixes_fall_back_to_lexicographic() {
        assert_eq!(natural_less("a2", "b1"), Ordering::Less);
        assert_eq!(natural_less("sprite", "sprite1"), Ordering::Less);
        assert_eq!(natural_less("a01", "a1"), Ordering::Equal);
    }
}
