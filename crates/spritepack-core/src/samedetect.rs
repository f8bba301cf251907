//! Identical-image detection: inputs are grouped by byte length, then by MD5
//! digest within each group. The first path of each equivalence class in
//! input order stays canonical; duplicates are recorded and replayed into the
//! descriptor after packing.

use crate::error::Result;
use crate::util::base_name;
use md5::{Digest, Md5};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Duplicate bookkeeping for one pack call.
///
/// Invariant: the maps are inverses of each other; every key of
/// `dupe_to_base` appears in exactly one `base_to_dupes` value list.
#[derive(Debug, Clone, Default)]
pub struct SameDetectInfo {
    /// duplicate file name -> canonical file name
    pub dupe_to_base: HashMap<String, String>,
    /// canonical file name -> duplicate file names, in input order
    pub base_to_dupes: HashMap<String, Vec<String>>,
}

impl SameDetectInfo {
    pub fn is_duplicate(&self, file_name: &str) -> bool {
        self.dupe_to_base.contains_key(file_name)
    }
}

/// Partitions `paths` into unique representatives and duplicate mappings.
/// Input order (natural sort order) is preserved; the first member of each
/// byte-identical class is kept.
pub fn find_duplicates(paths: &[PathBuf]) -> Result<(Vec<PathBuf>, SameDetectInfo)> {
    let mut size_counts: HashMap<u64, usize> = HashMap::new();
    let mut sizes = Vec::with_capacity(paths.len());
    for path in paths {
        let len = fs::metadata(path)?.len();
        *size_counts.entry(len).or_default() += 1;
        sizes.push(len);
    }

    let mut unique = Vec::with_capacity(paths.len());
    let mut info = SameDetectInfo::default();
    let mut canonical: HashMap<(u64, String), String> = HashMap::new();
    for (path, len) in paths.iter().zip(sizes) {
        if size_counts[&len] == 1 {
            unique.push(path.clone());
            continue;
        }
        let digest = match md5_file(path) {
            Ok(d) => d,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unhashable file");
                continue;
            }
        };
        match canonical.entry((len, digest)) {
            Entry::Vacant(slot) => {
                slot.insert(base_name(path));
                unique.push(path.clone());
            }
            Entry::Occupied(slot) => {
                let base = slot.get().clone();
                let dupe = base_name(path);
                info.dupe_to_base.insert(dupe.clone(), base.clone());
                info.base_to_dupes.entry(base).or_default().push(dupe);
            }
        }
    }
    Ok((unique, info))
}

fn md5_file(path: &Path) -> io::Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Md5::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn identical_files_map_to_first_seen() {
        let dir = tempfile::tempdir().unwrap();
        let mk = |name: &str, bytes: &[u8]| {
            let p = dir.path().join(name);
            fs::write(&p, bytes).unwrap();
            p
        };
        let paths = vec![
            mk("a.png", b"same-bytes"),
            mk("b.png", b"same-bytes"),
            mk("c.png", b"same-bytes"),
            mk("d.png", b"different"),
        ];
        let (unique, info) = find_duplicates(&paths).unwrap();
        let names: Vec<_> = unique.iter().map(|p| base_name(p)).collect();
        assert_eq!(names, ["a.png", "d.png"]);
        assert_eq!(info.base_to_dupes["a.png"], vec!["b.png", "c.png"]);
        assert_eq!(info.dupe_to_base["b.png"], "a.png");
        assert_eq!(info.dupe_to_base["c.png"], "a.png");
        assert!(!info.is_duplicate("a.png"));
        assert!(info.is_duplicate("c.png"));
    }

    #[test]
    fn same_length_different_bytes_stay_unique() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.bin");
        let b = dir.path().join("b.bin");
        fs::write(&a, b"0123456789").unwrap();
        fs::write(&b, b"9876543210").unwrap();
        let (unique, info) = find_duplicates(&[a, b]).unwrap();
        assert_eq!(unique.len(), 2);
        assert!(info.dupe_to_base.is_empty());
        assert!(info.base_to_dupes.is_empty());
    }
}
