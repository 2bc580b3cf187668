//! Custom assertions for archived output directories

use serde_json::Value;
use std::path::Path;

/// Documents written next to every manifest
pub const DOCUMENTS: [&str; 3] = ["README.md", "COMMENTS.md", "LICENSE.md"];

/// Top-level keys of every manifest
pub const MANIFEST_KEYS: [&str; 6] = ["thing", "files", "images", "derivatives", "makes", "comments"];

/// Assert that `dir` has the complete archive layout
pub fn assert_archive_layout(dir: &Path) {
    assert!(dir.is_dir(), "archive directory {} missing", dir.display());
    assert!(dir.join("files").is_dir(), "files/ missing in {}", dir.display());
    assert!(dir.join("images").is_dir(), "images/ missing in {}", dir.display());
    for doc in DOCUMENTS {
        assert!(dir.join(doc).is_file(), "{doc} missing in {}", dir.display());
    }

    let manifest = read_manifest(dir);
    for key in MANIFEST_KEYS {
        assert!(manifest.get(key).is_some(), "manifest key {key} missing");
    }
}

/// Parse `dir/metadata.json`
pub fn read_manifest(dir: &Path) -> Value {
    let bytes = std::fs::read(dir.join("metadata.json"))
        .unwrap_or_else(|e| panic!("cannot read manifest in {}: {e}", dir.display()));
    serde_json::from_slice(&bytes).unwrap_or_else(|e| panic!("invalid manifest JSON: {e}"))
}

/// Assert that no `*.part` file is left anywhere under `dir`
pub fn assert_no_partial_files(dir: &Path) {
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in std::fs::read_dir(&current).unwrap_or_else(|e| panic!("{e}")) {
            let path = entry.unwrap_or_else(|e| panic!("{e}")).path();
            if path.is_dir() {
                pending.push(path);
            } else {
                assert!(
                    path.extension().is_none_or(|ext| ext != "part"),
                    "partial file left behind: {}",
                    path.display()
                );
            }
        }
    }
}
