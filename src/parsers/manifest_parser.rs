use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use log::debug;
use serde::Deserialize;

use crate::error::{ProfileError, Result};

/// One sample in a run: an annotation table and the display name of the
/// sample it belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    pub file: PathBuf,
    pub sample: String,
}

/// Read a tab-separated manifest with a `file` and a `sample` column.
///
/// `#`-prefixed lines are comments. Order is preserved: it determines the
/// column order of the merged count table and of the rendered chart.
pub fn read_manifest(path: impl AsRef<Path>) -> Result<Vec<ManifestEntry>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .comment(Some(b'#'))
        .from_path(path)?;

    let entries = reader
        .deserialize()
        .collect::<std::result::Result<Vec<ManifestEntry>, csv::Error>>()?;

    if entries.is_empty() {
        return Err(ProfileError::EmptyManifest(path.to_path_buf()));
    }

    debug!("manifest {} lists {} samples", path.display(), entries.len());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_entries_in_order() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# annotation tables, one sample per row").unwrap();
        writeln!(file, "file\tsample").unwrap();
        writeln!(file, "data/well1.tabular\tWell 1").unwrap();
        writeln!(file, "data/well2.tabular\tWell 2").unwrap();

        let entries = read_manifest(file.path()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].file, PathBuf::from("data/well1.tabular"));
        assert_eq!(entries[0].sample, "Well 1");
        assert_eq!(entries[1].sample, "Well 2");
    }

    #[test]
    fn empty_manifest_is_fatal() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "file\tsample").unwrap();

        let err = read_manifest(file.path()).unwrap_err();
        assert!(matches!(err, ProfileError::EmptyManifest(_)));
    }
}
