use std::fs::File;
use std::path::Path;

use compact_str::CompactString;
use csv::{Reader, ReaderBuilder, StringRecord};
use log::debug;

use crate::error::{ProfileError, Result};

/// Fixed column positions inside an eggNOG-mapper annotation table.
///
/// The positions are a schema contract with the annotation tool, not
/// re-derivable from the file itself: every line starting with `#` is a
/// comment, including the header line.
#[derive(Debug, Clone, Copy)]
pub struct AnnotationSchema {
    pub category: usize,
    pub kegg_orthologs: usize,
    pub kegg_pathways: usize,
    pub pfam_domains: usize,
}

impl Default for AnnotationSchema {
    fn default() -> Self {
        AnnotationSchema {
            category: 6,
            kegg_orthologs: 11,
            kegg_pathways: 12,
            pfam_domains: 20,
        }
    }
}

/// One annotation row, parsed at load time from the fixed schema positions.
///
/// `category` holds the cell verbatim; the placeholder `-` is a countable
/// value there, while an empty cell means the row carries no assignment.
/// The three term fields keep their raw comma-delimited cells and are split
/// during tabulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRecord {
    pub category: CompactString,
    pub kegg_orthologs: String,
    pub kegg_pathways: String,
    pub pfam_domains: String,
}

fn table_reader(path: impl AsRef<Path>) -> Result<Reader<File>> {
    let reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .comment(Some(b'#'))
        .from_path(path.as_ref())?;
    Ok(reader)
}

fn field<'r>(record: &'r StringRecord, index: usize) -> Result<&'r str> {
    record.get(index).ok_or_else(|| ProfileError::TooFewColumns {
        line: record.position().map(|p| p.line()).unwrap_or(0),
        needed: index,
        found: record.len(),
    })
}

/// Read only the category column of an annotation table.
///
/// Empty cells are kept so that callers can distinguish "row without an
/// assignment" from "no row"; tabulation skips them.
pub fn read_categories(
    path: impl AsRef<Path>,
    schema: &AnnotationSchema,
) -> Result<Vec<CompactString>> {
    let path = path.as_ref();
    let mut reader = table_reader(path)?;

    let mut cells = Vec::new();
    for result in reader.records() {
        let record = result?;
        cells.push(CompactString::new(field(&record, schema.category)?));
    }

    debug!("read {} annotation rows from {}", cells.len(), path.display());
    Ok(cells)
}

/// Read full annotation records from a table.
pub fn read_annotations(
    path: impl AsRef<Path>,
    schema: &AnnotationSchema,
) -> Result<Vec<AnnotationRecord>> {
    let path = path.as_ref();
    let mut reader = table_reader(path)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        records.push(AnnotationRecord {
            category: CompactString::new(field(&record, schema.category)?),
            kegg_orthologs: field(&record, schema.kegg_orthologs)?.to_string(),
            kegg_pathways: field(&record, schema.kegg_pathways)?.to_string(),
            pfam_domains: field(&record, schema.pfam_domains)?.to_string(),
        });
    }

    debug!(
        "read {} annotation records from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn narrow_schema() -> AnnotationSchema {
        AnnotationSchema {
            category: 1,
            kegg_orthologs: 2,
            kegg_pathways: 3,
            pfam_domains: 4,
        }
    }

    fn write_table(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn skips_comment_lines_and_keeps_data_rows() {
        let file = write_table(&[
            "## eggNOG-mapper output",
            "#query\tCOG\tKO\tPathway\tPfam",
            "g1\tC\tko:K1\tmap1\tPF1",
            "g2\tK\tko:K2\tmap2\tPF2",
        ]);

        let cells = read_categories(file.path(), &narrow_schema()).unwrap();
        assert_eq!(cells, vec!["C", "K"]);
    }

    #[test]
    fn reads_typed_records_from_fixed_positions() {
        let file = write_table(&["g1\tE\tko:K1,ko:K2\t-\tPF1, PF2"]);

        let records = read_annotations(file.path(), &narrow_schema()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, "E");
        assert_eq!(records[0].kegg_orthologs, "ko:K1,ko:K2");
        assert_eq!(records[0].kegg_pathways, "-");
        assert_eq!(records[0].pfam_domains, "PF1, PF2");
    }

    #[test]
    fn missing_required_column_fails_with_line_number() {
        let file = write_table(&["g1\tC", "g2\tK"]);

        let err = read_annotations(file.path(), &narrow_schema()).unwrap_err();
        match err {
            ProfileError::TooFewColumns { line, needed, found } => {
                assert_eq!(line, 1);
                assert_eq!(needed, 2);
                assert_eq!(found, 2);
            }
            other => panic!("expected TooFewColumns, got {:?}", other),
        }
    }

    #[test]
    fn ragged_row_width_is_a_parse_error() {
        let file = write_table(&["g1\tC\tko:K1\tmap1\tPF1", "g2\tK\tko:K2"]);

        let err = read_categories(file.path(), &narrow_schema()).unwrap_err();
        assert!(matches!(err, ProfileError::Parse(_)));
    }

    #[test]
    fn empty_table_yields_no_rows() {
        let file = write_table(&["#query\tCOG\tKO\tPathway\tPfam"]);

        let cells = read_categories(file.path(), &narrow_schema()).unwrap();
        assert!(cells.is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_categories("/nonexistent/annotations.tabular", &narrow_schema()).is_err());
    }
}
