use std::error::Error;
use std::fmt::Write as FmtWrite;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::analysis::category_counts::SampleCountTable;
use crate::analysis::proportions::ProportionTable;
use crate::analysis::term_counts::Term;

const BUFFER_SIZE: usize = 8192 * 32;

/// Write the merged category x sample count table as TSV.
///
/// Rows keep first-seen category order; columns keep sample order.
pub fn write_count_table(
    table: &SampleCountTable,
    output_dir: &Path,
    prefix: &str,
) -> Result<(), Box<dyn Error>> {
    create_dir_all(output_dir)?;
    let filename = output_dir.join(format!("{}_category_counts.tsv", prefix));
    let file = File::create(&filename)?;
    let mut writer = BufWriter::with_capacity(BUFFER_SIZE, file);

    let mut line_buffer = String::with_capacity(256);

    line_buffer.push_str("Category");
    for sample in table.samples() {
        write!(&mut line_buffer, "\t{}", sample)?;
    }
    line_buffer.push('\n');
    writer.write_all(line_buffer.as_bytes())?;

    for category in table.categories() {
        if let Some(row) = table.row(category) {
            line_buffer.clear();
            line_buffer.push_str(category);
            for count in row {
                write!(&mut line_buffer, "\t{}", count)?;
            }
            line_buffer.push('\n');
            writer.write_all(line_buffer.as_bytes())?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Write the column-normalized proportion table as TSV.
pub fn write_proportion_table(
    proportions: &ProportionTable,
    output_dir: &Path,
    prefix: &str,
) -> Result<(), Box<dyn Error>> {
    create_dir_all(output_dir)?;
    let filename = output_dir.join(format!("{}_category_proportions.tsv", prefix));
    let file = File::create(&filename)?;
    let mut writer = BufWriter::with_capacity(BUFFER_SIZE, file);

    let mut line_buffer = String::with_capacity(256);

    line_buffer.push_str("Category");
    for sample in proportions.samples() {
        write!(&mut line_buffer, "\t{}", sample)?;
    }
    line_buffer.push('\n');
    writer.write_all(line_buffer.as_bytes())?;

    for category in proportions.categories() {
        if let Some(row) = proportions.row(category) {
            line_buffer.clear();
            line_buffer.push_str(category);
            for proportion in row {
                write!(&mut line_buffer, "\t{:.6}", proportion)?;
            }
            line_buffer.push('\n');
            writer.write_all(line_buffer.as_bytes())?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Write one panel's top (value, count) list as TSV.
pub fn write_top_terms(
    entries: &[(Term, u64)],
    output_dir: &Path,
    file_stem: &str,
) -> Result<(), Box<dyn Error>> {
    create_dir_all(output_dir)?;
    let filename = output_dir.join(format!("{}.tsv", file_stem));
    let file = File::create(&filename)?;
    let mut writer = BufWriter::with_capacity(BUFFER_SIZE, file);

    writer.write_all(b"Value\tCount\n")?;

    let mut line_buffer = String::with_capacity(64);
    for (value, count) in entries {
        line_buffer.clear();
        writeln!(&mut line_buffer, "{}\t{}", value, count)?;
        writer.write_all(line_buffer.as_bytes())?;
    }

    writer.flush()?;
    Ok(())
}
