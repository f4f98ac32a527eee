//! CSV tally output
//!
//! Spreadsheet-friendly layout: UTF-8 with a byte-order mark, comma
//! delimited, CRLF line endings, no header row, one `letter,count` row per
//! letter.

use crate::output::tally::Tally;
use crate::output::traits::{OutputResult, TallySink};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const BOM: &str = "\u{FEFF}";
const SEP: char = ',';

/// Writes the tally to a CSV file, replacing it if it exists
#[derive(Debug, Clone)]
pub struct CsvTallySink {
    path: PathBuf,
}

impl CsvTallySink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TallySink for CsvTallySink {
    fn write_tally(&self, tally: &Tally) -> OutputResult<()> {
        write_tally_csv(tally, &self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Writes `tally` to `path` in the CSV layout described above
pub fn write_tally_csv(tally: &Tally, path: &Path) -> OutputResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(BOM.as_bytes())?;
    write_rows(&mut writer, tally)?;
    writer.flush()?;
    Ok(())
}

fn write_rows<W: Write>(mut w: W, tally: &Tally) -> std::io::Result<()> {
    for (letter, count) in tally.rows() {
        write_row(&mut w, &[letter.to_string(), count.to_string()])?;
    }
    Ok(())
}

fn needs_quotes(field: &str) -> bool {
    field.contains(SEP) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer
fn write_row<W: Write>(mut w: W, row: &[String]) -> std::io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, "{}", SEP)?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    write!(w, "\r\n")
}
