//! Delimited-table view over game resource files.
//!
//! The game ships most tabular resources as comma-separated text, with
//! tab-separated variants for some locales. The delimiter is a property
//! of (file kind × country) and is never inferred from the content.

use tracing::warn;

use crate::country::CountryCode;
use crate::data::Data;

/// Cell separator for a resource file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    /// Delimiter used by per-language resource files for a region.
    pub fn for_country(cc: CountryCode) -> Self {
        match cc {
            CountryCode::En => Self::Comma,
            CountryCode::Jp | CountryCode::Kr | CountryCode::Tw => Self::Tab,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Tab => '\t',
        }
    }
}

/// A parsed delimited table.
///
/// Rows are editable in place; [`Csv::set_row`] grows the table as
/// needed so records can write at fixed indices. A read cursor supports
/// the header-then-entries layout of the pack list files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Csv {
    pub lines: Vec<Vec<String>>,
    delimiter: Delimiter,
    cursor: usize,
}

impl Csv {
    /// Create an empty table.
    pub fn new(delimiter: Delimiter) -> Self {
        Self {
            lines: Vec::new(),
            delimiter,
            cursor: 0,
        }
    }

    /// Parse a table, dropping empty cells and blank lines.
    ///
    /// This matches how the game reads most data files, where trailing
    /// separators are noise.
    pub fn parse(data: &Data, delimiter: Delimiter) -> Self {
        Self::parse_with(data, delimiter, false)
    }

    /// Parse a table, keeping empty cells.
    ///
    /// Name and description files use positional columns where an empty
    /// cell is meaningful.
    pub fn parse_keep_empty(data: &Data, delimiter: Delimiter) -> Self {
        Self::parse_with(data, delimiter, true)
    }

    fn parse_with(data: &Data, delimiter: Delimiter, keep_empty_cells: bool) -> Self {
        let text = data.to_utf8_lossy();
        let sep = delimiter.as_char();
        let mut lines = Vec::new();
        for raw_line in text.split('\n') {
            let raw_line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
            let mut cells: Vec<String> =
                raw_line.split(sep).map(str::to_string).collect();
            if !keep_empty_cells {
                cells.retain(|cell| !cell.trim().is_empty());
            }
            if cells.is_empty() || (cells.len() == 1 && cells[0].is_empty()) {
                continue;
            }
            lines.push(cells);
        }
        Self {
            lines,
            delimiter,
            cursor: 0,
        }
    }

    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    /// Read the next row, advancing the cursor.
    pub fn read_line(&mut self) -> Option<&[String]> {
        if self.cursor >= self.lines.len() {
            return None;
        }
        let index = self.cursor;
        self.cursor += 1;
        self.lines.get(index).map(Vec::as_slice)
    }

    pub fn get_row(&self, index: usize) -> Option<&[String]> {
        self.lines.get(index).map(Vec::as_slice)
    }

    /// Replace the row at `index`, growing the table with empty rows if
    /// it is past the end.
    pub fn set_row(&mut self, index: usize, cells: Vec<String>) {
        if index >= self.lines.len() {
            self.lines.resize_with(index + 1, Vec::new);
        }
        self.lines[index] = cells;
    }

    pub fn push_row(&mut self, cells: Vec<String>) {
        self.lines.push(cells);
    }

    pub fn row_count(&self) -> usize {
        self.lines.len()
    }

    /// Serialize the table back to bytes.
    pub fn to_data(&self) -> Data {
        let sep = self.delimiter.as_char();
        let mut out = String::new();
        for line in &self.lines {
            let mut first = true;
            for cell in line {
                if !first {
                    out.push(sep);
                }
                out.push_str(cell);
                first = false;
            }
            out.push('\n');
        }
        Data::from(out)
    }
}

/// Parse a numeric cell, treating blank or malformed cells as zero.
///
/// Shorter-than-schema rows and stray text both degrade to zero so a
/// single bad cell cannot take down a whole record.
pub fn parse_int(cell: &str) -> i32 {
    let cell = cell.trim();
    if cell.is_empty() {
        return 0;
    }
    match cell.parse() {
        Ok(v) => v,
        Err(_) => {
            warn!("unparsable numeric cell {cell:?}, using 0");
            0
        }
    }
}

/// Parse a boolean cell (any non-zero integer is true).
pub fn parse_bool(cell: &str) -> bool {
    parse_int(cell) != 0
}

/// Convert a whole row to integers.
pub fn row_ints(row: &[String]) -> Vec<i32> {
    row.iter().map(|cell| parse_int(cell)).collect()
}

/// Render an integer row back to cells.
pub fn ints_to_row(values: &[i32]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn csv(text: &str) -> Csv {
        Csv::parse(&Data::from(text), Delimiter::Comma)
    }

    #[test]
    fn test_parse_basic() {
        let table = csv("1,2,3\n4,5\n");
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get_row(0).unwrap(), &["1", "2", "3"]);
        assert_eq!(table.get_row(1).unwrap(), &["4", "5"]);
    }

    #[test]
    fn test_parse_tolerates_missing_trailing_newline() {
        assert_eq!(csv("1,2").row_count(), csv("1,2\n").row_count());
    }

    #[test]
    fn test_parse_drops_empty_cells() {
        let table = csv("1,,2,\n,,\n3");
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get_row(0).unwrap(), &["1", "2"]);
        assert_eq!(table.get_row(1).unwrap(), &["3"]);
    }

    #[test]
    fn test_parse_keep_empty_cells() {
        let table = Csv::parse_keep_empty(&Data::from("name,,desc\n"), Delimiter::Comma);
        assert_eq!(table.get_row(0).unwrap(), &["name", "", "desc"]);
    }

    #[test]
    fn test_tab_delimiter() {
        let table = Csv::parse(&Data::from("a\tb\nc\td\n"), Delimiter::Tab);
        assert_eq!(table.get_row(1).unwrap(), &["c", "d"]);
        assert_eq!(Delimiter::for_country(CountryCode::Kr), Delimiter::Tab);
        assert_eq!(Delimiter::for_country(CountryCode::En), Delimiter::Comma);
    }

    #[test]
    fn test_cursor_reads() {
        let mut table = csv("2\nfoo,0,4\nbar,4,8\n");
        assert_eq!(table.read_line().unwrap(), &["2"]);
        assert_eq!(table.read_line().unwrap(), &["foo", "0", "4"]);
        assert_eq!(table.read_line().unwrap(), &["bar", "4", "8"]);
        assert!(table.read_line().is_none());
    }

    #[test]
    fn test_set_row_extends() {
        let mut table = csv("1\n");
        table.set_row(3, vec!["x".into()]);
        assert_eq!(table.row_count(), 4);
        assert!(table.get_row(2).unwrap().is_empty());
        assert_eq!(table.get_row(3).unwrap(), &["x"]);
    }

    #[test]
    fn test_to_data_round_trip() {
        let table = csv("1,2,3\n4,5\n");
        let reparsed = Csv::parse(&table.to_data(), Delimiter::Comma);
        assert_eq!(reparsed.lines, table.lines);
    }

    #[test]
    fn test_cell_parsers() {
        assert_eq!(parse_int("42"), 42);
        assert_eq!(parse_int(" -1 "), -1);
        assert_eq!(parse_int(""), 0);
        assert_eq!(parse_int("abc"), 0);
        assert!(parse_bool("1"));
        assert!(!parse_bool("0"));
        assert_eq!(row_ints(&["1".into(), "x".into()]), vec![1, 0]);
        assert_eq!(ints_to_row(&[1, -2]), vec!["1", "-2"]);
    }
}
