//! Analytics export parser with encoding, header and delimiter auto-detection.
//!
//! Exports are not clean CSV files: they may be UTF-16, may start with a few
//! preamble lines before the real header, and the delimiter varies. This
//! module turns the raw bytes into a [`RawTable`] of strings and splits off
//! the channel "Total" row. No metric-specific logic lives here.

use serde::Serialize;
use serde_json::{json, Map, Value};
use std::path::Path;

use crate::error::{ParseError, ParseOutcome};

/// Header markers used when no configuration is supplied.
pub const DEFAULT_HEADER_MARKERS: [&str; 3] = ["Content", "Video title", "Video publish time"];

/// Candidate delimiters, in tie-break order.
const DELIMITERS: [char; 4] = [',', '\t', ';', '|'];

// =============================================================================
// Raw table
// =============================================================================

/// One data row. `values[i]` belongs to `RawTable::headers[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawRow {
    pub values: Vec<String>,
}

impl RawRow {
    /// Value at a column index, empty when out of range.
    pub fn get(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }

    /// Value of the first column.
    pub fn first(&self) -> &str {
        self.get(0)
    }
}

/// Ordered rows sharing one cleaned header.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as JSON objects keyed by column name.
    pub fn to_json_rows(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let mut obj = Map::new();
                for (i, header) in self.headers.iter().enumerate() {
                    obj.insert(header.clone(), json!(row.get(i)));
                }
                Value::Object(obj)
            })
            .collect()
    }
}

/// Result of parsing with detection metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedReport {
    /// Content rows, total row(s) removed.
    pub table: RawTable,
    /// First row whose first column contains "total".
    pub total: Option<RawRow>,
    /// Encoding the buffer was decoded with.
    pub encoding: String,
    /// Detected delimiter.
    pub delimiter: char,
    /// Zero-based line index of the header.
    pub header_row: usize,
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode raw bytes: byte-order mark first, then strict UTF-8, then UTF-16LE.
///
/// Returns the text and the name of the encoding used.
pub fn decode_content(bytes: &[u8]) -> ParseOutcome<(String, &'static str)> {
    if let Some((encoding, bom_len)) = encoding_rs::Encoding::for_bom(bytes) {
        return encoding
            .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
            .map(|text| (text.into_owned(), encoding.name()))
            .ok_or_else(|| {
                ParseError::Decode(format!("invalid {} data after byte-order mark", encoding.name()))
            });
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok((text.to_string(), encoding_rs::UTF_8.name()));
    }

    if bytes.len() % 2 == 0 {
        if let Some(text) = encoding_rs::UTF_16LE
            .decode_without_bom_handling_and_without_replacement(bytes)
        {
            return Ok((text.into_owned(), encoding_rs::UTF_16LE.name()));
        }
    }

    Err(ParseError::Decode("buffer is neither UTF-8 nor UTF-16".to_string()))
}

// =============================================================================
// Header and delimiter detection
// =============================================================================

/// Index of the first line containing any marker (case-sensitive substring).
pub fn locate_header<S: AsRef<str>>(lines: &[&str], markers: &[S]) -> Option<usize> {
    lines
        .iter()
        .position(|line| markers.iter().any(|m| line.contains(m.as_ref())))
}

/// Detect the delimiter by counting occurrences in the header line.
pub fn detect_delimiter(header_line: &str) -> char {
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &DELIMITERS {
        let count = header_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Strip whitespace and literal double quotes from a column name.
pub fn clean_header(raw: &str) -> String {
    raw.trim().replace('"', "")
}

// =============================================================================
// Parsing
// =============================================================================

/// Parse an export using the given header markers.
///
/// # Example
/// ```ignore
/// let csv = "Report\n\nContent,Video title,Views\nabc,Hello,10\nTotal,,10";
/// let parsed = parse_report(csv.as_bytes(), &DEFAULT_HEADER_MARKERS)?;
///
/// assert_eq!(parsed.header_row, 2);
/// assert_eq!(parsed.table.len(), 1);
/// assert!(parsed.total.is_some());
/// ```
pub fn parse_report<S: AsRef<str>>(bytes: &[u8], markers: &[S]) -> ParseOutcome<ParsedReport> {
    parse_report_with(bytes, |lines| locate_header(lines, markers))
}

/// Parse an export with a custom header-location strategy.
///
/// The locator receives every decoded line; `None` means "use line 0".
pub fn parse_report_with<F>(bytes: &[u8], locator: F) -> ParseOutcome<ParsedReport>
where
    F: Fn(&[&str]) -> Option<usize>,
{
    let (content, encoding) = decode_content(bytes)?;
    if content.trim().is_empty() {
        return Err(ParseError::EmptyReport);
    }

    let lines: Vec<&str> = content.lines().collect();
    let header_row = locator(&lines).filter(|&i| i < lines.len()).unwrap_or(0);
    let delimiter = detect_delimiter(lines[header_row]);

    let offset: usize = content
        .split_inclusive('\n')
        .take(header_row)
        .map(str::len)
        .sum();
    let table = read_table(&content[offset..], delimiter)?;
    let (table, total) = split_total_row(table);

    Ok(ParsedReport {
        table,
        total,
        encoding: encoding.to_string(),
        delimiter,
        header_row,
    })
}

/// Parse an export file from disk.
pub fn parse_report_file<P: AsRef<Path>, S: AsRef<str>>(
    path: P,
    markers: &[S],
) -> ParseOutcome<ParsedReport> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_report(&bytes, markers)
}

/// Read delimited text whose first line is the header.
fn read_table(body: &str, delimiter: char) -> ParseOutcome<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(clean_header).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|v| v.trim().is_empty()) {
            continue;
        }

        let values = (0..headers.len())
            .map(|i| record.get(i).unwrap_or("").to_string())
            .collect();
        rows.push(RawRow { values });
    }

    Ok(RawTable { headers, rows })
}

/// Remove rows whose first column contains "total" (any case).
///
/// The first such row is returned as the channel total; order of the
/// remaining rows is preserved.
pub fn split_total_row(table: RawTable) -> (RawTable, Option<RawRow>) {
    let RawTable { headers, rows } = table;
    let mut total = None;
    let mut kept = Vec::with_capacity(rows.len());

    for row in rows {
        if row.first().to_lowercase().contains("total") {
            if total.is_none() {
                total = Some(row);
            }
        } else {
            kept.push(row);
        }
    }

    (RawTable { headers, rows: kept }, total)
}
