//! Comma-separated text reading and writing.
//!
//! Fields may be wrapped in double quotes; a doubled quote inside a quoted
//! field is a literal quote. Blank lines are skipped. Quoted fields do not
//! span lines.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::SheetError;
use crate::record::{normalize_header, AnalysisResult, RawTable, Side};
use crate::validation::parse_number;

/// Header of the result sheet, in output-schema order.
pub const RESULT_HEADERS: [&str; 14] = [
    "subject",
    "rate",
    "line",
    "probAbove",
    "probAtOrBelow",
    "evOver",
    "evUnder",
    "bestSide",
    "bestEv",
    "isProfitable",
    "impliedProbOver",
    "impliedProbUnder",
    "edgeOver",
    "edgeUnder",
];

/// Read a sheet from disk.
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<RawTable, SheetError> {
    let path = path.as_ref();
    let text = read_text(path)?;

    let table = parse_table(&text)?;
    info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.headers.len(),
        "Sheet loaded"
    );
    Ok(table)
}

/// Read a file as text. Bytes that are not UTF-8 are decoded as Latin-1,
/// which spreadsheet exports on Windows often produce.
fn read_text(path: &Path) -> Result<String, SheetError> {
    let bytes = fs::read(path).map_err(|source| SheetError::Io {
        path: path.display().to_string(),
        source,
    })?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => {
            warn!(path = %path.display(), "Sheet is not UTF-8, reading as Latin-1");
            Ok(err.into_bytes().iter().map(|&b| char::from(b)).collect())
        }
    }
}

/// Parse sheet text. The first non-blank line is the header.
pub fn parse_table(text: &str) -> Result<RawTable, SheetError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());

    let (header_line, header) = lines.next().ok_or(SheetError::EmptyFile)?;
    let headers: Vec<String> = split_line(header, header_line)?
        .into_iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for (number, line) in lines {
        let fields = split_line(line, number)?;
        if fields.len() != headers.len() {
            return Err(SheetError::RaggedRow {
                line: number,
                expected: headers.len(),
                found: fields.len(),
            });
        }
        rows.push(fields);
    }

    Ok(RawTable::new(headers, rows))
}

/// Write a table to disk.
pub fn write_table<P: AsRef<Path>>(path: P, table: &RawTable) -> Result<(), SheetError> {
    let path = path.as_ref();
    let mut out = join_line(table.headers.as_slice());
    for row in &table.rows {
        out.push_str(&join_line(row.as_slice()));
    }

    write_file(path, &out)?;
    info!(path = %path.display(), rows = table.len(), "Sheet written");
    Ok(())
}

/// Render results in the output schema at full precision.
///
/// Floats use Rust's shortest round-trip form, so reading the text back
/// reproduces every value bit for bit.
pub fn results_to_csv(results: &[AnalysisResult]) -> String {
    let mut out = join_line(&RESULT_HEADERS[..]);
    for r in results {
        let fields = [
            r.subject.clone(),
            r.rate.to_string(),
            r.line.to_string(),
            r.prob_above.to_string(),
            r.prob_at_or_below.to_string(),
            r.ev_over.to_string(),
            r.ev_under.to_string(),
            r.best_side.to_string(),
            r.best_ev.to_string(),
            r.is_profitable.to_string(),
            r.implied_prob_over.to_string(),
            r.implied_prob_under.to_string(),
            r.edge_over.to_string(),
            r.edge_under.to_string(),
        ];
        out.push_str(&join_line(&fields[..]));
    }
    out
}

/// Write results to disk in rank order.
pub fn write_results<P: AsRef<Path>>(
    path: P,
    results: &[AnalysisResult],
) -> Result<(), SheetError> {
    let path = path.as_ref();
    write_file(path, &results_to_csv(results))?;
    info!(path = %path.display(), rows = results.len(), "Results written");
    Ok(())
}

/// Read a result sheet from disk.
pub fn read_results<P: AsRef<Path>>(path: P) -> Result<Vec<AnalysisResult>, SheetError> {
    parse_results(&read_text(path.as_ref())?)
}

/// Parse result-sheet text back into results.
pub fn parse_results(text: &str) -> Result<Vec<AnalysisResult>, SheetError> {
    let table = parse_table(text)?;

    let mut positions = [0usize; RESULT_HEADERS.len()];
    for (slot, name) in RESULT_HEADERS.iter().enumerate() {
        let wanted = normalize_header(name);
        positions[slot] = table
            .headers
            .iter()
            .position(|h| normalize_header(h) == wanted)
            .ok_or_else(|| SheetError::MissingColumn(name.to_string()))?;
    }

    let mut problems = Vec::new();
    let mut results = Vec::with_capacity(table.len());
    for (row, cells) in table.rows.iter().enumerate() {
        let cell = |slot: usize| cells[positions[slot]].as_str();
        let mut number = |slot: usize| {
            parse_number(cell(slot)).unwrap_or_else(|| {
                problems.push(format!(
                    "row {}: '{}' in '{}' is not a number",
                    row,
                    cell(slot),
                    RESULT_HEADERS[slot]
                ));
                f64::NAN
            })
        };

        let rate = number(1);
        let line = number(2);
        let prob_above = number(3);
        let prob_at_or_below = number(4);
        let ev_over = number(5);
        let ev_under = number(6);
        let best_ev = number(8);
        let implied_prob_over = number(10);
        let implied_prob_under = number(11);
        let edge_over = number(12);
        let edge_under = number(13);

        let best_side = cell(7).trim().parse::<Side>();
        let is_profitable = cell(9).trim().parse::<bool>();
        let (best_side, is_profitable) = match (best_side, is_profitable) {
            (Ok(side), Ok(flag)) => (side, flag),
            _ => {
                problems.push(format!("row {}: bad bestSide/isProfitable value", row));
                continue;
            }
        };

        results.push(AnalysisResult {
            subject: cell(0).to_string(),
            rate,
            line,
            prob_above,
            prob_at_or_below,
            ev_over,
            ev_under,
            best_side,
            best_ev,
            is_profitable,
            implied_prob_over,
            implied_prob_under,
            edge_over,
            edge_under,
        });
    }

    if problems.is_empty() {
        Ok(results)
    } else {
        Err(SheetError::InvalidValues { problems })
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), SheetError> {
    fs::write(path, contents).map_err(|source| SheetError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Split one line into fields.
fn split_line(line: &str, number: usize) -> Result<Vec<String>, SheetError> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(SheetError::UnterminatedQuote { line: number });
    }
    fields.push(field);
    Ok(fields)
}

/// Join fields into one newline-terminated line, quoting where needed.
fn join_line<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = fields
        .iter()
        .map(|f| quote(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n']) || field != field.trim() {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
