use std::io::{self, Write};

use crate::report::DomainReport;

const HEADERS: [&str; 4] = [
    "UCS Domain",
    "Current Version",
    "Is Deferred",
    "Suggested Version",
];

/// Placeholder for values the catalog could not provide
const UNKNOWN: &str = "-";

/// Writes an ASCII table of the reachable domains
pub fn render_table<W: Write>(reports: &[DomainReport], out: &mut W) -> io::Result<()> {
    let rows: Vec<[String; 4]> = reports
        .iter()
        .filter(|r| r.reachable)
        .map(|r| {
            [
                r.address.clone(),
                r.version.clone().unwrap_or_else(|| UNKNOWN.to_string()),
                r.deferred
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| UNKNOWN.to_string()),
                r.suggested_version
                    .clone()
                    .unwrap_or_else(|| UNKNOWN.to_string()),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let separator = widths
        .iter()
        .map(|w| "-".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let separator = format!("+{separator}+");

    writeln!(out, "{separator}")?;
    write_row(out, &HEADERS, &widths)?;
    writeln!(out, "{separator}")?;
    for row in &rows {
        write_row(out, row, &widths)?;
    }
    writeln!(out, "{separator}")?;

    Ok(())
}

fn write_row<W: Write, S: AsRef<str>>(out: &mut W, cells: &[S], widths: &[usize]) -> io::Result<()> {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!(" {:<width$} ", cell.as_ref(), width = width))
        .collect::<Vec<_>>()
        .join("|");
    writeln!(out, "|{line}|")
}

/// Writes all reports, unreachable ones included, as pretty JSON
pub fn render_json<W: Write>(reports: &[DomainReport], out: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, reports)?;
    writeln!(out)
}
