//! CSV serialization of a transition table.

use crate::compiler::TransitionRow;
use itertools::Itertools;
use std::io::{self, Write};

/// The header line, in column order.
pub const CSV_HEADER: [&str; 5] = [
    "Source Node",
    "Destination Node",
    "Rule List",
    "Priority",
    "Operation / Edge Effect",
];

/// Writes rows as CSV, in the order given.
pub struct CsvWriter<W: Write> {
    out: W,
    header_written: bool,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            header_written: false,
        }
    }

    /// Writes the header if it has not been written yet.
    pub fn write_header(&mut self) -> io::Result<()> {
        if !self.header_written {
            self.write_record(CSV_HEADER.iter().copied())?;
            self.header_written = true;
        }
        Ok(())
    }

    pub fn write_row(&mut self, row: &TransitionRow) -> io::Result<()> {
        self.write_header()?;
        let priority = row.priority.to_string();
        self.write_record(
            [
                row.source_node.as_str(),
                row.destination_node.as_str(),
                row.rule_list.as_str(),
                priority.as_str(),
                row.operation.as_str(),
            ]
            .into_iter(),
        )
    }

    pub fn write_rows<'r>(&mut self, rows: impl IntoIterator<Item = &'r TransitionRow>) -> io::Result<()> {
        self.write_header()?;
        for row in rows {
            self.write_row(row)?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_record<'f>(&mut self, fields: impl Iterator<Item = &'f str>) -> io::Result<()> {
        let line = fields.map(escape_field).join(",");
        self.out.write_all(line.as_bytes())?;
        self.out.write_all(b"\r\n")
    }
}

/// Serializes the header and `rows` into a CSV string.
pub fn to_csv_string(rows: &[TransitionRow]) -> String {
    let mut writer = CsvWriter::new(Vec::new());
    writer
        .write_rows(rows)
        .expect("writing to a Vec cannot fail");
    String::from_utf8_lossy(&writer.into_inner()).into_owned()
}

/// Quotes a field containing a comma, quote, CR or LF, doubling inner quotes.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
