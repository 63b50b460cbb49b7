//! CSV export and import for hourly schedule values.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

/// Column header for hourly value export.
const HEADER: [&str; 2] = ["hour", "value"];

/// Exports hourly values to a CSV file at the given path.
///
/// Writes a `hour,value` header followed by one row per value. Values are
/// written in their shortest round-trippable form, so an export/import
/// cycle reproduces them exactly.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(values: &[f64], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(values, buf)
}

/// Writes hourly values as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(values: &[f64], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HEADER)?;
    for (hour, value) in values.iter().enumerate() {
        wtr.write_record(&[hour.to_string(), value.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Imports hourly values from a CSV file at the given path.
///
/// See [`read_csv`] for the accepted layout.
///
/// # Errors
///
/// Returns an `io::Error` if the file cannot be opened or parsed.
pub fn import_csv(path: &Path) -> io::Result<Vec<f64>> {
    read_csv(File::open(path)?)
}

/// Reads hourly values from CSV: the last column of every row, with an
/// optional header row.
///
/// Accepts both the single-column layout and the `hour,value` layout
/// written by [`write_csv`]. A non-numeric first row is treated as a
/// header; a non-numeric row anywhere else is an error.
pub fn read_csv(reader: impl Read) -> io::Result<Vec<f64>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(reader);

    let mut values = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record.map_err(io::Error::other)?;
        let Some(cell) = record.iter().last().map(str::trim) else {
            continue;
        };
        match cell.parse::<f64>() {
            Ok(value) => values.push(value),
            Err(_) if row == 0 => continue,
            Err(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("row {}: cannot parse {cell:?} as a number", row + 1),
                ));
            }
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_row_count() {
        let values = vec![0.0, 0.5, 1.0];
        let mut buf = Vec::new();
        write_csv(&values, &mut buf).ok();
        let output = String::from_utf8(buf).unwrap_or_default();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.first().copied(), Some("hour,value"));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn deterministic_output() {
        let values = vec![0.1, 0.2, 0.3];
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_csv(&values, &mut buf1).ok();
        write_csv(&values, &mut buf2).ok();
        assert_eq!(buf1, buf2);
    }

    #[test]
    fn write_read_round_trip_is_exact() {
        let values = vec![0.123456789012345, 1.0 / 3.0, 42.0];
        let mut buf = Vec::new();
        write_csv(&values, &mut buf).ok();
        let back = read_csv(buf.as_slice()).expect("readable");
        assert_eq!(back, values);
    }

    #[test]
    fn reads_single_column_without_header() {
        let back = read_csv("1.5\n2.5\n3.5\n".as_bytes()).expect("readable");
        assert_eq!(back, vec![1.5, 2.5, 3.5]);
    }

    #[test]
    fn non_numeric_data_row_is_error() {
        let result = read_csv("hour,value\n0,1.0\n1,oops\n".as_bytes());
        assert!(result.is_err());
    }
}
