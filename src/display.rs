use crate::models::{ReportRow, Student};
use std::io::Write;
use tabled::{Table, settings::Style};

/// The report text shown when there is no attendance to list.
pub const NO_RECORDS: &str = "No attendance records found.";

/// Renders the attendance report as plain text, one line per record.
pub fn render_report(rows: &[ReportRow]) -> String {
    if rows.is_empty() {
        return NO_RECORDS.to_string();
    }

    rows.iter()
        .map(|row| {
            format!(
                "Name: {} | Date: {} | Time: {}\n",
                row.name, row.date, row.time
            )
        })
        .collect()
}

/// Pretty prints the attendance report as a table.
pub fn report_table(rows: &[ReportRow]) -> String {
    if rows.is_empty() {
        return NO_RECORDS.to_string();
    }

    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}

/// Pretty prints the roster as a table.
pub fn roster_table(roster: &[Student]) -> String {
    let mut table = Table::new(roster);
    table.with(Style::modern());
    table.to_string()
}

/// Writes the attendance report as CSV, with a header row.
pub fn write_report_csv<W: Write>(rows: &[ReportRow], writer: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);

    for row in rows {
        writer.serialize(row)?;
    }

    writer.flush()?;
    Ok(())
}
