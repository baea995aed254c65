//! Plain-text tables.

use std::fmt;

const COLUMN_GAP: &str = "  ";

/// A table with a header row and a dashed rule under it.
///
/// Every column is as wide as its widest cell. Columns holding only numbers are
/// right-aligned, the rest left-aligned.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with `headers`.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Missing cells render empty, extra cells are dropped.
    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = row.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(column, header)| {
                self.rows
                    .iter()
                    .map(|row| row[column].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn is_numeric(&self, column: usize) -> bool {
        !self.rows.is_empty()
            && self
                .rows
                .iter()
                .all(|row| row[column].trim().parse::<f64>().is_ok())
    }

    fn write_line(
        f: &mut fmt::Formatter<'_>,
        cells: &[String],
        widths: &[usize],
        numeric: &[bool],
    ) -> fmt::Result {
        let line = cells
            .iter()
            .zip(widths)
            .zip(numeric)
            .map(|((cell, &width), &right)| {
                if right {
                    format!("{cell:>width$}")
                } else {
                    format!("{cell:<width$}")
                }
            })
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        writeln!(f, "{}", line.trim_end())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        let numeric: Vec<bool> = (0..self.headers.len()).map(|c| self.is_numeric(c)).collect();
        let rule: Vec<String> = widths.iter().map(|&width| "-".repeat(width)).collect();

        Self::write_line(f, &self.headers, &widths, &numeric)?;
        Self::write_line(f, &rule, &widths, &numeric)?;
        for row in &self.rows {
            Self::write_line(f, row, &widths, &numeric)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_widest_cell() {
        let mut table = Table::new(["City", "Temperature", "Description"]);
        table.push_row(["Johannesburg", "21.5", "Clear sky"]);

        assert_eq!(
            table.to_string(),
            "City          Temperature  Description\n\
             ------------  -----------  -----------\n\
             Johannesburg         21.5  Clear sky\n"
        );
    }

    #[test]
    fn headers_only() {
        let table = Table::new(["A", "Bee"]);
        assert_eq!(table.to_string(), "A  Bee\n-  ---\n");
    }

    #[test]
    fn short_rows_are_padded() {
        let mut table = Table::new(["Name", "Note"]);
        table.push_row(["x"]);
        table.push_row(["longer", "n/a", "dropped"]);

        let rendered = table.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[2], "x");
        assert_eq!(lines[3], "longer  n/a");
        assert!(!rendered.contains("dropped"));
    }
}
