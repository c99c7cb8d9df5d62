//! Formatting helpers for summary reports.

use std::fmt;

/// Format elapsed seconds as a human-readable duration.
///
/// The input is rounded to the nearest whole second first. Negative and
/// non-finite inputs are treated as zero.
pub fn format_duration(seconds: f64) -> String {
    let s = whole_seconds(seconds);
    if s < 60 {
        format!("{} seconds", s)
    } else if s < 3600 {
        format!("{} minutes {} seconds", s / 60, s % 60)
    } else {
        let (h, rem) = (s / 3600, s % 3600);
        format!("{} hours {} minutes {} seconds", h, rem / 60, rem % 60)
    }
}

fn whole_seconds(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds.round() as u64
    } else {
        0
    }
}

/// Items processed per minute.
///
/// `None` when no time elapsed, so callers never divide by zero.
pub fn processing_rate(total_items: usize, elapsed_seconds: f64) -> Option<f64> {
    if elapsed_seconds > 0.0 {
        Some(total_items as f64 / (elapsed_seconds / 60.0))
    } else {
        None
    }
}

/// Format a rate as shown in the summary table.
pub fn format_rate(rate: f64) -> String {
    format!("{:.1} files / minute", rate)
}

/// Plain-text table with left-aligned, space-padded columns.
///
/// Columns are separated by two spaces and a dash rule sits under the
/// header. Trailing whitespace is trimmed from every line.
#[derive(Debug, Clone, Default)]
pub struct PlainTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl PlainTable {
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

    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths = vec![0; self.column_count()];
        for line in std::iter::once(&self.headers).chain(&self.rows) {
            for (width, cell) in widths.iter_mut().zip(line) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    let mut line = String::new();
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        line.push_str(cell);
        let pad = width.saturating_sub(cell.chars().count());
        line.extend(std::iter::repeat(' ').take(pad));
    }
    writeln!(f, "{}", line.trim_end())
}

impl fmt::Display for PlainTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.column_widths();
        write_line(f, &self.headers, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_line(f, &rule, &widths)?;
        for row in &self.rows {
            write_line(f, row, &widths)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_seconds() {
        assert_eq!(format_duration(0.0), "0 seconds");
        assert_eq!(format_duration(45.0), "45 seconds");
        assert_eq!(format_duration(59.4), "59 seconds");
    }

    #[test]
    fn test_format_duration_minutes() {
        assert_eq!(format_duration(125.0), "2 minutes 5 seconds");
        assert_eq!(format_duration(60.0), "1 minutes 0 seconds");
        // 59.5 rounds up into the minutes branch
        assert_eq!(format_duration(59.5), "1 minutes 0 seconds");
    }

    #[test]
    fn test_format_duration_hours() {
        assert_eq!(format_duration(3661.0), "1 hours 1 minutes 1 seconds");
        assert_eq!(format_duration(3600.0), "1 hours 0 minutes 0 seconds");
        assert_eq!(format_duration(90061.0), "25 hours 1 minutes 1 seconds");
    }

    #[test]
    fn test_format_duration_invalid_input() {
        assert_eq!(format_duration(-5.0), "0 seconds");
        assert_eq!(format_duration(f64::NAN), "0 seconds");
    }

    #[test]
    fn test_processing_rate() {
        assert_eq!(processing_rate(10, 0.0), None);
        assert_eq!(processing_rate(10, 60.0), Some(10.0));
        assert_eq!(processing_rate(30, 120.0), Some(15.0));
        assert_eq!(format_rate(7.0 / (125.0 / 60.0)), "3.4 files / minute");
    }

    #[test]
    fn test_plain_table_alignment() {
        let mut table = PlainTable::new(["Metric", "Count"]);
        table.push_row(["Success", "3"]);
        table.push_row(["Duplicate, not imported", "12"]);

        let expected = "\
Metric                   Count
-----------------------  -----
Success                  3
Duplicate, not imported  12
";
        assert_eq!(table.to_string(), expected);
    }

    #[test]
    fn test_plain_table_wide_value_column() {
        let mut table = PlainTable::new(["Metric", "Count"]);
        table.push_row(["Time elapsed", "2 minutes 5 seconds"]);

        let rendered = table.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[1], "------------  -------------------");
        assert!(lines.iter().all(|l| !l.ends_with(' ')));
    }
}
