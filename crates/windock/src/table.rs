/// Box-drawn table with fixed column widths.
pub struct TableFormatter {
    headers: Vec<&'static str>,
    widths: Vec<usize>,
}

impl TableFormatter {
    /// Size each column to its widest cell, clamped to `[header, max]`.
    pub fn new(columns: &[(&'static str, usize)], rows: &[Vec<String>]) -> Self {
        let widths = columns
            .iter()
            .enumerate()
            .map(|(i, (header, max))| {
                rows.iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
                    .clamp(header.chars().count(), (*max).max(header.chars().count()))
            })
            .collect();

        Self {
            headers: columns.iter().map(|(header, _)| *header).collect(),
            widths,
        }
    }

    pub fn print_table(&self, rows: &[Vec<String>]) {
        println!("{}", self.border('┌', '┬', '┐'));
        println!("{}", self.row(self.headers.iter().copied()));
        println!("{}", self.border('├', '┼', '┤'));
        for row in rows {
            println!("{}", self.row(row.iter().map(String::as_str)));
        }
        println!("{}", self.border('└', '┴', '┘'));
    }

    fn row<'a>(&self, cells: impl Iterator<Item = &'a str>) -> String {
        let cells: Vec<String> = cells
            .zip(&self.widths)
            .map(|(cell, width)| truncate(cell, *width))
            .collect();
        format!("│ {} │", cells.join(" │ "))
    }

    fn border(&self, left: char, middle: char, right: char) -> String {
        let segments: Vec<String> = self.widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}", left, segments.join(&middle.to_string()), right)
    }
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Uses character count (not byte count) so multi-byte titles are cut on
/// character boundaries.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_pads_short_strings() {
        assert_eq!(truncate("abc", 5), "abc  ");
    }

    #[test]
    fn test_truncate_cuts_on_char_boundaries() {
        assert_eq!(truncate("main.py — myproj", 8), "main....");
        assert_eq!(truncate("—————————", 4), "—...");
    }

    #[test]
    fn test_column_widths_follow_content() {
        let rows = vec![vec!["7".to_string(), "a very long window title".to_string()]];
        let table = TableFormatter::new(&[("Window", 10), ("Title", 12)], &rows);
        assert_eq!(table.widths, vec![6, 12]);
    }

    #[test]
    fn test_row_and_border_align() {
        let rows = vec![vec!["1".to_string(), "x".to_string()]];
        let table = TableFormatter::new(&[("No", 4), ("Title", 8)], &rows);
        let row = table.row(rows[0].iter().map(String::as_str));
        let border = table.border('┌', '┬', '┐');
        assert_eq!(row.chars().count(), border.chars().count());
    }
}
