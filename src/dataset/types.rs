/// In-memory tabular dataset: one header row plus string cells, exactly as
/// they appeared in the delimited source file. All typing happens downstream,
/// during normalization.
#[derive(Debug, Default)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Case-insensitive header lookup. Survey exports disagree on casing
    /// (`Data_Value` vs `Data_value`), so a single insensitive lookup covers
    /// both. Returns the first matching column.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keep only the rows the predicate accepts.
    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&[String]) -> bool,
    {
        self.rows.retain(|row| keep(row));
    }
}

/// Fetch one cell of a row by optional column index. A missing column or a
/// row shorter than the header yields the empty string, never a panic.
pub fn cell<'a>(row: &'a [String], col: Option<usize>) -> &'a str {
    col.and_then(|i| row.get(i))
        .map(|s| s.as_str())
        .unwrap_or("")
}

/// Coerce a raw cell to a number: trim whitespace, strip wrapping quotes,
/// parse. Anything non-numeric (including the empty cell) is `None`.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let v = raw.trim().trim_matches('"');
    if v.is_empty() {
        return None;
    }
    v.parse::<f64>().ok()
}
