//! Header-keyed CSV tables
//!
//! Just enough CSV for spreadsheet exports: quoted fields, `""` escapes,
//! separators and line breaks inside quotes, CRLF line ends.

/// Split CSV text into rows of fields
#[must_use]
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => row.push(std::mem::take(&mut field)),
            '\r' | '\n' if !in_quotes => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}

/// CSV text with its first row taken as the header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Parse `text`; `None` when there is no header row
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let mut rows = parse_rows(text).into_iter();
        let headers = rows
            .next()?
            .into_iter()
            .map(|h| h.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}').to_lowercase())
            .collect();
        Some(Self {
            headers,
            rows: rows.collect(),
        })
    }

    /// Normalized (trimmed, lowercased) header names
    #[inline]
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Check for a column (case-insensitive)
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Number of data rows
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if there are no data rows
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate data rows
    pub fn rows(&self) -> impl Iterator<Item = CsvRow<'_>> {
        self.rows.iter().map(move |cells| CsvRow { table: self, cells })
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.eq_ignore_ascii_case(name))
    }
}

/// One data row, readable by header name
#[derive(Debug, Clone, Copy)]
pub struct CsvRow<'a> {
    table: &'a CsvTable,
    cells: &'a [String],
}

impl<'a> CsvRow<'a> {
    /// Raw cell under `column`, if the column and cell exist
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let idx = self.table.column_index(column)?;
        self.cells.get(idx).map(String::as_str)
    }

    /// Trimmed, non-empty cell under the first present column of `columns`
    #[must_use]
    pub fn first_of(&self, columns: &[&str]) -> Option<&'a str> {
        columns
            .iter()
            .filter_map(|c| self.get(c))
            .map(str::trim)
            .find(|v| !v.is_empty())
    }

    /// Cells as `(header, value)` pairs
    pub fn entries(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.table
            .headers
            .iter()
            .map(String::as_str)
            .zip(self.cells.iter().map(String::as_str))
    }

    /// Number of cells in this row
    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.cells.len()
    }
}

/// Parse a taste level cell
///
/// A run of `★` counts stars; otherwise the digits in the cell are read as a
/// number; anything else is `0`. Capped at `max`.
#[must_use]
pub fn parse_level(value: Option<&str>, max: u8) -> u8 {
    let Some(value) = value else {
        return 0;
    };
    let stars = value.chars().filter(|&c| c == '★').count();
    let level = if stars > 0 {
        stars
    } else {
        let digits: String = value.chars().filter(char::is_ascii_digit).collect();
        digits.parse::<usize>().unwrap_or(0)
    };
    u8::try_from(level.min(usize::from(max))).unwrap_or(max)
}

/// Parse a price cell such as `18,000`
///
/// Thousands separators are stripped; unparseable text is `0`.
#[must_use]
pub fn parse_price(value: Option<&str>) -> u32 {
    let Some(value) = value else {
        return 0;
    };
    let cleaned: String = value.chars().filter(|&c| c != ',').collect();
    let cleaned = cleaned.trim();
    if let Ok(price) = cleaned.parse::<u32>() {
        return price;
    }
    match cleaned.parse::<f64>() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(p) if p.is_finite() && p >= 0.0 && p <= f64::from(u32::MAX) => p.round() as u32,
        _ => 0,
    }
}

/// Split a comma-separated tag cell
#[must_use]
pub fn parse_tags(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
