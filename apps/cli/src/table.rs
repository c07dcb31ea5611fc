//! Plain-text column tables.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Rows of cells printed under a header line; every cell is indented by two
/// spaces and padded to its column width.
#[derive(Clone, Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    align: Vec<Align>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: &[(&str, Align)]) -> Self {
        Self {
            headers: columns.iter().map(|(h, _)| h.to_string()).collect(),
            align: columns.iter().map(|&(_, a)| a).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let w = cell.chars().count();
                match widths.get_mut(i) {
                    Some(cur) => *cur = (*cur).max(w),
                    None => widths.push(w),
                }
            }
        }

        let mut out = String::new();
        // headers are always left aligned
        line(&mut out, &self.headers, &widths, |_| Align::Left);
        for row in &self.rows {
            line(&mut out, row, &widths, |i| {
                self.align.get(i).copied().unwrap_or(Align::Left)
            });
        }
        out
    }
}

fn line(out: &mut String, cells: &[String], widths: &[usize], align: impl Fn(usize) -> Align) {
    let mut text = String::new();
    for (i, cell) in cells.iter().enumerate() {
        let width = widths[i];
        text.push_str("  ");
        match align(i) {
            Align::Left => text.push_str(&format!("{cell:<width$}")),
            Align::Right => text.push_str(&format!("{cell:>width$}")),
        }
    }
    out.push_str(text.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligns_columns() {
        let mut t = Table::new(&[("Name", Align::Left), ("Price", Align::Right)]);
        assert!(t.is_empty());
        t.row(vec!["Milk".into(), "2.40$".into()]);
        t.row(vec!["Corn Flakes".into(), "12.00$".into()]);
        let text = t.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  Name         Price");
        assert_eq!(lines[1], "  Milk          2.40$");
        assert_eq!(lines[2], "  Corn Flakes  12.00$");
    }

    #[test]
    fn short_rows_are_allowed() {
        let mut t = Table::new(&[("A", Align::Left), ("B", Align::Left)]);
        t.row(vec!["x".into()]);
        assert_eq!(t.render(), "  A  B\n  x\n");
    }
}
