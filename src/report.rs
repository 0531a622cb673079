// src/report.rs
//! Operator-facing stdout: "Step... OK" status lines and plain-text tables.

use std::fmt::Display;
use std::io::Write;

use console::style;

use crate::error::RunError;
use crate::listings::{Cinema, Film};

/// Writes operator output. Write failures on the terminal are not worth
/// failing a run over, so they are dropped here.
pub struct Console<W: Write> {
    out: W,
    styled: bool,
    /// Step whose status line is still open.
    pending: Option<String>,
}

impl Console<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self {
            out: std::io::stdout(),
            styled: console::colors_enabled(),
            pending: None,
        }
    }
}

impl<W: Write> Console<W> {
    /// No colour codes; what tests and pipes want.
    pub fn plain(out: W) -> Self {
        Self {
            out,
            styled: false,
            pending: None,
        }
    }

    pub fn begin(&mut self, step: impl Display) {
        let step = step.to_string();
        let _ = write!(self.out, "{step}... ");
        let _ = self.out.flush();
        self.pending = Some(step);
    }

    pub fn ok(&mut self) {
        self.pending = None;
        if self.styled {
            let _ = writeln!(self.out, "{}", style("OK").green());
        } else {
            let _ = writeln!(self.out, "OK");
        }
    }

    pub fn error(&mut self) {
        self.pending = None;
        if self.styled {
            let _ = writeln!(self.out, "{}", style("ERROR").red().bold());
        } else {
            let _ = writeln!(self.out, "ERROR");
        }
    }

    /// Close the pending status line according to `res` and pass it through.
    pub fn finish<T>(&mut self, res: Result<T, RunError>) -> Result<T, RunError> {
        match &res {
            Ok(_) => self.ok(),
            Err(_) => self.error(),
        }
        res
    }

    /// A full line of output. While a step is open the line is printed
    /// beneath it and the step's status line is started again.
    pub fn line(&mut self, s: impl Display) {
        match &self.pending {
            Some(step) => {
                let _ = write!(self.out, "\n{s}\n{step}... ");
                let _ = self.out.flush();
            }
            None => {
                let _ = writeln!(self.out, "{s}");
            }
        }
    }

    /// Pre-formatted text, written as is.
    pub fn print(&mut self, s: &str) {
        let _ = write!(self.out, "{s}");
    }

    pub fn blank(&mut self) {
        let _ = writeln!(self.out);
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Minimal bordered table, sized to its widest cell per column.
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
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

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let border: String = widths
            .iter()
            .map(|w| format!("+{}", "-".repeat(w + 2)))
            .collect::<String>()
            + "+\n";

        let fmt_row = |cells: &[String]| -> String {
            let mut line = String::new();
            for (i, w) in widths.iter().enumerate() {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                let pad = w - cell.chars().count();
                line.push_str(&format!("| {cell}{} ", " ".repeat(pad)));
            }
            line.push_str("|\n");
            line
        };

        let upper: Vec<String> = self.headers.iter().map(|h| h.to_uppercase()).collect();
        let mut out = String::new();
        out.push_str(&border);
        out.push_str(&fmt_row(&upper));
        out.push_str(&border);
        for row in &self.rows {
            out.push_str(&fmt_row(row));
        }
        if !self.rows.is_empty() {
            out.push_str(&border);
        }
        out
    }
}

/// (Title, Date, Time) for every show of every film. Any unparseable show
/// time fails the whole table.
pub fn screenings_table(films: &[Film]) -> Result<Table, RunError> {
    let mut table = Table::new(["Title", "Date", "Time"]);
    for film in films {
        for show in &film.shows {
            let (date, time) = show.display_date_time()?;
            table.push_row(vec![film.title.clone(), date, time]);
        }
    }
    Ok(table)
}

pub fn cinemas_table(cinemas: &[Cinema]) -> Table {
    let mut table = Table::new(["ID", "Name"]);
    for c in cinemas {
        table.push_row(vec![c.id.to_string(), c.name.clone()]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::Show;

    #[test]
    fn status_lines_end_with_ok_or_error() {
        let mut c = Console::plain(Vec::new());
        c.begin("Finding cinema");
        let _ = c.finish::<()>(Ok(()));
        c.begin("Writing notifications file");
        let _ = c.finish::<()>(Err(RunError::CinemaNotFound(4)));
        let s = String::from_utf8(c.into_inner()).unwrap();
        assert_eq!(
            s,
            "Finding cinema... OK\nWriting notifications file... ERROR\n"
        );
    }

    #[test]
    fn lines_inside_an_open_step_reopen_it() {
        let mut c = Console::plain(Vec::new());
        c.begin("Sending SMS notifications");
        c.line("X on Mon  5 Mar @ 20:30: u1");
        c.ok();
        c.line("after");
        let s = String::from_utf8(c.into_inner()).unwrap();
        assert_eq!(
            s,
            "Sending SMS notifications... \nX on Mon  5 Mar @ 20:30: u1\nSending SMS notifications... OK\nafter\n"
        );
    }

    #[test]
    fn table_pads_to_widest_cell() {
        let mut t = Table::new(["ID", "Name"]);
        t.push_row(vec!["1".into(), "Aberdeen".into()]);
        t.push_row(vec!["12".into(), "Ely".into()]);
        let expected = "\
+----+----------+
| ID | NAME     |
+----+----------+
| 1  | Aberdeen |
| 12 | Ely      |
+----+----------+
";
        assert_eq!(t.render(), expected);
    }

    #[test]
    fn screenings_table_lists_every_show() {
        let films = vec![Film::new(
            "X : Unlimited Screening",
            vec![
                Show::new("u1", "2018-03-05T20:30:00"),
                Show::new("u2", "2018-03-06T18:00:00"),
            ],
        )];
        let t = screenings_table(&films).unwrap();
        assert_eq!(t.len(), 2);
        let out = t.render();
        assert!(out.contains("| X : Unlimited Screening | Mon  5 Mar | 20:30 |"));
        assert!(out.contains("| X : Unlimited Screening | Tue  6 Mar | 18:00 |"));
    }

    #[test]
    fn no_films_renders_header_only() {
        let t = screenings_table(&[]).unwrap();
        assert!(t.is_empty());
        assert_eq!(
            t.render(),
            "+-------+------+------+\n| TITLE | DATE | TIME |\n+-------+------+------+\n"
        );
    }

    #[test]
    fn screenings_table_fails_on_bad_time() {
        let films = vec![Film::new("X", vec![Show::new("u1", "soon")])];
        assert!(screenings_table(&films).is_err());
    }
}
