use std::{
    fmt::Display,
    io::{BufRead, ErrorKind, Write},
    str::FromStr,
};

use crate::util::error::{Error, Result};

const ELLIPSIS: &str = "...";

/// one rendered table row
pub struct Row(pub Vec<String>);

impl From<Vec<String>> for Row {
    fn from(value: Vec<String>) -> Self {
        Row(value)
    }
}

/// Line-oriented terminal
///
/// Every read fails with [`Error::Io`] once input is exhausted, which is how
/// menu loops learn they should stop.
pub struct Console<R, W> {
    input: R,
    output: W,
    max_width: usize,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, max_width: usize) -> Self {
        Self {
            input,
            output,
            max_width: max_width.max(ELLIPSIS.len() + 1),
        }
    }
    /// Print `prompt` and read one trimmed line
    ///
    /// A line that is not valid UTF-8 is consumed and asked for again.
    pub fn line(&mut self, prompt: &str) -> Result<String> {
        let mut buf = String::new();
        loop {
            write!(self.output, "{}", prompt)?;
            self.output.flush()?;

            buf.clear();
            match self.input.read_line(&mut buf) {
                Ok(0) => return Err(std::io::Error::from(ErrorKind::UnexpectedEof).into()),
                Ok(_) => return Ok(buf.trim().to_owned()),
                Err(err) if err.kind() == ErrorKind::InvalidData => {
                    self.message("Invalid input, please try again.")?
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
    /// read until the line parses as `T`
    pub fn input<T: FromStr>(&mut self, prompt: &str) -> Result<T> {
        loop {
            match self.line(prompt)?.parse() {
                Ok(x) => return Ok(x),
                Err(_) => self.message("Invalid input, please try again.")?,
            }
        }
    }
    /// read until the line is not empty
    pub fn required(&mut self, prompt: &str) -> Result<String> {
        loop {
            let line = self.line(prompt)?;
            if !line.is_empty() {
                return Ok(line);
            }
            self.message("This field is required.")?;
        }
    }
    /// empty line is `None`
    pub fn optional(&mut self, prompt: &str) -> Result<Option<String>> {
        let line = self.line(prompt)?;
        Ok((!line.is_empty()).then_some(line))
    }
    /// empty line is `None`, anything else must parse as `T`
    pub fn optional_input<T: FromStr>(&mut self, prompt: &str) -> Result<Option<T>> {
        loop {
            let line = self.line(prompt)?;
            if line.is_empty() {
                return Ok(None);
            }
            match line.parse() {
                Ok(x) => return Ok(Some(x)),
                Err(_) => self.message("Invalid input, please try again.")?,
            }
        }
    }
    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let line = self.line(&format!("{} (y/n): ", prompt))?;
        Ok(matches!(line.to_lowercase().as_str(), "y" | "yes"))
    }
    /// Show numbered options and return the 0-based index picked
    pub fn menu(&mut self, title: &str, options: &[&str]) -> Result<usize> {
        writeln!(self.output, "\n=== {} ===", title)?;
        for (n, option) in options.iter().enumerate() {
            writeln!(self.output, "{}. {}", n + 1, option)?;
        }
        loop {
            let choice: usize = self.input("Enter your choice: ")?;
            if (1..=options.len()).contains(&choice) {
                return Ok(choice - 1);
            }
            self.message("Invalid choice, please try again.")?;
        }
    }
    pub fn message(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }
    /// render a controller failure as `[kind] message`
    pub fn error(&mut self, err: &Error) -> Result<()> {
        writeln!(self.output, "[{}] {}", err.kind(), err)?;
        Ok(())
    }
    fn truncate(&self, cell: &str) -> String {
        if cell.chars().count() <= self.max_width {
            return cell.to_owned();
        }
        let kept: String = cell.chars().take(self.max_width - ELLIPSIS.len()).collect();
        kept + ELLIPSIS
    }
    /// Render rows as aligned columns, each cell cut to the column width limit
    pub fn table<I, T>(&mut self, headers: &[&str], rows: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<Row>,
    {
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into().0.iter().map(|x| self.truncate(x)).collect())
            .collect();
        if rows.is_empty() {
            return self.message("No records found.");
        }
        let headers: Vec<String> = headers.iter().map(|x| self.truncate(x)).collect();

        let mut widths: Vec<usize> = headers.iter().map(|x| x.chars().count()).collect();
        for row in &rows {
            for (n, cell) in row.iter().enumerate().take(widths.len()) {
                widths[n] = widths[n].max(cell.chars().count());
            }
        }

        self.row(&headers, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(self.output, "{}", rule.join("-+-"))?;
        for row in &rows {
            self.row(row, &widths)?;
        }
        Ok(())
    }
    fn row(&mut self, cells: &[String], widths: &[usize]) -> Result<()> {
        let line: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(n, w)| {
                let cell = cells.get(n).map(String::as_str).unwrap_or_default();
                format!("{:<width$}", cell, width = w)
            })
            .collect();
        writeln!(self.output, "{}", line.join(" | ").trim_end())?;
        Ok(())
    }
    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
