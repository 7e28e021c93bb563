//! Table output for list commands
//!
//! List commands build one [`Table`] of display strings and hand it the
//! resolved format; JSON and YAML bypass the table and serialize the
//! entities themselves.

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::OutputFormat;

/// Rows of a listing, each keyed by the entity id
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<(String, Vec<String>)>,
    noun: &'static str,
}

impl Table {
    /// `noun` names one row in the summary line, e.g. "car"
    pub fn new(noun: &'static str, headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
            noun,
        }
    }

    /// Add a row; `id` is what `--format id` prints for it
    pub fn push(&mut self, id: impl ToString, cells: Vec<String>) {
        self.rows.push((id.to_string(), cells));
    }

    /// Print in the given format; JSON/YAML are the caller's job
    pub fn print(&self, format: OutputFormat, quiet: bool) -> Result<()> {
        match format {
            OutputFormat::Id => {
                for (id, _) in &self.rows {
                    println!("{}", id);
                }
            }
            OutputFormat::Csv => print!("{}", self.to_csv()?),
            OutputFormat::Md => println!("{}", self.to_markdown()),
            _ => self.print_tsv(quiet),
        }
        Ok(())
    }

    fn print_tsv(&self, quiet: bool) {
        if self.rows.is_empty() {
            if !quiet {
                println!("No {}s found.", self.noun);
            }
            return;
        }

        if !quiet {
            let header: Vec<String> = self
                .headers
                .iter()
                .map(|h| style(h.to_uppercase()).bold().to_string())
                .collect();
            println!("{}", header.join("\t"));
        }
        for (_, cells) in &self.rows {
            println!("{}", cells.join("\t"));
        }
        if !quiet {
            println!();
            println!("{} {}(s) found.", style(self.rows.len()).cyan(), self.noun);
        }
    }

    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers).into_diagnostic()?;
        for (_, cells) in &self.rows {
            writer.write_record(cells).into_diagnostic()?;
        }
        writer.flush().into_diagnostic()?;
        let bytes = writer
            .into_inner()
            .map_err(|e| miette::miette!("failed to write CSV: {}", e.error()))?;
        String::from_utf8(bytes).into_diagnostic()
    }

    pub fn to_markdown(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.headers.iter().copied());
        for (_, cells) in &self.rows {
            builder.push_record(cells.iter().map(String::as_str));
        }
        builder.build().with(Style::markdown()).to_string()
    }
}
