//! Console summaries of the cleaning and ranking results

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{CleanOutcome, SignificanceRecord, SignificanceReport};

/// Summary of one analysis run
#[derive(Debug, Default)]
pub struct AnalysisSummary {
    pub initial_parameters: usize,
    pub dropped_missing: Vec<String>,
    pub dropped_variance: Vec<String>,
    pub imputed_cells: usize,
    pub clean_parameters: usize,
    pub tested: usize,
    pub skipped: Vec<String>,
    pub significant: usize,
    pub significance_level: f64,
    pub load_time: Duration,
    pub clean_time: Duration,
    pub rank_time: Duration,
    pub save_time: Duration,
}

impl AnalysisSummary {
    pub fn new(initial_parameters: usize, significance_level: f64) -> Self {
        Self {
            initial_parameters,
            clean_parameters: initial_parameters,
            significance_level,
            ..Default::default()
        }
    }

    pub fn add_cleaning(&mut self, clean: &CleanOutcome) {
        self.dropped_missing = clean.dropped_all_missing.clone();
        self.dropped_variance = clean
            .dropped_low_variance
            .iter()
            .map(|(name, _)| name.clone())
            .collect();
        self.imputed_cells = clean.imputed_cells;
        self.clean_parameters = clean.surviving.len();
    }

    pub fn add_ranking(&mut self, report: &SignificanceReport) {
        self.tested = report.len();
        self.skipped = report.skipped.clone();
        self.significant = report.significant_count(self.significance_level);
    }

    pub fn set_load_time(&mut self, duration: Duration) {
        self.load_time = duration;
    }

    pub fn set_clean_time(&mut self, duration: Duration) {
        self.clean_time = duration;
    }

    pub fn set_rank_time(&mut self, duration: Duration) {
        self.rank_time = duration;
    }

    pub fn set_save_time(&mut self, duration: Duration) {
        self.save_time = duration;
    }

    pub fn total_time(&self) -> Duration {
        self.load_time + self.clean_time + self.rank_time + self.save_time
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("ANALYSIS SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        let drop_color = |dropped: &[String]| {
            if dropped.is_empty() {
                Color::White
            } else {
                Color::Red
            }
        };

        table.add_row(vec![
            Cell::new("📁 Initial Parameters"),
            Cell::new(self.initial_parameters),
        ]);
        table.add_row(vec![
            Cell::new("🗑️  Dropped (All Missing)"),
            Cell::new(self.dropped_missing.len()).fg(drop_color(&self.dropped_missing)),
        ]);
        table.add_row(vec![
            Cell::new("🩹 Imputed Cells"),
            Cell::new(self.imputed_cells),
        ]);
        table.add_row(vec![
            Cell::new("📏 Dropped (Low Variance)"),
            Cell::new(self.dropped_variance.len()).fg(drop_color(&self.dropped_variance)),
        ]);
        table.add_row(vec![
            Cell::new("✅ Clean Parameters"),
            Cell::new(self.clean_parameters)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("🧪 Tested"),
            Cell::new(self.tested),
        ]);
        table.add_row(vec![
            Cell::new("⏭️  Skipped (< min samples)"),
            Cell::new(self.skipped.len()).fg(drop_color(&self.skipped)),
        ]);
        table.add_row(vec![
            Cell::new(format!("🎯 Significant (p < {})", self.significance_level)),
            Cell::new(format!("{} of {}", self.significant, self.tested))
                .fg(Color::Yellow)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("⏱️  Total Time"),
            Cell::new(format!("{:.2}s", self.total_time().as_secs_f64())),
        ]);

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if !self.skipped.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Skipped Parameters").yellow(),
                style(format!("({})", self.skipped.len())).dim()
            );
            for name in &self.skipped {
                println!("        {} {}", style("•").dim(), name);
            }
        }
    }
}

fn p_value_color(p_value: f64) -> Color {
    if p_value < 0.001 {
        Color::Red
    } else if p_value < 0.01 {
        Color::Magenta
    } else if p_value < 0.05 {
        Color::Yellow
    } else {
        Color::White
    }
}

/// Build the top-K table of the most significant parameters
pub fn top_parameters_table(records: &[SignificanceRecord]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Parameter").add_attribute(Attribute::Bold),
        Cell::new("p-value").add_attribute(Attribute::Bold),
        Cell::new("Pass Mean").add_attribute(Attribute::Bold),
        Cell::new("Fail Mean").add_attribute(Attribute::Bold),
        Cell::new("Δ %").add_attribute(Attribute::Bold),
    ]);

    for record in records {
        table.add_row(vec![
            Cell::new(record.rank),
            Cell::new(&record.parameter),
            Cell::new(format!("{:.2e}", record.p_value)).fg(p_value_color(record.p_value)),
            Cell::new(record.pass_mean).set_alignment(CellAlignment::Right),
            Cell::new(record.fail_mean).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:+.2}", record.pct_diff)).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

/// Print the top-K most significant parameters
pub fn display_top_parameters(report: &SignificanceReport, k: usize) {
    println!();
    println!(
        "    {} {}",
        style("🏆").cyan(),
        style(format!("TOP {} YIELD-LIMITING PARAMETERS", k)).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();

    if report.is_empty() {
        println!("    No parameters had enough observations to test");
        return;
    }

    for line in top_parameters_table(report.top(k)).to_string().lines() {
        println!("    {}", line);
    }
}
