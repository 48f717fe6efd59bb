use super::ui;
use crate::core::rates::{DailyRates, ResultSet};
use anyhow::{Context, Result};
use comfy_table::Cell;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One table per day
    #[default]
    Table,
    /// The full result as JSON
    Json,
}

impl DailyRates {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell("Sale"),
            ui::header_cell("Purchase"),
        ]);

        for (currency, quote) in &self.quotes {
            table.add_row(vec![
                Cell::new(currency),
                ui::format_optional_cell(quote.sale, format_rate),
                ui::format_optional_cell(quote.purchase, format_rate),
            ]);
        }

        let base = self
            .base_currency
            .as_deref()
            .map(|b| ui::style_text(&format!(" (in {b})"), ui::StyleType::Subtle))
            .unwrap_or_default();

        format!(
            "Rates for {}{}\n{}",
            ui::style_text(&self.date.to_string(), ui::StyleType::Title),
            base,
            table
        )
    }
}

fn format_rate(rate: f64) -> String {
    format!("{rate:.4}")
}

pub fn render(results: &ResultSet, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(results).context("Failed to serialize exchange rates")
        }
        OutputFormat::Table if results.is_empty() => Ok(ui::style_text(
            "No exchange rates were fetched.",
            ui::StyleType::Subtle,
        )),
        OutputFormat::Table => Ok(results
            .iter()
            .map(DailyRates::display_as_table)
            .collect::<Vec<_>>()
            .join("\n\n")),
    }
}
