use crate::domain::model::{Article, StockStatus};
use crate::utils::error::{AppError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Table,
    Csv,
    Json,
}

/// 報表中的一列：文章欄位加上推導出的庫存狀態
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub quantity: u32,
    pub unit: &'a str,
    pub low_stock_threshold: u32,
    pub status: StockStatus,
}

impl<'a> From<&'a Article> for ReportRow<'a> {
    fn from(article: &'a Article) -> Self {
        Self {
            id: article.id.as_str(),
            name: &article.name,
            quantity: article.quantity,
            unit: &article.unit,
            low_stock_threshold: article.low_stock_threshold,
            status: article.stock_status(),
        }
    }
}

pub fn render<'a, I>(articles: I, format: ReportFormat) -> Result<String>
where
    I: IntoIterator<Item = &'a Article>,
{
    let rows: Vec<ReportRow<'a>> = articles.into_iter().map(ReportRow::from).collect();
    match format {
        ReportFormat::Table => Ok(render_table(&rows)),
        ReportFormat::Csv => render_csv(&rows),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(&rows)?),
    }
}

fn render_table(rows: &[ReportRow<'_>]) -> String {
    const HEADERS: [&str; 5] = ["#", "Quantity", "Unit", "Threshold", "Status"];

    let cells: Vec<[String; 5]> = rows
        .iter()
        .map(|row| {
            [
                row.name.to_string(),
                row.quantity.to_string(),
                row.unit.to_string(),
                row.low_stock_threshold.to_string(),
                row.status.label().to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |values: [&str; 5]| {
        values
            .iter()
            .zip(widths)
            .map(|(value, width)| format!("{:<width$}", value, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_line(HEADERS)];
    for line in &cells {
        lines.push(format_line([
            line[0].as_str(),
            line[1].as_str(),
            line[2].as_str(),
            line[3].as_str(),
            line[4].as_str(),
        ]));
    }
    if cells.is_empty() {
        lines.push("(no articles)".to_string());
    }
    lines.join("\n")
}

fn render_csv(rows: &[ReportRow<'_>]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["id", "name", "quantity", "unit", "lowStockThreshold", "status"])?;
    for row in rows {
        let quantity = row.quantity.to_string();
        let threshold = row.low_stock_threshold.to_string();
        writer.write_record([
            row.id,
            row.name,
            quantity.as_str(),
            row.unit,
            threshold.as_str(),
            row.status.label(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| AppError::ConfigError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn articles() -> Vec<Article> {
        vec![
            Article {
                id: "a1".into(),
                name: "Bolt".to_string(),
                quantity: 10,
                unit: "pcs".to_string(),
                low_stock_threshold: 5,
            },
            Article {
                id: "a2".into(),
                name: "Copper wire".to_string(),
                quantity: 2,
                unit: "m".to_string(),
                low_stock_threshold: 2,
            },
        ]
    }

    #[test]
    fn test_table_marks_low_stock() {
        let output = render(&articles(), ReportFormat::Table).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("#"));
        assert!(lines[1].starts_with("Bolt ") && lines[1].ends_with("In stock"));
        assert!(lines[2].starts_with("Copper wire") && lines[2].ends_with("Low stock"));
    }

    #[test]
    fn test_empty_table() {
        let output = render(&Vec::<Article>::new(), ReportFormat::Table).unwrap();
        assert!(output.ends_with("(no articles)"));
    }

    #[test]
    fn test_csv_output() {
        let output = render(&articles(), ReportFormat::Csv).unwrap();
        let mut reader = csv::Reader::from_reader(output.as_bytes());

        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[4], "lowStockThreshold");

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[1][1], "Copper wire");
        assert_eq!(&records[1][5], "Low stock");
    }

    #[test]
    fn test_json_output_includes_status() {
        let output = render(&articles(), ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value[0]["status"], "in_stock");
        assert_eq!(value[1]["status"], "low_stock");
        assert_eq!(value[1]["lowStockThreshold"], 2);
    }
}
