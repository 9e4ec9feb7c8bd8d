use crate::config::toml_config::TomlConfig;
use crate::config::{ServiceSettings, DEFAULT_BASE_URL};
use crate::domain::model::{ArticleId, ArticleUpdate, NewArticle, QuantityChange};
use crate::report::ReportFormat;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "inventaro")]
#[command(about = "Stock inventory client: list, create, edit and restock articles")]
pub struct CliConfig {
    /// Base URL of the inventory service (overrides the config file)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Request timeout in seconds; requests wait indefinitely when unset
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List all articles with their stock status
    List {
        /// Only show articles at or below their threshold
        #[arg(long)]
        low_stock_only: bool,

        #[arg(long, value_enum)]
        format: Option<ReportFormat>,
    },
    /// Create a new article
    Create(ArticleFields),
    /// Edit name, unit and threshold of an article (quantity is left unchanged)
    Update {
        id: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        unit: String,

        #[arg(long, allow_negative_numbers = true)]
        threshold: i64,
    },
    /// Set or adjust the on-hand quantity of an article
    Quantity {
        id: String,

        #[command(flatten)]
        change: QuantityArgs,
    },
    /// Delete an article
    Delete { id: String },
}

#[derive(Debug, Clone, Args)]
pub struct ArticleFields {
    #[arg(long)]
    pub name: String,

    #[arg(long, allow_negative_numbers = true)]
    pub quantity: i64,

    #[arg(long)]
    pub unit: String,

    #[arg(long, allow_negative_numbers = true)]
    pub threshold: i64,
}

/// 二選一：設定絕對值或以差值調整
#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct QuantityArgs {
    /// New absolute quantity
    #[arg(long, allow_negative_numbers = true)]
    pub set: Option<i64>,

    /// Amount to add (negative to remove)
    #[arg(long, allow_negative_numbers = true)]
    pub adjust: Option<i64>,
}

impl From<ArticleFields> for NewArticle {
    fn from(fields: ArticleFields) -> Self {
        Self {
            name: fields.name,
            quantity: fields.quantity,
            unit: fields.unit,
            low_stock_threshold: fields.threshold,
        }
    }
}

impl Command {
    pub fn update_input(&self) -> Option<(ArticleId, ArticleUpdate)> {
        match self {
            Self::Update {
                id,
                name,
                unit,
                threshold,
            } => Some((
                ArticleId::new(id.clone()),
                ArticleUpdate {
                    name: name.clone(),
                    unit: unit.clone(),
                    low_stock_threshold: *threshold,
                },
            )),
            _ => None,
        }
    }

    pub fn quantity_change(&self) -> Option<(ArticleId, QuantityChange)> {
        match self {
            Self::Quantity { id, change } => {
                let change = match (change.set, change.adjust) {
                    (Some(value), _) => QuantityChange::Set(value),
                    (None, Some(delta)) => QuantityChange::Adjust(delta),
                    (None, None) => return None,
                };
                Some((ArticleId::new(id.clone()), change))
            }
            _ => None,
        }
    }
}

/// CLI 合併後的執行設定
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub service: ServiceSettings,
    pub low_stock_only: bool,
    pub format: ReportFormat,
}

impl CliConfig {
    /// 先讀設定檔，再套用命令列覆蓋
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let file = match &self.config {
            Some(path) => {
                tracing::debug!("📁 Loading configuration from: {}", path);
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };

        let mut service = file.service.clone();
        if let Some(base_url) = &self.base_url {
            service.base_url = base_url.clone();
        }
        if service.base_url.trim().is_empty() {
            service.base_url = DEFAULT_BASE_URL.to_string();
        }
        if let Some(timeout) = self.timeout_seconds {
            service.timeout_seconds = Some(timeout);
        }
        service.validate()?;

        let (low_stock_only, format) = match &self.command {
            Command::List {
                low_stock_only,
                format,
            } => (
                *low_stock_only || file.low_stock_only(),
                format.unwrap_or_else(|| file.format()),
            ),
            _ => (file.low_stock_only(), file.format()),
        };

        Ok(ResolvedConfig {
            service,
            low_stock_only,
            format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_create_with_negative_quantity() {
        let cli = CliConfig::try_parse_from([
            "inventaro", "create", "--name", "Bolt", "--quantity", "-1", "--unit", "pcs",
            "--threshold", "5",
        ])
        .unwrap();

        match cli.command {
            Command::Create(fields) => {
                let input = NewArticle::from(fields);
                assert_eq!(input.quantity, -1);
                assert!(input.validate().is_err());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_quantity_requires_set_or_adjust() {
        assert!(CliConfig::try_parse_from(["inventaro", "quantity", "a1"]).is_err());

        let cli = CliConfig::try_parse_from(["inventaro", "quantity", "a1", "--adjust", "-3"]).unwrap();
        assert_eq!(
            cli.command.quantity_change(),
            Some((ArticleId::from("a1"), QuantityChange::Adjust(-3)))
        );
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(
                br#"
[service]
base_url = "http://from-file:8080"
timeout_seconds = 30

[display]
format = "json"
"#,
            )
            .unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        let cli = CliConfig::try_parse_from([
            "inventaro",
            "--config",
            path.as_str(),
            "--base-url",
            "http://override:9000",
            "list",
        ])
        .unwrap();
        let resolved = cli.resolve().unwrap();

        assert_eq!(resolved.service.base_url, "http://override:9000");
        assert_eq!(resolved.service.timeout_seconds, Some(30));
        assert_eq!(resolved.format, ReportFormat::Json);
        assert!(!resolved.low_stock_only);
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let cli = CliConfig::try_parse_from(["inventaro", "--base-url", "ftp://nope", "list"]).unwrap();
        assert!(cli.resolve().is_err());
    }
}
