use crate::utils::error::ArticleError;
use crate::utils::validation::{validate_non_negative, validate_required_text};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 伺服器在建立時指派的識別碼，之後不可變
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(String);

impl ArticleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArticleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ArticleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A stocked item as confirmed by the inventory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    pub name: String,
    pub quantity: u32,
    pub unit: String,
    pub low_stock_threshold: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
}

impl StockStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::InStock => "In stock",
            Self::LowStock => "Low stock",
        }
    }
}

impl Article {
    /// 低庫存判定：數量「小於或等於」門檻即視為低庫存，全專案只用這一個規則
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.low_stock_threshold
    }

    pub fn stock_status(&self) -> StockStatus {
        if self.is_low_stock() {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    /// 檢查實體不變式（數值非負已由型別保證）
    pub fn validate(&self) -> Result<(), ArticleError> {
        if self.id.as_str().trim().is_empty() {
            return Err(ArticleError::malformed("article without id"));
        }
        if self.name.trim().is_empty() {
            return Err(ArticleError::malformed(format!(
                "article {} has an empty name",
                self.id
            )));
        }
        if self.unit.trim().is_empty() {
            return Err(ArticleError::malformed(format!(
                "article {} has an empty unit",
                self.id
            )));
        }
        Ok(())
    }
}

/// Fields for a new article. Integers are signed so that negative user input
/// can be represented and rejected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub name: String,
    pub quantity: i64,
    pub unit: String,
    pub low_stock_threshold: i64,
}

/// 建立文章時送出的請求內容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    pub name: String,
    pub quantity: u32,
    pub unit: String,
    pub low_stock_threshold: u32,
}

impl NewArticle {
    pub fn validate(&self) -> Result<CreateArticleRequest, ArticleError> {
        Ok(CreateArticleRequest {
            name: validate_required_text("name", &self.name)?,
            quantity: validate_non_negative("quantity", self.quantity)?,
            unit: validate_required_text("unit", &self.unit)?,
            low_stock_threshold: validate_non_negative(
                "lowStockThreshold",
                self.low_stock_threshold,
            )?,
        })
    }
}

/// Metadata edit. Quantity is deliberately absent: it only changes through
/// [`QuantityChange`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleUpdate {
    pub name: String,
    pub unit: String,
    pub low_stock_threshold: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleRequest {
    pub name: String,
    pub unit: String,
    pub low_stock_threshold: u32,
}

impl ArticleUpdate {
    pub fn validate(&self) -> Result<UpdateArticleRequest, ArticleError> {
        Ok(UpdateArticleRequest {
            name: validate_required_text("name", &self.name)?,
            unit: validate_required_text("unit", &self.unit)?,
            low_stock_threshold: validate_non_negative(
                "lowStockThreshold",
                self.low_stock_threshold,
            )?,
        })
    }
}

impl From<&Article> for ArticleUpdate {
    fn from(article: &Article) -> Self {
        Self {
            name: article.name.clone(),
            unit: article.unit.clone(),
            low_stock_threshold: i64::from(article.low_stock_threshold),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// 直接設定新的數量
    Set(i64),
    /// 以目前已確認的數量加減
    Adjust(i64),
}

impl QuantityChange {
    /// 計算候選數量；負值或溢位都在本地拒絕
    pub fn resolve(self, current: Option<u32>) -> Result<u32, ArticleError> {
        let candidate = match self {
            Self::Set(value) => value,
            Self::Adjust(delta) => {
                let current = current.ok_or_else(|| {
                    ArticleError::validation(
                        "quantity",
                        "cannot adjust the quantity of an article that is not loaded",
                    )
                })?;
                i64::from(current).checked_add(delta).ok_or_else(|| {
                    ArticleError::validation("quantity", "quantity is out of range")
                })?
            }
        };
        validate_non_negative("quantity", candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bolt(quantity: u32, threshold: u32) -> Article {
        Article {
            id: "a1".into(),
            name: "Bolt".to_string(),
            quantity,
            unit: "pcs".to_string(),
            low_stock_threshold: threshold,
        }
    }

    #[test]
    fn test_low_stock_boundary_pair() {
        assert!(bolt(5, 5).is_low_stock());
        assert!(!bolt(6, 5).is_low_stock());
        assert!(bolt(0, 0).is_low_stock());
        assert_eq!(bolt(5, 5).stock_status(), StockStatus::LowStock);
        assert_eq!(bolt(10, 5).stock_status(), StockStatus::InStock);
    }

    #[test]
    fn test_article_json_uses_camel_case() {
        let json = serde_json::json!({
            "id": "a1",
            "name": "Bolt",
            "quantity": 10,
            "unit": "pcs",
            "lowStockThreshold": 5
        });
        let article: Article = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(article, bolt(10, 5));
        assert_eq!(serde_json::to_value(&article).unwrap(), json);
    }

    #[test]
    fn test_negative_quantity_in_payload_is_rejected() {
        let json = r#"{"id":"a1","name":"Bolt","quantity":-3,"unit":"pcs","lowStockThreshold":5}"#;
        assert!(serde_json::from_str::<Article>(json).is_err());
    }

    #[test]
    fn test_article_validate_rejects_blank_fields() {
        let mut article = bolt(1, 1);
        article.unit = " ".to_string();
        assert!(matches!(
            article.validate(),
            Err(ArticleError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_new_article_validation() {
        let input = NewArticle {
            name: " Bolt ".to_string(),
            quantity: 10,
            unit: "pcs".to_string(),
            low_stock_threshold: 5,
        };
        let request = input.validate().unwrap();
        assert_eq!(request.name, "Bolt");
        assert_eq!(request.quantity, 10);

        let negative_threshold = NewArticle {
            low_stock_threshold: -1,
            ..input
        };
        let err = negative_threshold.validate().unwrap_err();
        assert_eq!(
            err,
            ArticleError::Validation {
                field: "lowStockThreshold".to_string(),
                message: "lowStockThreshold must be ≥ 0".to_string(),
            }
        );
    }

    #[test]
    fn test_update_request_has_no_quantity() {
        let update = ArticleUpdate {
            name: "Bolt M6".to_string(),
            unit: "pcs".to_string(),
            low_stock_threshold: 3,
        };
        let json = serde_json::to_value(update.validate().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "Bolt M6", "unit": "pcs", "lowStockThreshold": 3})
        );
    }

    #[test]
    fn test_quantity_change_resolve() {
        assert_eq!(QuantityChange::Set(5).resolve(None).unwrap(), 5);
        assert_eq!(QuantityChange::Adjust(-2).resolve(Some(5)).unwrap(), 3);
        assert!(QuantityChange::Set(-1).resolve(Some(5)).is_err());
        assert!(QuantityChange::Adjust(-6).resolve(Some(5)).is_err());
        assert!(QuantityChange::Adjust(1).resolve(None).is_err());
    }
}
