use crate::utils::error::{AppError, ArticleError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AppError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_header_name(field_name: &str, name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b));
    if !valid {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "Not a valid HTTP header name".to_string(),
        });
    }
    Ok(())
}

// 以下為文章表單欄位的本地檢查，失敗時不會發出網路請求

/// 數量類欄位必須 ≥ 0，並且能放進 u32
pub fn validate_non_negative(field_name: &str, value: i64) -> std::result::Result<u32, ArticleError> {
    if value < 0 {
        return Err(ArticleError::validation(
            field_name,
            format!("{} must be ≥ 0", field_name),
        ));
    }
    u32::try_from(value).map_err(|_| {
        ArticleError::validation(field_name, format!("{} is too large", field_name))
    })
}

/// 去除前後空白後不可為空，回傳修剪後的值
pub fn validate_required_text(field_name: &str, value: &str) -> std::result::Result<String, ArticleError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ArticleError::validation(
            field_name,
            format!("{} must not be empty", field_name),
        ));
    }
    Ok(trimmed.to_string())
}
