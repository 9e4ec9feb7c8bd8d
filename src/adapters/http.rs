use crate::domain::model::{
    Article, ArticleId, CreateArticleRequest, UpdateArticleRequest, UpdateQuantityRequest,
};
use crate::domain::ports::{ArticleService, ConfigProvider, ServiceResult};
use crate::utils::error::{AppError, ArticleError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

/// 以 REST/JSON 與庫存後端溝通的 ArticleService 實作
#[derive(Debug, Clone)]
pub struct HttpArticleService {
    client: Client,
    base_url: Url,
}

impl HttpArticleService {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let base_url = Url::parse(config.base_url()).map_err(|e| AppError::InvalidConfigValueError {
            field: "base_url".to_string(),
            value: config.base_url().to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::InvalidConfigValueError {
                field: "base_url".to_string(),
                value: config.base_url().to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        let mut headers = HeaderMap::new();
        for (key, value) in config.headers() {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                AppError::InvalidConfigValueError {
                    field: "headers".to_string(),
                    value: key.clone(),
                    reason: e.to_string(),
                }
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| AppError::InvalidConfigValueError {
                field: format!("headers.{}", key),
                value: value.clone(),
                reason: e.to_string(),
            })?;
            headers.insert(name, value);
        }

        // 不設定逾時時請求可能無限期等待
        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| AppError::ConfigError {
            message: format!("Failed to build HTTP client: {}", e),
        })?;

        tracing::debug!("HTTP article service targeting {}", base_url);
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, request: RequestBuilder) -> ServiceResult<Option<String>> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("📡 {} responded {}", response.url(), status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ArticleError::remote(status.as_u16(), &body);
            tracing::warn!("❌ Inventory service responded {}: {}", status, err);
            return Err(err);
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        // 有些後端會以 200 回傳空內容
        let text = response.text().await?;
        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }

    fn parse<T: DeserializeOwned>(body: Option<String>) -> ServiceResult<T> {
        let body = body.ok_or_else(|| ArticleError::malformed("empty response body"))?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ArticleService for HttpArticleService {
    async fn list(&self) -> ServiceResult<Vec<Article>> {
        let url = self.endpoint(&["articles"]);
        tracing::debug!("📡 GET {}", url);
        let body = self.send(self.client.get(url)).await?;
        Self::parse(body)
    }

    async fn create(&self, request: &CreateArticleRequest) -> ServiceResult<Article> {
        let url = self.endpoint(&["articles"]);
        tracing::debug!("📡 POST {}", url);
        let body = self.send(self.client.post(url).json(request)).await?;
        Self::parse(body)
    }

    async fn update_metadata(
        &self,
        id: &ArticleId,
        request: &UpdateArticleRequest,
    ) -> ServiceResult<Article> {
        let url = self.endpoint(&["articles", id.as_str()]);
        tracing::debug!("📡 PUT {}", url);
        let body = self.send(self.client.put(url).json(request)).await?;
        Self::parse(body)
    }

    async fn update_quantity(
        &self,
        id: &ArticleId,
        request: UpdateQuantityRequest,
    ) -> ServiceResult<Article> {
        let url = self.endpoint(&["articles", id.as_str(), "quantity"]);
        tracing::debug!("📡 PATCH {}", url);
        let body = self.send(self.client.patch(url).json(&request)).await?;
        Self::parse(body)
    }

    async fn delete(&self, id: &ArticleId) -> ServiceResult<()> {
        let url = self.endpoint(&["articles", id.as_str()]);
        tracing::debug!("📡 DELETE {}", url);
        self.send(self.client.delete(url)).await?;
        Ok(())
    }
}
