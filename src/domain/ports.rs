use crate::domain::model::{
    Article, ArticleId, CreateArticleRequest, UpdateArticleRequest, UpdateQuantityRequest,
};
use crate::utils::error::ArticleError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

pub type ServiceResult<T> = std::result::Result<T, ArticleError>;

/// 遠端文章服務的契約，真正的儲存在後端
#[async_trait]
pub trait ArticleService: Send + Sync {
    async fn list(&self) -> ServiceResult<Vec<Article>>;
    async fn create(&self, request: &CreateArticleRequest) -> ServiceResult<Article>;
    async fn update_metadata(
        &self,
        id: &ArticleId,
        request: &UpdateArticleRequest,
    ) -> ServiceResult<Article>;
    async fn update_quantity(
        &self,
        id: &ArticleId,
        request: UpdateQuantityRequest,
    ) -> ServiceResult<Article>;
    async fn delete(&self, id: &ArticleId) -> ServiceResult<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn timeout(&self) -> Option<Duration>;
    fn headers(&self) -> &HashMap<String, String>;
}
