use crate::core::store::ArticleStore;
use crate::domain::model::{
    Article, ArticleId, ArticleUpdate, NewArticle, QuantityChange, UpdateQuantityRequest,
};
use crate::domain::ports::{ArticleService, ServiceResult};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

const NOTIFICATION_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationSeverity {
    Info,
    Destructive,
}

/// 給呈現層顯示的通知（標題 + 描述）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: NotificationSeverity,
    pub issued_at: DateTime<Utc>,
}

impl Notification {
    fn info(title: &str, description: String) -> Self {
        Self {
            title: title.to_string(),
            description,
            severity: NotificationSeverity::Info,
            issued_at: Utc::now(),
        }
    }

    fn destructive(title: &str, description: String) -> Self {
        Self {
            title: title.to_string(),
            description,
            severity: NotificationSeverity::Destructive,
            issued_at: Utc::now(),
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.severity == NotificationSeverity::Destructive
    }
}

/// Identifies one user action so that its submission state can be tracked
/// independently of other in-flight actions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionKey {
    Create,
    UpdateMetadata(ArticleId),
    AdjustQuantity(ArticleId),
    Delete(ArticleId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionStatus {
    pub phase: SubmissionPhase,
    /// 最近一次失敗的訊息，直到下一次嘗試或被明確清除
    pub error: Option<String>,
}

impl ActionStatus {
    pub fn is_submitting(&self) -> bool {
        self.phase == SubmissionPhase::Submitting
    }
}

/// 整頁載入狀態，與單一表單的錯誤分開
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageState {
    #[default]
    Unloaded,
    Loading,
    Ready,
    Failed { message: String },
}

/// Sequences user actions through validation, the remote call, store
/// reconciliation and notification.
///
/// The store is only written after the remote call has succeeded. Locks are
/// never held across a remote call, so independent actions can be awaited
/// concurrently; when two responses race for the same id the one that
/// completes last wins.
pub struct ArticleController<S: ArticleService> {
    service: S,
    store: Arc<RwLock<ArticleStore>>,
    actions: RwLock<HashMap<ActionKey, ActionStatus>>,
    page: RwLock<PageState>,
    notifications: broadcast::Sender<Notification>,
}

impl<S: ArticleService> ArticleController<S> {
    pub fn new(service: S, store: Arc<RwLock<ArticleStore>>) -> Self {
        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        Self {
            service,
            store,
            actions: RwLock::new(HashMap::new()),
            page: RwLock::new(PageState::Unloaded),
            notifications,
        }
    }

    pub fn store(&self) -> Arc<RwLock<ArticleStore>> {
        Arc::clone(&self.store)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    pub async fn page_state(&self) -> PageState {
        self.page.read().await.clone()
    }

    pub async fn status(&self, key: &ActionKey) -> ActionStatus {
        self.actions.read().await.get(key).cloned().unwrap_or_default()
    }

    /// 例如對話框關閉時清掉表單錯誤
    pub async fn clear_error(&self, key: &ActionKey) {
        if let Some(status) = self.actions.write().await.get_mut(key) {
            status.error = None;
        }
    }

    /// 取得全部文章並取代本地快照；失敗時進入整頁錯誤狀態，已載入的資料保持不變
    pub async fn load_all(&self) -> ServiceResult<usize> {
        *self.page.write().await = PageState::Loading;
        tracing::debug!("📡 Loading all articles");

        let result = match self.service.list().await {
            Ok(articles) => self.store.write().await.replace_all(articles),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                let count = self.store.read().await.len();
                *self.page.write().await = PageState::Ready;
                tracing::info!("📦 Loaded {} articles", count);
                Ok(count)
            }
            Err(e) => {
                tracing::error!("❌ Failed to load articles: {}", e);
                *self.page.write().await = PageState::Failed {
                    message: e.user_friendly_message(),
                };
                Err(e)
            }
        }
    }

    pub async fn create(&self, input: NewArticle) -> ServiceResult<Article> {
        let key = ActionKey::Create;
        self.begin(&key).await;

        let result = match input.validate() {
            Ok(request) => self.service.create(&request).await,
            Err(e) => Err(e),
        };
        let result = self.reconcile(result).await;

        match &result {
            Ok(article) => {
                tracing::info!("✅ Created article {} ({})", article.name, article.id);
                self.notify(Notification::info(
                    "Article created",
                    format!("{} was added.", article.name),
                ));
            }
            Err(e) => tracing::warn!("⚠️ Create failed: {}", e),
        }

        self.finish(&key, &result).await;
        result
    }

    /// Quantity is not part of the payload; the store takes whatever quantity
    /// the service returns.
    pub async fn update_metadata(
        &self,
        id: &ArticleId,
        input: ArticleUpdate,
    ) -> ServiceResult<Article> {
        let key = ActionKey::UpdateMetadata(id.clone());
        self.begin(&key).await;

        let result = match input.validate() {
            Ok(request) => self.service.update_metadata(id, &request).await,
            Err(e) => Err(e),
        };
        let result = self.reconcile(result).await;

        match &result {
            Ok(article) => {
                tracing::info!("✅ Updated article {} ({})", article.name, article.id);
                self.notify(Notification::info(
                    "Article updated",
                    format!("{} was updated.", article.name),
                ));
            }
            Err(e) => tracing::warn!("⚠️ Update of {} failed: {}", id, e),
        }

        self.finish(&key, &result).await;
        result
    }

    /// 調整數量：候選值為負時在本地拒絕，不發請求；只有伺服器確認後才寫回快照
    pub async fn adjust_quantity(
        &self,
        id: &ArticleId,
        change: QuantityChange,
    ) -> ServiceResult<Article> {
        let key = ActionKey::AdjustQuantity(id.clone());
        self.begin(&key).await;

        let current = self.store.read().await.get(id).map(|a| a.quantity);
        let result = match change.resolve(current) {
            Ok(quantity) => {
                tracing::debug!("📡 Setting quantity of {} to {}", id, quantity);
                self.service
                    .update_quantity(id, UpdateQuantityRequest { quantity })
                    .await
            }
            Err(e) => Err(e),
        };
        let result = self.reconcile(result).await;

        match &result {
            Ok(article) => {
                tracing::info!("✅ {} now has {} {}", article.name, article.quantity, article.unit);
                self.notify(Notification::info(
                    "Stock updated",
                    format!("{} now has {} {}.", article.name, article.quantity, article.unit),
                ));
            }
            Err(e) => {
                tracing::warn!("⚠️ Quantity update of {} failed: {}", id, e);
                self.notify(Notification::destructive(
                    "Stock update failed",
                    e.user_friendly_message(),
                ));
            }
        }

        self.finish(&key, &result).await;
        result
    }

    pub async fn delete(&self, id: &ArticleId) -> ServiceResult<()> {
        let key = ActionKey::Delete(id.clone());
        self.begin(&key).await;

        let result = self.service.delete(id).await;
        match &result {
            Ok(()) => {
                let removed = self.store.write().await.remove(id);
                let label = removed.map(|a| a.name).unwrap_or_else(|| id.to_string());
                tracing::info!("🗑️ Deleted article {} ({})", label, id);
                self.notify(Notification::info(
                    "Article deleted",
                    format!("{} was removed.", label),
                ));
            }
            Err(e) => {
                tracing::warn!("⚠️ Delete of {} failed: {}", id, e);
                self.notify(Notification::destructive(
                    "Delete failed",
                    e.user_friendly_message(),
                ));
            }
        }

        self.finish(&key, &result).await;
        result
    }

    /// 遠端呼叫成功後才寫入快照
    async fn reconcile(&self, result: ServiceResult<Article>) -> ServiceResult<Article> {
        let article = result?;
        self.store.write().await.upsert(article.clone())?;
        Ok(article)
    }

    async fn begin(&self, key: &ActionKey) {
        let mut actions = self.actions.write().await;
        let status = actions.entry(key.clone()).or_default();
        status.phase = SubmissionPhase::Submitting;
        status.error = None;
        tracing::debug!("{:?}: Idle -> Submitting", key);
    }

    async fn finish<T>(&self, key: &ActionKey, result: &ServiceResult<T>) {
        let mut actions = self.actions.write().await;
        let status = actions.entry(key.clone()).or_default();
        status.phase = SubmissionPhase::Idle;
        match result {
            Ok(_) => {
                status.error = None;
                tracing::debug!("{:?}: Submitting -> Succeeded -> Idle", key);
            }
            Err(e) => {
                status.error = Some(e.user_friendly_message());
                tracing::debug!("{:?}: Submitting -> Failed -> Idle", key);
            }
        }
    }

    fn notify(&self, notification: Notification) {
        if self.notifications.send(notification).is_err() {
            tracing::debug!("No notification subscribers");
        }
    }
}
