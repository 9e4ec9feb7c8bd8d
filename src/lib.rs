pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod report;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::HttpArticleService;
pub use config::ServiceSettings;
pub use crate::core::{
    controller::{ActionKey, ArticleController, Notification, NotificationSeverity, PageState},
    store::ArticleStore,
};
pub use domain::model::{Article, ArticleId, ArticleUpdate, NewArticle, QuantityChange};
pub use utils::error::{AppError, ArticleError, Result};
