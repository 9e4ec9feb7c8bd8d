pub mod controller;
pub mod store;

pub use crate::domain::model::{Article, ArticleId, StockStatus};
pub use crate::domain::ports::{ArticleService, ConfigProvider};
pub use crate::utils::error::Result;
