use crate::domain::model::{Article, ArticleId};
use crate::utils::error::ArticleError;
use indexmap::IndexMap;

/// Local snapshot of the articles confirmed by the inventory service.
///
/// Entries keep insertion order for stable display. Nothing in here talks to
/// the network: the controller only reconciles results into it after a
/// remote call has succeeded.
#[derive(Debug, Clone, Default)]
pub struct ArticleStore {
    articles: IndexMap<ArticleId, Article>,
}

impl ArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以伺服器回傳的完整清單取代整個快照；任何一筆不合法則整批拒絕，快照不變
    pub fn replace_all(&mut self, articles: Vec<Article>) -> Result<(), ArticleError> {
        for article in &articles {
            article.validate()?;
        }

        let mut next = IndexMap::with_capacity(articles.len());
        for article in articles {
            let id = article.id.clone();
            if next.insert(id.clone(), article).is_some() {
                tracing::warn!("⚠️ Duplicate article id {} in list response, keeping the later entry", id);
            }
        }

        tracing::debug!("Store snapshot replaced with {} articles", next.len());
        self.articles = next;
        Ok(())
    }

    /// 新增或取代同 id 的項目；回傳是否為新增
    pub fn upsert(&mut self, article: Article) -> Result<bool, ArticleError> {
        article.validate()?;
        let inserted = self.articles.insert(article.id.clone(), article).is_none();
        Ok(inserted)
    }

    /// 冪等：不存在的 id 不做任何事
    pub fn remove(&mut self, id: &ArticleId) -> Option<Article> {
        self.articles.shift_remove(id)
    }

    /// 依插入順序的唯讀檢視，可重複走訪
    pub fn list(&self) -> impl Iterator<Item = &Article> + Clone + '_ {
        self.articles.values()
    }

    pub fn get(&self, id: &ArticleId) -> Option<&Article> {
        self.articles.get(id)
    }

    pub fn low_stock(&self) -> impl Iterator<Item = &Article> + Clone + '_ {
        self.list().filter(|article| Self::is_low_stock(article))
    }

    pub fn is_low_stock(article: &Article) -> bool {
        article.is_low_stock()
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn article(id: &str, name: &str, quantity: u32, threshold: u32) -> Article {
        Article {
            id: id.into(),
            name: name.to_string(),
            quantity,
            unit: "pcs".to_string(),
            low_stock_threshold: threshold,
        }
    }

    fn ids(store: &ArticleStore) -> Vec<String> {
        store.list().map(|a| a.id.to_string()).collect()
    }

    #[test]
    fn test_upsert_inserts_then_replaces_in_place() {
        let mut store = ArticleStore::new();
        assert!(store.upsert(article("a1", "Bolt", 10, 5)).unwrap());
        assert!(store.upsert(article("a2", "Nut", 3, 5)).unwrap());
        assert!(store.upsert(article("a3", "Washer", 7, 1)).unwrap());

        assert!(!store.upsert(article("a2", "Nut M6", 4, 5)).unwrap());

        assert_eq!(ids(&store), vec!["a1", "a2", "a3"]);
        assert_eq!(store.get(&"a2".into()).unwrap().name, "Nut M6");
        assert_eq!(store.get(&"a1".into()).unwrap(), &article("a1", "Bolt", 10, 5));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = ArticleStore::new();
        store.upsert(article("a1", "Bolt", 10, 5)).unwrap();
        store.upsert(article("a2", "Nut", 3, 5)).unwrap();
        store.upsert(article("a3", "Washer", 7, 1)).unwrap();

        assert!(store.remove(&"a2".into()).is_some());
        assert!(store.remove(&"a2".into()).is_none());
        assert!(store.remove(&"missing".into()).is_none());

        assert_eq!(ids(&store), vec!["a1", "a3"]);
    }

    #[test]
    fn test_replace_all_is_atomic() {
        let mut store = ArticleStore::new();
        store.upsert(article("a1", "Bolt", 10, 5)).unwrap();

        let result = store.replace_all(vec![article("b1", "Screw", 1, 1), article("b2", "", 1, 1)]);
        assert!(matches!(result, Err(ArticleError::MalformedResponse { .. })));
        assert_eq!(ids(&store), vec!["a1"]);

        store
            .replace_all(vec![article("b1", "Screw", 1, 1), article("b2", "Pin", 9, 2)])
            .unwrap();
        assert_eq!(ids(&store), vec!["b1", "b2"]);
    }

    #[test]
    fn test_replace_all_duplicate_ids_keep_later_entry() {
        let mut store = ArticleStore::new();
        store
            .replace_all(vec![
                article("a1", "Bolt", 10, 5),
                article("a2", "Nut", 3, 5),
                article("a1", "Bolt M6", 8, 5),
            ])
            .unwrap();

        assert_eq!(ids(&store), vec!["a1", "a2"]);
        assert_eq!(store.get(&"a1".into()).unwrap().name, "Bolt M6");
    }

    #[test]
    fn test_list_is_restartable() {
        let mut store = ArticleStore::new();
        store.upsert(article("a1", "Bolt", 10, 5)).unwrap();
        store.upsert(article("a2", "Nut", 3, 5)).unwrap();

        let view = store.list();
        assert_eq!(view.clone().count(), 2);
        assert_eq!(view.map(|a| a.quantity).sum::<u32>(), 13);
    }

    #[test]
    fn test_low_stock_view() {
        let mut store = ArticleStore::new();
        store.upsert(article("a1", "Bolt", 10, 5)).unwrap();
        store.upsert(article("a2", "Nut", 5, 5)).unwrap();
        store.upsert(article("a3", "Washer", 6, 5)).unwrap();

        let low: Vec<_> = store.low_stock().map(|a| a.id.to_string()).collect();
        assert_eq!(low, vec!["a2"]);
    }

    proptest! {
        #[test]
        fn upsert_keeps_one_entry_per_id_with_latest_values(
            ops in prop::collection::vec((0_u8..6, 0_u32..50, 0_u32..50), 0..40)
        ) {
            let mut store = ArticleStore::new();
            let mut expected: HashMap<String, (u32, u32)> = HashMap::new();

            for (id, quantity, threshold) in ops {
                let id = format!("a{}", id);
                store.upsert(article(&id, "Item", quantity, threshold)).unwrap();
                expected.insert(id, (quantity, threshold));
            }

            prop_assert_eq!(store.len(), expected.len());
            for (id, (quantity, threshold)) in expected {
                let stored = store.get(&ArticleId::new(id)).unwrap();
                prop_assert_eq!(stored.quantity, quantity);
                prop_assert_eq!(stored.low_stock_threshold, threshold);
            }
        }

        #[test]
        fn low_stock_iff_quantity_at_or_below_threshold(quantity in 0_u32..10_000, threshold in 0_u32..10_000) {
            let a = article("a1", "Bolt", quantity, threshold);
            prop_assert_eq!(ArticleStore::is_low_stock(&a), quantity <= threshold);
        }
    }
}
