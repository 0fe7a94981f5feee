//! In-memory directory store
//!
//! Holds the whole directory behind a single RwLock. Suitable for
//! development (optionally seeded from a JSON file at startup) and tests.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::models::{
    Category, CategoryKeywordGroup, IncorrectInformationReport, Keyword, Organisation,
    OrganisationRating,
};
use crate::Result;

use super::DirectoryStore;

/// Seed file shape: top-level lists of entities.
#[derive(Debug, Default, Deserialize)]
struct Seed {
    #[serde(default)]
    organisations: Vec<Organisation>,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    keywords: Vec<Keyword>,
}

#[derive(Default)]
struct Inner {
    organisations: BTreeMap<i64, Organisation>,
    categories: BTreeMap<i64, Category>,
    keywords: BTreeMap<i64, Keyword>,
    reports: Vec<IncorrectInformationReport>,
    ratings: Vec<OrganisationRating>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a JSON seed file.
    pub fn from_seed_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let seed: Seed = serde_json::from_str(&raw)?;

        let mut inner = Inner::default();
        for category in seed.categories {
            inner.categories.insert(category.id, category);
        }
        for keyword in seed.keywords {
            inner.keywords.insert(keyword.id, keyword);
        }
        for organisation in seed.organisations {
            // Organisations carry their categories/keywords inline; make
            // sure those are known standalone too.
            for category in &organisation.categories {
                inner
                    .categories
                    .entry(category.id)
                    .or_insert_with(|| category.clone());
            }
            for keyword in &organisation.keywords {
                inner
                    .keywords
                    .entry(keyword.id)
                    .or_insert_with(|| keyword.clone());
            }
            inner.organisations.insert(organisation.id, organisation);
        }

        Ok(Self {
            inner: RwLock::new(inner),
        })
    }

    pub async fn insert_organisation(&self, organisation: Organisation) {
        self.inner
            .write()
            .await
            .organisations
            .insert(organisation.id, organisation);
    }

    pub async fn insert_category(&self, category: Category) {
        self.inner
            .write()
            .await
            .categories
            .insert(category.id, category);
    }

    pub async fn insert_keyword(&self, keyword: Keyword) {
        self.inner
            .write()
            .await
            .keywords
            .insert(keyword.id, keyword);
    }

    pub async fn organisation_count(&self) -> usize {
        self.inner.read().await.organisations.len()
    }

    pub async fn reports(&self) -> Vec<IncorrectInformationReport> {
        self.inner.read().await.reports.clone()
    }

    pub async fn ratings(&self) -> Vec<OrganisationRating> {
        self.inner.read().await.ratings.clone()
    }
}

#[async_trait]
impl DirectoryStore for MemoryStore {
    async fn organisation(&self, id: i64) -> Result<Option<Organisation>> {
        Ok(self.inner.read().await.organisations.get(&id).cloned())
    }

    async fn home_page_groupings(&self) -> Result<Vec<CategoryKeywordGroup>> {
        let inner = self.inner.read().await;

        let mut groups = Vec::new();
        for category in inner.categories.values() {
            if !category.show_on_home_page {
                continue;
            }

            let keywords: Vec<String> = inner
                .keywords
                .values()
                .filter(|keyword| {
                    keyword.show_on_home_page && keyword.categories.contains(&category.id)
                })
                .map(|keyword| keyword.name.clone())
                .collect();

            if keywords.is_empty() {
                continue;
            }

            groups.push(CategoryKeywordGroup {
                name: category.name.clone(),
                keywords,
            });
        }

        Ok(groups)
    }

    async fn keywords(
        &self,
        category_names: &[String],
        home_page_only: bool,
    ) -> Result<Vec<Keyword>> {
        let inner = self.inner.read().await;

        // Resolve category names case-insensitively, the way the backing
        // schema's citext columns would.
        let category_ids: Vec<i64> = inner
            .categories
            .values()
            .filter(|category| {
                category_names
                    .iter()
                    .any(|name| name.eq_ignore_ascii_case(&category.name))
            })
            .map(|category| category.id)
            .collect();

        let keywords = inner
            .keywords
            .values()
            .filter(|keyword| !home_page_only || keyword.show_on_home_page)
            .filter(|keyword| {
                category_names.is_empty()
                    || keyword
                        .categories
                        .iter()
                        .any(|id| category_ids.contains(id))
            })
            .cloned()
            .collect();

        Ok(keywords)
    }

    async fn add_report(&self, report: IncorrectInformationReport) -> Result<()> {
        self.inner.write().await.reports.push(report);
        Ok(())
    }

    async fn add_rating(&self, rating: OrganisationRating) -> Result<()> {
        self.inner.write().await.ratings.push(rating);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signpost_esquery::Point;

    fn category(id: i64, name: &str, show: bool) -> Category {
        Category {
            id,
            name: name.to_string(),
            show_on_home_page: show,
        }
    }

    fn keyword(id: i64, name: &str, show: bool, categories: Vec<i64>) -> Keyword {
        Keyword {
            id,
            name: name.to_string(),
            show_on_home_page: show,
            categories,
        }
    }

    #[tokio::test]
    async fn home_page_groupings_skip_unflagged_and_empty_categories() {
        let store = MemoryStore::new();
        store.insert_category(category(1, "Health", true)).await;
        store.insert_category(category(2, "Hidden", false)).await;
        store.insert_category(category(3, "Empty", true)).await;
        store.insert_keyword(keyword(1, "hiv", true, vec![1])).await;
        store
            .insert_keyword(keyword(2, "quiet", false, vec![1, 3]))
            .await;
        store.insert_keyword(keyword(3, "other", true, vec![2])).await;

        let groups = store.home_page_groupings().await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Health");
        assert_eq!(groups[0].keywords, vec!["hiv"]);
    }

    #[tokio::test]
    async fn keywords_filter_by_category_name_case_insensitively() {
        let store = MemoryStore::new();
        store.insert_category(category(1, "Health", true)).await;
        store.insert_keyword(keyword(1, "hiv", false, vec![1])).await;
        store.insert_keyword(keyword(2, "legal", false, vec![2])).await;

        let keywords = store
            .keywords(&["health".to_string()], false)
            .await
            .unwrap();
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].name, "hiv");
    }

    #[tokio::test]
    async fn seed_file_registers_inline_categories_and_keywords() {
        let seed = serde_json::json!({
            "organisations": [{
                "id": 1,
                "name": "Test Clinic",
                "country": { "id": 1, "name": "South Africa", "iso_code": "ZA" },
                "location": { "lat": -33.9, "lon": 18.4 },
                "categories": [{ "id": 7, "name": "Health", "show_on_home_page": true }],
                "keywords": [{ "id": 9, "name": "clinic", "categories": [7] }],
            }],
        });

        let dir = std::env::temp_dir().join("signpost-seed-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("seed.json");
        std::fs::write(&path, seed.to_string()).unwrap();

        let store = MemoryStore::from_seed_file(&path).unwrap();
        assert_eq!(store.organisation_count().await, 1);

        let org = store.organisation(1).await.unwrap().unwrap();
        assert_eq!(org.location, Point::new(-33.9, 18.4).unwrap());

        let keywords = store.keywords(&["Health".to_string()], false).await.unwrap();
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].name, "clinic");
    }
}
