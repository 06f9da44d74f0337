use anyhow::{anyhow, Result};
use std::collections::{BTreeMap, HashMap};

use crate::language::ContentLanguage;
use crate::record::Record;

const DEFAULT_PER_PAGE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// 1-based page number.
    pub page: usize,
    pub per_page: usize,
    pub search: Option<String>,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            search: None,
        }
    }
}

impl Query {
    pub fn page(page: usize, per_page: usize) -> Self {
        Self {
            page,
            per_page,
            search: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Matching records across all pages.
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

impl<T> Page<T> {
    pub fn page_count(&self) -> usize {
        if self.per_page == 0 {
            0
        } else {
            self.total.div_ceil(self.per_page)
        }
    }
}

/// Per-language storage for one entity type.
pub trait Repository<T: Record> {
    fn list(&self, lang: ContentLanguage, query: &Query) -> Result<Page<T>>;
    fn get(&self, lang: ContentLanguage, id: u64) -> Result<T>;
    /// Store a new record and return it with its assigned id.
    fn create(&mut self, lang: ContentLanguage, record: T) -> Result<T>;
    fn update(&mut self, lang: ContentLanguage, record: T) -> Result<T>;
    fn delete(&mut self, lang: ContentLanguage, id: u64) -> Result<()>;
}

/// Repository kept entirely in memory, one collection per language.
pub struct InMemoryRepository<T> {
    collections: HashMap<ContentLanguage, BTreeMap<u64, T>>,
    next_id: u64,
}

impl<T: Record> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            collections: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn len(&self, lang: ContentLanguage) -> usize {
        self.collections.get(&lang).map_or(0, BTreeMap::len)
    }

    fn not_found(lang: ContentLanguage, id: u64) -> anyhow::Error {
        anyhow!("{} {} not found for language {}", T::ENTITY, id, lang)
    }
}

impl<T: Record> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Repository<T> for InMemoryRepository<T> {
    fn list(&self, lang: ContentLanguage, query: &Query) -> Result<Page<T>> {
        if query.page == 0 || query.per_page == 0 {
            return Err(anyhow!(
                "Invalid page request: page {} of size {}",
                query.page,
                query.per_page
            ));
        }

        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let matching: Vec<&T> = self
            .collections
            .get(&lang)
            .into_iter()
            .flat_map(|records| records.values())
            .filter(|record| match &needle {
                Some(needle) => record.search_text().to_lowercase().contains(needle),
                None => true,
            })
            .collect();

        let items = matching
            .iter()
            .skip((query.page - 1) * query.per_page)
            .take(query.per_page)
            .map(|record| (*record).clone())
            .collect();

        Ok(Page {
            items,
            total: matching.len(),
            page: query.page,
            per_page: query.per_page,
        })
    }

    fn get(&self, lang: ContentLanguage, id: u64) -> Result<T> {
        self.collections
            .get(&lang)
            .and_then(|records| records.get(&id))
            .cloned()
            .ok_or_else(|| Self::not_found(lang, id))
    }

    fn create(&mut self, lang: ContentLanguage, mut record: T) -> Result<T> {
        let id = self.next_id;
        self.next_id += 1;
        record.set_id(id);
        self.collections
            .entry(lang)
            .or_default()
            .insert(id, record.clone());
        log::debug!("Created {} {} ({})", T::ENTITY, id, lang);
        Ok(record)
    }

    fn update(&mut self, lang: ContentLanguage, record: T) -> Result<T> {
        let id = record
            .id()
            .ok_or_else(|| anyhow!("Cannot update {} without an id", T::ENTITY))?;
        let slot = self
            .collections
            .get_mut(&lang)
            .and_then(|records| records.get_mut(&id))
            .ok_or_else(|| Self::not_found(lang, id))?;
        *slot = record.clone();
        log::debug!("Updated {} {} ({})", T::ENTITY, id, lang);
        Ok(record)
    }

    fn delete(&mut self, lang: ContentLanguage, id: u64) -> Result<()> {
        self.collections
            .get_mut(&lang)
            .and_then(|records| records.remove(&id))
            .map(|_| log::debug!("Deleted {} {} ({})", T::ENTITY, id, lang))
            .ok_or_else(|| Self::not_found(lang, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Department;

    fn department(name: &str) -> Department {
        Department {
            id: None,
            name: name.to_string(),
            head: None,
            description: None,
        }
    }

    #[test]
    fn test_create_assigns_ids() {
        let mut repo = InMemoryRepository::new();
        let a = repo.create(ContentLanguage::UzLatin, department("Moliya")).unwrap();
        let b = repo.create(ContentLanguage::Russian, department("Финансы")).unwrap();
        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
        assert_eq!(repo.len(ContentLanguage::UzLatin), 1);
        assert_eq!(repo.len(ContentLanguage::Russian), 1);
    }

    #[test]
    fn test_collections_are_per_language() {
        let mut repo = InMemoryRepository::new();
        let a = repo.create(ContentLanguage::UzLatin, department("Moliya")).unwrap();
        assert!(repo.get(ContentLanguage::UzLatin, 1).is_ok());
        assert!(repo.get(ContentLanguage::UzCyrillic, a.id.unwrap()).is_err());
    }

    #[test]
    fn test_list_paginates_and_searches() {
        let mut repo = InMemoryRepository::new();
        for name in ["Moliya", "Kadrlar", "Yuridik", "Moliya nazorati", "Matbuot"] {
            repo.create(ContentLanguage::UzLatin, department(name)).unwrap();
        }

        let page = repo.list(ContentLanguage::UzLatin, &Query::page(2, 2)).unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.page_count(), 3);
        assert_eq!(
            page.items.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
            vec!["Yuridik", "Moliya nazorati"]
        );

        let found = repo
            .list(ContentLanguage::UzLatin, &Query::default().search("MOLIYA"))
            .unwrap();
        assert_eq!(found.total, 2);

        let empty = repo.list(ContentLanguage::English, &Query::default()).unwrap();
        assert_eq!(empty.total, 0);
        assert!(repo.list(ContentLanguage::UzLatin, &Query::page(0, 10)).is_err());
    }

    #[test]
    fn test_update_and_delete() {
        let mut repo = InMemoryRepository::new();
        let mut d = repo.create(ContentLanguage::UzLatin, department("Moliya")).unwrap();
        d.head = Some("Karimov".to_string());
        repo.update(ContentLanguage::UzLatin, d.clone()).unwrap();
        assert_eq!(repo.get(ContentLanguage::UzLatin, 1).unwrap(), d);

        assert!(repo.update(ContentLanguage::UzLatin, department("no id")).is_err());
        repo.delete(ContentLanguage::UzLatin, 1).unwrap();
        assert!(repo.delete(ContentLanguage::UzLatin, 1).is_err());
        assert!(repo.get(ContentLanguage::UzLatin, 1).is_err());
    }
}
