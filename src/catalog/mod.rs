//! Menu catalog cache: a read-only snapshot of items joined with category
//! labels, refreshed on demand. Menu and category mutations all funnel
//! through the same refresh, so the fetch-merge-publish sequence exists in
//! exactly one place.

use std::collections::HashMap;

use tracing::{info, instrument};

use crate::api::{ApiClient, CategoryWire, ItemPayload, ItemWire};
use crate::domain::MenuItem;
use crate::error::ApiError;

const UNCATEGORIZED: &str = "Uncategorized";

/// The last-published snapshot of the combined menu.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub items: Vec<MenuItem>,
    /// Category labels in backend order.
    pub categories: Vec<String>,
}

impl Catalog {
    pub fn find_item(&self, id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items_in_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a MenuItem> + 'a {
        self.items.iter().filter(move |item| item.category == category)
    }
}

pub struct CatalogCache {
    api: ApiClient,
    snapshot: Catalog,
    generation: u64,
    item_limit: u32,
}

impl CatalogCache {
    pub fn new(api: ApiClient, item_limit: u32) -> Self {
        Self {
            api,
            snapshot: Catalog::default(),
            generation: 0,
            item_limit,
        }
    }

    pub fn snapshot(&self) -> &Catalog {
        &self.snapshot
    }

    /// Bumped once per published snapshot; lets callers detect staleness.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Fetches items and categories concurrently and publishes the merged
    /// snapshot only once both have arrived. On failure the previous
    /// snapshot stays in place.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let (items, categories) = tokio::try_join!(
            self.api.list_items(self.item_limit),
            self.api.list_categories()
        )?;
        self.snapshot = merge_catalog(items, categories);
        self.generation += 1;
        info!(
            items = self.snapshot.items.len(),
            categories = self.snapshot.categories.len(),
            generation = self.generation,
            "Catalog refreshed"
        );
        Ok(())
    }

    // --- Menu management; every mutation republishes the catalog ---

    pub async fn add_item(&mut self, payload: &ItemPayload) -> Result<(), ApiError> {
        self.api.create_item(payload).await?;
        self.refresh().await
    }

    pub async fn update_item(&mut self, id: &str, payload: &ItemPayload) -> Result<(), ApiError> {
        self.api.update_item(id, payload).await?;
        self.refresh().await
    }

    pub async fn delete_item(&mut self, id: &str) -> Result<(), ApiError> {
        self.api.delete_item(id).await?;
        self.refresh().await
    }

    pub async fn add_category(&mut self, category_name: &str) -> Result<(), ApiError> {
        self.api.create_category(category_name).await?;
        self.refresh().await
    }
}

fn merge_catalog(items: Vec<ItemWire>, categories: Vec<CategoryWire>) -> Catalog {
    let labels: HashMap<&str, &str> = categories
        .iter()
        .map(|category| (category.id.as_str(), category.name.as_str()))
        .collect();

    let items = items
        .into_iter()
        .map(|item| MenuItem {
            category: item
                .category_id
                .as_deref()
                .and_then(|id| labels.get(id))
                .map_or_else(|| UNCATEGORIZED.to_string(), |label| (*label).to_string()),
            id: item.id,
            name: item.name,
            price: item.price,
            available: item.available,
        })
        .collect();

    Catalog {
        items,
        categories: categories.into_iter().map(|category| category.name).collect(),
    }
}
