//! Category routes (`/categorias`).

use crate::client::ApiClient;
use crate::config::CATEGORIES_PATH;
use crate::error::Result;
use crate::models::{Category, CategoryDraft, CategoryId, CategoryUpdate, DeleteAck};
use crate::validation;

pub struct CategoryApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CategoryApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub fn list(&self) -> Result<Vec<Category>> {
        self.client.get(CATEGORIES_PATH, &[])
    }

    pub fn get(&self, id: CategoryId) -> Result<Category> {
        self.client.get(&format!("{CATEGORIES_PATH}/{id}"), &[])
    }

    /// Validate and create a category.
    pub fn create(&self, draft: &CategoryDraft) -> Result<Category> {
        let draft = validation::validate_category(draft)?;
        self.client.post(CATEGORIES_PATH, &draft)
    }

    pub fn update(&self, id: CategoryId, update: &CategoryUpdate) -> Result<Category> {
        self.client.patch(&format!("{CATEGORIES_PATH}/{id}"), update)
    }

    pub fn delete(&self, id: CategoryId) -> Result<DeleteAck> {
        self.client.delete(&format!("{CATEGORIES_PATH}/{id}"))
    }
}
