//! Cat profile management.
//!
//! Validates incoming field sets before they reach the store and logs each
//! operation. Health records hang off a cat but are handled by
//! [`super::HealthRecordService`].

use std::sync::Arc;

use chrono::Local;
use log::{info, warn};

use super::errors::DomainError;
use super::models::{Cat, CatFields};
use super::validation::validate_cat_fields;
use crate::backend::storage::CatStorage;

#[derive(Clone)]
pub struct CatService {
    store: Arc<dyn CatStorage>,
}

impl CatService {
    pub fn new(store: Arc<dyn CatStorage>) -> Self {
        Self { store }
    }

    /// List all cats in the order they were added
    pub async fn list_cats(&self) -> Result<Vec<Cat>, DomainError> {
        info!("Listing all cats");
        let cats = self.store.list_cats().await?;
        info!("Found {} cats", cats.len());
        Ok(cats)
    }

    /// Get a cat by ID. A missing cat is `Ok(None)`.
    pub async fn get_cat(&self, cat_id: &str) -> Result<Option<Cat>, DomainError> {
        info!("Getting cat: {}", cat_id);
        let cat = self.store.get_cat(cat_id).await?;
        if cat.is_none() {
            warn!("Cat not found: {}", cat_id);
        }
        Ok(cat)
    }

    pub async fn create_cat(&self, fields: CatFields) -> Result<Cat, DomainError> {
        info!("Creating cat: name={}, breed={}", fields.name, fields.breed);
        validate_cat_fields(&fields, Local::now().date_naive())?;

        let cat = self.store.create_cat(fields).await?;
        info!("Created cat: {} with ID: {}", cat.name, cat.id);
        Ok(cat)
    }

    /// Replace the mutable fields of an existing cat
    pub async fn update_cat(&self, cat_id: &str, fields: CatFields) -> Result<Cat, DomainError> {
        info!("Updating cat: {}", cat_id);
        validate_cat_fields(&fields, Local::now().date_naive())?;

        let cat = self.store.update_cat(cat_id, fields).await?;
        info!("Updated cat: {} with ID: {}", cat.name, cat.id);
        Ok(cat)
    }

    /// Delete a cat and all of its health records. Deleting a missing cat
    /// succeeds.
    pub async fn delete_cat(&self, cat_id: &str) -> Result<(), DomainError> {
        info!("Deleting cat: {}", cat_id);
        self.store.delete_cat(cat_id).await?;
        Ok(())
    }
}
