//! In-memory cat record store.
//!
//! State lives for the lifetime of the process and is shared through cheap
//! clones of [`InMemoryCatStore`]. Every call first waits out the configured
//! latency, then does all of its work under a single lock acquisition, so a
//! reader never observes a half-applied write.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use tokio::sync::RwLock;

use super::demo_data;
use crate::backend::domain::models::{
    Cat, CatFields, NewVaccination, NewVetVisit, NewWeight, Vaccination, VetVisit, Weight,
};
use crate::backend::storage::traits::{CatStorage, StoreError};

#[derive(Clone)]
pub struct InMemoryCatStore {
    cats: Arc<RwLock<Vec<Cat>>>,
    latency: Duration,
}

impl InMemoryCatStore {
    /// Create an empty store
    pub fn new(latency: Duration) -> Self {
        Self::with_cats(Vec::new(), latency)
    }

    pub fn with_cats(cats: Vec<Cat>, latency: Duration) -> Self {
        Self {
            cats: Arc::new(RwLock::new(cats)),
            latency,
        }
    }

    /// Create a store pre-populated with the demo cats
    pub fn with_demo_data(latency: Duration) -> Self {
        let cats = demo_data::demo_cats();
        info!("Seeding cat store with {} demo cats", cats.len());
        Self::with_cats(cats, latency)
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Apply `change` to a copy of the cat and swap the copy in.
    ///
    /// Nothing is written when the cat is missing.
    async fn replace_cat<T>(
        &self,
        cat_id: &str,
        change: impl FnOnce(&mut Cat) -> T,
    ) -> Result<T, StoreError> {
        let mut cats = self.cats.write().await;
        let index = cats
            .iter()
            .position(|cat| cat.id == cat_id)
            .ok_or_else(|| StoreError::CatNotFound(cat_id.to_string()))?;

        let mut updated = cats[index].clone();
        let result = change(&mut updated);
        cats[index] = updated;
        Ok(result)
    }
}

#[async_trait]
impl CatStorage for InMemoryCatStore {
    async fn list_cats(&self) -> Result<Vec<Cat>, StoreError> {
        self.simulate_latency().await;
        Ok(self.cats.read().await.clone())
    }

    async fn get_cat(&self, cat_id: &str) -> Result<Option<Cat>, StoreError> {
        self.simulate_latency().await;
        let cats = self.cats.read().await;
        Ok(cats.iter().find(|cat| cat.id == cat_id).cloned())
    }

    async fn create_cat(&self, fields: CatFields) -> Result<Cat, StoreError> {
        self.simulate_latency().await;
        let cat = Cat::from_fields(Cat::generate_id(), fields);
        self.cats.write().await.push(cat.clone());
        debug!("Stored cat {}", cat.id);
        Ok(cat)
    }

    async fn update_cat(&self, cat_id: &str, fields: CatFields) -> Result<Cat, StoreError> {
        self.simulate_latency().await;
        self.replace_cat(cat_id, |cat| {
            cat.apply_fields(fields);
            cat.clone()
        })
        .await
    }

    async fn delete_cat(&self, cat_id: &str) -> Result<(), StoreError> {
        self.simulate_latency().await;
        let mut cats = self.cats.write().await;
        let before = cats.len();
        cats.retain(|cat| cat.id != cat_id);
        if cats.len() == before {
            debug!("delete_cat: {} was not present", cat_id);
        }
        Ok(())
    }

    async fn add_weight(&self, cat_id: &str, weight: NewWeight) -> Result<Weight, StoreError> {
        self.simulate_latency().await;
        let weight = Weight::from_new(Weight::generate_id(), weight);
        let stored = weight.clone();
        self.replace_cat(cat_id, move |cat| cat.weights.push(stored))
            .await?;
        Ok(weight)
    }

    async fn delete_weight(&self, cat_id: &str, weight_id: &str) -> Result<(), StoreError> {
        self.simulate_latency().await;
        self.replace_cat(cat_id, |cat| cat.weights.retain(|w| w.id != weight_id))
            .await
    }

    async fn add_vet_visit(
        &self,
        cat_id: &str,
        visit: NewVetVisit,
    ) -> Result<VetVisit, StoreError> {
        self.simulate_latency().await;
        let visit = VetVisit::from_new(VetVisit::generate_id(), visit);
        let stored = visit.clone();
        self.replace_cat(cat_id, move |cat| cat.vet_visits.push(stored))
            .await?;
        Ok(visit)
    }

    async fn delete_vet_visit(&self, cat_id: &str, visit_id: &str) -> Result<(), StoreError> {
        self.simulate_latency().await;
        self.replace_cat(cat_id, |cat| cat.vet_visits.retain(|v| v.id != visit_id))
            .await
    }

    async fn add_vaccination(
        &self,
        cat_id: &str,
        vaccination: NewVaccination,
    ) -> Result<Vaccination, StoreError> {
        self.simulate_latency().await;
        let vaccination = Vaccination::from_new(Vaccination::generate_id(), vaccination);
        let stored = vaccination.clone();
        self.replace_cat(cat_id, move |cat| cat.vaccinations.push(stored))
            .await?;
        Ok(vaccination)
    }

    async fn delete_vaccination(
        &self,
        cat_id: &str,
        vaccination_id: &str,
    ) -> Result<(), StoreError> {
        self.simulate_latency().await;
        self.replace_cat(cat_id, |cat| {
            cat.vaccinations.retain(|v| v.id != vaccination_id)
        })
        .await
    }
}
