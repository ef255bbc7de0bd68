//! Weight, vet visit and vaccination records for a cat.

use std::sync::Arc;

use log::{info, warn};

use super::errors::DomainError;
use super::models::{NewVaccination, NewVetVisit, NewWeight, Vaccination, VetVisit, Weight};
use super::validation::{validate_new_vaccination, validate_new_vet_visit, validate_new_weight};
use crate::backend::storage::CatStorage;

#[derive(Clone)]
pub struct HealthRecordService {
    store: Arc<dyn CatStorage>,
}

impl HealthRecordService {
    pub fn new(store: Arc<dyn CatStorage>) -> Self {
        Self { store }
    }

    /// Weight entries for a cat, oldest first
    pub async fn weight_history(&self, cat_id: &str) -> Result<Vec<Weight>, DomainError> {
        info!("Getting weight history for cat: {}", cat_id);
        let cat = self
            .store
            .get_cat(cat_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Cat {}", cat_id)))?;
        Ok(cat.weights_by_date())
    }

    pub async fn add_weight(&self, cat_id: &str, weight: NewWeight) -> Result<Weight, DomainError> {
        info!("Adding weight {} for cat: {}", weight.value, cat_id);
        validate_new_weight(&weight)?;
        Ok(self.store.add_weight(cat_id, weight).await?)
    }

    pub async fn delete_weight(&self, cat_id: &str, weight_id: &str) -> Result<(), DomainError> {
        info!("Deleting weight {} for cat: {}", weight_id, cat_id);
        Ok(self.store.delete_weight(cat_id, weight_id).await?)
    }

    pub async fn add_vet_visit(
        &self,
        cat_id: &str,
        visit: NewVetVisit,
    ) -> Result<VetVisit, DomainError> {
        info!("Adding vet visit for cat: {}", cat_id);
        validate_new_vet_visit(&visit)?;
        Ok(self.store.add_vet_visit(cat_id, visit).await?)
    }

    pub async fn delete_vet_visit(&self, cat_id: &str, visit_id: &str) -> Result<(), DomainError> {
        info!("Deleting vet visit {} for cat: {}", visit_id, cat_id);
        Ok(self.store.delete_vet_visit(cat_id, visit_id).await?)
    }

    pub async fn add_vaccination(
        &self,
        cat_id: &str,
        vaccination: NewVaccination,
    ) -> Result<Vaccination, DomainError> {
        info!(
            "Adding vaccination {} for cat: {}",
            vaccination.name, cat_id
        );
        validate_new_vaccination(&vaccination)?;
        if vaccination.due_before_administered() {
            warn!(
                "Vaccination {} for cat {} is due ({}) before it was given ({})",
                vaccination.name, cat_id, vaccination.due_date, vaccination.date
            );
        }
        Ok(self.store.add_vaccination(cat_id, vaccination).await?)
    }

    pub async fn delete_vaccination(
        &self,
        cat_id: &str,
        vaccination_id: &str,
    ) -> Result<(), DomainError> {
        info!(
            "Deleting vaccination {} for cat: {}",
            vaccination_id, cat_id
        );
        Ok(self
            .store
            .delete_vaccination(cat_id, vaccination_id)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::InMemoryCatStore;
    use chrono::NaiveDate;
    use std::time::Duration;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn setup_test() -> HealthRecordService {
        HealthRecordService::new(Arc::new(InMemoryCatStore::with_demo_data(Duration::ZERO)))
    }

    #[tokio::test]
    async fn test_weight_history_is_sorted() {
        let service = setup_test();
        service
            .add_weight(
                "1",
                NewWeight {
                    value: 4.0,
                    date: date("2022-12-01"),
                    notes: None,
                },
            )
            .await
            .unwrap();

        let history = service.weight_history("1").await.unwrap();
        assert_eq!(history.len(), 6);
        assert_eq!(history[0].date, date("2022-12-01"));
        assert!(history.windows(2).all(|pair| pair[0].date <= pair[1].date));
    }

    #[tokio::test]
    async fn test_weight_history_for_missing_cat() {
        let service = setup_test();
        assert_eq!(
            service.weight_history("missing").await.unwrap_err(),
            DomainError::NotFound("Cat missing".to_string())
        );
    }

    #[tokio::test]
    async fn test_invalid_weight_is_rejected_before_lookup() {
        let service = setup_test();
        let err = service
            .add_weight(
                "missing",
                NewWeight {
                    value: 0.0,
                    date: date("2024-01-01"),
                    notes: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_add_weight_to_missing_cat() {
        let service = setup_test();
        let err = service
            .add_weight(
                "missing",
                NewWeight {
                    value: 4.0,
                    date: date("2024-01-01"),
                    notes: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound("Cat missing".to_string()));
    }

    #[tokio::test]
    async fn test_early_due_date_is_accepted() {
        let service = setup_test();
        let vaccination = service
            .add_vaccination(
                "2",
                NewVaccination {
                    name: "FeLV".to_string(),
                    date: date("2024-05-01"),
                    due_date: date("2024-04-01"),
                    notes: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(vaccination.due_date, date("2024-04-01"));
    }

    #[tokio::test]
    async fn test_delete_records_idempotently() {
        let service = setup_test();
        for _ in 0..2 {
            service.delete_weight("1", "w1").await.unwrap();
            service.delete_vet_visit("1", "v1").await.unwrap();
            service.delete_vaccination("1", "vac1").await.unwrap();
        }
        let history = service.weight_history("1").await.unwrap();
        assert!(history.iter().all(|w| w.id != "w1"));
        assert_eq!(history.len(), 4);
    }
}
