//! Field-level validation for cat and health record input.
//!
//! Every check runs so the caller gets the complete list of offending fields
//! in one go. Field names match the wire names used by the front-end forms.

use chrono::NaiveDate;
use shared::FieldError;

use super::errors::DomainError;
use super::models::{CatFields, NewVaccination, NewVetVisit, NewWeight};

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_TEXT_LENGTH: usize = 2000;

#[derive(Default)]
struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    fn push(&mut self, field: &str, message: &str) {
        self.0.push(FieldError::new(field, message));
    }

    fn required_text(&mut self, field: &str, label: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, &format!("{} is required", label));
        } else if value.chars().count() > MAX_NAME_LENGTH {
            self.push(
                field,
                &format!("{} cannot exceed {} characters", label, MAX_NAME_LENGTH),
            );
        }
    }

    /// Absent is fine, present-but-blank is not
    fn optional_text(&mut self, field: &str, value: Option<&str>) {
        if let Some(value) = value {
            if value.trim().is_empty() {
                self.push(field, "Must be omitted rather than left blank");
            } else if value.chars().count() > MAX_TEXT_LENGTH {
                self.push(
                    field,
                    &format!("Cannot exceed {} characters", MAX_TEXT_LENGTH),
                );
            }
        }
    }

    fn finish(self) -> Result<(), DomainError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self.0))
        }
    }
}

pub fn validate_cat_fields(fields: &CatFields, today: NaiveDate) -> Result<(), DomainError> {
    let mut errors = FieldErrors::default();

    errors.required_text("name", "Name", &fields.name);
    errors.required_text("breed", "Breed", &fields.breed);

    if !fields.age.is_finite() || fields.age < 0.0 {
        errors.push("age", "Age must be a positive number");
    }

    if let Some(birth_date) = fields.birth_date {
        if birth_date > today {
            errors.push("birthDate", "Birth date cannot be in the future");
        }
    }

    errors.optional_text("imageUrl", fields.image_url.as_deref());
    errors.optional_text("notes", fields.notes.as_deref());
    errors.optional_text("feedingSchedule", fields.feeding_schedule.as_deref());

    errors.finish()
}

pub fn validate_new_weight(weight: &NewWeight) -> Result<(), DomainError> {
    let mut errors = FieldErrors::default();
    if !weight.value.is_finite() || weight.value <= 0.0 {
        errors.push("value", "Weight must be greater than 0");
    }
    errors.optional_text("notes", weight.notes.as_deref());
    errors.finish()
}

pub fn validate_new_vet_visit(visit: &NewVetVisit) -> Result<(), DomainError> {
    let mut errors = FieldErrors::default();
    errors.required_text("reason", "Reason", &visit.reason);
    errors.optional_text("notes", visit.notes.as_deref());
    errors.optional_text("vetName", visit.vet_name.as_deref());
    errors.finish()
}

/// Due dates before the administered date are accepted; existing records
/// already contain them.
pub fn validate_new_vaccination(vaccination: &NewVaccination) -> Result<(), DomainError> {
    let mut errors = FieldErrors::default();
    errors.required_text("name", "Vaccination name", &vaccination.name);
    errors.optional_text("notes", vaccination.notes.as_deref());
    errors.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn fields_of(err: DomainError) -> Vec<String> {
        match err {
            DomainError::Validation(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    fn valid_cat() -> CatFields {
        CatFields {
            name: "Mochi".to_string(),
            breed: "Tabby".to_string(),
            age: 2.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_cat_passes() {
        let today = date("2024-01-01");
        assert!(validate_cat_fields(&valid_cat(), today).is_ok());
    }

    #[test]
    fn test_cat_reports_every_bad_field() {
        let fields = CatFields {
            name: "   ".to_string(),
            breed: String::new(),
            age: -1.0,
            birth_date: Some(date("2030-01-01")),
            notes: Some(String::new()),
            ..Default::default()
        };
        let err = validate_cat_fields(&fields, date("2024-01-01")).unwrap_err();
        assert_eq!(
            fields_of(err),
            vec!["name", "breed", "age", "birthDate", "notes"]
        );
    }

    #[test]
    fn test_cat_rejects_nan_age_and_long_name() {
        let fields = CatFields {
            name: "x".repeat(MAX_NAME_LENGTH + 1),
            age: f64::NAN,
            ..valid_cat()
        };
        let err = validate_cat_fields(&fields, date("2024-01-01")).unwrap_err();
        assert_eq!(fields_of(err), vec!["name", "age"]);
    }

    #[test]
    fn test_weight_must_be_positive() {
        for value in [0.0, -3.0, f64::INFINITY] {
            let weight = NewWeight {
                value,
                date: date("2024-01-01"),
                notes: None,
            };
            assert_eq!(
            fields_of(validate_new_weight(&weight).unwrap_err()),
            vec!["value"]
        );
        }

        let weight = NewWeight {
            value: 0.1,
            date: date("2024-01-01"),
            notes: Some("ok".to_string()),
        };
        assert!(validate_new_weight(&weight).is_ok());
    }

    #[test]
    fn test_vet_visit_requires_reason() {
        let visit = NewVetVisit {
            date: date("2024-01-01"),
            reason: " ".to_string(),
            notes: None,
            vet_name: Some(String::new()),
        };
        assert_eq!(
            fields_of(validate_new_vet_visit(&visit).unwrap_err()),
            vec!["reason", "vetName"]
        );
    }

    #[test]
    fn test_vaccination_requires_name_but_allows_early_due_date() {
        let mut vaccination = NewVaccination {
            name: String::new(),
            date: date("2024-02-10"),
            due_date: date("2023-02-10"),
            notes: None,
        };
        assert_eq!(
            fields_of(validate_new_vaccination(&vaccination).unwrap_err()),
            vec!["name"]
        );

        vaccination.name = "Rabies".to_string();
        assert!(validate_new_vaccination(&vaccination).is_ok());
    }
}
