//! Conversion between the shared cat DTOs and the domain models.
//!
//! Incoming dates are `YYYY-MM-DD`; a full ISO timestamp is accepted and
//! truncated to its date. Blank optional text coming off a form means
//! "absent" and becomes `None` here.

use chrono::{Local, NaiveDate};
use shared::{
    Cat as CatDto, CatListResponse, CatRequest, CatResponse, CreateVaccinationRequest,
    CreateVetVisitRequest, CreateWeightRequest, FieldError, Vaccination as VaccinationDto,
    VetVisit as VetVisitDto, Weight as WeightDto, WeightHistoryResponse,
};

use crate::backend::domain::models::{
    Cat, CatFields, NewVaccination, NewVetVisit, NewWeight, Vaccination, VetVisit, Weight,
};
use crate::backend::domain::validation::{
    validate_cat_fields, validate_new_vaccination, validate_new_vet_visit, validate_new_weight,
};
use crate::backend::domain::DomainError;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct CatMapper;

impl CatMapper {
    pub fn to_dto(domain: Cat) -> CatDto {
        CatDto {
            id: domain.id,
            name: domain.name,
            breed: domain.breed,
            age: domain.age,
            birth_date: domain.birth_date.map(format_date),
            image_url: domain.image_url,
            special_needs: domain.special_needs,
            notes: domain.notes,
            feeding_schedule: domain.feeding_schedule,
            weights: domain
                .weights
                .into_iter()
                .map(Self::weight_to_dto)
                .collect(),
            vet_visits: domain
                .vet_visits
                .into_iter()
                .map(Self::vet_visit_to_dto)
                .collect(),
            vaccinations: domain
                .vaccinations
                .into_iter()
                .map(Self::vaccination_to_dto)
                .collect(),
        }
    }

    pub fn weight_to_dto(domain: Weight) -> WeightDto {
        WeightDto {
            id: domain.id,
            value: domain.value,
            date: format_date(domain.date),
            notes: domain.notes,
        }
    }

    pub fn vet_visit_to_dto(domain: VetVisit) -> VetVisitDto {
        VetVisitDto {
            id: domain.id,
            date: format_date(domain.date),
            reason: domain.reason,
            notes: domain.notes,
            vet_name: domain.vet_name,
        }
    }

    pub fn vaccination_to_dto(domain: Vaccination) -> VaccinationDto {
        VaccinationDto {
            id: domain.id,
            name: domain.name,
            date: format_date(domain.date),
            due_date: format_date(domain.due_date),
            notes: domain.notes,
        }
    }

    pub fn to_cat_list_dto(cats: Vec<Cat>) -> CatListResponse {
        CatListResponse {
            cats: cats.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_cat_response_dto(domain: Cat, message: &str) -> CatResponse {
        CatResponse {
            cat: Self::to_dto(domain),
            success_message: message.to_string(),
        }
    }

    pub fn to_weight_history_dto(cat_id: &str, weights: Vec<Weight>) -> WeightHistoryResponse {
        WeightHistoryResponse {
            cat_id: cat_id.to_string(),
            weights: weights.into_iter().map(Self::weight_to_dto).collect(),
        }
    }

    pub fn to_fields(request: CatRequest) -> Result<CatFields, DomainError> {
        let mut errors = Vec::new();
        let birth_date = parse_optional_date("birthDate", request.birth_date, &mut errors);

        let fields = CatFields {
            name: request.name.trim().to_string(),
            breed: request.breed.trim().to_string(),
            age: request.age,
            birth_date,
            image_url: present(request.image_url),
            special_needs: request.special_needs,
            notes: present(request.notes),
            feeding_schedule: present(request.feeding_schedule),
        };
        finish(fields, errors, |fields| {
            validate_cat_fields(fields, Local::now().date_naive())
        })
    }

    pub fn to_new_weight(request: CreateWeightRequest) -> Result<NewWeight, DomainError> {
        let mut errors = Vec::new();
        let date = parse_date("date", &request.date, &mut errors);

        let weight = NewWeight {
            value: request.value,
            date: date.unwrap_or_default(),
            notes: present(request.notes),
        };
        finish(weight, errors, validate_new_weight)
    }

    pub fn to_new_vet_visit(request: CreateVetVisitRequest) -> Result<NewVetVisit, DomainError> {
        let mut errors = Vec::new();
        let date = parse_date("date", &request.date, &mut errors);

        let visit = NewVetVisit {
            date: date.unwrap_or_default(),
            reason: request.reason.trim().to_string(),
            notes: present(request.notes),
            vet_name: present(request.vet_name),
        };
        finish(visit, errors, validate_new_vet_visit)
    }

    pub fn to_new_vaccination(
        request: CreateVaccinationRequest,
    ) -> Result<NewVaccination, DomainError> {
        let mut errors = Vec::new();
        let date = parse_date("date", &request.date, &mut errors);
        let due_date = parse_date("dueDate", &request.due_date, &mut errors);

        let vaccination = NewVaccination {
            name: request.name.trim().to_string(),
            date: date.unwrap_or_default(),
            due_date: due_date.unwrap_or_default(),
            notes: present(request.notes),
        };
        finish(vaccination, errors, validate_new_vaccination)
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_date(field: &str, raw: &str, errors: &mut Vec<FieldError>) -> Option<NaiveDate> {
    let day = raw.trim().split('T').next().unwrap_or_default();
    match NaiveDate::parse_from_str(day, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(FieldError::new(field, "Date must be in YYYY-MM-DD format"));
            None
        }
    }
}

fn parse_optional_date(
    field: &str,
    raw: Option<String>,
    errors: &mut Vec<FieldError>,
) -> Option<NaiveDate> {
    present(raw).and_then(|raw| parse_date(field, &raw, errors))
}

/// Unparseable dates fail the request together with every other field
/// check, so the form shows all of its problems at once. With no date
/// errors the services validate as usual.
fn finish<T>(
    value: T,
    date_errors: Vec<FieldError>,
    validate: impl FnOnce(&T) -> Result<(), DomainError>,
) -> Result<T, DomainError> {
    if date_errors.is_empty() {
        return Ok(value);
    }
    let mut errors = match validate(&value) {
        Err(DomainError::Validation(errors)) => errors,
        _ => Vec::new(),
    };
    errors.extend(date_errors);
    Err(DomainError::Validation(errors))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CatRequest {
        CatRequest {
            name: "  Mochi ".to_string(),
            breed: "Tabby".to_string(),
            age: 2.0,
            birth_date: Some("2022-01-04T00:00:00.000Z".to_string()),
            image_url: Some(String::new()),
            special_needs: false,
            notes: Some("   ".to_string()),
            feeding_schedule: Some("Twice daily".to_string()),
        }
    }

    #[test]
    fn test_to_fields_normalises_input() {
        let fields = CatMapper::to_fields(request()).unwrap();
        assert_eq!(fields.name, "Mochi");
        assert_eq!(fields.birth_date, NaiveDate::from_ymd_opt(2022, 1, 4));
        assert_eq!(fields.image_url, None);
        assert_eq!(fields.notes, None);
        assert_eq!(fields.feeding_schedule.as_deref(), Some("Twice daily"));
    }

    #[test]
    fn test_bad_dates_become_field_errors() {
        let err = CatMapper::to_new_vaccination(CreateVaccinationRequest {
            name: "Rabies".to_string(),
            date: "10/02/2024".to_string(),
            due_date: "soon".to_string(),
            notes: None,
        })
        .unwrap_err();

        let DomainError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["date", "dueDate"]);
    }

    #[test]
    fn test_bad_date_is_reported_with_other_field_errors() {
        let err = CatMapper::to_fields(CatRequest {
            name: String::new(),
            breed: String::new(),
            age: -1.0,
            birth_date: Some("yesterday".to_string()),
            ..request()
        })
        .unwrap_err();

        let DomainError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "breed", "age", "birthDate"]);
    }

    #[test]
    fn test_bad_weight_date_keeps_value_error() {
        let err = CatMapper::to_new_weight(CreateWeightRequest {
            value: 0.0,
            date: "2024-13-01".to_string(),
            notes: None,
        })
        .unwrap_err();

        let DomainError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["value", "date"]);
    }

    #[test]
    fn test_cat_dto_uses_plain_dates() {
        let fields = CatMapper::to_fields(request()).unwrap();
        let mut cat = Cat::from_fields("1".to_string(), fields);
        cat.weights.push(Weight {
            id: "w1".to_string(),
            value: 4.2,
            date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            notes: None,
        });

        let dto = CatMapper::to_dto(cat);
        assert_eq!(dto.birth_date.as_deref(), Some("2022-01-04"));
        assert_eq!(dto.weights[0].date, "2023-01-15");
    }
}
