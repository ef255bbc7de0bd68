use chrono::NaiveDate;

use super::health_record::{Vaccination, VetVisit, Weight};

/// A tracked cat and the health records it owns.
///
/// The three collections keep insertion order and have no life of their own:
/// removing the cat removes them.
#[derive(Debug, Clone, PartialEq)]
pub struct Cat {
    pub id: String,
    pub name: String,
    pub breed: String,
    pub age: f64,
    pub birth_date: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub special_needs: bool,
    pub notes: Option<String>,
    pub feeding_schedule: Option<String>,
    pub weights: Vec<Weight>,
    pub vet_visits: Vec<VetVisit>,
    pub vaccinations: Vec<Vaccination>,
}

/// The mutable field set of a cat, used for both create and update
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatFields {
    pub name: String,
    pub breed: String,
    pub age: f64,
    pub birth_date: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub special_needs: bool,
    pub notes: Option<String>,
    pub feeding_schedule: Option<String>,
}

impl Cat {
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Build a new cat with empty health collections
    pub fn from_fields(id: String, fields: CatFields) -> Self {
        let mut cat = Cat {
            id,
            name: String::new(),
            breed: String::new(),
            age: 0.0,
            birth_date: None,
            image_url: None,
            special_needs: false,
            notes: None,
            feeding_schedule: None,
            weights: Vec::new(),
            vet_visits: Vec::new(),
            vaccinations: Vec::new(),
        };
        cat.apply_fields(fields);
        cat
    }

    /// Replace every mutable field. Id and collections are left alone.
    pub fn apply_fields(&mut self, fields: CatFields) {
        self.name = fields.name;
        self.breed = fields.breed;
        self.age = fields.age;
        self.birth_date = fields.birth_date;
        self.image_url = fields.image_url;
        self.special_needs = fields.special_needs;
        self.notes = fields.notes;
        self.feeding_schedule = fields.feeding_schedule;
    }

    pub fn fields(&self) -> CatFields {
        CatFields {
            name: self.name.clone(),
            breed: self.breed.clone(),
            age: self.age,
            birth_date: self.birth_date,
            image_url: self.image_url.clone(),
            special_needs: self.special_needs,
            notes: self.notes.clone(),
            feeding_schedule: self.feeding_schedule.clone(),
        }
    }

    /// Weights ordered by date, oldest first. Entries sharing a date keep
    /// their insertion order.
    pub fn weights_by_date(&self) -> Vec<Weight> {
        let mut weights = self.weights.clone();
        weights.sort_by_key(|w| w.date);
        weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::NewWeight;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_from_fields_starts_with_empty_collections() {
        let fields = CatFields {
            name: "Mochi".to_string(),
            breed: "Tabby".to_string(),
            age: 2.0,
            ..Default::default()
        };
        let cat = Cat::from_fields("abc".to_string(), fields.clone());

        assert_eq!(cat.id, "abc");
        assert_eq!(cat.fields(), fields);
        assert!(!cat.special_needs);
        assert!(cat.weights.is_empty());
        assert!(cat.vet_visits.is_empty());
        assert!(cat.vaccinations.is_empty());
    }

    #[test]
    fn test_apply_fields_keeps_id_and_collections() {
        let mut cat = Cat::from_fields("abc".to_string(), CatFields::default());
        cat.weights.push(Weight::from_new(
            "w1".to_string(),
            NewWeight {
                value: 4.2,
                date: date("2023-01-15"),
                notes: None,
            },
        ));

        cat.apply_fields(CatFields {
            name: "Shadow".to_string(),
            breed: "Siamese".to_string(),
            age: 5.0,
            special_needs: true,
            ..Default::default()
        });

        assert_eq!(cat.id, "abc");
        assert_eq!(cat.name, "Shadow");
        assert!(cat.special_needs);
        assert_eq!(cat.weights.len(), 1);
    }

    #[test]
    fn test_weights_by_date_is_stable() {
        let mut cat = Cat::from_fields("abc".to_string(), CatFields::default());
        let days = [
            ("a", "2023-06-10"),
            ("b", "2023-01-15"),
            ("c", "2023-06-10"),
        ];
        for (id, day) in days {
            cat.weights.push(Weight::from_new(
                id.to_string(),
                NewWeight {
                    value: 4.0,
                    date: date(day),
                    notes: None,
                },
            ));
        }

        let ids: Vec<_> = cat.weights_by_date().into_iter().map(|w| w.id).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        // Stored order is untouched
        assert_eq!(cat.weights[0].id, "a");
    }
}
