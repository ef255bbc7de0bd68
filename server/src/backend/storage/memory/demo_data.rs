//! Demo records loaded into the in-memory store when seeding is enabled.

use chrono::NaiveDate;

use crate::backend::domain::image_service::PLACEHOLDER_IMAGE_URL;
use crate::backend::domain::models::{Cat, Vaccination, VetVisit, Weight};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| panic!("invalid demo date {year}-{month}-{day}"))
}

fn weight(id: &str, value: f64, on: NaiveDate, notes: &str) -> Weight {
    Weight {
        id: id.to_string(),
        value,
        date: on,
        notes: Some(notes.to_string()),
    }
}

fn vet_visit(id: &str, on: NaiveDate, reason: &str, notes: &str, vet_name: &str) -> VetVisit {
    VetVisit {
        id: id.to_string(),
        date: on,
        reason: reason.to_string(),
        notes: Some(notes.to_string()),
        vet_name: Some(vet_name.to_string()),
    }
}

fn vaccination(id: &str, name: &str, on: NaiveDate, due: NaiveDate, notes: &str) -> Vaccination {
    Vaccination {
        id: id.to_string(),
        name: name.to_string(),
        date: on,
        due_date: due,
        notes: Some(notes.to_string()),
    }
}

pub fn demo_cats() -> Vec<Cat> {
    vec![
        Cat {
            id: "1".to_string(),
            name: "Whiskers".to_string(),
            breed: "Maine Coon".to_string(),
            age: 3.0,
            birth_date: Some(date(2020, 5, 15)),
            image_url: Some(PLACEHOLDER_IMAGE_URL.to_string()),
            special_needs: false,
            notes: Some("Loves to play with string toys".to_string()),
            feeding_schedule: Some(
                "Morning: 1/4 cup dry food, Evening: 1/2 can wet food".to_string(),
            ),
            weights: vec![
                weight("w1", 4.2, date(2023, 1, 15), "Healthy weight"),
                weight("w2", 4.5, date(2023, 3, 20), "Slight increase"),
                weight("w3", 4.8, date(2023, 6, 10), "Continued growth"),
                weight("w4", 5.0, date(2023, 9, 5), "Target weight reached"),
                weight("w5", 5.1, date(2023, 12, 20), "Maintaining well"),
            ],
            vet_visits: vec![
                vet_visit(
                    "v1",
                    date(2023, 2, 10),
                    "Annual checkup",
                    "All tests normal",
                    "Dr. Smith",
                ),
                vet_visit(
                    "v2",
                    date(2023, 8, 15),
                    "Dental cleaning",
                    "Minor tartar buildup removed",
                    "Dr. Johnson",
                ),
            ],
            vaccinations: vec![
                vaccination(
                    "vac1",
                    "Rabies",
                    date(2023, 2, 10),
                    date(2024, 2, 10),
                    "3-year vaccine",
                ),
                vaccination(
                    "vac2",
                    "FVRCP",
                    date(2023, 2, 10),
                    date(2024, 2, 10),
                    "Annual booster",
                ),
            ],
        },
        Cat {
            id: "2".to_string(),
            name: "Shadow".to_string(),
            breed: "Siamese".to_string(),
            age: 5.0,
            birth_date: Some(date(2018, 9, 22)),
            image_url: Some(PLACEHOLDER_IMAGE_URL.to_string()),
            special_needs: true,
            notes: Some("Requires special diet for urinary health".to_string()),
            feeding_schedule: Some(
                "Three small meals daily of prescription urinary food".to_string(),
            ),
            weights: vec![
                weight("w6", 3.8, date(2023, 1, 10), "Slightly underweight"),
                weight("w7", 4.0, date(2023, 4, 15), "Improving"),
                weight("w8", 4.2, date(2023, 7, 20), "Healthy weight"),
                weight("w9", 4.1, date(2023, 10, 25), "Slight decrease"),
                weight("w10", 4.3, date(2024, 1, 5), "Back to healthy range"),
            ],
            vet_visits: vec![
                vet_visit(
                    "v3",
                    date(2023, 3, 5),
                    "Urinary issue checkup",
                    "Prescribed special diet",
                    "Dr. Wilson",
                ),
                vet_visit(
                    "v4",
                    date(2023, 9, 12),
                    "Follow-up",
                    "Condition improved with diet",
                    "Dr. Wilson",
                ),
            ],
            vaccinations: vec![
                vaccination(
                    "vac3",
                    "Rabies",
                    date(2023, 3, 5),
                    date(2026, 3, 5),
                    "3-year vaccine",
                ),
                vaccination(
                    "vac4",
                    "FVRCP",
                    date(2023, 3, 5),
                    date(2024, 3, 5),
                    "Annual booster",
                ),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_demo_ids_are_unique_per_collection() {
        let cats = demo_cats();
        let cat_ids: HashSet<_> = cats.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(cat_ids.len(), cats.len());

        for cat in &cats {
            let weights: HashSet<_> = cat.weights.iter().map(|w| w.id.as_str()).collect();
            assert_eq!(weights.len(), cat.weights.len());
            let visits: HashSet<_> = cat.vet_visits.iter().map(|v| v.id.as_str()).collect();
            assert_eq!(visits.len(), cat.vet_visits.len());
            let vaccinations: HashSet<_> = cat.vaccinations.iter().map(|v| v.id.as_str()).collect();
            assert_eq!(vaccinations.len(), cat.vaccinations.len());
        }
    }

    #[test]
    fn test_demo_dates_are_the_real_ones() {
        let cats = demo_cats();
        assert_eq!(cats[0].birth_date, NaiveDate::from_ymd_opt(2020, 5, 15));
        assert_eq!(
            cats[1].weights.last().map(|w| w.date),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        let epoch = NaiveDate::default();
        assert!(cats
            .iter()
            .flat_map(|cat| cat.weights.iter().map(|w| w.date))
            .all(|d| d != epoch));
    }

    #[test]
    #[should_panic(expected = "invalid demo date 2023-2-30")]
    fn test_mistyped_demo_date_panics() {
        date(2023, 2, 30);
    }
}
