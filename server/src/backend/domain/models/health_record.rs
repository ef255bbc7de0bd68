use chrono::NaiveDate;

fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Weight {
    pub id: String,
    pub value: f64,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWeight {
    pub value: f64,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

impl Weight {
    pub fn generate_id() -> String {
        generate_id()
    }

    pub fn from_new(id: String, new: NewWeight) -> Self {
        Self {
            id,
            value: new.value,
            date: new.date,
            notes: new.notes,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VetVisit {
    pub id: String,
    pub date: NaiveDate,
    pub reason: String,
    pub notes: Option<String>,
    pub vet_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewVetVisit {
    pub date: NaiveDate,
    pub reason: String,
    pub notes: Option<String>,
    pub vet_name: Option<String>,
}

impl VetVisit {
    pub fn generate_id() -> String {
        generate_id()
    }

    pub fn from_new(id: String, new: NewVetVisit) -> Self {
        Self {
            id,
            date: new.date,
            reason: new.reason,
            notes: new.notes,
            vet_name: new.vet_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vaccination {
    pub id: String,
    pub name: String,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewVaccination {
    pub name: String,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
}

impl NewVaccination {
    /// Due date earlier than the administered date. Accepted, but suspicious.
    pub fn due_before_administered(&self) -> bool {
        self.due_date < self.date
    }
}

impl Vaccination {
    pub fn generate_id() -> String {
        generate_id()
    }

    pub fn from_new(id: String, new: NewVaccination) -> Self {
        Self {
            id,
            name: new.name,
            date: new.date,
            due_date: new.due_date,
            notes: new.notes,
        }
    }
}
