pub mod cat;
pub mod health_record;
pub mod session;

pub use cat::{Cat, CatFields};
pub use health_record::{NewVaccination, NewVetVisit, NewWeight, Vaccination, VetVisit, Weight};
pub use session::{Session, SessionUser};
