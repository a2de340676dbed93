//! Careers surface: vacancy listings, candidate applications, and the
//! dashboard stats snapshot.

pub mod domain;
pub mod router;
pub mod stats;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationRecord, ApplicationStatus, ApplicationSubmission, EmploymentType, NewApplication,
    NewVacancy, VacancyRecord, VacancyStatus,
};
pub use router::careers_router;
pub use store::{ActivityWindow, CareersStore, SqliteCareersStore, VacancyDimension};
