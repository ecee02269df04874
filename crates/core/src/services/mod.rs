//! Business logic services.

#![allow(missing_docs)]

pub mod account;
pub mod dashboard;
pub mod registration;
pub mod workshop;

pub use account::{AccountService, RegisterAccountInput};
pub use dashboard::{DashboardService, DashboardStats};
pub use registration::{RegistrationService, SubmitRegistrationInput};
pub use workshop::{CreateWorkshopInput, UpdateWorkshopInput, WorkshopPage, WorkshopService};
