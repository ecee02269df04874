//! Repository layer over the entity store.
//!
//! Repositories return plain entity models; relationship traversal is done
//! through explicit joined queries, never lazy loading.

pub mod registration;
pub mod tag;
pub mod user;
pub mod workshop;

pub use registration::RegistrationRepository;
pub use tag::TagRepository;
pub use user::UserRepository;
pub use workshop::{PriceFilter, WorkshopFilter, WorkshopRepository, WorkshopSort};
