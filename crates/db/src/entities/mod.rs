//! Database entities.

pub mod registration;
pub mod tag;
pub mod user;
pub mod workshop;
pub mod workshop_tag;

pub use registration::Entity as Registration;
pub use tag::Entity as Tag;
pub use user::Entity as User;
pub use workshop::Entity as Workshop;
pub use workshop_tag::Entity as WorkshopTag;
