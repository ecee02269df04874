//! Workshop management and query service.

use chrono::Utc;
use sea_orm::{DatabaseConnection, Set};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;
use workshop_common::{AppError, AppResult, id::IdGenerator};
use workshop_db::entities::{
    tag, user::UserRole, workshop,
    workshop::{WorkshopMode, WorkshopStatus},
};
use workshop_db::repositories::{
    RegistrationRepository, TagRepository, WorkshopFilter, WorkshopRepository,
};

/// Default page size for workshop listings.
const DEFAULT_PAGE_SIZE: u64 = 10;

/// Input for creating a workshop.
///
/// Capacity is fixed at creation: `max_seats` seeds the seat ledger and
/// neither it nor `available_seats` can be changed afterwards.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkshopInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 10000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub organizer: String,
    #[validate(length(min = 1, max = 100))]
    pub instructor: String,
    pub date: chrono::DateTime<Utc>,
    #[validate(length(min = 1, max = 20))]
    pub time: String,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[validate(length(min = 1, max = 50))]
    pub city: String,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[validate(length(min = 1, max = 20))]
    pub level: String,
    #[validate(length(min = 1, max = 20))]
    pub duration: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 1))]
    pub max_seats: i32,
    #[serde(default)]
    pub mode: WorkshopMode,
    pub image_url: Option<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub what_you_learn: Vec<String>,
    #[serde(default)]
    pub agenda: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Input for updating a workshop. Unset fields are left untouched.
///
/// `max_seats` and `available_seats` are deliberately absent: the seat
/// ledger only moves through the registration workflow.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkshopInput {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 10000))]
    pub description: Option<Option<String>>,
    #[validate(length(min = 1, max = 100))]
    pub organizer: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub instructor: Option<String>,
    pub date: Option<chrono::DateTime<Utc>>,
    #[validate(length(min = 1, max = 20))]
    pub time: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub level: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub duration: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub mode: Option<WorkshopMode>,
    pub status: Option<WorkshopStatus>,
    pub featured: Option<bool>,
    pub image_url: Option<Option<String>>,
    pub prerequisites: Option<Vec<String>>,
    pub what_you_learn: Option<Vec<String>>,
    pub agenda: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

/// One page of a workshop listing.
#[derive(Debug, Clone)]
pub struct WorkshopPage {
    /// Rows on this page.
    pub workshops: Vec<workshop::Model>,
    /// Total rows matching the filter.
    pub total: u64,
    /// 1-based page number.
    pub page: u64,
    /// Page size used.
    pub per_page: u64,
    /// Total page count.
    pub total_pages: u64,
}

/// Service for managing and querying workshops.
#[derive(Clone)]
pub struct WorkshopService {
    workshop_repo: WorkshopRepository,
    registration_repo: RegistrationRepository,
    tag_repo: TagRepository,
    id_gen: IdGenerator,
}

impl WorkshopService {
    /// Create a new workshop service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            workshop_repo: WorkshopRepository::new(db.clone()),
            registration_repo: RegistrationRepository::new(db.clone()),
            tag_repo: TagRepository::new(db),
            id_gen: IdGenerator::new(),
        }
    }

    /// Get a workshop by ID.
    pub async fn get_by_id(&self, id: &str) -> AppResult<workshop::Model> {
        self.workshop_repo.get_by_id(id).await
    }

    /// Filtered, sorted, paginated listing.
    ///
    /// `page` is 1-based; `per_page` falls back to the default page size.
    pub async fn list(
        &self,
        filter: &WorkshopFilter,
        page: u64,
        per_page: Option<u64>,
    ) -> AppResult<WorkshopPage> {
        let page = page.max(1);
        let per_page = per_page.unwrap_or(DEFAULT_PAGE_SIZE).max(1);

        let (workshops, total) = self.workshop_repo.search(filter, page, per_page).await?;

        Ok(WorkshopPage {
            workshops,
            total,
            page,
            per_page,
            total_pages: total.div_ceil(per_page),
        })
    }

    /// Create a new workshop, seeding the seat ledger from `max_seats`.
    pub async fn create(
        &self,
        organizer_user_id: Option<&str>,
        input: CreateWorkshopInput,
    ) -> AppResult<workshop::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let id = self.id_gen.generate();
        let now = Utc::now();

        let model = workshop::ActiveModel {
            id: Set(id),
            title: Set(input.title),
            description: Set(input.description),
            organizer: Set(input.organizer),
            organizer_user_id: Set(organizer_user_id.map(ToString::to_string)),
            instructor: Set(input.instructor),
            date: Set(input.date.into()),
            time: Set(input.time),
            location: Set(input.location),
            city: Set(input.city),
            category: Set(input.category),
            level: Set(input.level),
            duration: Set(input.duration),
            price: Set(input.price),
            max_seats: Set(input.max_seats),
            available_seats: Set(input.max_seats),
            mode: Set(input.mode),
            status: Set(WorkshopStatus::Active),
            featured: Set(false),
            image_url: Set(input.image_url),
            prerequisites: Set(json_list(input.prerequisites)),
            what_you_learn: Set(json_list(input.what_you_learn)),
            agenda: Set(json_list(input.agenda)),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        let created = self.workshop_repo.create(model).await?;

        if !input.tags.is_empty() {
            self.attach_tags(&created.id, &input.tags).await?;
        }

        tracing::debug!(workshop = %created.id, "Workshop created");

        Ok(created)
    }

    /// Update a workshop.
    ///
    /// Enterprise accounts may only update their own workshops; the caller
    /// is trusted for everything else.
    pub async fn update(
        &self,
        workshop_id: &str,
        user_id: &str,
        role: UserRole,
        input: UpdateWorkshopInput,
    ) -> AppResult<workshop::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let workshop = self.workshop_repo.get_by_id(workshop_id).await?;
        check_ownership(&workshop, user_id, role)?;

        let tags = input.tags;
        let mut model: workshop::ActiveModel = workshop.into();

        if let Some(title) = input.title {
            model.title = Set(title);
        }
        if let Some(description) = input.description {
            model.description = Set(description);
        }
        if let Some(organizer) = input.organizer {
            model.organizer = Set(organizer);
        }
        if let Some(instructor) = input.instructor {
            model.instructor = Set(instructor);
        }
        if let Some(date) = input.date {
            model.date = Set(date.into());
        }
        if let Some(time) = input.time {
            model.time = Set(time);
        }
        if let Some(location) = input.location {
            model.location = Set(location);
        }
        if let Some(city) = input.city {
            model.city = Set(city);
        }
        if let Some(category) = input.category {
            model.category = Set(category);
        }
        if let Some(level) = input.level {
            model.level = Set(level);
        }
        if let Some(duration) = input.duration {
            model.duration = Set(duration);
        }
        if let Some(price) = input.price {
            model.price = Set(price);
        }
        if let Some(mode) = input.mode {
            model.mode = Set(mode);
        }
        if let Some(status) = input.status {
            model.status = Set(status);
        }
        if let Some(featured) = input.featured {
            model.featured = Set(featured);
        }
        if let Some(image_url) = input.image_url {
            model.image_url = Set(image_url);
        }
        if let Some(prerequisites) = input.prerequisites {
            model.prerequisites = Set(json_list(prerequisites));
        }
        if let Some(what_you_learn) = input.what_you_learn {
            model.what_you_learn = Set(json_list(what_you_learn));
        }
        if let Some(agenda) = input.agenda {
            model.agenda = Set(json_list(agenda));
        }
        model.updated_at = Set(Some(Utc::now().into()));

        let updated = self.workshop_repo.update(model).await?;

        if let Some(tags) = tags {
            self.tag_repo.unlink_all(&updated.id).await?;
            self.attach_tags(&updated.id, &tags).await?;
        }

        Ok(updated)
    }

    /// Delete a workshop.
    ///
    /// Enterprise accounts may only delete their own workshops, and no
    /// workshop with registrations can be deleted.
    pub async fn delete(&self, workshop_id: &str, user_id: &str, role: UserRole) -> AppResult<()> {
        let workshop = self.workshop_repo.get_by_id(workshop_id).await?;
        check_ownership(&workshop, user_id, role)?;

        let registrations = self.registration_repo.count_by_workshop(workshop_id).await?;
        if registrations > 0 {
            return Err(AppError::Conflict(format!(
                "Cannot delete workshop with {registrations} registrations"
            )));
        }

        self.workshop_repo.delete(workshop_id).await?;

        tracing::debug!(workshop = %workshop_id, "Workshop deleted");

        Ok(())
    }

    /// Tags attached to a workshop.
    pub async fn tags_for(&self, workshop_id: &str) -> AppResult<Vec<tag::Model>> {
        self.tag_repo.find_for_workshop(workshop_id).await
    }

    /// Attach tags by name, creating missing ones. Names are trimmed and
    /// lowercased; empty names are skipped.
    async fn attach_tags(&self, workshop_id: &str, names: &[String]) -> AppResult<()> {
        for name in names {
            let name = name.trim().to_lowercase();
            if name.is_empty() {
                continue;
            }

            let tag = match self.tag_repo.find_by_name(&name).await? {
                Some(tag) => tag,
                None => {
                    self.tag_repo
                        .create(tag::ActiveModel {
                            id: Set(self.id_gen.generate()),
                            name: Set(name),
                            created_at: Set(Utc::now().into()),
                        })
                        .await?
                }
            };

            self.tag_repo.link(workshop_id, &tag.id).await?;
        }

        Ok(())
    }
}

fn check_ownership(workshop: &workshop::Model, user_id: &str, role: UserRole) -> AppResult<()> {
    if role == UserRole::Enterprise && workshop.organizer_user_id.as_deref() != Some(user_id) {
        return Err(AppError::PermissionDenied(
            "You can only manage your own workshops".to_string(),
        ));
    }
    Ok(())
}

fn json_list(items: Vec<String>) -> Option<serde_json::Value> {
    if items.is_empty() {
        None
    } else {
        Some(serde_json::Value::from(items))
    }
}
