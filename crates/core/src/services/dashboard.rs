//! Dashboard aggregation service.
//!
//! Read-only rollups over the store, computed fresh per call. These are
//! derived views: seat accounting is owned by the workshop seat ledger and
//! nothing here feeds back into it.

use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;
use workshop_common::AppResult;
use workshop_db::entities::{registration::RegistrationStatus, workshop::WorkshopStatus};
use workshop_db::repositories::{RegistrationRepository, WorkshopRepository};

/// Administrative dashboard statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    /// All workshops.
    pub total_workshops: u64,
    /// Workshops open for registration.
    pub active_workshops: u64,
    /// All registrations.
    pub total_registrations: u64,
    /// Registrations holding a seat.
    pub confirmed_registrations: u64,
    /// Registrations awaiting admin review.
    pub pending_registrations: u64,
    /// Sum of workshop prices over confirmed registrations.
    pub total_revenue: f64,
}

/// Service computing dashboard statistics.
#[derive(Clone)]
pub struct DashboardService {
    workshop_repo: WorkshopRepository,
    registration_repo: RegistrationRepository,
}

impl DashboardService {
    /// Create a new dashboard service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            workshop_repo: WorkshopRepository::new(db.clone()),
            registration_repo: RegistrationRepository::new(db),
        }
    }

    /// Compute the dashboard rollup.
    pub async fn stats(&self) -> AppResult<DashboardStats> {
        let total_workshops = self.workshop_repo.count_all().await?;
        let active_workshops = self
            .workshop_repo
            .count_by_status(WorkshopStatus::Active)
            .await?;
        let total_registrations = self.registration_repo.count_all().await?;
        let confirmed_registrations = self
            .registration_repo
            .count_by_status(RegistrationStatus::Confirmed)
            .await?;
        let pending_registrations = self.registration_repo.count_pending().await?;
        let total_revenue = self.registration_repo.sum_confirmed_revenue().await?;

        Ok(DashboardStats {
            total_workshops,
            active_workshops,
            total_registrations,
            confirmed_registrations,
            pending_registrations,
            total_revenue,
        })
    }
}
