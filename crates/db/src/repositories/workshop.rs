//! Workshop repository.

use std::sync::Arc;

use crate::entities::{Workshop, workshop, workshop::WorkshopStatus};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, sea_query::Expr,
    sea_query::extension::postgres::PgExpr,
};
use workshop_common::{AppError, AppResult};

/// Free-vs-paid filter predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceFilter {
    /// Only workshops with `price == 0`.
    Free,
    /// Only workshops with `price > 0`.
    Paid,
}

/// Sort key for workshop listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkshopSort {
    /// Newest first (default).
    #[default]
    CreatedAt,
    /// Event date, soonest first.
    Date,
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
    /// Alphabetical by title.
    Title,
}

/// Filter predicates for workshop listings. All fields combine with AND.
#[derive(Debug, Clone, Default)]
pub struct WorkshopFilter {
    /// Case-insensitive substring match over title, description, instructor
    /// and organizer.
    pub search: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// Exact city match.
    pub city: Option<String>,
    /// Exact level match.
    pub level: Option<String>,
    /// Lifecycle status match.
    pub status: Option<WorkshopStatus>,
    /// Free-vs-paid predicate.
    pub price: Option<PriceFilter>,
    /// Restrict to workshops owned by this organizer account.
    pub organizer_user_id: Option<String>,
    /// Sort key.
    pub sort: WorkshopSort,
}

/// Workshop repository for database operations.
#[derive(Clone)]
pub struct WorkshopRepository {
    db: Arc<DatabaseConnection>,
}

impl WorkshopRepository {
    /// Create a new workshop repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a workshop by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<workshop::Model>> {
        Workshop::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a workshop by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<workshop::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::WorkshopNotFound(id.to_string()))
    }

    /// Create a new workshop.
    pub async fn create(&self, model: workshop::ActiveModel) -> AppResult<workshop::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a workshop.
    pub async fn update(&self, model: workshop::ActiveModel) -> AppResult<workshop::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a workshop row.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Workshop::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Filtered, sorted, paginated listing.
    ///
    /// Returns the page of rows and the total row count matching the filter.
    /// `page` is 1-based; the offset is `(page - 1) * per_page`.
    pub async fn search(
        &self,
        filter: &WorkshopFilter,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<workshop::Model>, u64)> {
        let mut condition = Condition::all();

        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search.replace('%', "\\%").replace('_', "\\_"));
            condition = condition.add(
                Condition::any()
                    .add(Expr::col(workshop::Column::Title).ilike(pattern.as_str()))
                    .add(Expr::col(workshop::Column::Description).ilike(pattern.as_str()))
                    .add(Expr::col(workshop::Column::Instructor).ilike(pattern.as_str()))
                    .add(Expr::col(workshop::Column::Organizer).ilike(pattern.as_str())),
            );
        }

        if let Some(category) = filter.category.as_deref() {
            condition = condition.add(workshop::Column::Category.eq(category));
        }

        if let Some(city) = filter.city.as_deref() {
            condition = condition.add(workshop::Column::City.eq(city));
        }

        if let Some(level) = filter.level.as_deref() {
            condition = condition.add(workshop::Column::Level.eq(level));
        }

        if let Some(status) = filter.status {
            condition = condition.add(workshop::Column::Status.eq(status));
        }

        match filter.price {
            Some(PriceFilter::Free) => {
                condition = condition.add(workshop::Column::Price.eq(0.0));
            }
            Some(PriceFilter::Paid) => {
                condition = condition.add(workshop::Column::Price.gt(0.0));
            }
            None => {}
        }

        if let Some(organizer_user_id) = filter.organizer_user_id.as_deref() {
            condition = condition.add(workshop::Column::OrganizerUserId.eq(organizer_user_id));
        }

        let query = Workshop::find().filter(condition);

        let total = query
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let query = match filter.sort {
            WorkshopSort::CreatedAt => query.order_by_desc(workshop::Column::CreatedAt),
            WorkshopSort::Date => query.order_by_asc(workshop::Column::Date),
            WorkshopSort::PriceLow => query.order_by_asc(workshop::Column::Price),
            WorkshopSort::PriceHigh => query.order_by_desc(workshop::Column::Price),
            WorkshopSort::Title => query.order_by_asc(workshop::Column::Title),
        };

        let offset = page.saturating_sub(1) * per_page;
        let items = query
            .offset(offset)
            .limit(per_page)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((items, total))
    }

    /// Count all workshops.
    pub async fn count_all(&self) -> AppResult<u64> {
        Workshop::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count workshops with a given status.
    pub async fn count_by_status(&self, status: WorkshopStatus) -> AppResult<u64> {
        Workshop::find()
            .filter(workshop::Column::Status.eq(status))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Atomically take one seat from the ledger (single conditional UPDATE).
    ///
    /// Runs on the given connection so it can join a caller transaction.
    /// Returns `false` when no seat was available; the caller decides whether
    /// that is `SoldOut` or `SeatsExhausted`.
    pub async fn decrement_available_seats<C: ConnectionTrait>(
        conn: &C,
        workshop_id: &str,
    ) -> AppResult<bool> {
        let result = Workshop::update_many()
            .col_expr(
                workshop::Column::AvailableSeats,
                Expr::col(workshop::Column::AvailableSeats).sub(1),
            )
            .filter(workshop::Column::Id.eq(workshop_id))
            .filter(workshop::Column::AvailableSeats.gt(0))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}
