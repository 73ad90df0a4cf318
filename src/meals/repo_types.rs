use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub eaten_at: OffsetDateTime,
    pub in_diet: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone)]
pub struct NewMeal {
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub eaten_at: OffsetDateTime,
    pub in_diet: bool,
}

/// Partial update; `None` leaves the column as it is.
#[derive(Debug, Clone, Default)]
pub struct MealChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub eaten_at: Option<OffsetDateTime>,
    pub in_diet: Option<bool>,
}

/// The two columns the streak computation reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct MealMark {
    pub eaten_at: OffsetDateTime,
    pub in_diet: bool,
}
