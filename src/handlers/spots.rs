use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use sqlx::query_builder::Separated;
use sqlx::{Postgres, QueryBuilder};

use crate::config;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::Spot;
use crate::database::repository::{CrudResource, Repository};
use crate::error::ApiError;
use crate::middleware::AdminUser;
use crate::schemas::resolve_page;
use crate::schemas::spot::{ListSpotsQuery, SpotCreate, SpotResponse, SpotUpdate};

/// Façade binding for the spots table; listing stays custom because of the
/// search filter and rating order.
pub struct Spots;

impl CrudResource for Spots {
    type Record = Spot;
    type Create = SpotCreate;
    type Update = SpotUpdate;

    const TABLE: &'static str = "spots";
    const RESOURCE: &'static str = "Spot";

    fn bind_insert(qb: &mut QueryBuilder<'_, Postgres>, input: &SpotCreate) {
        qb.push(
            "(name, description, location, latitude, longitude, category, \
              image_url, rating, tags, best_time, equipment_needed) VALUES (",
        );
        let mut vals = qb.separated(", ");
        vals.push_bind(input.name.clone());
        vals.push_bind(input.description.clone());
        vals.push_bind(input.location.clone());
        vals.push_bind(input.latitude);
        vals.push_bind(input.longitude);
        vals.push_bind(input.category);
        vals.push_bind(input.image_url.clone());
        vals.push_bind(input.rating);
        vals.push_bind(input.tags.clone());
        vals.push_bind(input.best_time.clone());
        vals.push_bind(input.equipment_needed.clone());
        vals.push_unseparated(")");
    }

    fn bind_update(sets: &mut Separated<'_, '_, Postgres, &'static str>, input: &SpotUpdate) {
        if let Some(name) = &input.name {
            sets.push("name = ").push_bind_unseparated(name.clone());
        }
        if let Some(description) = &input.description {
            sets.push("description = ").push_bind_unseparated(description.clone());
        }
        if let Some(location) = &input.location {
            sets.push("location = ").push_bind_unseparated(location.clone());
        }
        if let Some(latitude) = input.latitude {
            sets.push("latitude = ").push_bind_unseparated(latitude);
        }
        if let Some(longitude) = input.longitude {
            sets.push("longitude = ").push_bind_unseparated(longitude);
        }
        if let Some(category) = input.category {
            sets.push("category = ").push_bind_unseparated(category);
        }
        if let Some(image_url) = &input.image_url {
            sets.push("image_url = ").push_bind_unseparated(image_url.clone());
        }
        if let Some(rating) = input.rating {
            sets.push("rating = ").push_bind_unseparated(rating);
        }
        if let Some(tags) = &input.tags {
            sets.push("tags = ").push_bind_unseparated(tags.clone());
        }
        if let Some(best_time) = &input.best_time {
            sets.push("best_time = ").push_bind_unseparated(best_time.clone());
        }
        if let Some(equipment_needed) = &input.equipment_needed {
            sets.push("equipment_needed = ").push_bind_unseparated(equipment_needed.clone());
        }
    }

    fn has_changes(input: &SpotUpdate) -> bool {
        input.has_changes()
    }
}

/// GET /api/spots - list spots, best-rated first
pub async fn list(Query(query): Query<ListSpotsQuery>) -> Result<Json<Vec<SpotResponse>>, ApiError> {
    let pagination = &config::config().pagination;
    let (skip, limit) = resolve_page(
        query.skip,
        query.limit,
        pagination.spot_default_limit,
        pagination.spot_max_limit,
    )?;

    let pool = DatabaseManager::pool().await?;

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM spots WHERE 1 = 1");
    if let Some(category) = query.category {
        qb.push(" AND category = ").push_bind(category);
    }
    if let Some(search) = &query.search {
        // Case-insensitive substring match over name OR location
        let pattern = format!("%{}%", search);
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR location ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    qb.push(" ORDER BY rating DESC OFFSET ")
        .push_bind(skip)
        .push(" LIMIT ")
        .push_bind(limit);

    let spots = qb
        .build_query_as::<Spot>()
        .fetch_all(&pool)
        .await
        .map_err(DatabaseError::Sqlx)?;

    Ok(Json(spots.into_iter().map(SpotResponse::from).collect()))
}

/// GET /api/spots/:id
pub async fn get(Path(id): Path<i64>) -> Result<Json<SpotResponse>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let spot = Repository::<Spots>::fetch(&pool, id).await?;
    Ok(Json(spot.into()))
}

/// POST /api/spots - admin only
pub async fn create(
    AdminUser(_admin): AdminUser,
    Json(input): Json<SpotCreate>,
) -> Result<(StatusCode, Json<SpotResponse>), ApiError> {
    input.validate()?;

    let pool = DatabaseManager::pool().await?;
    let spot = Repository::<Spots>::insert(&pool, &input).await?;
    Ok((StatusCode::CREATED, Json(spot.into())))
}

/// PUT /api/spots/:id - admin only, partial update
pub async fn update(
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
    Json(input): Json<SpotUpdate>,
) -> Result<Json<SpotResponse>, ApiError> {
    input.validate()?;

    let pool = DatabaseManager::pool().await?;
    let spot = Repository::<Spots>::update(&pool, id, &input).await?;
    Ok(Json(spot.into()))
}

/// DELETE /api/spots/:id - admin only
pub async fn delete(AdminUser(_admin): AdminUser, Path(id): Path<i64>) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Repository::<Spots>::delete(&pool, id).await?;
    Ok(Json(json!({ "message": "Spot deleted successfully" })))
}
