use serde::Serialize;
use sqlx::query_builder::Separated;
use sqlx::{self, postgres::PgRow, FromRow, PgPool, Postgres, QueryBuilder};

use crate::database::manager::DatabaseError;

/// Binds a record kind to its table and the conversions the standard CRUD
/// operations need. Resources with extra rules (articles) skip the façade
/// and issue their own queries; plain resources implement this once and get
/// list/fetch/insert/update/delete for free.
pub trait CrudResource {
    type Record: for<'r> FromRow<'r, PgRow> + Send + Unpin + Serialize;
    /// Storage input for an INSERT (already merged with caller identity
    /// where relevant).
    type Create: Send + Sync;
    /// Partial field-set for an UPDATE; absent fields stay untouched.
    type Update: Send + Sync;

    /// Table name. Trusted identifier, never caller input.
    const TABLE: &'static str;
    /// Singular resource name used in error messages.
    const RESOURCE: &'static str;

    /// Push `(columns) VALUES (binds)` for an INSERT.
    fn bind_insert(qb: &mut QueryBuilder<'_, Postgres>, input: &Self::Create);

    /// Push `column = bind` pairs for every field present in the update.
    fn bind_update(sets: &mut Separated<'_, '_, Postgres, &'static str>, input: &Self::Update);

    /// Whether the partial update carries any field at all.
    fn has_changes(input: &Self::Update) -> bool;
}

/// Generic CRUD over a [`CrudResource`].
pub struct Repository<R: CrudResource> {
    _marker: std::marker::PhantomData<R>,
}

impl<R: CrudResource> Repository<R> {
    pub async fn list(pool: &PgPool, skip: i64, limit: i64) -> Result<Vec<R::Record>, DatabaseError> {
        let mut qb = QueryBuilder::new(format!("SELECT * FROM {} ORDER BY id OFFSET ", R::TABLE));
        qb.push_bind(skip).push(" LIMIT ").push_bind(limit);
        Ok(qb.build_query_as::<R::Record>().fetch_all(pool).await?)
    }

    pub async fn fetch(pool: &PgPool, id: i64) -> Result<R::Record, DatabaseError> {
        let mut qb = QueryBuilder::new(format!("SELECT * FROM {} WHERE id = ", R::TABLE));
        qb.push_bind(id);
        qb.build_query_as::<R::Record>()
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("{} not found", R::RESOURCE)))
    }

    pub async fn insert(pool: &PgPool, input: &R::Create) -> Result<R::Record, DatabaseError> {
        let mut qb = QueryBuilder::new(format!("INSERT INTO {} ", R::TABLE));
        R::bind_insert(&mut qb, input);
        qb.push(" RETURNING *");
        Ok(qb.build_query_as::<R::Record>().fetch_one(pool).await?)
    }

    pub async fn update(pool: &PgPool, id: i64, input: &R::Update) -> Result<R::Record, DatabaseError> {
        if !R::has_changes(input) {
            // Nothing to write; hand back the current row
            return Self::fetch(pool, id).await;
        }

        let mut qb = QueryBuilder::new(format!("UPDATE {} SET ", R::TABLE));
        {
            let mut sets = qb.separated(", ");
            R::bind_update(&mut sets, input);
            sets.push("updated_at = now()");
        }
        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");
        qb.build_query_as::<R::Record>()
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("{} not found", R::RESOURCE)))
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<(), DatabaseError> {
        let mut qb = QueryBuilder::new(format!("DELETE FROM {} WHERE id = ", R::TABLE));
        qb.push_bind(id);
        let result = qb.build().execute(pool).await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("{} not found", R::RESOURCE)));
        }
        Ok(())
    }
}
