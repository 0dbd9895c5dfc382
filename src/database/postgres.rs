use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, postgres::PgRow, types::Json, PgPool, Row};
use tracing::info;

use super::models::{AuthorRef, Campground, CampgroundFields, Geometry, Image, Review, ReviewFields, User, UserSummary};
use super::store::{ResourceStore, StoreError};
use crate::config::DatabaseConfig;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        email TEXT,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS campgrounds (
        id TEXT PRIMARY KEY,
        seq BIGSERIAL,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        price DOUBLE PRECISION NOT NULL,
        location TEXT NOT NULL,
        geometry JSONB NOT NULL,
        images JSONB NOT NULL DEFAULT '[]',
        author_id TEXT NOT NULL REFERENCES users (id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS reviews (
        id TEXT PRIMARY KEY,
        seq BIGSERIAL,
        campground_id TEXT NOT NULL REFERENCES campgrounds (id) ON DELETE CASCADE,
        body TEXT NOT NULL,
        rating SMALLINT NOT NULL CHECK (rating BETWEEN 1 AND 5),
        author_id TEXT NOT NULL REFERENCES users (id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
];

const CAMPGROUND_COLUMNS: &str = r#"
    c.id, c.title, c.description, c.price, c.location, c.geometry, c.images,
    c.author_id, c.created_at, u.username AS author_username,
    ARRAY(SELECT r.id FROM reviews r WHERE r.campground_id = c.id ORDER BY r.seq) AS review_ids
"#;

/// Postgres-backed store. Review cleanup on campground delete is also enforced
/// by `ON DELETE CASCADE`.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| StoreError::Backend("DATABASE_URL is not configured".to_string()))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        let store = Self { pool };
        store.ensure_schema().await?;
        info!("Connected to Postgres store");
        Ok(store)
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn select_campground(&self, id: &str, hydrate: bool) -> Result<Option<Campground>, StoreError> {
        let sql = format!(
            "SELECT {CAMPGROUND_COLUMNS} FROM campgrounds c LEFT JOIN users u ON u.id = c.author_id WHERE c.id = $1"
        );
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.map(|row| campground_from_row(&row, hydrate)).transpose()
    }
}

fn map_unique_violation(err: sqlx::Error, message: String) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => StoreError::Conflict(message),
        _ => StoreError::Sqlx(err),
    }
}

fn author_from_row(row: &PgRow, hydrate: bool) -> Result<AuthorRef, StoreError> {
    let author_id: String = row.try_get("author_id")?;
    let username: Option<String> = row.try_get("author_username")?;
    let author = AuthorRef::Id(author_id.clone());
    Ok(match (hydrate, username) {
        (true, Some(username)) => author.hydrate(Some(UserSummary { id: author_id, username })),
        _ => author,
    })
}

fn campground_from_row(row: &PgRow, hydrate: bool) -> Result<Campground, StoreError> {
    let Json(geometry): Json<Geometry> = row.try_get("geometry")?;
    let Json(images): Json<Vec<Image>> = row.try_get("images")?;
    Ok(Campground {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        price: row.try_get("price")?,
        location: row.try_get("location")?,
        geometry,
        images,
        author: author_from_row(row, hydrate)?,
        reviews: row.try_get("review_ids")?,
        created_at: row.try_get("created_at")?,
    })
}

fn review_from_row(row: &PgRow, hydrate: bool) -> Result<Review, StoreError> {
    let rating: i16 = row.try_get("rating")?;
    Ok(Review {
        id: row.try_get("id")?,
        campground_id: row.try_get("campground_id")?,
        body: row.try_get("body")?,
        rating: u8::try_from(rating).map_err(|_| StoreError::Backend(format!("stored rating out of range: {rating}")))?,
        author: author_from_row(row, hydrate)?,
        created_at: row.try_get("created_at")?,
    })
}

fn user_from_row(row: &PgRow) -> Result<User, StoreError> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl ResourceStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, user: User) -> Result<User, StoreError> {
        sqlx::query("INSERT INTO users (id, username, email, password_hash, created_at) VALUES ($1, $2, $3, $4, $5)")
            .bind(&user.id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_unique_violation(
                    e,
                    format!("A user with the given username '{}' is already registered", user.username),
                )
            })?;
        Ok(user)
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT id, username, email, password_hash, created_at FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT id, username, email, password_hash, created_at FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn list_campgrounds(&self) -> Result<Vec<Campground>, StoreError> {
        let sql = format!(
            "SELECT {CAMPGROUND_COLUMNS} FROM campgrounds c LEFT JOIN users u ON u.id = c.author_id ORDER BY c.seq"
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(|row| campground_from_row(row, false)).collect()
    }

    async fn find_campground(&self, id: &str) -> Result<Option<Campground>, StoreError> {
        self.select_campground(id, false).await
    }

    async fn find_campground_with_author(&self, id: &str) -> Result<Option<Campground>, StoreError> {
        self.select_campground(id, true).await
    }

    async fn create_campground(&self, fields: CampgroundFields, author_id: &str) -> Result<Campground, StoreError> {
        let camp = Campground::new(fields, author_id);
        sqlx::query(
            r#"
            INSERT INTO campgrounds (id, title, description, price, location, geometry, images, author_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&camp.id)
        .bind(&camp.title)
        .bind(&camp.description)
        .bind(camp.price)
        .bind(&camp.location)
        .bind(Json(&camp.geometry))
        .bind(Json(&camp.images))
        .bind(author_id)
        .bind(camp.created_at)
        .execute(&self.pool)
        .await?;
        Ok(camp)
    }

    async fn update_campground(&self, camp: &Campground) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE campgrounds
            SET title = $2, description = $3, price = $4, location = $5, geometry = $6, images = $7
            WHERE id = $1
            "#,
        )
        .bind(&camp.id)
        .bind(&camp.title)
        .bind(&camp.description)
        .bind(camp.price)
        .bind(&camp.location)
        .bind(Json(&camp.geometry))
        .bind(Json(&camp.images))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::campground_not_found(&camp.id));
        }
        Ok(())
    }

    async fn delete_campground(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM campgrounds WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::campground_not_found(id));
        }
        Ok(())
    }

    async fn delete_all_campgrounds(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM campgrounds").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn find_review(&self, campground_id: &str, review_id: &str) -> Result<Option<Review>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT r.id, r.campground_id, r.body, r.rating, r.author_id, r.created_at, NULL::TEXT AS author_username
            FROM reviews r
            WHERE r.id = $1 AND r.campground_id = $2
            "#,
        )
        .bind(review_id)
        .bind(campground_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|row| review_from_row(&row, false)).transpose()
    }

    async fn list_reviews_with_author(&self, campground_id: &str) -> Result<Vec<Review>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.campground_id, r.body, r.rating, r.author_id, r.created_at, u.username AS author_username
            FROM reviews r
            LEFT JOIN users u ON u.id = r.author_id
            WHERE r.campground_id = $1
            ORDER BY r.seq
            "#,
        )
        .bind(campground_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(|row| review_from_row(row, true)).collect()
    }

    async fn count_reviews(&self, campground_id: &str) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE campground_id = $1")
            .bind(campground_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn create_review(&self, campground_id: &str, fields: ReviewFields, author_id: &str) -> Result<Review, StoreError> {
        if self.find_campground(campground_id).await?.is_none() {
            return Err(StoreError::campground_not_found(campground_id));
        }

        let review = Review::new(campground_id, fields, author_id);
        sqlx::query(
            r#"
            INSERT INTO reviews (id, campground_id, body, rating, author_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&review.id)
        .bind(campground_id)
        .bind(&review.body)
        .bind(i16::from(review.rating))
        .bind(author_id)
        .bind(review.created_at)
        .execute(&self.pool)
        .await?;
        Ok(review)
    }

    async fn delete_review(&self, campground_id: &str, review_id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1 AND campground_id = $2")
            .bind(review_id)
            .bind(campground_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::review_not_found(review_id));
        }
        Ok(())
    }

    async fn delete_reviews_for(&self, campground_id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM reviews WHERE campground_id = $1")
            .bind(campground_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
