use crate::db::models::{Meme, RankedMeme, User};
use crate::db::schema::SQLITE_INIT;
use crate::error::ForgeError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

/// Open (creating the file if missing) a pooled connection to the store.
pub async fn connect(database_url: &str) -> Result<SqlitePool, ForgeError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
    Ok(pool)
}

/// Browse-listing order.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MemeSort {
    #[default]
    Recent,
    Likes,
}

#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), ForgeError> {
        // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn insert_user(&self, user: &User) -> Result<(), ForgeError> {
        sqlx::query(
            r#"INSERT INTO user (id, name, email, profile_pic, password)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.profile_pic)
        .bind(&user.password)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn user_by_id(&self, id: &str) -> Result<Option<User>, ForgeError> {
        let row = sqlx::query(
            r#"SELECT id, name, email, profile_pic, password FROM user WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_user).transpose()
    }

    pub async fn user_by_email(&self, email: &str) -> Result<Option<User>, ForgeError> {
        let row = sqlx::query(
            r#"SELECT id, name, email, profile_pic, password FROM user WHERE email = ?"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_user).transpose()
    }

    /// Persist a new meme owned by `owner_id`, stamped with the current time.
    pub async fn insert_meme(&self, owner_id: &str, url: &str) -> Result<Meme, ForgeError> {
        let created = Utc::now();
        let res = sqlx::query(
            r#"INSERT INTO meme (id, url, date_of_creation) VALUES (?, ?, ?)"#,
        )
        .bind(owner_id)
        .bind(url)
        .bind(created.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(Meme {
            meme_id: res.last_insert_rowid(),
            owner_id: owner_id.to_string(),
            url: url.to_string(),
            date_of_creation: created,
        })
    }

    pub async fn meme_by_id(&self, meme_id: i64) -> Result<Option<Meme>, ForgeError> {
        let row = sqlx::query(
            r#"SELECT meme_id, id, url, date_of_creation FROM meme WHERE meme_id = ?"#,
        )
        .bind(meme_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_meme).transpose()
    }

    pub async fn memes_by_owner(&self, owner_id: &str) -> Result<Vec<Meme>, ForgeError> {
        let rows = sqlx::query(
            r#"SELECT meme_id, id, url, date_of_creation FROM meme
               WHERE id = ? ORDER BY meme_id DESC"#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_meme).collect()
    }

    /// Memes created by other users, joined with like counts.
    /// Never includes the viewer's own memes; at most `limit` rows.
    pub async fn list_browsable(
        &self,
        viewer_id: &str,
        sort: MemeSort,
        limit: u32,
    ) -> Result<Vec<RankedMeme>, ForgeError> {
        let sql = match sort {
            MemeSort::Recent => {
                r#"SELECT m.meme_id, m.id, m.url, m.date_of_creation,
                          COUNT(l.meme_id) AS likes
                   FROM meme m
                   LEFT JOIN "like" l ON l.meme_id = m.meme_id
                   WHERE m.id <> ?
                   GROUP BY m.meme_id
                   ORDER BY m.date_of_creation DESC, m.meme_id DESC
                   LIMIT ?"#
            }
            MemeSort::Likes => {
                r#"SELECT m.meme_id, m.id, m.url, m.date_of_creation,
                          COUNT(l.meme_id) AS likes
                   FROM meme m
                   LEFT JOIN "like" l ON l.meme_id = m.meme_id
                   WHERE m.id <> ?
                   GROUP BY m.meme_id
                   ORDER BY likes DESC, m.meme_id DESC
                   LIMIT ?"#
            }
        };
        let rows = sqlx::query(sql)
            .bind(viewer_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::row_to_ranked).collect()
    }

    /// Record a like. Duplicate (user, meme) pairs are ignored; returns
    /// whether a new row was written.
    pub async fn insert_like(&self, user_id: &str, meme_id: i64) -> Result<bool, ForgeError> {
        let res = sqlx::query(
            r#"INSERT INTO "like" (id, meme_id) VALUES (?, ?)
               ON CONFLICT(id, meme_id) DO NOTHING"#,
        )
        .bind(user_id)
        .bind(meme_id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn like_count(&self, meme_id: i64) -> Result<i64, ForgeError> {
        let rec: (i64,) = sqlx::query_as(r#"SELECT COUNT(*) FROM "like" WHERE meme_id = ?"#)
            .bind(meme_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    fn row_to_user(row: SqliteRow) -> Result<User, ForgeError> {
        Ok(User {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            profile_pic: row.try_get("profile_pic")?,
            password: row.try_get("password")?,
        })
    }

    fn row_to_meme(row: SqliteRow) -> Result<Meme, ForgeError> {
        let created_str: String = row.try_get("date_of_creation")?;
        let date_of_creation: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc);
        Ok(Meme {
            meme_id: row.try_get("meme_id")?,
            owner_id: row.try_get("id")?,
            url: row.try_get("url")?,
            date_of_creation,
        })
    }

    fn row_to_ranked(row: SqliteRow) -> Result<RankedMeme, ForgeError> {
        let likes: i64 = row.try_get("likes")?;
        Ok(RankedMeme {
            meme: Self::row_to_meme(row)?,
            likes,
        })
    }
}
