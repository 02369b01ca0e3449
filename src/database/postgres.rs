use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Director, Genre, Movie, MovieRow, NewMovie, NewUser, User, UserUpdate};
use super::store::Store;

const MOVIE_COLUMNS: &str = "id, title, description, genre_name, genre_description, \
     director_name, director_bio, director_birth, director_death, image_path, featured";

const USER_COLUMNS: &str = "id, username, password, email, birthday, favorite_movies";

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn first_movie_where(&self, column: &str, value: &str) -> Result<Option<Movie>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM movies WHERE {} = $1 ORDER BY title LIMIT 1",
            MOVIE_COLUMNS, column
        );
        let row = sqlx::query_as::<_, MovieRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Movie::from))
    }

    /// Runs an `UPDATE ... RETURNING` on a single user row.
    async fn update_returning(
        &self,
        sql: &str,
        username: &str,
        movie_id: Uuid,
    ) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(sql)
            .bind(username)
            .bind(movie_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl Store for PgStore {
    async fn list_movies(&self) -> Result<Vec<Movie>, DatabaseError> {
        let sql = format!("SELECT {} FROM movies ORDER BY title", MOVIE_COLUMNS);
        let rows = sqlx::query_as::<_, MovieRow>(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn find_movie_by_title(&self, title: &str) -> Result<Option<Movie>, DatabaseError> {
        self.first_movie_where("title", title).await
    }

    async fn find_genre(&self, name: &str) -> Result<Option<Genre>, DatabaseError> {
        Ok(self.first_movie_where("genre_name", name).await?.map(|m| m.genre))
    }

    async fn find_director(&self, name: &str) -> Result<Option<Director>, DatabaseError> {
        Ok(self.first_movie_where("director_name", name).await?.map(|m| m.director))
    }

    async fn insert_movie(&self, movie: NewMovie) -> Result<Option<Movie>, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO movies ({})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (title) DO NOTHING
            RETURNING {}
            "#,
            MOVIE_COLUMNS, MOVIE_COLUMNS
        );

        let row = sqlx::query_as::<_, MovieRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&movie.title)
            .bind(&movie.description)
            .bind(&movie.genre.name)
            .bind(&movie.genre.description)
            .bind(&movie.director.name)
            .bind(&movie.director.bio)
            .bind(movie.director.birth)
            .bind(movie.director.death)
            .bind(&movie.image_path)
            .bind(movie.featured)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Movie::from))
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users ORDER BY username", USER_COLUMNS);
        let users = sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?;
        Ok(users)
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO users (id, username, password, email, birthday)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (username) DO NOTHING
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let created = sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.email)
            .bind(user.birthday)
            .fetch_optional(&self.pool)
            .await?;

        created.ok_or(DatabaseError::AlreadyExists(user.username))
    }

    async fn update_user(&self, username: &str, update: UserUpdate) -> Result<Option<User>, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE users SET
                username = COALESCE($2, username),
                password = COALESCE($3, password),
                email    = COALESCE($4, email),
                birthday = COALESCE($5, birthday)
            WHERE username = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let result = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(update.username.as_deref())
            .bind(update.password_hash.as_deref())
            .bind(update.email.as_deref())
            .bind(update.birthday)
            .fetch_optional(&self.pool)
            .await;

        match result {
            Ok(user) => Ok(user),
            Err(e) if is_unique_violation(&e) => Err(DatabaseError::AlreadyExists(
                update.username.unwrap_or_else(|| username.to_string()),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn add_favorite(&self, username: &str, movie_id: Uuid) -> Result<Option<User>, DatabaseError> {
        let sql = format!(
            "UPDATE users SET favorite_movies = array_append(favorite_movies, $2) \
             WHERE username = $1 RETURNING {}",
            USER_COLUMNS
        );
        self.update_returning(&sql, username, movie_id).await
    }

    async fn remove_favorite(&self, username: &str, movie_id: Uuid) -> Result<Option<User>, DatabaseError> {
        let sql = format!(
            "UPDATE users SET favorite_movies = array_remove(favorite_movies, $2) \
             WHERE username = $1 RETURNING {}",
            USER_COLUMNS
        );
        self.update_returning(&sql, username, movie_id).await
    }

    async fn delete_user(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("DELETE FROM users WHERE username = $1 RETURNING {}", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
