use async_trait::async_trait;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Director, Genre, Movie, NewMovie, NewUser, User, UserUpdate};

/// Persistence contract for the `movies` and `users` collections.
///
/// Every method is a single atomic operation against the backing store. Lookups that
/// find nothing return `Ok(None)` rather than an error so handlers can decide how
/// absence maps onto the response.
#[async_trait]
pub trait Store: Send + Sync {
    async fn list_movies(&self) -> Result<Vec<Movie>, DatabaseError>;

    async fn find_movie_by_title(&self, title: &str) -> Result<Option<Movie>, DatabaseError>;

    /// Genre of the first movie whose genre carries this name.
    async fn find_genre(&self, name: &str) -> Result<Option<Genre>, DatabaseError>;

    /// Director of the first movie directed by this name.
    async fn find_director(&self, name: &str) -> Result<Option<Director>, DatabaseError>;

    /// Returns `None` when a movie with the same title already exists.
    async fn insert_movie(&self, movie: NewMovie) -> Result<Option<Movie>, DatabaseError>;

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError>;

    async fn find_user(&self, username: &str) -> Result<Option<User>, DatabaseError>;

    /// Conditional insert; fails with `DatabaseError::AlreadyExists` if the username is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError>;

    /// Overwrites only the supplied fields. Renaming onto a taken username fails with
    /// `DatabaseError::AlreadyExists`.
    async fn update_user(&self, username: &str, update: UserUpdate) -> Result<Option<User>, DatabaseError>;

    async fn add_favorite(&self, username: &str, movie_id: Uuid) -> Result<Option<User>, DatabaseError>;

    /// Removes every occurrence of `movie_id`.
    async fn remove_favorite(&self, username: &str, movie_id: Uuid) -> Result<Option<User>, DatabaseError>;

    /// Returns the removed record, if there was one.
    async fn delete_user(&self, username: &str) -> Result<Option<User>, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}
