use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Director, Genre, Movie, NewMovie, NewUser, User, UserUpdate};
use super::store::Store;

/// In-process store selected with `DATABASE_URL=memory://`.
///
/// Each collection sits behind its own lock, and every operation holds the write lock for
/// its whole check-and-mutate sequence, so username uniqueness holds under concurrency.
#[derive(Default)]
pub struct MemoryStore {
    movies: RwLock<Vec<Movie>>,
    users: RwLock<Vec<User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn modify_user<F>(&self, username: &str, f: F) -> Option<User>
    where
        F: FnOnce(&mut User),
    {
        let mut users = self.users.write().await;
        let user = users.iter_mut().find(|u| u.username == username)?;
        f(user);
        Some(user.clone())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_movies(&self) -> Result<Vec<Movie>, DatabaseError> {
        let mut movies = self.movies.read().await.clone();
        movies.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(movies)
    }

    async fn find_movie_by_title(&self, title: &str) -> Result<Option<Movie>, DatabaseError> {
        let movies = self.movies.read().await;
        Ok(movies.iter().find(|m| m.title == title).cloned())
    }

    async fn find_genre(&self, name: &str) -> Result<Option<Genre>, DatabaseError> {
        let movies = self.list_movies().await?;
        Ok(movies.into_iter().find(|m| m.genre.name == name).map(|m| m.genre))
    }

    async fn find_director(&self, name: &str) -> Result<Option<Director>, DatabaseError> {
        let movies = self.list_movies().await?;
        Ok(movies.into_iter().find(|m| m.director.name == name).map(|m| m.director))
    }

    async fn insert_movie(&self, movie: NewMovie) -> Result<Option<Movie>, DatabaseError> {
        let mut movies = self.movies.write().await;
        if movies.iter().any(|m| m.title == movie.title) {
            return Ok(None);
        }
        let movie = movie.into_movie(Uuid::new_v4());
        movies.push(movie.clone());
        Ok(Some(movie))
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let mut users = self.users.read().await.clone();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == user.username) {
            return Err(DatabaseError::AlreadyExists(user.username));
        }
        let user = user.into_user(Uuid::new_v4());
        users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, username: &str, update: UserUpdate) -> Result<Option<User>, DatabaseError> {
        let mut users = self.users.write().await;
        let Some(index) = users.iter().position(|u| u.username == username) else {
            return Ok(None);
        };

        if let Some(new_name) = &update.username {
            let taken = users
                .iter()
                .enumerate()
                .any(|(i, u)| i != index && &u.username == new_name);
            if taken {
                return Err(DatabaseError::AlreadyExists(new_name.clone()));
            }
        }

        update.apply(&mut users[index]);
        Ok(Some(users[index].clone()))
    }

    async fn add_favorite(&self, username: &str, movie_id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self
            .modify_user(username, |user| user.favorite_movies.push(movie_id))
            .await)
    }

    async fn remove_favorite(&self, username: &str, movie_id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self
            .modify_user(username, |user| user.favorite_movies.retain(|id| *id != movie_id))
            .await)
    }

    async fn delete_user(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let mut users = self.users.write().await;
        let removed = users
            .iter()
            .position(|u| u.username == username)
            .map(|index| users.remove(index));
        Ok(removed)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: "$2b$04$hash".to_string(),
            email: format!("{}@example.com", username),
            birthday: NaiveDate::from_ymd_opt(1985, 6, 15),
        }
    }

    fn new_movie(title: &str, genre: &str, director: &str) -> NewMovie {
        NewMovie {
            title: title.to_string(),
            description: String::new(),
            genre: Genre { name: genre.to_string(), description: format!("{} films", genre) },
            director: Director { name: director.to_string(), bio: String::new(), birth: Some(1950), death: None },
            image_path: String::new(),
            featured: false,
        }
    }

    #[tokio::test]
    async fn create_user_rejects_duplicate_username() {
        let store = MemoryStore::new();
        store.create_user(new_user("moviefan")).await.unwrap();

        let err = store.create_user(new_user("moviefan")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::AlreadyExists(name) if name == "moviefan"));
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_registration_inserts_once() {
        let store = Arc::new(MemoryStore::new());
        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.create_user(new_user("racer")).await.is_ok() })
            })
            .collect();

        let mut created = 0;
        for task in tasks {
            if task.await.unwrap() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_rename_onto_taken_username_fails() {
        let store = MemoryStore::new();
        store.create_user(new_user("first")).await.unwrap();
        store.create_user(new_user("second")).await.unwrap();

        let update = UserUpdate { username: Some("second".into()), ..Default::default() };
        assert!(matches!(
            store.update_user("first", update).await,
            Err(DatabaseError::AlreadyExists(_))
        ));

        // Renaming onto itself is fine
        let update = UserUpdate { username: Some("first".into()), ..Default::default() };
        assert!(store.update_user("first", update).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn update_missing_user_returns_none() {
        let store = MemoryStore::new();
        let update = UserUpdate { email: Some("x@example.com".into()), ..Default::default() };
        assert!(store.update_user("ghost", update).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn favorites_keep_duplicates_and_pull_all() {
        let store = MemoryStore::new();
        store.create_user(new_user("moviefan")).await.unwrap();
        let movie = Uuid::new_v4();
        let other = Uuid::new_v4();

        store.add_favorite("moviefan", movie).await.unwrap();
        store.add_favorite("moviefan", other).await.unwrap();
        let user = store.add_favorite("moviefan", movie).await.unwrap().unwrap();
        assert_eq!(user.favorite_movies, vec![movie, other, movie]);

        let user = store.remove_favorite("moviefan", movie).await.unwrap().unwrap();
        assert_eq!(user.favorite_movies, vec![other]);
    }

    #[tokio::test]
    async fn delete_user_returns_removed_record() {
        let store = MemoryStore::new();
        store.create_user(new_user("moviefan")).await.unwrap();

        assert!(store.delete_user("moviefan").await.unwrap().is_some());
        assert!(store.delete_user("moviefan").await.unwrap().is_none());
        assert!(store.find_user("moviefan").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn movie_lookups_by_title_genre_and_director() {
        let store = MemoryStore::new();
        store.insert_movie(new_movie("Jaws", "Thriller", "Steven Spielberg")).await.unwrap();
        store.insert_movie(new_movie("Alien", "Horror", "Ridley Scott")).await.unwrap();
        assert!(store.insert_movie(new_movie("Jaws", "Drama", "Someone")).await.unwrap().is_none());

        let titles: Vec<_> = store.list_movies().await.unwrap().into_iter().map(|m| m.title).collect();
        assert_eq!(titles, vec!["Alien", "Jaws"]);

        assert_eq!(store.find_movie_by_title("Jaws").await.unwrap().unwrap().genre.name, "Thriller");
        assert_eq!(store.find_genre("Horror").await.unwrap().unwrap().description, "Horror films");
        assert_eq!(
            store.find_director("Steven Spielberg").await.unwrap().unwrap().birth,
            Some(1950)
        );
        assert!(store.find_genre("Western").await.unwrap().is_none());
    }
}
