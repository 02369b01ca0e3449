pub mod favorites;
pub mod movies;
pub mod users;

pub use favorites::{favorite_add, favorite_remove};
pub use movies::{director_get, genre_get, movie_get};
pub use users::{user_delete, user_get, user_put};
