pub mod movie;
pub mod user;

pub use movie::{Director, Genre, Movie, MovieRow, NewMovie};
pub use user::{LoginRequest, NewUser, RegisterRequest, UpdateUserRequest, User, UserProfile, UserUpdate};
