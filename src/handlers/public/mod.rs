pub mod catalog;
pub mod login;
pub mod register;
pub mod root;

pub use catalog::{movies_list, users_list};
pub use login::login;
pub use register::user_register;
pub use root::{health, root};
