pub mod auth;
pub mod notes;
pub mod tables;
pub mod users;

pub use self::auth::model::SignInRequest;
pub use self::users::model::User;
