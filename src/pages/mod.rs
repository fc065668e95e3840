mod admin;
mod login;
mod public;

pub use admin::{NavigationAdminPage, RequireAdmin};
pub use login::LoginPage;
pub use public::PublicHome;
