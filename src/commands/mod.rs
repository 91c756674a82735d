pub mod categories;
pub mod menu;
pub mod orders;
pub mod reports;
pub mod users;
