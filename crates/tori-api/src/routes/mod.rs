pub mod health;
pub mod history;
pub mod messages;
pub mod summary;
pub mod threads;
