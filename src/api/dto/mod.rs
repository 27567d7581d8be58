pub mod auth;
pub mod cards;
pub mod rules;
pub mod users;
