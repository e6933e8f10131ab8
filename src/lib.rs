pub mod listings;
pub mod filtering;
pub mod formatting;
pub mod notifications;

pub mod config;
pub mod run; // Run controller: snapshot -> selection -> message -> dispatch
pub mod version;
