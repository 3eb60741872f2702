#![doc = "The `minerva` library crate."]
#![doc = ""]
#![doc = "This crate contains the authentication boundary, the bearer-token service,"]
#![doc = "the owner-scoped project store, routing configuration, and error handling"]
#![doc = "for the Minerva backend. It is used by the main binary (`main.rs`) to"]
#![doc = "construct and run the application."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod schema;
pub mod store;
