pub mod appointment;
pub mod auth;
pub mod billing;
pub mod business;
pub mod client;
pub mod dashboard;
pub mod health;
pub mod public;
pub mod service;
pub mod staff;
