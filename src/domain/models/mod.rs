pub mod appointment;
pub mod business;
pub mod client;
pub mod service;
pub mod session;
pub mod staff;
pub mod subscription;
pub mod user;
