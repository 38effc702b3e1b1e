pub mod availability;
pub mod billing;
pub mod session_service;
