//! Domain models

pub mod aml;
pub mod request_log;
pub mod role;
pub mod service;
pub mod user;
