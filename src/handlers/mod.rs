//! HTTP 处理器模块

pub mod aml;
pub mod auth;
pub mod health;
pub mod permission;
pub mod request_log;
pub mod role;
pub mod service;
pub mod user;
