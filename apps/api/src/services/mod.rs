//! HTTP handlers, one module per area.

pub mod admin;
pub mod catalog;
pub mod health;
pub mod orders;
pub mod seed;
pub mod user;
