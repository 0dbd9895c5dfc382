// handlers/public/mod.rs - Handlers reachable without a session identity

pub mod auth;
pub mod campgrounds;
pub mod home;
