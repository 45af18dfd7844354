//! Entity Module

pub mod credential;
pub mod principal;
pub mod session;
