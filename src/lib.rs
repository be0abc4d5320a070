// src/lib.rs
// Main library module declarations

pub mod alert;
pub mod config;
pub mod domain;
pub mod exchange;
pub mod monitor;
