#![allow(clippy::new_without_default)]

pub mod actor;
pub mod config;
pub mod controller;
pub mod cover;
pub mod data;
pub mod error;
pub mod holder;
pub mod library;
pub mod preferences;
pub mod util;
