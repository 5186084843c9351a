//! Imaging decision-support demo shell.
//!
//! The wizard controller is the core; the terminal demo and the session
//! REST API are two front ends over it.

pub mod app;
pub mod config;
pub mod logging;
pub mod products;
pub mod rest;
pub mod ui;
pub mod wizard;
