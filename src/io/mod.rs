// src/io/mod.rs
//! File readers for surfaces and drawn tracks.

pub mod surface_import;
pub mod waypoints;

pub use surface_import::load_surface;
pub use waypoints::load_waypoints;
