// src/math/types/mod.rs
pub mod bounds;

pub use bounds::*;

// Re-export häufig verwendete externe Typen
pub use bevy::math::{DVec2, DVec3};
pub use spade::Point2;

// Einheitliche Typen für das gesamte Modul. Tiefen und Positionen werden in
// Metern gerechnet, daher f64 statt der f32-Varianten von Bevy.
pub type Point2D = DVec2;
pub type Point3D = DVec3;
pub type SpadePoint = Point2<f64>;
