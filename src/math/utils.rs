// src/math/utils.rs

/// Mathematische Konstanten
pub mod constants {
    /// Toleranz für Lande- und Kollinearitätsprüfungen (in Metern)
    pub const EPSILON: f64 = 1e-9;
    pub const TAU: f64 = std::f64::consts::TAU;
    pub const PI: f64 = std::f64::consts::PI;
    pub const PI_OVER_2: f64 = std::f64::consts::FRAC_PI_2;
}
