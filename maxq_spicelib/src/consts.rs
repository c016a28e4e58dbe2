//! Mathematical and physical constants, as functions to match the toolkit's
//! calling style.

use std::f64::consts;

pub fn pi() -> f64 {
    consts::PI
}

pub fn halfpi() -> f64 {
    consts::FRAC_PI_2
}

pub fn twopi() -> f64 {
    consts::TAU
}

/// Degrees per radian
pub fn dpr() -> f64 {
    180.0 / consts::PI
}

/// Radians per degree
pub fn rpd() -> f64 {
    consts::PI / 180.0
}

/// Speed of light in vacuum, km/s
pub fn clight() -> f64 {
    299792.458
}

pub fn dpmax() -> f64 {
    f64::MAX
}

pub fn dpmin() -> f64 {
    f64::MIN
}

pub fn intmax() -> i32 {
    i32::MAX
}

pub fn intmin() -> i32 {
    i32::MIN
}
