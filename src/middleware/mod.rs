//! Record middlewares

pub mod interpolation;

pub use interpolation::{replace, Interpolation};
