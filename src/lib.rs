//! Barn door light filter wireframes: the filter's rounded rect and the frustum it cuts out of
//! every light shining through it, as vertex and line-list index buffers, plus a small CPU line
//! renderer to look at them.

pub mod config;
pub mod error;
pub mod frustum;
pub mod scene;

pub use error::{FrustumError, Result};
pub use frustum::params::{BarnMode, FilterParameters};
pub use frustum::{build_frustum, FrustumGeometry};
