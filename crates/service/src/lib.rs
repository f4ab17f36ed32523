//! Service layer for fractal jobs.
//! - `fractal::validation` turns raw JSON bodies into typed requests.
//! - `fractal::repository` is the record store seam (SeaORM and in-memory).
//! - `fractal::service` applies the create / publish-result rules.

pub mod errors;
pub mod fractal;
#[cfg(test)]
pub mod test_support;
