pub mod errors;
pub mod db;
pub mod fractal;

#[cfg(test)]
mod tests;
