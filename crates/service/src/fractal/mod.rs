pub mod repository;
pub mod service;
pub mod validation;

pub use repository::{FractalRepository, InMemoryFractalRepository, SeaOrmFractalRepository};
pub use service::FractalService;
pub use validation::{CreateJobRequest, PublishResultRequest};
