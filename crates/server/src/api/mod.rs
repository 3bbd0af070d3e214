pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;
pub mod tickets;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
