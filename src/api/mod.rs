mod handlers;
mod routes;
mod types;
#[cfg(test)]
mod tests;

pub use routes::create_router;
pub use types::{ApiError, HealthStatus};
