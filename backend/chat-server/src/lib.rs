pub mod error;
pub mod health;
pub mod idle;
pub mod logger;
pub mod metrics;
pub mod routes;

#[cfg(test)]
mod tests;

pub use crate::error::{Result as ServerErrorResult, ServerError};
pub use crate::routes::build_router;
