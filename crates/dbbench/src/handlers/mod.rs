pub mod error;
pub mod health;
pub mod queries;
pub mod sql;

pub use error::AppError;
