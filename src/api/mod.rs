//! Transport layer: the authenticated request gateway and its errors
//!
//! Every remote call in the crate goes through [`Gateway`], which resolves
//! paths against the configured base URL, attaches the stored bearer
//! credential, and turns an HTTP 401 into a global logout.

pub mod error;
pub mod gateway;

pub use error::ApiError;
pub use gateway::{ApiRequest, Gateway, SessionEvent};
