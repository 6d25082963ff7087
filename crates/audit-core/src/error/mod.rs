//! Domain-level errors returned by the ports

mod platform_error;
mod store_error;

pub use platform_error::PlatformError;
pub use store_error::StoreError;
