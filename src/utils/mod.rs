//! Utility modules

pub mod cancel;
pub mod mime;
pub mod url;

pub use cancel::{CancelHandle, new_cancel_handle};
