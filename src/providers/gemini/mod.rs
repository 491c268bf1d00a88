//! Google Gemini Provider
//!
//! Transport adapter for the Gemini API: text and speech through
//! `generateContent`, images through Imagen `predict` and video through Veo
//! long-running operations.
//!
//! # Example
//! ```rust,no_run
//! use skran::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), GenerationError> {
//!     let client = GeminiClient::new(StudioConfig::new("your-api-key"))?;
//!     let reply = client
//!         .generate_text(TextRequest::new("gemini-2.5-flash", "Hello!"))
//!         .await?;
//!     println!("{:?}", reply.text());
//!     Ok(())
//! }
//! ```

mod audio;
mod chat;
pub mod client;
mod images;
pub mod types;
mod video;

pub use client::GeminiClient;
