//! Provider implementations
//!
//! Only Google Gemini (Gemini text/TTS, Imagen, Veo) is wired in.

pub mod gemini;
