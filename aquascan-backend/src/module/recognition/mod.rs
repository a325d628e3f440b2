//! Remote fish recognition
//!
//! Uploads a photo to the third-party recognition service and returns
//! ranked species guesses. Failures stay at this boundary as
//! [`RecognitionError`] and never reach the regulation matcher.

pub mod client;
pub mod types;

pub use client::{HttpRecognitionClient, RecognitionClient};
pub use types::RecognitionError;
