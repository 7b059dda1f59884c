//! Structured output: prompt augmentation and section extraction.
//!
//! The augmenter asks the model for a JSON object with fixed keys; the
//! extractor recovers those keys from whatever the model actually returned.

mod augment;
mod extract;

pub use augment::augment;
pub use extract::{extract, Sections};
