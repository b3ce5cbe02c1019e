//! Client side of the issue reporting wizard.
//!
//! [`controller::StepController`] walks the user through the five steps,
//! holding the draft form and the captured media. Capture adapters in
//! [`capture`] turn device input into files for the media buckets, and
//! [`submit`] packages everything into one multipart request.

pub mod capture;
pub mod config;
pub mod controller;
pub mod draft;
pub mod error;
pub mod media;
pub mod submit;
