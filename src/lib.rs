//! SpeciScan - species identification client
//!
//! Browser client for the species identification page. It binds the image
//! upload and name search forms to the backend, and renders the returned
//! species record as the results fragment.

pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod model;
pub mod render;
pub mod submission;

pub use config::{ClientConfig, ConfigError, LogLevel};
pub use controller::{FormController, Page, Transport};
pub use error::ClientError;
pub use model::{Classification, Image, SpeciesData, UploadResult};
pub use render::{RenderKind, RenderedResults, ResultRenderer};

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod http;

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
