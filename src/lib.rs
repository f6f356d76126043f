pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{ConsoleAttachmentSink, HttpCapabilitiesSource, MemoryAttachmentSink};
pub use config::PreviewConfig;
pub use crate::core::{
    parser::CapabilitiesParser, preview::PreviewService, url_builder::RequestUrlBuilder,
};
pub use domain::model::{
    Attachment, AttachmentMode, CapabilitiesDocument, Layer, LayerChoice, NoResults,
    OperationDescriptor, SearchOutcome,
};
pub use utils::error::{PreviewError, Result};
