pub mod parser;
pub mod preview;
pub mod url_builder;
pub mod xml;

pub use crate::domain::model::{
    AttachmentMode, CapabilitiesDocument, Layer, LayerChoice, OperationDescriptor,
    SearchOutcome,
};
pub use crate::domain::ports::{AttachmentSink, CapabilitiesSource};
pub use crate::utils::error::Result;
