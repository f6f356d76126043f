// Adapters layer: concrete implementations of the domain ports.

pub mod attachment;
pub mod http;

pub use attachment::{ConsoleAttachmentSink, MemoryAttachmentSink};
pub use http::HttpCapabilitiesSource;
