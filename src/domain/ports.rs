use crate::domain::model::Attachment;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Anything that can hand back the raw text of a capabilities document.
#[async_trait]
pub trait CapabilitiesSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Receives the attachment chosen by the user.
#[async_trait]
pub trait AttachmentSink: Send + Sync {
    async fn attach(&self, attachment: Attachment) -> Result<()>;
}
