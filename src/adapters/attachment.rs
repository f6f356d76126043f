use crate::domain::model::Attachment;
use crate::domain::ports::AttachmentSink;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Prints attachments to stdout, one `name<TAB>url` line each.
#[derive(Debug, Clone, Default)]
pub struct ConsoleAttachmentSink {
    json: bool,
}

impl ConsoleAttachmentSink {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

#[async_trait]
impl AttachmentSink for ConsoleAttachmentSink {
    async fn attach(&self, attachment: Attachment) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string(&attachment)?);
        } else {
            println!("{}\t{}", attachment.name, attachment.url);
        }
        tracing::info!("Attached '{}'", attachment.name);
        Ok(())
    }
}

/// Keeps attachments in memory; handy for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryAttachmentSink {
    attachments: Arc<Mutex<Vec<Attachment>>>,
}

impl MemoryAttachmentSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn attachments(&self) -> Vec<Attachment> {
        self.attachments.lock().await.clone()
    }
}

#[async_trait]
impl AttachmentSink for MemoryAttachmentSink {
    async fn attach(&self, attachment: Attachment) -> Result<()> {
        self.attachments.lock().await.push(attachment);
        Ok(())
    }
}
