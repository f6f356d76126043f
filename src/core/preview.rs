use crate::config::toml_config::PreviewConfig;
use crate::core::parser::CapabilitiesParser;
use crate::core::url_builder::{RequestUrlBuilder, WMS_VERSION};
use crate::domain::model::{
    Attachment, AttachmentMode, LayerChoice, NoResults, SearchOutcome,
};
use crate::domain::ports::{AttachmentSink, CapabilitiesSource};
use crate::utils::error::{PreviewError, Result};
use crate::utils::validation::{validate_secure_url, validate_url};

/// Drives one search: fetch the capabilities, check them, and offer one
/// choice per layer. Each call is independent; nothing is cached.
pub struct PreviewService<S: CapabilitiesSource> {
    source: S,
    parser: CapabilitiesParser,
    builder: RequestUrlBuilder,
    require_https: bool,
}

impl<S: CapabilitiesSource> PreviewService<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            parser: CapabilitiesParser::new(),
            builder: RequestUrlBuilder::new(),
            require_https: true,
        }
    }

    pub fn from_config(source: S, config: &PreviewConfig) -> Self {
        Self::new(source).with_require_https(config.require_https())
    }

    pub fn with_require_https(mut self, require_https: bool) -> Self {
        self.require_https = require_https;
        self
    }

    pub async fn search(&self, input: &str, mode: AttachmentMode) -> Result<SearchOutcome> {
        let url = input.trim();
        if url.is_empty() {
            return Ok(SearchOutcome::Empty(NoResults::EmptyInput));
        }

        if self.require_https {
            validate_secure_url(url)?;
        } else {
            validate_url("url", url)?;
        }

        tracing::info!("{} {}", mode.searching_message(), url);
        let raw = self.source.fetch(url).await?;
        let doc = self.parser.parse(&raw)?;

        // The builder always writes VERSION=1.3.0, so nothing else can be served.
        if doc.version != WMS_VERSION {
            return Err(PreviewError::UnsupportedVersion {
                found: doc.version,
                expected: WMS_VERSION.to_string(),
            });
        }

        if doc.operation(mode).is_none() {
            return Err(PreviewError::UnsupportedOperation {
                operation: mode.operation_name().to_string(),
            });
        }

        if doc.layers.is_empty() {
            tracing::warn!("{}: the service lists no layers", mode.empty_message());
            return Ok(SearchOutcome::Empty(NoResults::NoLayers));
        }

        let choices = doc
            .layers
            .iter()
            .map(|layer| {
                Ok(LayerChoice {
                    label: layer.title.clone(),
                    url: self.builder.build(&doc, layer, mode)?,
                    attachment_name: format!("{}: {}", mode.attachment_prefix(), layer.title),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            "Found {} layer(s) on '{}'",
            choices.len(),
            doc.service_title
        );
        Ok(SearchOutcome::Choices(choices))
    }

    /// What the selection popup shows: every failure becomes an empty list,
    /// with the reason logged for the operator.
    pub async fn choices_or_empty(&self, input: &str, mode: AttachmentMode) -> Vec<LayerChoice> {
        match self.search(input, mode).await {
            Ok(outcome) => outcome.into_choices(),
            Err(e) if e.is_no_results() => {
                tracing::error!("{} ({})", e, mode.empty_message());
                Vec::new()
            }
            Err(e) => {
                tracing::error!(
                    "Search failed: {} (Category: {:?}, Severity: {:?})",
                    e,
                    e.category(),
                    e.severity()
                );
                Vec::new()
            }
        }
    }

    pub async fn attach<A: AttachmentSink + ?Sized>(
        &self,
        choice: &LayerChoice,
        sink: &A,
    ) -> Result<()> {
        tracing::debug!("Attaching {} -> {}", choice.attachment_name, choice.url);
        sink.attach(Attachment::from(choice)).await
    }
}
