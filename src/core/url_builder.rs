use crate::domain::model::{AttachmentMode, CapabilitiesDocument, Layer, OperationDescriptor};
use crate::utils::error::{PreviewError, Result};

pub const WMS_VERSION: &str = "1.3.0";
pub const DEFAULT_CRS: &str = "EPSG:4326";
pub const WHOLE_EARTH_BBOX: &str = "-90,-180,90,180";
pub const IMAGE_WIDTH: u32 = 512;
pub const IMAGE_HEIGHT: u32 = 256;

/// Builds GetMap and GetLegendGraphic URLs for a discovered layer.
///
/// The endpoint and the parameters are joined with `&` as-is. Downstream
/// services expect this exact string, so nothing is percent-encoded and
/// CRS/BBOX stay fixed even when the document advertises another CRS.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestUrlBuilder;

impl RequestUrlBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(
        &self,
        doc: &CapabilitiesDocument,
        layer: &Layer,
        mode: AttachmentMode,
    ) -> Result<String> {
        match mode {
            AttachmentMode::Map => self.build_map_url(doc, layer),
            AttachmentMode::LegendGraphic => self.build_legend_url(doc, layer),
        }
    }

    pub fn build_map_url(&self, doc: &CapabilitiesDocument, layer: &Layer) -> Result<String> {
        let operation = require(doc, AttachmentMode::Map)?;
        Ok(join(
            &operation.endpoint,
            "GetMap",
            format!("LAYERS={}", layer.name),
            "STYLES=",
            &operation.format,
        ))
    }

    pub fn build_legend_url(&self, doc: &CapabilitiesDocument, layer: &Layer) -> Result<String> {
        let operation = require(doc, AttachmentMode::LegendGraphic)?;
        Ok(join(
            &operation.endpoint,
            "GetLegendGraphic",
            format!("LAYER={}", layer.name),
            "STYLE=",
            &operation.format,
        ))
    }
}

fn require(doc: &CapabilitiesDocument, mode: AttachmentMode) -> Result<&OperationDescriptor> {
    doc.operation(mode)
        .ok_or_else(|| PreviewError::UnsupportedOperation {
            operation: mode.operation_name().to_string(),
        })
}

fn join(endpoint: &str, request: &str, layer: String, style: &str, format: &str) -> String {
    [
        endpoint.to_string(),
        "SERVICE=WMS".to_string(),
        format!("VERSION={}", WMS_VERSION),
        format!("REQUEST={}", request),
        layer,
        style.to_string(),
        format!("CRS={}", DEFAULT_CRS),
        format!("BBOX={}", WHOLE_EARTH_BBOX),
        format!("width={}", IMAGE_WIDTH),
        format!("height={}", IMAGE_HEIGHT),
        format!("format={}", format),
    ]
    .join("&")
}
