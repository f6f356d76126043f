use serde::{Deserialize, Serialize};

/// Parsed snapshot of a WMS GetCapabilities response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitiesDocument {
    pub version: String,
    pub service_name: String,
    pub service_title: String,
    pub map_operation: Option<OperationDescriptor>,
    pub legend_operation: Option<OperationDescriptor>,
    pub layers: Vec<Layer>,
}

impl CapabilitiesDocument {
    pub fn operation(&self, mode: AttachmentMode) -> Option<&OperationDescriptor> {
        match mode {
            AttachmentMode::Map => self.map_operation.as_ref(),
            AttachmentMode::LegendGraphic => self.legend_operation.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    pub endpoint: String,
    pub format: String,
    /// Only sampled for GetMap; legend requests carry no CRS.
    pub reference_system: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentMode {
    Map,
    LegendGraphic,
}

impl AttachmentMode {
    /// WMS request name of the operation backing this mode.
    pub fn operation_name(self) -> &'static str {
        match self {
            Self::Map => "GetMap",
            Self::LegendGraphic => "GetLegendGraphic",
        }
    }

    pub fn popup_title(self) -> &'static str {
        match self {
            Self::Map => "Attach Map..",
            Self::LegendGraphic => "Attach Legend Graphic..",
        }
    }

    pub fn empty_message(self) -> &'static str {
        match self {
            Self::Map => "No Maps found",
            Self::LegendGraphic => "No Legend Graphics found",
        }
    }

    pub fn searching_message(self) -> &'static str {
        match self {
            Self::Map => "Searching for Maps...",
            Self::LegendGraphic => "Searching for Legend Graphics...",
        }
    }

    pub fn attachment_prefix(self) -> &'static str {
        match self {
            Self::Map => "Map",
            Self::LegendGraphic => "LegendGraphic",
        }
    }
}

/// One selectable entry offered to the user for a discovered layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerChoice {
    pub label: String,
    pub url: String,
    pub attachment_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub url: String,
}

impl From<&LayerChoice> for Attachment {
    fn from(choice: &LayerChoice) -> Self {
        Self {
            name: choice.attachment_name.clone(),
            url: choice.url.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoResults {
    /// Nothing typed into the search box yet.
    EmptyInput,
    /// The service advertises the operation but lists no layers.
    NoLayers,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Choices(Vec<LayerChoice>),
    Empty(NoResults),
}

impl SearchOutcome {
    pub fn into_choices(self) -> Vec<LayerChoice> {
        match self {
            Self::Choices(choices) => choices,
            Self::Empty(_) => Vec::new(),
        }
    }
}
