use crate::core::xml::{read_document, Element};
use crate::domain::model::{CapabilitiesDocument, Layer, OperationDescriptor};
use crate::utils::error::{PreviewError, Result};

/// Turns raw GetCapabilities XML into a [`CapabilitiesDocument`].
///
/// Stateless: one parser can be shared between any number of concurrent
/// searches.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilitiesParser;

impl CapabilitiesParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, raw: &str) -> Result<CapabilitiesDocument> {
        let root = read_document(raw)?;

        // Version compatibility is the caller's decision; only presence is required here.
        let version = root
            .attribute("version")
            .map(str::to_string)
            .ok_or_else(|| {
                PreviewError::malformed(format!(
                    "root element <{}> has no version attribute",
                    root.name
                ))
            })?;

        let (service_name, service_title) = match root.child("Service") {
            Some(service) => (service.child_text("Name"), service.child_text("Title")),
            None => (String::new(), String::new()),
        };

        let capability = root.child("Capability");
        let request = capability.and_then(|c| c.child("Request"));

        let map_operation = request
            .and_then(|r| r.child("GetMap"))
            .and_then(parse_operation)
            .map(|descriptor| OperationDescriptor {
                reference_system: capability.and_then(first_reference_system),
                ..descriptor
            });

        // `sld:GetLegendGraphic` and `GetLegendGraphic` share the local name.
        let legend_operation = request
            .and_then(|r| r.child("GetLegendGraphic"))
            .and_then(parse_operation);

        let layers = capability.map(collect_layers).unwrap_or_default();

        tracing::debug!(
            version = %version,
            service = %service_name,
            layers = layers.len(),
            get_map = map_operation.is_some(),
            get_legend_graphic = legend_operation.is_some(),
            "Parsed capabilities document"
        );

        Ok(CapabilitiesDocument {
            version,
            service_name,
            service_title,
            map_operation,
            legend_operation,
            layers,
        })
    }
}

/// An operation without an HTTP GET online resource cannot be requested, so
/// it is treated as not advertised. Other operations are unaffected.
fn parse_operation(operation: &Element) -> Option<OperationDescriptor> {
    let endpoint = operation
        .children_named("DCPType")
        .find_map(|dcp| dcp.path(&["HTTP", "Get", "OnlineResource"]))
        .and_then(|resource| resource.attribute("href"));

    let Some(endpoint) = endpoint else {
        tracing::warn!(
            "{} is advertised without an HTTP GET online resource; ignoring it",
            operation.name
        );
        return None;
    };

    Some(OperationDescriptor {
        endpoint: endpoint.to_string(),
        format: operation.child_text("Format"),
        reference_system: None,
    })
}

/// The first CRS of the first top-level layer stands in for the whole service.
fn first_reference_system(capability: &Element) -> Option<String> {
    let layer = capability.child("Layer")?;
    layer
        .descendant("CRS")
        .or_else(|| layer.descendant("SRS"))
        .map(|crs| crs.text().to_string())
        .filter(|crs| !crs.is_empty())
}

/// Second-level layers: the direct children of each top-level umbrella layer.
fn collect_layers(capability: &Element) -> Vec<Layer> {
    capability
        .children_named("Layer")
        .flat_map(|umbrella| umbrella.children_named("Layer"))
        .map(|layer| Layer {
            name: layer.child_text("Name"),
            title: layer.child_text("Title"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<WMS_Capabilities version="1.3.0" xmlns="http://www.opengis.net/wms"
    xmlns:sld="http://www.opengis.net/sld" xmlns:xlink="http://www.w3.org/1999/xlink">
  <Service>
    <Name>WMS</Name>
    <Title>Example Service</Title>
  </Service>
  <Capability>
    <Request>
      <GetCapabilities>
        <Format>text/xml</Format>
      </GetCapabilities>
      <GetMap>
        <Format>image/png</Format>
        <Format>image/jpeg</Format>
        <DCPType><HTTP><Get><OnlineResource xlink:type="simple" xlink:href="http://example.org/wms?"/></Get></HTTP></DCPType>
      </GetMap>
      <sld:GetLegendGraphic>
        <Format>image/gif</Format>
        <DCPType><HTTP><Get><OnlineResource xlink:href="http://example.org/legend?"/></Get></HTTP></DCPType>
      </sld:GetLegendGraphic>
    </Request>
    <Layer>
      <Title>Umbrella</Title>
      <CRS>EPSG:3857</CRS>
      <CRS>EPSG:4326</CRS>
      <Layer>
        <Name>roads</Name>
        <Title>Roads</Title>
        <Layer><Name>roads:major</Name><Title>Major roads</Title></Layer>
      </Layer>
      <Layer>
        <Name>rivers</Name>
        <Title>Rivers</Title>
        <Layer><Name>rivers:all</Name><Title>All rivers</Title></Layer>
      </Layer>
    </Layer>
  </Capability>
</WMS_Capabilities>"#;

    #[test]
    fn test_parse_full_document() {
        let doc = CapabilitiesParser::new().parse(FULL_DOCUMENT).unwrap();

        assert_eq!(doc.version, "1.3.0");
        assert_eq!(doc.service_name, "WMS");
        assert_eq!(doc.service_title, "Example Service");

        let map = doc.map_operation.as_ref().unwrap();
        assert_eq!(map.endpoint, "http://example.org/wms?");
        assert_eq!(map.format, "image/png");
        assert_eq!(map.reference_system.as_deref(), Some("EPSG:3857"));

        let legend = doc.legend_operation.as_ref().unwrap();
        assert_eq!(legend.endpoint, "http://example.org/legend?");
        assert_eq!(legend.format, "image/gif");
        assert_eq!(legend.reference_system, None);
    }

    #[test]
    fn test_collects_second_level_layers_only() {
        let doc = CapabilitiesParser::new().parse(FULL_DOCUMENT).unwrap();
        assert_eq!(
            doc.layers,
            vec![
                Layer {
                    name: "roads".to_string(),
                    title: "Roads".to_string()
                },
                Layer {
                    name: "rivers".to_string(),
                    title: "Rivers".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_bare_legend_graphic_name() {
        let doc = CapabilitiesParser::new()
            .parse(
                r#"<WMS_Capabilities version="1.3.0"><Capability><Request>
<GetLegendGraphic><Format>image/png</Format>
<DCPType><HTTP><Get><OnlineResource href="http://example.org/legend"/></Get></HTTP></DCPType>
</GetLegendGraphic></Request></Capability></WMS_Capabilities>"#,
            )
            .unwrap();

        assert!(doc.map_operation.is_none());
        assert_eq!(
            doc.legend_operation.unwrap().endpoint,
            "http://example.org/legend"
        );
        assert!(doc.layers.is_empty());
    }

    #[test]
    fn test_missing_service_and_capability_default_to_empty() {
        let doc = CapabilitiesParser::new()
            .parse(r#"<WMS_Capabilities version="9.9.9"/>"#)
            .unwrap();

        assert_eq!(doc.version, "9.9.9");
        assert_eq!(doc.service_name, "");
        assert_eq!(doc.service_title, "");
        assert!(doc.map_operation.is_none());
        assert!(doc.legend_operation.is_none());
        assert!(doc.layers.is_empty());
    }

    #[test]
    fn test_missing_version_is_malformed() {
        let err = CapabilitiesParser::new()
            .parse("<WMS_Capabilities><Service/></WMS_Capabilities>")
            .unwrap_err();
        assert!(matches!(err, PreviewError::MalformedDocument { .. }));
    }

    #[test]
    fn test_operation_without_online_resource_is_unset() {
        let doc = CapabilitiesParser::new()
            .parse(
                r#"<WMS_Capabilities version="1.3.0"><Capability><Request>
<GetMap><Format>image/png</Format></GetMap>
<GetLegendGraphic><Format>image/png</Format>
<DCPType><HTTP><Get><OnlineResource href="http://example.org/legend"/></Get></HTTP></DCPType>
</GetLegendGraphic></Request></Capability></WMS_Capabilities>"#,
            )
            .unwrap();
        assert!(doc.map_operation.is_none());
        assert_eq!(
            doc.legend_operation.unwrap().endpoint,
            "http://example.org/legend"
        );
    }

    const GET_MAP_REQUEST: &str = r#"<Request><GetMap><Format>image/png</Format>
<DCPType><HTTP><Get><OnlineResource href="http://example.org/wms"/></Get></HTTP></DCPType>
</GetMap></Request>"#;

    fn reference_system_of(layers: &str) -> Option<String> {
        let raw = format!(
            r#"<WMS_Capabilities version="1.3.0"><Capability>{}{}</Capability></WMS_Capabilities>"#,
            GET_MAP_REQUEST, layers
        );
        CapabilitiesParser::new()
            .parse(&raw)
            .unwrap()
            .map_operation
            .unwrap()
            .reference_system
    }

    #[test]
    fn test_legacy_srs_is_used_when_no_crs() {
        assert_eq!(
            reference_system_of("<Layer><SRS>EPSG:4269</SRS><Layer><Name>a</Name></Layer></Layer>")
                .as_deref(),
            Some("EPSG:4269")
        );
    }

    #[test]
    fn test_crs_preferred_over_srs() {
        assert_eq!(
            reference_system_of("<Layer><SRS>EPSG:4269</SRS><Layer><CRS>EPSG:3857</CRS></Layer></Layer>")
                .as_deref(),
            Some("EPSG:3857")
        );
    }

    #[test]
    fn test_crs_sampled_from_first_top_level_layer_only() {
        // Only a nested layer of the first umbrella declares a CRS.
        assert_eq!(
            reference_system_of(
                "<Layer><Title>Root</Title><Layer><Name>a</Name><CRS>EPSG:25832</CRS></Layer></Layer>\
                 <Layer><CRS>EPSG:3857</CRS></Layer>"
            )
            .as_deref(),
            Some("EPSG:25832")
        );
        // The second top-level layer is never consulted.
        assert_eq!(
            reference_system_of("<Layer><Title>Root</Title></Layer><Layer><CRS>EPSG:3857</CRS></Layer>"),
            None
        );
    }

    #[test]
    fn test_operation_without_format_has_empty_format() {
        let doc = CapabilitiesParser::new()
            .parse(
                r#"<WMS_Capabilities version="1.3.0"><Capability><Request><GetMap>
<DCPType><HTTP><Get><OnlineResource href="http://example.org/wms"/></Get></HTTP></DCPType>
</GetMap></Request></Capability></WMS_Capabilities>"#,
            )
            .unwrap();
        let map = doc.map_operation.unwrap();
        assert_eq!(map.format, "");
        assert_eq!(map.reference_system, None);
    }

    #[test]
    fn test_layer_without_name_keeps_empty_name() {
        let doc = CapabilitiesParser::new()
            .parse(
                r#"<WMS_Capabilities version="1.3.0"><Capability>
<Layer><Layer><Title>Anonymous</Title></Layer></Layer></Capability></WMS_Capabilities>"#,
            )
            .unwrap();
        assert_eq!(doc.layers.len(), 1);
        assert_eq!(doc.layers[0].name, "");
        assert_eq!(doc.layers[0].title, "Anonymous");
    }
}
