use anyhow::{bail, Context, Result};
use quick_xml::de::from_str;
use serde::Deserialize;
use shared::models::CatalogEntry;

const DOWNLOAD_BASE: &str = "https://downloads.dell.com/";

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(rename = "SoftwareComponent", default)]
    components: Vec<SoftwareComponent>,
}

#[derive(Debug, Deserialize)]
struct SoftwareComponent {
    #[serde(rename = "@packageID", default)]
    package_id: String,
    #[serde(rename = "@releaseDate", default)]
    release_date: String,
    #[serde(rename = "@vendorVersion", default)]
    vendor_version: String,
    #[serde(rename = "@path", default)]
    path: String,
    #[serde(rename = "@size", default)]
    size: u64,
    #[serde(rename = "Name", default)]
    name: Option<Localized>,
    #[serde(rename = "ComponentType", default)]
    component_type: Option<Coded>,
    #[serde(rename = "Criticality", default)]
    criticality: Option<Coded>,
    #[serde(rename = "SupportedSystems", default)]
    supported_systems: Option<SupportedSystems>,
}

#[derive(Debug, Deserialize)]
struct Localized {
    #[serde(rename = "Display", default)]
    display: Option<Text>,
}

#[derive(Debug, Deserialize)]
struct Text {
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct Coded {
    #[serde(rename = "@value", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct SupportedSystems {
    #[serde(rename = "Brand", default)]
    brands: Vec<Brand>,
}

#[derive(Debug, Deserialize)]
struct Brand {
    #[serde(rename = "Model", default)]
    models: Vec<Model>,
}

#[derive(Debug, Deserialize)]
struct Model {
    #[serde(rename = "$text", default)]
    name: String,
    #[serde(rename = "Display", default)]
    display: Option<Text>,
}

impl Model {
    /// Inline model name, or its `Display` child when the text is nested.
    fn name(&self) -> Option<&str> {
        let inline = self.name.trim();
        if !inline.is_empty() {
            return Some(inline);
        }
        self.display
            .as_ref()
            .map(|d| d.value.trim())
            .filter(|name| !name.is_empty())
    }
}

/// Vendor component-type codes mapped to readable categories.
pub(crate) fn map_component_type(code: &str) -> String {
    match code {
        "BIOS" => "BIOS",
        "FRMW" => "Firmware",
        "DRVR" => "Driver",
        "APAC" => "Application",
        other => other,
    }
    .to_string()
}

/// Decodes manifest bytes: UTF-16 with BOM as published by the vendor, or UTF-8.
fn decode_text(bytes: &[u8]) -> Result<String> {
    fn utf16(bytes: &[u8], from_bytes: fn([u8; 2]) -> u16) -> Result<String> {
        if bytes.len() % 2 != 0 {
            bail!("UTF-16 manifest has an odd number of bytes");
        }
        let units = bytes.chunks_exact(2).map(|pair| from_bytes([pair[0], pair[1]]));
        char::decode_utf16(units)
            .collect::<Result<String, _>>()
            .context("invalid UTF-16 in manifest")
    }

    match bytes {
        [0xFF, 0xFE, rest @ ..] => utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => utf16(rest, u16::from_be_bytes),
        [0xEF, 0xBB, 0xBF, rest @ ..] => {
            String::from_utf8(rest.to_vec()).context("invalid UTF-8 in manifest")
        }
        _ => String::from_utf8(bytes.to_vec()).context("invalid UTF-8 in manifest"),
    }
}

/// Parses a vendor manifest into one entry per (component, supported model).
pub(crate) fn parse_manifest(bytes: &[u8]) -> Result<Vec<CatalogEntry>> {
    let text = decode_text(bytes)?;
    let manifest: Manifest = from_str(&text).context("failed to parse catalog XML")?;

    let mut entries = Vec::new();
    for component in manifest.components {
        let component_type = map_component_type(
            component
                .component_type
                .as_ref()
                .map_or("", |c| c.value.as_str()),
        );
        let file_name = component
            .name
            .as_ref()
            .and_then(|n| n.display.as_ref())
            .map(|d| d.value.trim().to_string())
            .unwrap_or_default();
        let criticality = component
            .criticality
            .as_ref()
            .map(|c| c.value.clone())
            .unwrap_or_default();

        let models = component
            .supported_systems
            .iter()
            .flat_map(|systems| &systems.brands)
            .flat_map(|brand| &brand.models)
            .filter_map(Model::name);
        for model in models {
            entries.push(CatalogEntry {
                component_id: component.package_id.clone(),
                component_type: component_type.clone(),
                system_model_id: model.to_string(),
                version: component.vendor_version.clone(),
                release_date: component.release_date.clone(),
                criticality: criticality.clone(),
                download_url: format!("{DOWNLOAD_BASE}{}", component.path),
                file_name: file_name.clone(),
                size_mb: component.size / 1024 / 1024,
            });
        }
    }
    Ok(entries)
}

#[cfg(test)]
pub(crate) const SAMPLE_MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Manifest version="2.0">
	<SoftwareComponent schemaVersion="2.0" packageID="ABCD1234" releaseDate="2024-01-15"
		vendorVersion="2.18.1" path="FOLDER111/BIOS_OLD.EXE" size="16777216">
		<Name><Display>BIOS Update</Display></Name>
		<ComponentType value="BIOS"/>
		<Criticality value="Optional"/>
		<SupportedSystems>
			<Brand>
				<Model systemID="08B4" systemIDType="PNPID">PowerEdge R640</Model>
			</Brand>
		</SupportedSystems>
	</SoftwareComponent>
	<SoftwareComponent schemaVersion="2.0" packageID="ABCD5678" releaseDate="2024-03-02"
		vendorVersion="2.19.1" path="FOLDER123/BIOS_ABC.EXE" size="16777216">
		<Name><Display>BIOS Update</Display></Name>
		<ComponentType value="BIOS"/>
		<Criticality value="Recommended"/>
		<SupportedSystems>
			<Brand>
				<Model systemID="08B4" systemIDType="PNPID">PowerEdge R640</Model>
				<Model systemID="08B5" systemIDType="PNPID">PowerEdge R740</Model>
			</Brand>
		</SupportedSystems>
	</SoftwareComponent>
	<SoftwareComponent schemaVersion="2.0" packageID="EFGH5678" releaseDate="2024-02-20"
		vendorVersion="6.10.30.00" path="FOLDER456/iDRAC_XYZ.EXE" size="33554432">
		<Name><Display>iDRAC Update</Display></Name>
		<ComponentType value="FRMW"/>
		<Criticality value="Critical"/>
		<SupportedSystems>
			<Brand>
				<Model systemID="08B4" systemIDType="PNPID">PowerEdge R640</Model>
			</Brand>
		</SupportedSystems>
	</SoftwareComponent>
</Manifest>"#;
