//! HDHomeRun device identity (`discover.json`, `device.xml`) and the static
//! lineup status.

use serde::Serialize;

use crate::xmltv::render_xml;

/// Friendly name advertised to clients.
pub const FRIENDLY_NAME: &str = "tvhgate";
/// Manufacturer clients expect from an HDHomeRun.
pub const MANUFACTURER: &str = "Silicondust";
/// Emulated model.
pub const MODEL_NUMBER: &str = "HDTC-2US";
/// Emulated firmware name.
pub const FIRMWARE_NAME: &str = "hdhomeruntc_atsc";
/// Emulated firmware version.
pub const FIRMWARE_VERSION: &str = "20150826";
/// Placeholder device auth token.
pub const DEVICE_AUTH: &str = "test1234";

/// Device description failure.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum DeviceError {
    /// The UPnP description could not be rendered.
    #[error("device description could not be rendered: {0}")]
    Render(String),
}

/// `discover.json` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeviceDescriptor {
    /// Friendly name.
    pub friendly_name: String,
    /// Manufacturer.
    pub manufacturer: String,
    /// Model number.
    pub model_number: String,
    /// Firmware name.
    pub firmware_name: String,
    /// Number of tuners offered.
    pub tuner_count: u32,
    /// Firmware version.
    pub firmware_version: String,
    /// Device identifier.
    #[serde(rename = "DeviceID")]
    pub device_id: String,
    /// Device auth token.
    pub device_auth: String,
    /// Externally reachable base URL of this gateway.
    #[serde(rename = "BaseURL")]
    pub base_url: String,
    /// `{BaseURL}/lineup.json`.
    #[serde(rename = "LineupURL")]
    pub lineup_url: String,
}

impl DeviceDescriptor {
    /// Builds the descriptor with the emulated HDHomeRun identity.
    #[must_use]
    pub fn new(device_id: impl Into<String>, tuner_count: u32, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            friendly_name: String::from(FRIENDLY_NAME),
            manufacturer: String::from(MANUFACTURER),
            model_number: String::from(MODEL_NUMBER),
            firmware_name: String::from(FIRMWARE_NAME),
            tuner_count,
            firmware_version: String::from(FIRMWARE_VERSION),
            device_id: device_id.into(),
            device_auth: String::from(DEVICE_AUTH),
            base_url: String::from(base_url),
            lineup_url: format!("{base_url}/lineup.json"),
        }
    }

    /// UPnP root description served at `/` and `/device.xml`.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Render`] if the document cannot be rendered.
    pub fn device_xml(&self) -> Result<String, DeviceError> {
        let root = UpnpRoot {
            xmlns: "urn:schemas-upnp-org:device-1-0",
            spec_version: SpecVersion { major: 1, minor: 0 },
            url_base: &self.base_url,
            device: UpnpDevice {
                device_type: "urn:schemas-upnp-org:device:MediaServer:1",
                friendly_name: &self.friendly_name,
                manufacturer: &self.manufacturer,
                model_name: &self.model_number,
                model_number: &self.model_number,
                serial_number: "",
                udn: format!("uuid:{}", self.device_id),
            },
        };
        render_xml(&root, false).map_err(DeviceError::Render)
    }
}

#[derive(Serialize)]
#[serde(rename = "root")]
struct UpnpRoot<'a> {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    #[serde(rename = "specVersion")]
    spec_version: SpecVersion,
    #[serde(rename = "URLBase")]
    url_base: &'a str,
    device: UpnpDevice<'a>,
}

#[derive(Serialize)]
struct SpecVersion {
    major: u8,
    minor: u8,
}

#[derive(Serialize)]
struct UpnpDevice<'a> {
    #[serde(rename = "deviceType")]
    device_type: &'static str,
    #[serde(rename = "friendlyName")]
    friendly_name: &'a str,
    manufacturer: &'a str,
    #[serde(rename = "modelName")]
    model_name: &'a str,
    #[serde(rename = "modelNumber")]
    model_number: &'a str,
    #[serde(rename = "serialNumber")]
    serial_number: &'static str,
    #[serde(rename = "UDN")]
    udn: String,
}

/// `lineup_status.json` body. The gateway never scans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LineupStatus {
    /// Always 0.
    pub scan_in_progress: u8,
    /// Always 0.
    pub scan_possible: u8,
    /// Signal source.
    pub source: &'static str,
    /// Available sources.
    pub source_list: [&'static str; 1],
}

impl Default for LineupStatus {
    fn default() -> Self {
        Self {
            scan_in_progress: 0,
            scan_possible: 0,
            source: "Cable",
            source_list: ["Cable"],
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_descriptor_urls() {
        let descriptor = DeviceDescriptor::new("12345678", 6, "http://gateway:5004/");

        assert_eq!(descriptor.base_url, "http://gateway:5004");
        assert_eq!(descriptor.lineup_url, "http://gateway:5004/lineup.json");
    }

    #[test]
    fn test_descriptor_json_keys() {
        // Arrange
        let descriptor = DeviceDescriptor::new("abcd", 2, "http://gateway:5004");

        // Act
        let json = serde_json::to_value(&descriptor).unwrap();

        // Assert
        assert_eq!(json["FriendlyName"], "tvhgate");
        assert_eq!(json["Manufacturer"], "Silicondust");
        assert_eq!(json["ModelNumber"], "HDTC-2US");
        assert_eq!(json["FirmwareName"], "hdhomeruntc_atsc");
        assert_eq!(json["FirmwareVersion"], "20150826");
        assert_eq!(json["TunerCount"], 2);
        assert_eq!(json["DeviceID"], "abcd");
        assert_eq!(json["DeviceAuth"], "test1234");
        assert_eq!(json["BaseURL"], "http://gateway:5004");
        assert_eq!(json["LineupURL"], "http://gateway:5004/lineup.json");
    }

    #[test]
    fn test_device_xml() {
        // Arrange
        let descriptor = DeviceDescriptor::new("12345678", 6, "http://gateway:5004");

        // Act
        let rendered: Result<String, DeviceError> = descriptor.device_xml();
        let xml = rendered.unwrap();

        // Assert
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<root xmlns=\"urn:schemas-upnp-org:device-1-0\">"));
        assert!(xml.contains("<URLBase>http://gateway:5004</URLBase>"));
        assert!(xml.contains("<friendlyName>tvhgate</friendlyName>"));
        assert!(xml.contains("<modelNumber>HDTC-2US</modelNumber>"));
        assert!(xml.contains("<UDN>uuid:12345678</UDN>"));
        assert!(!xml.contains("DOCTYPE"));
    }

    #[test]
    fn test_device_error_display() {
        let err = DeviceError::Render(String::from("unsupported value"));

        assert_eq!(
            err.to_string(),
            "device description could not be rendered: unsupported value"
        );
    }

    #[test]
    fn test_lineup_status_json() {
        let json = serde_json::to_value(LineupStatus::default()).unwrap();

        assert_eq!(json["ScanInProgress"], 0);
        assert_eq!(json["ScanPossible"], 0);
        assert_eq!(json["Source"], "Cable");
        assert_eq!(json["SourceList"][0], "Cable");
    }
}
