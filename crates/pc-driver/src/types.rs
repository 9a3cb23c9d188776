use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use host_telemetry::MetricValue as PointValue;

/// Suffix of the key a point's probe status is reported under.
pub const STATUS_SUFFIX: &str = "-Status";

/// Values keyed by point name, plus `<name>-Status` entries for probed points.
pub type ReadResult = HashMap<String, PointValue>;

pub fn status_key(point_name: &str) -> String {
    format!("{point_name}{STATUS_SUFFIX}")
}

/// A requested read target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub name: String,
    /// Probe target (hostname or IP). Points with an address are always probed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Type hint carried through from the device model; not used when resolving.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

impl Point {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_address(name: &str, address: &str) -> Self {
        Self {
            name: name.to_string(),
            address: Some(address.to_string()),
            data_type: None,
        }
    }

    /// The probe target, if one is set and not blank.
    pub fn target(&self) -> Option<&str> {
        self.address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }
}

/// A decoded control payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest {
    pub name: String,
    /// Scalar for single-parameter services, an array in parameter order, or an
    /// object keyed by parameter id.
    #[serde(default)]
    pub input_data: serde_json::Value,
}

impl CommandRequest {
    pub fn new(name: &str, input_data: serde_json::Value) -> Self {
        Self {
            name: name.to_string(),
            input_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_address_is_no_target() {
        assert_eq!(Point::named("CpuRate").target(), None);
        assert_eq!(Point::with_address("Gw", "  ").target(), None);
        assert_eq!(Point::with_address("Gw", " 10.0.0.1 ").target(), Some("10.0.0.1"));
    }

    #[test]
    fn point_decodes_from_device_model_json() -> anyhow::Result<()> {
        let p: Point = serde_json::from_value(json!({
            "name": "Gateway",
            "address": "192.168.1.1",
            "dataType": "int"
        }))?;
        assert_eq!(p.target(), Some("192.168.1.1"));
        assert_eq!(p.data_type.as_deref(), Some("int"));
        Ok(())
    }

    #[test]
    fn command_input_defaults_to_null() -> anyhow::Result<()> {
        let req: CommandRequest = serde_json::from_value(json!({ "name": "Speak" }))?;
        assert!(req.input_data.is_null());
        Ok(())
    }
}
