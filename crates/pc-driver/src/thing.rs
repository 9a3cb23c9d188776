use serde::{Deserialize, Serialize};

/// Whether a property can be written as well as read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AccessMode {
    #[serde(rename = "r")]
    Read,
    #[default]
    #[serde(rename = "rw")]
    ReadWrite,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSpecs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specs: Option<DataSpecs>,
}

impl TypeSpec {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            specs: None,
        }
    }

    pub fn with_unit(mut self, unit: &str, unit_name: &str) -> Self {
        let specs = self.specs.get_or_insert_with(DataSpecs::default);
        specs.unit = Some(unit.to_string());
        specs.unit_name = Some(unit_name.to_string());
        self
    }
}

/// A readable (and possibly writable) attribute of the device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySpec {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<TypeSpec>,
    #[serde(default)]
    pub access_mode: AccessMode,
}

impl PropertySpec {
    /// Quick constructor; `length` is only recorded when positive.
    pub fn create(
        id: &str,
        name: &str,
        kind: Option<&str>,
        length: u32,
        address: Option<&str>,
    ) -> Self {
        let data_type = kind.map(|k| {
            let mut ts = TypeSpec::new(k);
            if length > 0 {
                ts.specs = Some(DataSpecs {
                    length: Some(length),
                    ..DataSpecs::default()
                });
            }
            ts
        });
        Self {
            id: id.to_string(),
            name: name.to_string(),
            address: address.map(str::to_string),
            data_type,
            access_mode: AccessMode::default(),
        }
    }

    pub fn read_only(mut self) -> Self {
        self.access_mode = AccessMode::Read;
        self
    }
}

/// One positional input of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSpec {
    pub id: String,
    pub name: String,
    pub data_type: TypeSpec,
}

/// An invokable action of the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    pub id: String,
    pub name: String,
    /// Parameters in the order the action takes them.
    #[serde(default)]
    pub input_data: Vec<ParameterSpec>,
}

/// Self-description of the device: what can be read and what can be invoked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThingSpec {
    #[serde(default)]
    pub properties: Vec<PropertySpec>,
    #[serde(default)]
    pub services: Vec<ServiceSpec>,
}

impl ThingSpec {
    pub fn property(&self, id: &str) -> Option<&PropertySpec> {
        self.properties.iter().find(|p| p.id == id)
    }

    pub fn service(&self, id: &str) -> Option<&ServiceSpec> {
        self.services.iter().find(|s| s.id == id)
    }
}
