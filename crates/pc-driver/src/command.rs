use crate::{CommandRequest, DriverError, ParameterSpec, Result, ServiceSpec, TypeSpec};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Text,
    Int,
}

impl ParamKind {
    pub fn type_name(self) -> &'static str {
        match self {
            ParamKind::Text => "string",
            ParamKind::Int => "int",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: ParamKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub params: &'static [ParamDescriptor],
}

impl ServiceDescriptor {
    pub fn to_spec(&self) -> ServiceSpec {
        ServiceSpec {
            id: self.id.to_string(),
            name: self.name.to_string(),
            input_data: self
                .params
                .iter()
                .map(|p| ParameterSpec {
                    id: p.id.to_string(),
                    name: p.name.to_string(),
                    data_type: TypeSpec::new(p.kind.type_name()),
                })
                .collect(),
        }
    }
}

const SPEAK: ServiceDescriptor = ServiceDescriptor {
    id: "Speak",
    name: "Speak text",
    params: &[ParamDescriptor {
        id: "text",
        name: "Text",
        kind: ParamKind::Text,
    }],
};

const REBOOT: ServiceDescriptor = ServiceDescriptor {
    id: "Reboot",
    name: "Reboot after delay",
    params: &[ParamDescriptor {
        id: "timeout",
        name: "Delay in seconds",
        kind: ParamKind::Int,
    }],
};

/// Every service the driver accepts, in description order.
pub const SERVICES: [ServiceDescriptor; 2] = [SPEAK, REBOOT];

/// A validated control command, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Speak { text: String },
    Reboot { timeout: u32 },
}

impl Command {
    /// Match `req.name` exactly against [`SERVICES`] and parse its input.
    pub fn parse(req: &CommandRequest) -> Result<Self> {
        match req.name.as_str() {
            "" => Err(DriverError::EmptyCommand),
            "Speak" => {
                let text = text_arg(&SPEAK, 0, &req.input_data)?;
                Ok(Command::Speak { text })
            }
            "Reboot" => {
                let timeout = int_arg(&REBOOT, 0, &req.input_data)?;
                Ok(Command::Reboot { timeout })
            }
            other => Err(DriverError::NotImplemented(other.to_string())),
        }
    }

    pub fn service(&self) -> &'static ServiceDescriptor {
        match self {
            Command::Speak { .. } => &SERVICES[0],
            Command::Reboot { .. } => &SERVICES[1],
        }
    }
}

fn invalid(svc: &ServiceDescriptor, idx: usize, reason: impl Into<String>) -> DriverError {
    DriverError::InvalidInput {
        service: svc.id,
        parameter: svc.params.get(idx).map(|p| p.id).unwrap_or("?"),
        reason: reason.into(),
    }
}

// Picks parameter `idx` out of a scalar, a positional array, or an object keyed by parameter id.
fn arg<'a>(svc: &ServiceDescriptor, idx: usize, input: &'a Value) -> Result<&'a Value> {
    let found = match input {
        Value::Array(items) => items.get(idx),
        Value::Object(map) => {
            let id = svc.params.get(idx).map(|p| p.id).unwrap_or_default();
            map.get(id).or_else(|| {
                map.iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(id))
                    .map(|(_, v)| v)
            })
        }
        Value::Null => None,
        scalar if idx == 0 => Some(scalar),
        _ => None,
    };
    match found {
        Some(Value::Null) | None => Err(invalid(svc, idx, "missing value")),
        Some(v) => Ok(v),
    }
}

fn text_arg(svc: &ServiceDescriptor, idx: usize, input: &Value) -> Result<String> {
    match arg(svc, idx, input)? {
        Value::String(s) => Ok(s.clone()),
        v @ (Value::Number(_) | Value::Bool(_)) => Ok(v.to_string()),
        _ => Err(invalid(svc, idx, "expected a string")),
    }
}

fn int_arg(svc: &ServiceDescriptor, idx: usize, input: &Value) -> Result<u32> {
    let raw: i64 = match arg(svc, idx, input)? {
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i,
            (None, Some(f)) if f.fract() == 0.0 && f.abs() <= i64::MAX as f64 => f as i64,
            _ => return Err(invalid(svc, idx, format!("{n} is not an integer"))),
        },
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| invalid(svc, idx, format!("'{s}' is not an integer")))?,
        _ => return Err(invalid(svc, idx, "expected an integer")),
    };
    u32::try_from(raw).map_err(|_| invalid(svc, idx, format!("{raw} is out of range")))
}
