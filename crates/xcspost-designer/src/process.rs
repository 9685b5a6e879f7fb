//! Cut processes attached to primitives.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

use crate::model::encode_number;

/// How the laser treats a primitive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessingType {
    VectorCutting,
    VectorEngraving,
    BitmapEngraving,
    /// Any other processing type name the control application knows
    Custom(String),
}

impl ProcessingType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::VectorCutting => "VECTOR_CUTTING",
            Self::VectorEngraving => "VECTOR_ENGRAVING",
            Self::BitmapEngraving => "BITMAP_ENGRAVING",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for ProcessingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProcessingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            return Err("Empty processing type".to_string());
        }
        Ok(match name {
            "VECTOR_CUTTING" => Self::VectorCutting,
            "VECTOR_ENGRAVING" => Self::VectorEngraving,
            "BITMAP_ENGRAVING" => Self::BitmapEngraving,
            other => Self::Custom(other.to_string()),
        })
    }
}

/// Power/speed/pass parameters for one primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutProcess {
    pub processing_type: ProcessingType,
    /// Laser power, percent
    pub power: f64,
    /// Travel speed, mm/s
    pub speed: f64,
    /// Number of passes
    pub repeat: u32,
}

impl CutProcess {
    pub fn new(processing_type: ProcessingType, power: f64, speed: f64, repeat: u32) -> Self {
        Self {
            processing_type,
            power,
            speed,
            repeat,
        }
    }

    pub fn cutting(power: f64, speed: f64, repeat: u32) -> Self {
        Self::new(ProcessingType::VectorCutting, power, speed, repeat)
    }

    pub fn engraving(power: f64, speed: f64, repeat: u32) -> Self {
        Self::new(ProcessingType::VectorEngraving, power, speed, repeat)
    }

    /// Encode for the device block; `type` and `isFill` come from the owner
    pub fn encode(&self, primitive_type: &str, is_fill: bool) -> Value {
        let name = self.processing_type.as_str();
        let mut data = serde_json::Map::new();
        data.insert(
            name.to_string(),
            json!({
                "materialType": "customize",
                "processIgnore": false,
                "parameter": {
                    "customize": {
                        "power": encode_number(self.power),
                        "speed": encode_number(self.speed),
                        "repeat": self.repeat,
                    }
                }
            }),
        );
        json!({
            "processingType": name,
            "data": Value::Object(data),
            "type": primitive_type,
            "isFill": is_fill,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_type_names() {
        assert_eq!(ProcessingType::VectorCutting.to_string(), "VECTOR_CUTTING");
        assert_eq!(
            "VECTOR_ENGRAVING".parse::<ProcessingType>(),
            Ok(ProcessingType::VectorEngraving)
        );
        assert_eq!(
            "KNIFE_CUTTING".parse::<ProcessingType>(),
            Ok(ProcessingType::Custom("KNIFE_CUTTING".to_string()))
        );
        assert!("".parse::<ProcessingType>().is_err());
    }

    #[test]
    fn test_encode_layout() {
        let process = CutProcess::cutting(81.0, 31.0, 2);
        let text = process.encode("RECT", false).to_string();
        assert_eq!(
            text,
            r#"{"processingType":"VECTOR_CUTTING","data":{"VECTOR_CUTTING":{"materialType":"customize","processIgnore":false,"parameter":{"customize":{"power":81,"speed":31,"repeat":2}}}},"type":"RECT","isFill":false}"#
        );
    }
}
