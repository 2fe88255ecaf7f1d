use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Byte,
    Int32,
    Int64,
    Float32,
    Float64,
    Object,
}

impl ElementKind {
    /// Width in bytes of one element, `None` for the generic object kind.
    pub fn byte_size(self) -> Option<usize> {
        match self {
            Self::Byte => Some(1),
            Self::Int32 | Self::Float32 => Some(4),
            Self::Int64 | Self::Float64 => Some(8),
            Self::Object => None,
        }
    }

    pub fn is_numeric(self) -> bool {
        self != Self::Object
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Byte => "BYTE",
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
            Self::Float32 => "FLOAT32",
            Self::Float64 => "FLOAT64",
            Self::Object => "OBJECT",
        };
        write!(f, "{}", name)
    }
}
