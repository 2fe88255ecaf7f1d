use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::error::{Error, Result};

/// Controls when a buffer switches from a single block to the segmented tier.
///
/// Unset fields fall back to the native ceiling of the element kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferConfig {
    #[serde(default)]
    pub max_direct_capacity: Option<u64>,
    #[serde(default)]
    pub segment_size: Option<u64>,
}

impl BufferConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: BufferConfig = serde_json::from_str(json).map_err(|e| Error::ArgumentsError {
            msg: format!("Invalid buffer config: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_max_direct_capacity(mut self, capacity: u64) -> Self {
        self.max_direct_capacity = Some(capacity);
        self
    }

    pub fn with_segment_size(mut self, segment_size: u64) -> Self {
        self.segment_size = Some(segment_size);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.segment_size == Some(0) {
            return Err(Error::ArgumentsError {
                msg: "Segment size must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn direct_capacity_limit<T: Element>(&self) -> u64 {
        let native = T::max_direct_capacity();
        match self.max_direct_capacity {
            Some(limit) => limit.min(native),
            None => native,
        }
    }

    pub fn segment_size_for<T: Element>(&self) -> u64 {
        let native = T::max_direct_capacity();
        match self.segment_size {
            Some(size) => size.min(native),
            None => self.direct_capacity_limit::<T>().max(1),
        }
    }
}
