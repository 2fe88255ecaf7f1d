use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::index::Index;

/// One addressable axis of a shape.
///
/// A dimension is either a base axis with a direct stride, a derived dimension that resolves
/// its coordinates through an [`Index`] into a source dimension, or an unknown axis used only to
/// describe shapes that are not allocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    kind: DimensionKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DimensionKind {
    Axis {
        num_elements: u64,
        stride: u64,
    },
    Indexed {
        index: Index,
        source: Rc<Dimension>,
        num_elements: u64,
    },
    Unknown,
}

impl Dimension {
    pub fn axis(num_elements: u64, stride: u64) -> Self {
        Self {
            kind: DimensionKind::Axis {
                num_elements,
                stride,
            },
        }
    }

    pub fn unknown() -> Self {
        Self {
            kind: DimensionKind::Unknown,
        }
    }

    /// Derives a dimension by applying `index` to `source`.
    ///
    /// The identity index returns the source itself. A fixed index is validated here, so that a
    /// placeholder always carries a resolvable offset.
    pub fn indexed(index: Index, source: &Dimension) -> Result<Self> {
        if index == Index::All {
            return Ok(source.clone());
        }
        if let Index::At(coordinate) = index {
            source.position_of(coordinate)?;
        }
        let num_elements = index.num_elements(source)?;
        Ok(Self {
            kind: DimensionKind::Indexed {
                index,
                source: Rc::new(source.clone()),
                num_elements,
            },
        })
    }

    pub fn num_elements(&self) -> u64 {
        match &self.kind {
            DimensionKind::Axis { num_elements, .. } => *num_elements,
            DimensionKind::Indexed { num_elements, .. } => *num_elements,
            DimensionKind::Unknown => 0,
        }
    }

    pub fn stride(&self) -> u64 {
        match &self.kind {
            DimensionKind::Axis { stride, .. } => *stride,
            DimensionKind::Indexed { source, .. } => source.stride(),
            DimensionKind::Unknown => 0,
        }
    }

    pub fn position_of(&self, coordinate: u64) -> Result<u64> {
        match &self.kind {
            DimensionKind::Axis {
                num_elements,
                stride,
            } => {
                if coordinate >= *num_elements {
                    return Err(Error::out_of_bounds(coordinate, *num_elements));
                }
                Ok(stride * coordinate)
            }
            DimensionKind::Indexed {
                index,
                source,
                num_elements,
            } => {
                if coordinate >= *num_elements {
                    return Err(Error::out_of_bounds(coordinate, *num_elements));
                }
                source.position_of(index.map_coordinate(coordinate, source))
            }
            DimensionKind::Unknown => Err(Error::OutOfBoundsError {
                msg: "Cannot resolve a coordinate on a dimension of unknown size".to_string(),
            }),
        }
    }

    /// Offset contributed by a fixed-coordinate placeholder, zero for any other dimension.
    pub fn position(&self) -> u64 {
        match &self.kind {
            DimensionKind::Indexed {
                index: Index::At(coordinate),
                source,
                ..
            } => source.position_of(*coordinate).unwrap_or(0),
            _ => 0,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(
            &self.kind,
            DimensionKind::Indexed {
                index: Index::At(_),
                ..
            }
        )
    }

    pub fn is_known(&self) -> bool {
        !matches!(self.kind, DimensionKind::Unknown)
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self.kind, DimensionKind::Indexed { .. })
    }

    /// True when consecutive coordinates resolve to adjacent positions.
    pub fn is_contiguous(&self) -> bool {
        match &self.kind {
            DimensionKind::Axis { stride, .. } => *stride == 1,
            DimensionKind::Indexed { index, source, .. } => {
                index.preserves_contiguity() && source.is_contiguous()
            }
            DimensionKind::Unknown => false,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "{}", self.num_elements())
        } else {
            write!(f, "?")
        }
    }
}
