use std::fmt;

use crate::dimension::Dimension;
use crate::error::{Error, Result};
use crate::index::Index;

/// Size sentinel accepted by [`Shape::make`] for an axis of unknown length.
pub const UNKNOWN_SIZE: i64 = -1;

/// Ordered dimensions of an N-dimensional array.
///
/// Equality is structural: two shapes are equal when they have the same number of dimensions
/// with the same element counts and the same placeholders, regardless of how each dimension
/// resolves positions.
#[derive(Debug, Clone)]
pub struct Shape {
    dimensions: Vec<Dimension>,
}

pub(crate) struct Resolution {
    pub position: u64,
    pub next_dimension: usize,
    pub remaining_rank: usize,
}

impl Shape {
    pub fn scalar() -> Self {
        Self::from_dimensions(Vec::new())
    }

    /// Builds a row-major shape. Fails when a stride or the total size does not fit in 64 bits.
    pub fn of(dims: &[u64]) -> Result<Self> {
        let strides = Self::compute_stride(dims)?;
        let dimensions = dims
            .iter()
            .zip(strides)
            .map(|(n, stride)| Dimension::axis(*n, stride))
            .collect();
        Ok(Self::from_dimensions(dimensions))
    }

    /// Builds a shape that may contain [`UNKNOWN_SIZE`] axes.
    pub fn make(dims: &[i64]) -> Result<Self> {
        if dims.iter().any(|n| *n < UNKNOWN_SIZE) {
            let msg = format!("Invalid dimension sizes {:?}", dims);
            return Err(Error::ArgumentsError { msg });
        }
        if dims.iter().all(|n| *n >= 0) {
            let known: Vec<u64> = dims.iter().map(|n| *n as u64).collect();
            return Self::of(&known);
        }
        let dimensions = dims
            .iter()
            .map(|n| {
                if *n == UNKNOWN_SIZE {
                    Dimension::unknown()
                } else {
                    Dimension::axis(*n as u64, 0)
                }
            })
            .collect();
        Ok(Self::from_dimensions(dimensions))
    }

    pub(crate) fn from_dimensions(dimensions: Vec<Dimension>) -> Self {
        Self { dimensions }
    }

    fn compute_stride(dims: &[u64]) -> Result<Vec<u64>> {
        let mut strides = vec![0; dims.len()];
        let mut stride: u64 = 1;
        for i in (0..dims.len()).rev() {
            strides[i] = stride;
            // The last product is the total size, which must be addressable as well.
            stride = stride.checked_mul(dims[i]).ok_or_else(|| Error::ArgumentsError {
                msg: format!("Shape {:?} overflows a 64-bit position space", dims),
            })?;
        }
        Ok(strides)
    }

    pub fn rank(&self) -> usize {
        self.dimensions.len()
    }

    pub fn num_dimensions(&self) -> usize {
        self.rank()
    }

    pub fn is_scalar(&self) -> bool {
        self.dimensions.is_empty()
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// # Panics
    ///
    /// Panics if `i >= self.rank()`; see [`get`](Self::get) for a checked lookup.
    pub fn dimension(&self, i: usize) -> &Dimension {
        &self.dimensions[i]
    }

    pub fn get(&self, i: usize) -> Option<&Dimension> {
        self.dimensions.get(i)
    }

    /// # Panics
    ///
    /// Panics if `i >= self.rank()`.
    pub fn num_elements(&self, i: usize) -> u64 {
        self.dimensions[i].num_elements()
    }

    pub fn extents(&self) -> Vec<u64> {
        self.dimensions.iter().map(|d| d.num_elements()).collect()
    }

    pub fn is_known(&self) -> bool {
        self.dimensions.iter().all(|d| d.is_known())
    }

    /// Total number of addressable values. Placeholders left by a fixed index count as one;
    /// unknown axes count as zero.
    pub fn size(&self) -> u64 {
        // Construction rejects known shapes whose size overflows.
        self.counts().fold(1, u64::saturating_mul)
    }

    fn checked_size(&self) -> Option<u64> {
        self.counts().try_fold(1u64, |size, n| size.checked_mul(n))
    }

    fn counts(&self) -> impl Iterator<Item = u64> + '_ {
        self.dimensions
            .iter()
            .map(|d| if d.is_placeholder() { 1 } else { d.num_elements() })
    }

    pub fn known_size(&self) -> Option<u64> {
        self.is_known().then(|| self.size())
    }

    pub fn subshape(&self, first_dimension: usize) -> Shape {
        let first = first_dimension.min(self.dimensions.len());
        Self::from_dimensions(self.dimensions[first..].to_vec())
    }

    /// Applies one index per leading dimension; trailing dimensions pass through unchanged.
    pub fn map_to(&self, indices: &[Index]) -> Result<Shape> {
        if indices.len() > self.rank() {
            let msg = format!(
                "Cannot apply {} indices to a shape of rank {}",
                indices.len(),
                self.rank()
            );
            return Err(Error::RankError { msg });
        }
        let mut dimensions = Vec::with_capacity(self.rank());
        for (i, dim) in self.dimensions.iter().enumerate() {
            match indices.get(i) {
                Some(index) => dimensions.push(Dimension::indexed(index.clone(), dim)?),
                None => dimensions.push(dim.clone()),
            }
        }
        let shape = Self::from_dimensions(dimensions);
        if shape.checked_size().is_none() {
            let msg = format!("Sliced shape {} overflows a 64-bit position space", shape);
            return Err(Error::ArgumentsError { msg });
        }
        Ok(shape)
    }

    /// Sum of the offsets of the placeholders that `indices` created on this mapped shape.
    pub(crate) fn fixed_offset(&self, indices: &[Index]) -> u64 {
        indices
            .iter()
            .zip(&self.dimensions)
            .filter(|(index, _)| index.is_fixed())
            .map(|(_, dim)| dim.position())
            .sum()
    }

    pub(crate) fn trim_leading_placeholders(self) -> Shape {
        let leading = self
            .dimensions
            .iter()
            .take_while(|d| d.is_placeholder())
            .count();
        if leading == 0 {
            self
        } else {
            self.subshape(leading)
        }
    }

    /// Dimensions that still consume a coordinate.
    pub(crate) fn live_dimensions(&self) -> impl Iterator<Item = &Dimension> + '_ {
        self.dimensions.iter().filter(|d| !d.is_placeholder())
    }

    pub(crate) fn live_rank(&self) -> usize {
        self.live_dimensions().count()
    }

    pub(crate) fn is_dense(&self) -> bool {
        self.is_known() && self.dimensions.iter().all(|d| !d.is_indexed())
    }

    // Placeholders consume no coordinate: their offset already lives in the view's base position.
    pub(crate) fn resolve(&self, coords: &[u64]) -> Result<Resolution> {
        let mut position = 0;
        let mut consumed = 0;
        let mut next_dimension = 0;
        for (i, dim) in self.dimensions.iter().enumerate() {
            if consumed == coords.len() {
                break;
            }
            if dim.is_placeholder() {
                continue;
            }
            position += dim.position_of(coords[consumed])?;
            consumed += 1;
            next_dimension = i + 1;
        }
        if consumed < coords.len() {
            let msg = format!(
                "{} coordinates given for a shape of rank {}",
                coords.len(),
                self.live_rank()
            );
            return Err(Error::OutOfBoundsError { msg });
        }
        let remaining_rank = self.dimensions[next_dimension..]
            .iter()
            .filter(|d| !d.is_placeholder())
            .count();
        Ok(Resolution {
            position,
            next_dimension,
            remaining_rank,
        })
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.rank() == other.rank()
            && self
                .dimensions
                .iter()
                .zip(&other.dimensions)
                .all(|(a, b)| {
                    a.is_known() == b.is_known()
                        && a.is_placeholder() == b.is_placeholder()
                        && a.num_elements() == b.num_elements()
                })
    }
}

impl Eq for Shape {}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, dim) in self.dimensions.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", dim)?;
        }
        write!(f, "]")
    }
}
