use std::rc::Rc;

use num_traits::ToPrimitive;

use crate::dimension::Dimension;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::ndarray::NdArray;

/// A coordinate selection applied to one dimension by [`NdArray::slice`].
///
/// Each variant derives an element count from the source dimension and maps every coordinate
/// of the derived dimension back to a source coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Index {
    All,
    At(u64),
    Seq(Rc<[u64]>),
    Even,
    Odd,
    Step(u64),
    From(u64),
    To(u64),
    Range(u64, u64),
    Flip,
}

impl Index {
    pub fn num_elements(&self, dim: &Dimension) -> Result<u64> {
        let n = dim.num_elements();
        let num_elements = match self {
            Self::All | Self::Flip => n,
            Self::At(_) => 0,
            Self::Seq(coords) => coords.len() as u64,
            Self::Even => (n >> 1) + 1,
            Self::Odd => n >> 1,
            Self::Step(step) => n.div_ceil(*step),
            Self::From(start) => n.checked_sub(*start).ok_or_else(|| Error::OutOfBoundsError {
                msg: format!("Start coordinate {} exceeds dimension of {} elements", start, n),
            })?,
            Self::To(end) => end + 1,
            Self::Range(start, end) => end - start,
        };
        Ok(num_elements)
    }

    pub fn map_coordinate(&self, coordinate: u64, dim: &Dimension) -> u64 {
        match self {
            Self::All => coordinate,
            Self::At(coord) => *coord,
            Self::Seq(coords) => coords[coordinate as usize],
            Self::Even => coordinate << 1,
            Self::Odd => (coordinate << 1) + 1,
            Self::Step(step) => coordinate * step,
            Self::From(start) => start + coordinate,
            Self::To(_) => coordinate,
            Self::Range(start, _) => start + coordinate,
            Self::Flip => dim.num_elements() - 1 - coordinate,
        }
    }

    /// True for an index that fixes its axis to a single coordinate.
    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::At(_))
    }

    pub(crate) fn preserves_contiguity(&self) -> bool {
        matches!(self, Self::All | Self::From(_) | Self::To(_) | Self::Range(_, _))
    }
}

pub fn all() -> Index {
    Index::All
}

pub fn at(coordinate: i64) -> Result<Index> {
    Ok(Index::At(non_negative(coordinate, "Coordinate")?))
}

/// Fixes an axis to the coordinate held by a rank-0 array.
pub fn at_scalar<T: Element + ToPrimitive>(scalar: &NdArray<T>) -> Result<Index> {
    if scalar.rank() > 0 {
        return Err(Error::ArgumentsError {
            msg: format!("Only scalars are accepted as a value index (shape = {})", scalar.shape()),
        });
    }
    at(to_coordinate(&scalar.get(&[])?)?)
}

pub fn seq(coordinates: &[i64]) -> Result<Index> {
    let coords = coordinates
        .iter()
        .map(|c| non_negative(*c, "Sequence coordinate"))
        .collect::<Result<Vec<_>>>()?;
    Ok(Index::Seq(coords.into()))
}

/// Selects the coordinates listed, in order, by a rank-1 array.
pub fn seq_of<T: Element + ToPrimitive>(vector: &NdArray<T>) -> Result<Index> {
    if vector.rank() != 1 {
        return Err(Error::ArgumentsError {
            msg: format!("Only vectors are accepted as an element index (shape = {})", vector.shape()),
        });
    }
    let coords = vector
        .values()
        .map(|v| v.and_then(|v| to_coordinate(&v)))
        .collect::<Result<Vec<_>>>()?;
    seq(&coords)
}

pub fn even() -> Index {
    Index::Even
}

pub fn odd() -> Index {
    Index::Odd
}

pub fn step(step: i64) -> Result<Index> {
    if step < 1 {
        return Err(Error::ArgumentsError {
            msg: format!("Step must be strictly positive (step = {})", step),
        });
    }
    Ok(Index::Step(step as u64))
}

pub fn from(start: i64) -> Result<Index> {
    Ok(Index::From(non_negative(start, "Start coordinate")?))
}

pub fn to(end: i64) -> Result<Index> {
    Ok(Index::To(non_negative(end, "End coordinate")?))
}

pub fn range(start: i64, end: i64) -> Result<Index> {
    let start = non_negative(start, "Start coordinate")?;
    let end = non_negative(end, "End coordinate")?;
    if start > end {
        return Err(Error::ArgumentsError {
            msg: format!(
                "Start coordinate cannot be greater than end coordinate (start = {}, end = {})",
                start, end
            ),
        });
    }
    Ok(Index::Range(start, end))
}

pub fn flip() -> Index {
    Index::Flip
}

fn non_negative(value: i64, what: &str) -> Result<u64> {
    u64::try_from(value).map_err(|_| Error::ArgumentsError {
        msg: format!("{} cannot be negative ({})", what, value),
    })
}

fn to_coordinate<T: ToPrimitive>(value: &T) -> Result<i64> {
    value.to_i64().ok_or_else(|| Error::ArgumentsError {
        msg: "Index value is not representable as a coordinate".to_string(),
    })
}
