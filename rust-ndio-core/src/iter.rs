use crate::buffer::DataBuffer;
use crate::dimension::Dimension;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::ndarray::NdArray;
use crate::shape::Shape;

/// Flat positions of every coordinate tuple over a set of dimensions, last dimension fastest.
#[derive(Clone)]
pub(crate) struct Positions {
    dimensions: Vec<Dimension>,
    coords: Vec<u64>,
    total: u64,
    remaining: u64,
}

impl Positions {
    pub(crate) fn new(shape: &Shape) -> Self {
        Self::over(shape.live_dimensions().cloned().collect())
    }

    pub(crate) fn over(dimensions: Vec<Dimension>) -> Self {
        let total = dimensions
            .iter()
            .map(|d| d.num_elements())
            .fold(1, u64::saturating_mul);
        Self {
            coords: vec![0; dimensions.len()],
            dimensions,
            total,
            remaining: total,
        }
    }

    pub(crate) fn rewind(&mut self) {
        self.coords.iter_mut().for_each(|c| *c = 0);
        self.remaining = self.total;
    }

    pub(crate) fn has_next(&self) -> bool {
        self.remaining > 0
    }

    fn advance(&mut self) {
        for k in (0..self.coords.len()).rev() {
            self.coords[k] += 1;
            if self.coords[k] < self.dimensions[k].num_elements() {
                return;
            }
            self.coords[k] = 0;
        }
    }
}

impl Iterator for Positions {
    type Item = Result<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let position = self
            .dimensions
            .iter()
            .zip(&self.coords)
            .map(|(dim, coord)| dim.position_of(*coord))
            .sum::<Result<u64>>();
        self.remaining -= 1;
        self.advance();
        Some(position)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (remaining, usize::try_from(self.remaining).ok())
    }
}

/// Every scalar value of an array in row-major order.
///
/// Reading with [`Iterator::next`] and writing with [`put_next`](Self::put_next) share the same
/// cursor, so a traversal can replace values as it goes.
#[derive(Clone)]
pub struct Values<T: Element> {
    buffer: DataBuffer<T>,
    positions: Positions,
}

impl<T: Element> Values<T> {
    pub(crate) fn new(buffer: DataBuffer<T>, shape: &Shape) -> Self {
        Self {
            buffer,
            positions: Positions::new(shape),
        }
    }

    pub fn has_next(&self) -> bool {
        self.positions.has_next()
    }

    pub fn put_next(&mut self, value: T) -> Result<()> {
        match self.positions.next() {
            Some(position) => self.buffer.put(position?, value),
            None => Err(Error::OutOfBoundsError {
                msg: "No value left to write".to_string(),
            }),
        }
    }

    pub fn rewind(&mut self) {
        self.positions.rewind();
    }
}

impl<T: Element> Iterator for Values<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let position = self.positions.next()?;
        Some(position.and_then(|p| self.buffer.get(p)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

/// Views of an array along its first dimension.
pub struct ChildElements<T: Element> {
    array: NdArray<T>,
    next: u64,
    len: u64,
}

impl<T: Element> ChildElements<T> {
    pub(crate) fn new(array: NdArray<T>, len: u64) -> Self {
        Self {
            array,
            next: 0,
            len,
        }
    }
}

impl<T: Element> Iterator for ChildElements<T> {
    type Item = Result<NdArray<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let child = self.array.at(&[self.next]);
        self.next += 1;
        Some(child)
    }
}
