use log::trace;

use crate::buffer::DataBuffer;
use crate::config::BufferConfig;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::index::Index;
use crate::iter::{ChildElements, Positions, Values};
use crate::shape::Shape;

/// A dense N-dimensional view over a [`DataBuffer`].
///
/// [`at`](Self::at) and [`slice`](Self::slice) return new arrays sharing the same storage; any
/// value written through one of them is visible through all others.
#[derive(Clone, Debug)]
pub struct NdArray<T: Element> {
    buffer: DataBuffer<T>,
    shape: Shape,
}

enum TransferPath {
    Dense,
    Rows,
    Elements,
}

impl<T: Element> NdArray<T> {
    pub fn allocate(shape: Shape) -> Result<Self> {
        Self::allocate_with(shape, &BufferConfig::default())
    }

    pub fn allocate_with(shape: Shape, config: &BufferConfig) -> Result<Self> {
        let size = Self::known_size(&shape)?;
        let buffer = DataBuffer::allocate_with(size, config)?;
        Ok(Self::new(buffer, shape))
    }

    pub fn wrap(buffer: DataBuffer<T>, shape: Shape) -> Result<Self> {
        let size = Self::known_size(&shape)?;
        if buffer.capacity() < size {
            let msg = format!(
                "Buffer of capacity {} is too small for shape {} ({} values)",
                buffer.capacity(),
                shape,
                size
            );
            return Err(Error::CapacityError { msg });
        }
        Ok(Self::new(buffer, shape))
    }

    pub fn from_vec(data: Vec<T>, dims: &[u64]) -> Result<Self> {
        let shape = Shape::of(dims)?;
        if data.len() as u64 != shape.size() {
            let msg = format!(
                "Invalid data length(data len = {}, shape = {}, shape len = {})",
                data.len(),
                shape,
                shape.size()
            );
            return Err(Error::ArgumentsError { msg });
        }
        Ok(Self::new(DataBuffer::from_vec(data), shape))
    }

    fn new(buffer: DataBuffer<T>, shape: Shape) -> Self {
        Self { buffer, shape }
    }

    fn known_size(shape: &Shape) -> Result<u64> {
        shape.known_size().ok_or_else(|| Error::ArgumentsError {
            msg: format!("Cannot allocate values for shape {} of unknown size", shape),
        })
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn size(&self) -> u64 {
        self.shape.size()
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    pub fn buffer(&self) -> &DataBuffer<T> {
        &self.buffer
    }

    pub fn is_read_only(&self) -> bool {
        self.buffer.is_read_only()
    }

    /// Returns the element found at `coords`, as a view over the dimensions left unresolved.
    pub fn at(&self, coords: &[u64]) -> Result<Self> {
        let resolution = self.shape.resolve(coords)?;
        let shape = self
            .shape
            .subshape(resolution.next_dimension)
            .trim_leading_placeholders();
        self.view(resolution.position, shape)
    }

    pub fn slice(&self, indices: &[Index]) -> Result<Self> {
        let shape = self.shape.map_to(indices)?;
        let position = shape.fixed_offset(indices);
        self.view(position, shape.trim_leading_placeholders())
    }

    fn view(&self, position: u64, shape: Shape) -> Result<Self> {
        let buffer = self.buffer.with_position(position)?.slice();
        Ok(Self::new(buffer, shape))
    }

    pub fn get(&self, coords: &[u64]) -> Result<T> {
        let position = self.scalar_position(coords)?;
        self.buffer.get(position)
    }

    pub fn set(&self, coords: &[u64], value: T) -> Result<()> {
        let position = self.scalar_position(coords)?;
        self.buffer.put(position, value)
    }

    fn scalar_position(&self, coords: &[u64]) -> Result<u64> {
        let resolution = self.shape.resolve(coords)?;
        if resolution.remaining_rank > 0 {
            let msg = format!(
                "Not a scalar value: {} coordinates given for shape {}",
                coords.len(),
                self.shape
            );
            return Err(Error::RankError { msg });
        }
        Ok(resolution.position)
    }

    pub fn values(&self) -> Values<T> {
        Values::new(self.buffer.clone(), &self.shape)
    }

    pub fn child_elements(&self) -> Result<ChildElements<T>> {
        let Some(first) = self.shape.live_dimensions().next() else {
            return Err(Error::RankError {
                msg: "Cannot iterate elements of a scalar".to_string(),
            });
        };
        Ok(ChildElements::new(self.clone(), first.num_elements()))
    }

    pub fn to_vec(&self) -> Result<Vec<T>> {
        if self.shape.is_dense() {
            let mut data = vec![T::default(); self.size() as usize];
            self.buffer.read_into(&mut data)?;
            return Ok(data);
        }
        self.values().collect()
    }

    pub fn copy_to(&self, dst: &NdArray<T>) -> Result<()> {
        if self.shape != dst.shape {
            let msg = format!(
                "Can only copy to arrays of the same shape (source = {}, destination = {})",
                self.shape, dst.shape
            );
            return Err(Error::ArgumentsError { msg });
        }
        if self.shape.is_dense() && dst.shape.is_dense() {
            trace!("copying {} values as a single span", self.size());
            return self.buffer.copy_to(&dst.buffer, self.size());
        }
        let mut dst_values = dst.values();
        for value in self.values() {
            dst_values.put_next(value?)?;
        }
        Ok(())
    }

    pub fn copy_from(&self, src: &NdArray<T>) -> Result<()> {
        src.copy_to(self)
    }

    /// Copies the values of this array, in row-major order, to the start of `dst`.
    pub fn read(&self, dst: &DataBuffer<T>) -> Result<()> {
        self.check_transfer_capacity(dst)?;
        if dst.is_read_only() {
            return Err(Error::ReadOnlyError {
                msg: "Cannot read values into a read-only buffer".to_string(),
            });
        }
        match self.transfer_path() {
            TransferPath::Dense => {
                trace!("reading {} values as a single span", self.size());
                self.buffer.copy_to(dst, self.size())
            }
            TransferPath::Rows => self.transfer_rows(|row, start, len| {
                self.buffer
                    .slice_range(start, len)?
                    .copy_to(&dst.slice_range(row * len, len)?, len)
            }),
            TransferPath::Elements => {
                trace!("reading {} values one by one", self.size());
                for (i, value) in self.values().enumerate() {
                    dst.put(i as u64, value?)?;
                }
                Ok(())
            }
        }
    }

    /// Overwrites the values of this array, in row-major order, with the start of `src`.
    pub fn write(&self, src: &DataBuffer<T>) -> Result<()> {
        self.check_transfer_capacity(src)?;
        if self.is_read_only() {
            return Err(Error::ReadOnlyError {
                msg: "Cannot write values into a read-only array".to_string(),
            });
        }
        match self.transfer_path() {
            TransferPath::Dense => {
                trace!("writing {} values as a single span", self.size());
                src.copy_to(&self.buffer, self.size())
            }
            TransferPath::Rows => self.transfer_rows(|row, start, len| {
                src.slice_range(row * len, len)?
                    .copy_to(&self.buffer.slice_range(start, len)?, len)
            }),
            TransferPath::Elements => {
                trace!("writing {} values one by one", self.size());
                let mut values = self.values();
                let mut i = 0;
                while values.has_next() {
                    values.put_next(src.get(i)?)?;
                    i += 1;
                }
                Ok(())
            }
        }
    }

    fn check_transfer_capacity(&self, buffer: &DataBuffer<T>) -> Result<()> {
        if buffer.capacity() < self.size() {
            let msg = format!(
                "Buffer of capacity {} cannot hold the {} values of shape {}",
                buffer.capacity(),
                self.size(),
                self.shape
            );
            return Err(Error::CapacityError { msg });
        }
        Ok(())
    }

    fn transfer_path(&self) -> TransferPath {
        if self.shape.is_dense() {
            return TransferPath::Dense;
        }
        match self.shape.live_dimensions().last() {
            Some(last) if last.is_contiguous() => TransferPath::Rows,
            _ => TransferPath::Elements,
        }
    }

    // Calls `copy_row(row, start, len)` once per row of the last live dimension.
    fn transfer_rows<F>(&self, mut copy_row: F) -> Result<()>
    where
        F: FnMut(u64, u64, u64) -> Result<()>,
    {
        let mut live: Vec<_> = self.shape.live_dimensions().cloned().collect();
        let Some(last) = live.pop() else {
            return Ok(());
        };
        let len = last.num_elements();
        if len == 0 {
            return Ok(());
        }
        // Validates the whole row span before copying it as one run.
        let first = last.position_of(0)?;
        last.position_of(len - 1)?;
        trace!("transferring {} values in rows of {}", self.size(), len);
        for (row, position) in Positions::over(live).enumerate() {
            copy_row(row as u64, position? + first, len)?;
        }
        Ok(())
    }
}

/// Builds an [`NdArray`] from nested literals, e.g. `nd![[1, 2], [3, 4]]`.
///
/// Panics if the nested rows do not all have the same shape.
#[macro_export]
macro_rules! nd {
    ( $( [ $($inner:tt)* ] ),+ $(,)? ) => {{
        let arrays = vec![$( $crate::nd![ $($inner)* ] ),+];
        let mut shape = arrays[0].shape().extents();
        shape.insert(0, arrays.len() as u64);
        let data = arrays
            .into_iter()
            .flat_map(|a| a.to_vec().expect("readable array literal"))
            .collect::<Vec<_>>();
        $crate::ndarray::NdArray::from_vec(data, &shape).expect("rectangular array literal")
    }};
    ( $($x:expr),+ $(,)? ) => {{
        let data = vec![$($x),+];
        let shape = vec![data.len() as u64];
        $crate::ndarray::NdArray::from_vec(data, &shape).expect("rectangular array literal")
    }};
}
