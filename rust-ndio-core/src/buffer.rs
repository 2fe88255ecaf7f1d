use std::{cell::RefCell, rc::Rc};

use crate::config::BufferConfig;
use crate::dtype::ElementKind;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::storage::Storage;

/// A flat, 64-bit addressed window over shared storage.
///
/// Cloning a buffer, or deriving a view with [`slice_range`](Self::slice_range) or
/// [`with_position`](Self::with_position), never copies elements: all views share the same
/// storage and see each other's writes. A read-only view rejects mutation through itself only.
#[derive(Clone)]
pub struct DataBuffer<T: Element> {
    storage: Rc<RefCell<Storage<T>>>,
    offset: u64,
    capacity: u64,
    position: u64,
    read_only: bool,
}

impl<T: Element> DataBuffer<T> {
    pub fn allocate(capacity: u64) -> Result<Self> {
        Self::allocate_with(capacity, &BufferConfig::default())
    }

    pub fn allocate_with(capacity: u64, config: &BufferConfig) -> Result<Self> {
        let storage = Storage::allocate(capacity, config)?;
        Ok(Self::new(Rc::new(RefCell::new(storage)), 0, capacity, false))
    }

    pub fn wrap(data: Vec<T>, read_only: bool) -> Self {
        let capacity = data.len() as u64;
        let storage = Rc::new(RefCell::new(Storage::Direct(data)));
        Self::new(storage, 0, capacity, read_only)
    }

    pub fn from_vec(data: Vec<T>) -> Self {
        Self::wrap(data, false)
    }

    fn new(storage: Rc<RefCell<Storage<T>>>, offset: u64, capacity: u64, read_only: bool) -> Self {
        Self {
            storage,
            offset,
            capacity,
            position: 0,
            read_only,
        }
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_segmented(&self) -> bool {
        self.storage.borrow().is_segmented()
    }

    pub fn kind(&self) -> ElementKind {
        T::kind()
    }

    pub fn as_read_only(&self) -> Self {
        Self {
            read_only: true,
            ..self.clone()
        }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn set_position(&mut self, position: u64) -> Result<()> {
        if position > self.capacity {
            return Err(Error::out_of_bounds(position, self.capacity + 1));
        }
        self.position = position;
        Ok(())
    }

    pub fn remaining(&self) -> u64 {
        self.capacity - self.position
    }

    pub fn has_remaining(&self) -> bool {
        self.remaining() > 0
    }

    pub fn rewind(&mut self) -> &mut Self {
        self.position = 0;
        self
    }

    /// Returns a view of the same window, positioned for a following [`slice`](Self::slice).
    pub fn with_position(&self, position: u64) -> Result<Self> {
        let mut view = self.clone();
        view.set_position(position)?;
        Ok(view)
    }

    /// Returns a view covering `[position, capacity)` of this buffer.
    pub fn slice(&self) -> Self {
        Self::new(
            Rc::clone(&self.storage),
            self.offset + self.position,
            self.remaining(),
            self.read_only,
        )
    }

    pub fn slice_range(&self, offset: u64, len: u64) -> Result<Self> {
        let end = offset.checked_add(len).filter(|end| *end <= self.capacity);
        if end.is_none() {
            return Err(Error::OutOfBoundsError {
                msg: format!(
                    "Slice [{}, {}+{}) exceeds buffer capacity {}",
                    offset, offset, len, self.capacity
                ),
            });
        }
        Ok(Self::new(
            Rc::clone(&self.storage),
            self.offset + offset,
            len,
            self.read_only,
        ))
    }

    pub fn get(&self, position: u64) -> Result<T> {
        self.check_position(position)?;
        Ok(self.storage.borrow().get(self.offset + position).clone())
    }

    pub fn put(&self, position: u64, value: T) -> Result<()> {
        self.check_writable()?;
        self.check_position(position)?;
        *self.storage.borrow_mut().get_mut(self.offset + position) = value;
        Ok(())
    }

    pub fn get_next(&mut self) -> Result<T> {
        let value = self.get(self.position)?;
        self.position += 1;
        Ok(value)
    }

    pub fn put_next(&mut self, value: T) -> Result<()> {
        self.put(self.position, value)?;
        self.position += 1;
        Ok(())
    }

    /// Copies the first `len` elements of this view into `dst`, one block-sized run at a time.
    ///
    /// Overlapping views of the same storage behave as if the source were read before any write.
    pub fn copy_to(&self, dst: &DataBuffer<T>, len: u64) -> Result<()> {
        dst.check_writable()?;
        if len > self.capacity || len > dst.capacity {
            return Err(Error::CapacityError {
                msg: format!(
                    "Cannot copy {} elements (source capacity = {}, destination capacity = {})",
                    len, self.capacity, dst.capacity
                ),
            });
        }
        if Rc::ptr_eq(&self.storage, &dst.storage) {
            // Views of one storage may overlap across block edges: read everything first.
            let staged = self.slice_range(0, len)?.to_vec();
            return dst.slice_range(0, len)?.write_from(&staged);
        }
        let src_storage = self.storage.borrow();
        let mut dst_storage = dst.storage.borrow_mut();
        let mut done = 0;
        while done < len {
            let src_position = self.offset + done;
            let dst_position = dst.offset + done;
            let run = (len - done)
                .min(src_storage.run_len(src_position))
                .min(dst_storage.run_len(dst_position));
            dst_storage
                .run_mut(dst_position, run)
                .clone_from_slice(src_storage.run(src_position, run));
            done += run;
        }
        Ok(())
    }

    pub fn read_into(&self, dst: &mut [T]) -> Result<()> {
        let len = dst.len() as u64;
        if len > self.capacity {
            return Err(Error::CapacityError {
                msg: format!("Cannot read {} elements from a buffer of {}", len, self.capacity),
            });
        }
        let storage = self.storage.borrow();
        let mut done = 0;
        while done < len {
            let position = self.offset + done;
            let run = (len - done).min(storage.run_len(position));
            dst[done as usize..(done + run) as usize].clone_from_slice(storage.run(position, run));
            done += run;
        }
        Ok(())
    }

    pub fn write_from(&self, src: &[T]) -> Result<()> {
        self.check_writable()?;
        let len = src.len() as u64;
        if len > self.capacity {
            return Err(Error::CapacityError {
                msg: format!("Cannot write {} elements to a buffer of {}", len, self.capacity),
            });
        }
        let mut storage = self.storage.borrow_mut();
        let mut done = 0;
        while done < len {
            let position = self.offset + done;
            let run = (len - done).min(storage.run_len(position));
            storage
                .run_mut(position, run)
                .clone_from_slice(&src[done as usize..(done + run) as usize]);
            done += run;
        }
        Ok(())
    }

    pub fn to_vec(&self) -> Vec<T> {
        let storage = self.storage.borrow();
        let mut data = Vec::with_capacity(self.capacity as usize);
        let mut done = 0;
        while done < self.capacity {
            let position = self.offset + done;
            let run = (self.capacity - done).min(storage.run_len(position));
            data.extend_from_slice(storage.run(position, run));
            done += run;
        }
        data
    }

    fn check_position(&self, position: u64) -> Result<()> {
        if position >= self.capacity {
            return Err(Error::out_of_bounds(position, self.capacity));
        }
        Ok(())
    }

    fn check_writable(&self) -> Result<()> {
        if self.read_only {
            return Err(Error::ReadOnlyError {
                msg: "Buffer is read-only".to_string(),
            });
        }
        Ok(())
    }
}

impl<T: Element> std::fmt::Debug for DataBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataBuffer")
            .field("kind", &T::kind())
            .field("offset", &self.offset)
            .field("capacity", &self.capacity)
            .field("position", &self.position)
            .field("read_only", &self.read_only)
            .finish()
    }
}
