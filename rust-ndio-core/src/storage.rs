use std::ops::Range;

use log::debug;

use crate::config::BufferConfig;
use crate::element::Element;
use crate::error::{Error, Result};

pub enum Storage<T: Element> {
    Direct(Vec<T>),
    Segmented(SegmentedStorage<T>),
}

/// Fixed-size blocks under one logical position space. Every segment but the last holds
/// exactly `segment_size` elements.
pub struct SegmentedStorage<T: Element> {
    segments: Vec<Vec<T>>,
    segment_size: u64,
    len: u64,
}

impl<T: Element> SegmentedStorage<T> {
    fn allocate(len: u64, segment_size: u64) -> Result<Self> {
        let mut segments = Vec::new();
        let mut remaining = len;
        while remaining > 0 {
            let n = remaining.min(segment_size);
            segments.push(vec![T::default(); to_usize(n)?]);
            remaining -= n;
        }
        Ok(Self {
            segments,
            segment_size,
            len,
        })
    }

    pub fn segment_size(&self) -> u64 {
        self.segment_size
    }

    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    fn locate(&self, position: u64) -> (usize, usize) {
        (
            (position / self.segment_size) as usize,
            (position % self.segment_size) as usize,
        )
    }
}

impl<T: Element> Storage<T> {
    pub fn allocate(len: u64, config: &BufferConfig) -> Result<Self> {
        config.validate()?;
        let limit = config.direct_capacity_limit::<T>();
        if len <= limit {
            debug!("allocating direct {} storage of {} elements", T::kind(), len);
            return Ok(Self::Direct(vec![T::default(); to_usize(len)?]));
        }
        let segment_size = config.segment_size_for::<T>();
        let storage = SegmentedStorage::allocate(len, segment_size)?;
        debug!(
            "allocating segmented {} storage of {} elements ({} segments of {})",
            T::kind(),
            len,
            storage.num_segments(),
            segment_size
        );
        Ok(Self::Segmented(storage))
    }

    pub fn len(&self) -> u64 {
        match self {
            Self::Direct(data) => data.len() as u64,
            Self::Segmented(storage) => storage.len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_segmented(&self) -> bool {
        matches!(self, Self::Segmented(_))
    }

    // Positions are validated by the owning buffer view.
    pub fn get(&self, position: u64) -> &T {
        match self {
            Self::Direct(data) => &data[position as usize],
            Self::Segmented(storage) => {
                let (segment, offset) = storage.locate(position);
                &storage.segments[segment][offset]
            }
        }
    }

    pub fn get_mut(&mut self, position: u64) -> &mut T {
        match self {
            Self::Direct(data) => &mut data[position as usize],
            Self::Segmented(storage) => {
                let (segment, offset) = storage.locate(position);
                &mut storage.segments[segment][offset]
            }
        }
    }

    /// Number of elements readable from `position` without leaving the block that holds it.
    pub fn run_len(&self, position: u64) -> u64 {
        match self {
            Self::Direct(data) => data.len() as u64 - position,
            Self::Segmented(storage) => {
                let (segment, offset) = storage.locate(position);
                (storage.segments[segment].len() - offset) as u64
            }
        }
    }

    pub fn run(&self, position: u64, len: u64) -> &[T] {
        match self {
            Self::Direct(data) => &data[run_range(position as usize, len)],
            Self::Segmented(storage) => {
                let (segment, offset) = storage.locate(position);
                &storage.segments[segment][run_range(offset, len)]
            }
        }
    }

    pub fn run_mut(&mut self, position: u64, len: u64) -> &mut [T] {
        match self {
            Self::Direct(data) => &mut data[run_range(position as usize, len)],
            Self::Segmented(storage) => {
                let (segment, offset) = storage.locate(position);
                &mut storage.segments[segment][run_range(offset, len)]
            }
        }
    }
}

fn run_range(start: usize, len: u64) -> Range<usize> {
    start..start + len as usize
}

fn to_usize(len: u64) -> Result<usize> {
    usize::try_from(len).map_err(|_| Error::CapacityError {
        msg: format!("{} elements cannot be addressed on this platform", len),
    })
}
