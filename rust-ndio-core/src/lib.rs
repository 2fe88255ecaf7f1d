//! N-dimensional array views over flat, 64-bit addressed buffers.
//!
//! A [`DataBuffer`](buffer::DataBuffer) stores values either in one block or, past the native
//! addressing ceiling of its element kind, in fixed-size segments. An
//! [`NdArray`](ndarray::NdArray) pairs a buffer with a [`Shape`](shape::Shape) and derives
//! zero-copy views from it with `at` and `slice`.
//!
//! ```
//! use rust_ndio_core::index::{all, at};
//! use rust_ndio_core::ndarray::NdArray;
//! use rust_ndio_core::shape::Shape;
//!
//! let matrix = NdArray::<f32>::allocate(Shape::of(&[3, 2]).unwrap()).unwrap();
//! matrix.set(&[1, 0], 4.0).unwrap();
//! let column = matrix.slice(&[all(), at(0).unwrap()]).unwrap();
//! assert_eq!(column.get(&[1]).unwrap(), 4.0);
//! ```
pub mod buffer;
pub mod config;
pub mod dimension;
pub mod dtype;
pub mod element;
pub mod error;
pub mod index;
pub mod iter;
pub mod ndarray;
pub mod shape;
pub mod storage;
