use std::fmt::Debug;

use crate::dtype::ElementKind;

/// A value that can be stored in a [`DataBuffer`](crate::buffer::DataBuffer).
///
/// Fixed-width numeric types report their own kind; any other `Clone + Default` type can
/// opt in with an empty impl and is treated as the generic object kind.
pub trait Element: Clone + Default + Debug + 'static {
    fn kind() -> ElementKind {
        ElementKind::Object
    }

    /// Largest number of elements a single contiguous block may hold.
    fn max_direct_capacity() -> u64 {
        let size = std::mem::size_of::<Self>().max(1) as u64;
        isize::MAX as u64 / size
    }
}

macro_rules! define_element {
    ($ty:ty, $kind:ident) => {
        impl Element for $ty {
            fn kind() -> ElementKind {
                ElementKind::$kind
            }
        }
    };
}

define_element!(i8, Byte);
define_element!(u8, Byte);
define_element!(i32, Int32);
define_element!(i64, Int64);
define_element!(f32, Float32);
define_element!(f64, Float64);

impl Element for bool {}

impl Element for String {}
