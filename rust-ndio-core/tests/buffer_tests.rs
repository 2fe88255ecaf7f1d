
use rand::{rngs::StdRng, Rng, SeedableRng};
use rust_ndio_core::{
    buffer::DataBuffer,
    config::BufferConfig,
    dtype::ElementKind,
    error::{Error, Result},
};

use crate::test_utils::{arange_buffer, init_logger, segmented_config};

#[test]
fn test_allocate_direct() -> Result<()> {
    init_logger();
    let buffer = DataBuffer::<f64>::allocate(10)?;
    assert_eq!(buffer.capacity(), 10);
    assert!(!buffer.is_segmented());
    assert!(!buffer.is_read_only());
    assert_eq!(buffer.get(9)?, 0.0);
    buffer.put(9, 1.5)?;
    assert_eq!(buffer.get(9)?, 1.5);
    assert!(matches!(buffer.get(10), Err(Error::OutOfBoundsError { .. })));
    assert!(matches!(buffer.put(10, 1.0), Err(Error::OutOfBoundsError { .. })));
    Ok(())
}

#[test]
fn test_allocate_segmented() -> Result<()> {
    init_logger();
    let buffer = arange_buffer(23, &segmented_config(16, 5))?;
    assert!(buffer.is_segmented());
    assert_eq!(buffer.capacity(), 23);
    assert_eq!(buffer.to_vec(), (0..23).collect::<Vec<i64>>());
    assert!(matches!(buffer.get(23), Err(Error::OutOfBoundsError { .. })));
    Ok(())
}

#[test]
fn test_capacity_at_limit_stays_direct() -> Result<()> {
    let buffer = DataBuffer::<i32>::allocate_with(16, &segmented_config(16, 5))?;
    assert!(!buffer.is_segmented());
    Ok(())
}

#[test]
fn test_zero_capacity() -> Result<()> {
    let buffer = DataBuffer::<u8>::allocate(0)?;
    assert_eq!(buffer.capacity(), 0);
    assert!(!buffer.has_remaining());
    assert!(buffer.to_vec().is_empty());
    assert!(matches!(buffer.get(0), Err(Error::OutOfBoundsError { .. })));
    Ok(())
}

#[test]
fn test_tiers_behave_identically() -> Result<()> {
    init_logger();
    let capacity = 64;
    let direct = arange_buffer(capacity, &BufferConfig::default())?;
    let segmented = arange_buffer(capacity, &segmented_config(8, 7))?;
    assert!(!direct.is_segmented());
    assert!(segmented.is_segmented());

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let position = rng.gen_range(0..capacity);
        let value: i64 = rng.gen_range(-1000..1000);
        direct.put(position, value)?;
        segmented.put(position, value)?;
        assert_eq!(direct.get(position)?, segmented.get(position)?);
    }
    for _ in 0..50 {
        let offset = rng.gen_range(0..capacity);
        let len = rng.gen_range(0..=capacity - offset);
        let a = direct.slice_range(offset, len)?;
        let b = segmented.slice_range(offset, len)?;
        assert_eq!(a.to_vec(), b.to_vec());
    }
    assert_eq!(direct.to_vec(), segmented.to_vec());
    Ok(())
}

#[test]
fn test_slice_straddling_segment_boundary() -> Result<()> {
    let buffer = arange_buffer(20, &segmented_config(10, 5))?;
    let view = buffer.slice_range(3, 9)?;
    assert_eq!(view.capacity(), 9);
    assert_eq!(view.to_vec(), vec![3, 4, 5, 6, 7, 8, 9, 10, 11]);
    assert_eq!(view.get(2)?, 5);
    view.put(2, 500)?;
    assert_eq!(buffer.get(5)?, 500);
    assert!(matches!(view.get(9), Err(Error::OutOfBoundsError { .. })));
    Ok(())
}

#[test]
fn test_slice_shares_storage() -> Result<()> {
    let buffer = DataBuffer::from_vec(vec![1, 2, 3, 4, 5]);
    let view = buffer.slice_range(1, 3)?;
    assert_eq!(view.to_vec(), vec![2, 3, 4]);
    view.put(0, 20)?;
    assert_eq!(buffer.get(1)?, 20);
    buffer.put(3, 40)?;
    assert_eq!(view.get(2)?, 40);
    assert!(buffer.slice_range(3, 3).is_err());
    Ok(())
}

#[test]
fn test_with_position_slice() -> Result<()> {
    let buffer = DataBuffer::from_vec((0..10).collect::<Vec<i32>>());
    let view = buffer.with_position(4)?.slice();
    assert_eq!(view.capacity(), 6);
    assert_eq!(view.get(0)?, 4);
    let nested = view.with_position(2)?.slice();
    assert_eq!(nested.to_vec(), vec![6, 7, 8, 9]);
    assert!(buffer.with_position(11).is_err());
    assert_eq!(buffer.with_position(10)?.slice().capacity(), 0);
    Ok(())
}

#[test]
fn test_relative_cursor() -> Result<()> {
    let mut buffer = DataBuffer::<i64>::allocate(4)?;
    let mut val = 0;
    while buffer.has_remaining() {
        buffer.put_next(val)?;
        val += 10;
    }
    assert_eq!(buffer.position(), 4);
    assert!(matches!(buffer.put_next(1), Err(Error::OutOfBoundsError { .. })));
    buffer.rewind();
    assert_eq!(buffer.remaining(), 4);
    assert_eq!(buffer.get_next()?, 0);
    assert_eq!(buffer.get_next()?, 10);
    buffer.set_position(3)?;
    assert_eq!(buffer.get_next()?, 30);
    Ok(())
}

#[test]
fn test_read_only_wrap() -> Result<()> {
    let buffer = DataBuffer::wrap(vec![1.0f32, 2.0, 3.0], true);
    assert!(buffer.is_read_only());
    assert!(matches!(buffer.put(0, 9.0), Err(Error::ReadOnlyError { .. })));
    assert_eq!(buffer.to_vec(), vec![1.0, 2.0, 3.0]);
    assert!(buffer.slice_range(1, 2)?.is_read_only());
    let target = DataBuffer::wrap(vec![0.0f32; 3], true);
    assert!(matches!(
        DataBuffer::from_vec(vec![5.0f32; 3]).copy_to(&target, 3),
        Err(Error::ReadOnlyError { .. })
    ));
    Ok(())
}

#[test]
fn test_read_only_view_does_not_block_other_views() -> Result<()> {
    let buffer = DataBuffer::from_vec(vec![1, 2, 3]);
    let read_only = buffer.as_read_only();
    assert!(read_only.put(0, 10).is_err());
    buffer.put(0, 10)?;
    assert_eq!(read_only.get(0)?, 10);
    Ok(())
}

#[test]
fn test_copy_to_across_segments() -> Result<()> {
    init_logger();
    let src = arange_buffer(20, &segmented_config(4, 4))?;
    let dst = DataBuffer::<i64>::allocate_with(20, &segmented_config(7, 7))?;
    src.copy_to(&dst, 20)?;
    assert_eq!(dst.to_vec(), (0..20).collect::<Vec<i64>>());

    let partial = DataBuffer::<i64>::allocate(30)?;
    src.slice_range(5, 15)?.copy_to(&partial.slice_range(2, 20)?, 10)?;
    assert_eq!(partial.get(1)?, 0);
    assert_eq!(partial.get(2)?, 5);
    assert_eq!(partial.get(11)?, 14);
    assert_eq!(partial.get(12)?, 0);
    Ok(())
}

#[test]
fn test_copy_to_overlapping_views() -> Result<()> {
    let buffer = arange_buffer(10, &segmented_config(3, 3))?;
    buffer
        .slice_range(0, 5)?
        .copy_to(&buffer.slice_range(5, 5)?, 5)?;
    assert_eq!(buffer.to_vec(), vec![0, 1, 2, 3, 4, 0, 1, 2, 3, 4]);
    Ok(())
}

#[test]
fn test_overlapping_copy_matches_across_tiers() -> Result<()> {
    for config in [BufferConfig::default(), segmented_config(4, 4), segmented_config(4, 3)] {
        let forward = arange_buffer(10, &config)?;
        forward
            .slice_range(0, 8)?
            .copy_to(&forward.slice_range(2, 8)?, 8)?;
        assert_eq!(forward.to_vec(), vec![0, 1, 0, 1, 2, 3, 4, 5, 6, 7], "{:?}", config);

        let backward = arange_buffer(10, &config)?;
        backward
            .slice_range(2, 8)?
            .copy_to(&backward.slice_range(0, 8)?, 8)?;
        assert_eq!(backward.to_vec(), vec![2, 3, 4, 5, 6, 7, 8, 9, 8, 9], "{:?}", config);
    }
    Ok(())
}

#[test]
fn test_copy_to_capacity_error() -> Result<()> {
    let src = DataBuffer::<i32>::allocate(5)?;
    let dst = DataBuffer::<i32>::allocate(3)?;
    assert!(matches!(src.copy_to(&dst, 5), Err(Error::CapacityError { .. })));
    Ok(())
}

#[test]
fn test_read_into_write_from() -> Result<()> {
    let buffer = DataBuffer::<f64>::allocate_with(12, &segmented_config(5, 5))?;
    let values: Vec<f64> = (0..12).map(|i| i as f64 * 0.5).collect();
    buffer.write_from(&values)?;
    let mut read = vec![0.0; 12];
    buffer.read_into(&mut read)?;
    assert_eq!(read, values);
    let mut too_long = vec![0.0; 13];
    assert!(matches!(buffer.read_into(&mut too_long), Err(Error::CapacityError { .. })));
    assert!(buffer.as_read_only().write_from(&values).is_err());
    Ok(())
}

#[test]
fn test_object_elements() -> Result<()> {
    let buffer = DataBuffer::<String>::allocate_with(6, &segmented_config(2, 4))?;
    assert_eq!(buffer.kind(), ElementKind::Object);
    buffer.put(3, "three".to_string())?;
    buffer.put(4, "four".to_string())?;
    assert_eq!(buffer.get(0)?, "");
    let copy = DataBuffer::<String>::allocate(6)?;
    buffer.copy_to(&copy, 6)?;
    assert_eq!(copy.get(3)?, "three");
    assert_eq!(copy.get(4)?, "four");
    Ok(())
}

#[test]
fn test_kinds() -> Result<()> {
    assert_eq!(DataBuffer::<i8>::allocate(1)?.kind(), ElementKind::Byte);
    assert_eq!(DataBuffer::<i32>::allocate(1)?.kind(), ElementKind::Int32);
    assert_eq!(DataBuffer::<i64>::allocate(1)?.kind(), ElementKind::Int64);
    assert_eq!(DataBuffer::<f32>::allocate(1)?.kind(), ElementKind::Float32);
    assert_eq!(DataBuffer::<f64>::allocate(1)?.kind(), ElementKind::Float64);
    assert_eq!(ElementKind::Float64.byte_size(), Some(8));
    assert_eq!(ElementKind::Object.byte_size(), None);
    Ok(())
}

#[test]
fn test_config_from_json() -> Result<()> {
    let config = BufferConfig::from_json(r#"{"max_direct_capacity": 8, "segment_size": 3}"#)?;
    assert_eq!(config, segmented_config(8, 3));
    assert_eq!(config.direct_capacity_limit::<i64>(), 8);
    assert_eq!(config.segment_size_for::<i64>(), 3);

    let defaults = BufferConfig::from_json("{}")?;
    assert_eq!(defaults, BufferConfig::default());
    assert_eq!(
        defaults.direct_capacity_limit::<i64>(),
        isize::MAX as u64 / 8
    );

    assert!(matches!(
        BufferConfig::from_json(r#"{"segment_size": 0}"#),
        Err(Error::ArgumentsError { .. })
    ));
    assert!(matches!(
        BufferConfig::from_json("not json"),
        Err(Error::ArgumentsError { .. })
    ));
    Ok(())
}

#[test]
fn test_zero_segment_size_rejected() {
    let config = BufferConfig::new()
        .with_max_direct_capacity(2)
        .with_segment_size(0);
    assert!(matches!(
        DataBuffer::<i32>::allocate_with(5, &config),
        Err(Error::ArgumentsError { .. })
    ));
}
