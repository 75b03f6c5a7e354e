//! The [`Cell`] marker trait.

/// A value stored in one grid cell.
///
/// Cells are plain values: they are copied freely between the stream
/// stages and carry no identity beyond their contents. Any type that is
/// `Copy`, thread-safe and `'static` qualifies through the blanket impl,
/// so numeric scalars, tuples and small `#[derive(Clone, Copy)]` structs
/// all work out of the box.
pub trait Cell: Copy + Send + Sync + 'static {}

impl<T: Copy + Send + Sync + 'static> Cell for T {}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_cell<T: Cell>() {}

    #[derive(Clone, Copy)]
    struct Fields {
        _ex: f32,
        _hz: f32,
    }

    #[test]
    fn common_value_types_are_cells() {
        assert_cell::<f32>();
        assert_cell::<(u32, u32, bool)>();
        assert_cell::<[f64; 4]>();
        assert_cell::<Fields>();
    }
}
