#![forbid(unsafe_code)]

//! Collaborators the engine consumes but does not own.

use wavegrid_core::{GridPosition, ItemAttributes, Point, Rect, Size};

/// Unsimulated ("rest") geometry of the grid.
///
/// This is the ground truth an item returns to once its spring settles, and
/// what the engine answers with before any spring exists.
pub trait StaticLayout {
    /// Recompute geometry for a viewport of `viewport` size.
    ///
    /// Returns `true` when existing item positions changed, which makes every
    /// live anchor stale.
    fn prepare(&mut self, viewport: Size) -> bool {
        let _ = viewport;
        false
    }

    /// Total scrollable size.
    fn content_size(&self) -> Size;

    /// Every element (cells and supplementary) whose frame intersects `rect`.
    fn attributes_in_rect(&self, rect: Rect) -> Vec<ItemAttributes>;

    fn attributes_for_item(&self, position: GridPosition) -> Option<ItemAttributes>;

    fn attributes_for_supplementary(&self, position: GridPosition) -> Option<ItemAttributes>;
}

/// Where the active gesture's pointer currently is, in content coordinates.
pub trait PointerSource {
    fn current_pointer_location(&self) -> Option<Point>;
}

impl PointerSource for Option<Point> {
    fn current_pointer_location(&self) -> Option<Point> {
        *self
    }
}

impl PointerSource for Point {
    fn current_pointer_location(&self) -> Option<Point> {
        Some(*self)
    }
}

/// Intrinsic size of the item at a position.
pub trait SizingCallback {
    fn size_for_item(&self, position: GridPosition) -> Size;
}

impl<F> SizingCallback for F
where
    F: Fn(GridPosition) -> Size,
{
    fn size_for_item(&self, position: GridPosition) -> Size {
        self(position)
    }
}
