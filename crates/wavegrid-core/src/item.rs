#![forbid(unsafe_code)]

//! Grid item identity and per-item visual state.

use std::fmt;

use crate::geometry::{Point, Rect, Size};

/// Identifies an element inside the grid: a section index and an item index.
///
/// A section header uses the same key space as cells (the header of section
/// 2 is `GridPosition::new(2, 0)`), so positions are always paired with an
/// [`ElementCategory`] when they key anything long-lived. See [`ElementKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPosition {
    pub section: usize,
    pub item: usize,
}

impl GridPosition {
    #[inline]
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.item)
    }
}

/// What kind of element a set of attributes describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ElementCategory {
    /// A regular grid cell.
    Cell,
    /// A supplementary element such as a section header.
    Supplementary,
}

impl fmt::Display for ElementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cell => "cell",
            Self::Supplementary => "supplementary",
        })
    }
}

/// A position qualified by its category; unique across cells and headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementKey {
    pub category: ElementCategory,
    pub position: GridPosition,
}

impl ElementKey {
    #[inline]
    pub const fn cell(position: GridPosition) -> Self {
        Self {
            category: ElementCategory::Cell,
            position,
        }
    }

    #[inline]
    pub const fn supplementary(position: GridPosition) -> Self {
        Self {
            category: ElementCategory::Supplementary,
            position,
        }
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.category, self.position)
    }
}

/// Visual state of one element: where its center is and how big it is.
///
/// Handed out by value; the animator keeps its own copy and mutates the
/// center as the spring settles.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemAttributes {
    pub position: GridPosition,
    pub category: ElementCategory,
    pub center: Point,
    pub size: Size,
}

impl ItemAttributes {
    /// Attributes for a cell whose frame is `frame`.
    pub fn cell(position: GridPosition, frame: Rect) -> Self {
        Self {
            position,
            category: ElementCategory::Cell,
            center: frame.center(),
            size: frame.size(),
        }
    }

    /// Attributes for a supplementary element whose frame is `frame`.
    pub fn supplementary(position: GridPosition, frame: Rect) -> Self {
        Self {
            position,
            category: ElementCategory::Supplementary,
            center: frame.center(),
            size: frame.size(),
        }
    }

    #[inline]
    pub fn key(&self) -> ElementKey {
        ElementKey {
            category: self.category,
            position: self.position,
        }
    }

    /// The frame implied by `center` and `size`.
    #[inline]
    pub fn frame(&self) -> Rect {
        Rect::from_center(self.center, self.size)
    }
}
