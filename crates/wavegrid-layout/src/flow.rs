#![forbid(unsafe_code)]

//! Flow layout: sections of variably sized items wrapped into rows.
//!
//! Each section is laid out top to bottom:
//!
//! ```text
//! ┌──────────────── header (optional, full width) ───────────────┐
//! │ inset.top                                                    │
//! │ inset.left [item] spacing [item] spacing [item]   inset.right│
//! │ line_spacing                                                 │
//! │ inset.left [item] [item]                                     │
//! │ inset.bottom                                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows are left-aligned and items are vertically centered within their row.
//! An item wider than the available width gets a row of its own.
//!
//! # Invariants
//!
//! 1. Geometry is a pure function of (item counts, sizing, config, width).
//! 2. `attributes_in_rect` returns headers before cells, each in position
//!    order.

use serde::{Deserialize, Serialize};
use wavegrid_core::{GridPosition, ItemAttributes, Rect, Size};

use crate::provider::{SizingCallback, StaticLayout};

/// Padding around a section's items.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeInsets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl EdgeInsets {
    pub const fn all(value: f64) -> Self {
        Self {
            top: value,
            left: value,
            bottom: value,
            right: value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowLayoutConfig {
    pub section_inset: EdgeInsets,
    /// Vertical gap between rows.
    pub line_spacing: f64,
    /// Horizontal gap between items in a row.
    pub interitem_spacing: f64,
    /// Height of the per-section header; 0 means no headers.
    pub header_height: f64,
}

impl Default for FlowLayoutConfig {
    fn default() -> Self {
        Self {
            section_inset: EdgeInsets::all(20.0),
            line_spacing: 10.0,
            interitem_spacing: 10.0,
            header_height: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct SectionGeometry {
    bounds: Rect,
    header: Option<Rect>,
    items: Vec<Rect>,
}

/// Static geometry provider for a sectioned grid.
#[derive(Debug, Clone)]
pub struct FlowLayout<Z> {
    section_counts: Vec<usize>,
    sizing: Z,
    config: FlowLayoutConfig,
    width: f64,
    sections: Vec<SectionGeometry>,
    content_size: Size,
}

impl<Z: SizingCallback> FlowLayout<Z> {
    /// Lay out `section_counts[s]` items per section at `width`.
    pub fn new(section_counts: Vec<usize>, sizing: Z, config: FlowLayoutConfig, width: f64) -> Self {
        let mut layout = Self {
            section_counts,
            sizing,
            config,
            width,
            sections: Vec::new(),
            content_size: Size::ZERO,
        };
        layout.rebuild();
        layout
    }

    #[must_use]
    pub fn config(&self) -> &FlowLayoutConfig {
        &self.config
    }

    #[must_use]
    pub fn section_count(&self) -> usize {
        self.section_counts.len()
    }

    #[must_use]
    pub fn item_count(&self, section: usize) -> usize {
        self.section_counts.get(section).copied().unwrap_or(0)
    }

    fn rebuild(&mut self) {
        let cfg = self.config;
        let inset = cfg.section_inset;
        let row_start = inset.left;
        let row_limit = (self.width - inset.right).max(row_start);

        let mut sections = Vec::with_capacity(self.section_counts.len());
        let mut y = 0.0;

        for (section, &count) in self.section_counts.iter().enumerate() {
            let top = y;
            let header = (cfg.header_height > 0.0).then(|| {
                let frame = Rect::new(0.0, y, self.width, cfg.header_height);
                y += cfg.header_height;
                frame
            });
            y += inset.top;

            let mut items = Vec::with_capacity(count);
            let mut row: Vec<Size> = Vec::new();
            let mut cursor = row_start;
            let mut first_row = true;

            let mut flush = |row: &mut Vec<Size>, y: &mut f64, items: &mut Vec<Rect>| {
                if row.is_empty() {
                    return;
                }
                if !first_row {
                    *y += cfg.line_spacing;
                }
                first_row = false;
                let row_height = row.iter().map(|s| s.height).fold(0.0, f64::max);
                let mut x = row_start;
                for size in row.drain(..) {
                    let item_y = *y + (row_height - size.height) / 2.0;
                    items.push(Rect::new(x, item_y, size.width, size.height));
                    x += size.width + cfg.interitem_spacing;
                }
                *y += row_height;
            };

            for item in 0..count {
                let size = self.sizing.size_for_item(GridPosition::new(section, item));
                if !row.is_empty() && cursor + size.width > row_limit {
                    flush(&mut row, &mut y, &mut items);
                    cursor = row_start;
                }
                row.push(size);
                cursor += size.width + cfg.interitem_spacing;
            }
            flush(&mut row, &mut y, &mut items);

            y += inset.bottom;
            sections.push(SectionGeometry {
                bounds: Rect::new(0.0, top, self.width, y - top),
                header,
                items,
            });
        }

        self.sections = sections;
        self.content_size = Size::new(self.width, y);
    }
}

impl<Z: SizingCallback> StaticLayout for FlowLayout<Z> {
    fn prepare(&mut self, viewport: Size) -> bool {
        if viewport.width == self.width {
            return false;
        }
        self.width = viewport.width;
        self.rebuild();
        true
    }

    fn content_size(&self) -> Size {
        self.content_size
    }

    fn attributes_in_rect(&self, rect: Rect) -> Vec<ItemAttributes> {
        let mut headers = Vec::new();
        let mut cells = Vec::new();
        for (section, geometry) in self.sections.iter().enumerate() {
            if !geometry.bounds.intersects(&rect) {
                continue;
            }
            if let Some(frame) = geometry.header.filter(|f| f.intersects(&rect)) {
                headers.push(ItemAttributes::supplementary(
                    GridPosition::new(section, 0),
                    frame,
                ));
            }
            cells.extend(
                geometry
                    .items
                    .iter()
                    .enumerate()
                    .filter(|(_, frame)| frame.intersects(&rect))
                    .map(|(item, frame)| {
                        ItemAttributes::cell(GridPosition::new(section, item), *frame)
                    }),
            );
        }
        headers.extend(cells);
        headers
    }

    fn attributes_for_item(&self, position: GridPosition) -> Option<ItemAttributes> {
        let frame = self.sections.get(position.section)?.items.get(position.item)?;
        Some(ItemAttributes::cell(position, *frame))
    }

    fn attributes_for_supplementary(&self, position: GridPosition) -> Option<ItemAttributes> {
        if position.item != 0 {
            return None;
        }
        let frame = self.sections.get(position.section)?.header?;
        Some(ItemAttributes::supplementary(position, frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavegrid_core::ElementCategory;

    fn uniform(side: f64) -> impl Fn(GridPosition) -> Size {
        move |_: GridPosition| Size::square(side)
    }

    #[test]
    fn rows_wrap_within_width() {
        // Available width 400 - 40 = 360: three 100-wide items fit (320), a
        // fourth would not.
        let layout = FlowLayout::new(vec![5], uniform(100.0), FlowLayoutConfig::default(), 400.0);
        let frames: Vec<Rect> = (0..5)
            .map(|i| layout.attributes_for_item(GridPosition::new(0, i)).unwrap().frame())
            .collect();
        assert_eq!(frames[0], Rect::new(20.0, 20.0, 100.0, 100.0));
        assert_eq!(frames[1], Rect::new(130.0, 20.0, 100.0, 100.0));
        assert_eq!(frames[2], Rect::new(240.0, 20.0, 100.0, 100.0));
        assert_eq!(frames[3], Rect::new(20.0, 130.0, 100.0, 100.0));
        assert_eq!(layout.content_size(), Size::new(400.0, 250.0));
    }

    #[test]
    fn items_centered_in_row() {
        let sizing = |p: GridPosition| {
            if p.item == 0 { Size::square(100.0) } else { Size::square(50.0) }
        };
        let layout = FlowLayout::new(vec![2], sizing, FlowLayoutConfig::default(), 400.0);
        let small = layout.attributes_for_item(GridPosition::new(0, 1)).unwrap();
        assert_eq!(small.frame().y, 45.0);
        assert_eq!(small.center.y, 70.0);
    }

    #[test]
    fn sections_stack_with_headers() {
        let config = FlowLayoutConfig {
            header_height: 40.0,
            ..FlowLayoutConfig::default()
        };
        let layout = FlowLayout::new(vec![1, 1], uniform(60.0), config, 300.0);
        // Section 0: header 40 + inset 20 + row 60 + inset 20 = 140.
        let header1 = layout
            .attributes_for_supplementary(GridPosition::new(1, 0))
            .unwrap();
        assert_eq!(header1.frame(), Rect::new(0.0, 140.0, 300.0, 40.0));
        assert_eq!(header1.category, ElementCategory::Supplementary);
        let cell = layout.attributes_for_item(GridPosition::new(1, 0)).unwrap();
        assert_eq!(cell.frame().y, 200.0);
        assert_eq!(layout.content_size().height, 280.0);
        assert!(layout.attributes_for_supplementary(GridPosition::new(1, 1)).is_none());
    }

    #[test]
    fn no_headers_by_default() {
        let layout = FlowLayout::new(vec![3], uniform(60.0), FlowLayoutConfig::default(), 300.0);
        assert!(layout.attributes_for_supplementary(GridPosition::new(0, 0)).is_none());
        let all = layout.attributes_in_rect(Rect::new(0.0, 0.0, 300.0, 1000.0));
        assert!(all.iter().all(|a| a.category == ElementCategory::Cell));
    }

    #[test]
    fn rect_query_filters_and_orders() {
        let config = FlowLayoutConfig {
            header_height: 40.0,
            ..FlowLayoutConfig::default()
        };
        let layout = FlowLayout::new(vec![6, 6], uniform(100.0), config, 400.0);
        let hits = layout.attributes_in_rect(Rect::new(0.0, 0.0, 400.0, 100.0));
        assert_eq!(hits[0].category, ElementCategory::Supplementary);
        let cells: Vec<usize> = hits
            .iter()
            .filter(|a| a.category == ElementCategory::Cell)
            .map(|a| a.position.item)
            .collect();
        assert_eq!(cells, vec![0, 1, 2]);
    }

    #[test]
    fn oversized_item_gets_own_row() {
        let sizing = |p: GridPosition| {
            if p.item == 1 { Size::new(500.0, 50.0) } else { Size::square(50.0) }
        };
        let layout = FlowLayout::new(vec![3], sizing, FlowLayoutConfig::default(), 300.0);
        let ys: Vec<f64> = (0..3)
            .map(|i| layout.attributes_for_item(GridPosition::new(0, i)).unwrap().frame().y)
            .collect();
        assert_eq!(ys, vec![20.0, 80.0, 140.0]);
    }

    #[test]
    fn prepare_rebuilds_only_on_width_change() {
        let mut layout =
            FlowLayout::new(vec![4], uniform(100.0), FlowLayoutConfig::default(), 400.0);
        assert!(!layout.prepare(Size::new(400.0, 800.0)));
        assert!(layout.prepare(Size::new(260.0, 800.0)));
        // 220 available: two per row.
        let third = layout.attributes_for_item(GridPosition::new(0, 2)).unwrap();
        assert_eq!(third.frame().y, 130.0);
    }

    #[test]
    fn empty_section_keeps_insets() {
        let layout = FlowLayout::new(vec![0, 1], uniform(60.0), FlowLayoutConfig::default(), 300.0);
        let cell = layout.attributes_for_item(GridPosition::new(1, 0)).unwrap();
        assert_eq!(cell.frame().y, 60.0);
        assert_eq!(layout.item_count(0), 0);
        assert_eq!(layout.section_count(), 2);
    }
}
