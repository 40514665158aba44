#![forbid(unsafe_code)]

//! Sample data: a produce catalog in three colour sections.
//!
//! Each vegetable's weight picks its on-screen size (`weight × 1.2`, square),
//! which gives the flow grid visibly uneven rows.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use wavegrid_core::{GridPosition, Size};
use wavegrid_layout::{FlowLayout, FlowLayoutConfig};

/// Lower bound (inclusive) of a generated weight, in grams.
pub const MIN_WEIGHT: f64 = 42.0;
/// Upper bound (exclusive) of a generated weight, in grams.
pub const MAX_WEIGHT: f64 = 111.0;
/// Display points per gram.
pub const SIZE_PER_GRAM: f64 = 1.2;

const GREEN: [&str; 4] = ["Cucumber", "Pea", "Broccoli", "Brussel Sprouts"];
const RED: [&str; 4] = ["Red Pepper", "Chili", "Beetroot", "Tomato"];
const YELLOW: [&str; 3] = ["Corn", "Potato", "Yellow Zucchini"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vegetable {
    pub id: u64,
    pub name: &'static str,
    pub weight: f64,
}

impl Vegetable {
    /// Square display size for this vegetable.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::square(self.weight * SIZE_PER_GRAM)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub id: u32,
    pub title: &'static str,
    pub items: Vec<Vegetable>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    pub sections: Vec<Section>,
}

impl Catalog {
    /// The three-section sample catalog with weights drawn from `seed`.
    #[must_use]
    pub fn sample(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut next_id = 0u64;
        let mut section = |id: u32, title: &'static str, names: &[&'static str], repeats: usize| {
            let items = (0..repeats)
                .flat_map(|_| names.iter().copied())
                .map(|name| {
                    next_id += 1;
                    Vegetable {
                        id: next_id,
                        name,
                        weight: rng.random_range(MIN_WEIGHT..MAX_WEIGHT),
                    }
                })
                .collect();
            Section { id, title, items }
        };

        Self {
            sections: vec![
                section(1, "Green", &GREEN, 8),
                section(2, "Red", &RED, 7),
                section(3, "Yellow", &YELLOW, 6),
            ],
        }
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    #[must_use]
    pub fn vegetable(&self, position: GridPosition) -> Option<&Vegetable> {
        self.sections.get(position.section)?.items.get(position.item)
    }

    /// Static flow layout of this catalog at `width`.
    pub fn flow_layout(
        &self,
        config: FlowLayoutConfig,
        width: f64,
    ) -> FlowLayout<impl Fn(GridPosition) -> Size + use<>> {
        let sizes: Vec<Vec<Size>> = self
            .sections
            .iter()
            .map(|s| s.items.iter().map(Vegetable::size).collect())
            .collect();
        let counts = sizes.iter().map(Vec::len).collect();
        let sizing = move |p: GridPosition| {
            sizes
                .get(p.section)
                .and_then(|row| row.get(p.item))
                .copied()
                .unwrap_or(Size::ZERO)
        };
        FlowLayout::new(counts, sizing, config, width)
    }
}
