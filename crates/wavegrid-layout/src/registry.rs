#![forbid(unsafe_code)]

//! Spring attachment registry.
//!
//! Owns the [`ActiveSet`] together with one [`SpringAttachment`] record per
//! active element. Both are only ever changed inside the same method, so
//! `key ∈ active ⟺ attachment(key) exists` holds between any two calls.
//!
//! # Rounding
//!
//! A new item's center is rounded to whole units *before* it reaches the
//! simulation service, and the rounded center is written back onto the
//! attributes. A solver that rounds internally would otherwise animate the
//! sub-unit residual, which shows up as a small circular wobble around the
//! anchor.

use rustc_hash::FxHashMap;
use wavegrid_core::{ElementCategory, ElementKey, GridPosition, ItemAttributes, Point};
use wavegrid_dynamics::{AttachmentHandle, SimulationService, SpringParams};

use crate::visibility::ActiveSet;

/// One live spring, as the engine sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringAttachment {
    pub handle: AttachmentHandle,
    pub key: ElementKey,
    /// Rounded rest center; never changes for the life of the attachment.
    pub anchor: Point,
    pub params: SpringParams,
}

impl SpringAttachment {
    #[inline]
    pub fn position(&self) -> GridPosition {
        self.key.position
    }

    #[inline]
    pub fn category(&self) -> ElementCategory {
        self.key.category
    }
}

#[derive(Debug, Clone, Default)]
pub struct AttachmentRegistry {
    params: SpringParams,
    active: ActiveSet,
    attachments: FxHashMap<ElementKey, SpringAttachment>,
}

impl AttachmentRegistry {
    #[must_use]
    pub fn new(params: SpringParams) -> Self {
        Self {
            params,
            active: ActiveSet::new(),
            attachments: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn params(&self) -> &SpringParams {
        &self.params
    }

    #[must_use]
    pub fn active(&self) -> &ActiveSet {
        &self.active
    }

    #[must_use]
    pub fn get(&self, key: ElementKey) -> Option<&SpringAttachment> {
        self.attachments.get(&key)
    }

    #[must_use]
    pub fn contains(&self, key: ElementKey) -> bool {
        self.active.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.attachments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
    }

    /// All live attachments, ordered by key.
    #[must_use]
    pub fn attachments(&self) -> Vec<SpringAttachment> {
        let mut all: Vec<SpringAttachment> = self.attachments.values().copied().collect();
        all.sort_by_key(|a| a.key);
        all
    }

    /// Whether the active set and the attachment map describe the same keys.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.active.len() == self.attachments.len()
            && self.attachments.keys().all(|key| self.active.contains(*key))
    }

    /// Destroy the attachments for `keys`. Unknown keys are ignored.
    ///
    /// If the simulation reports a different category for an attachment than
    /// the registry recorded, that attachment is left alone for this pass.
    /// Returns the number of attachments destroyed.
    pub fn remove<S>(&mut self, simulation: &mut S, keys: &[ElementKey]) -> usize
    where
        S: SimulationService + ?Sized,
    {
        let mut removed = 0;
        for &key in keys {
            let Some(attachment) = self.attachments.get(&key).copied() else {
                continue;
            };
            let reported = simulation
                .attachment_state(attachment.handle)
                .map(|state| state.category);
            if let Some(reported) = reported.filter(|c| *c != key.category) {
                tracing::warn!(%key, %reported, "attachment category mismatch, skipping removal");
                continue;
            }
            simulation.remove_attachment(attachment.handle);
            self.attachments.remove(&key);
            self.active.remove(key);
            removed += 1;
        }
        removed
    }

    /// Attach springs to `items`, rounding each center first.
    ///
    /// Items that are already active are skipped. Returns the number of
    /// attachments created.
    pub fn add<S, I>(&mut self, simulation: &mut S, items: I) -> usize
    where
        S: SimulationService + ?Sized,
        I: IntoIterator<Item = ItemAttributes>,
    {
        let mut added = 0;
        for mut item in items {
            let key = item.key();
            if self.active.contains(key) {
                tracing::debug!(%key, "already attached");
                continue;
            }

            let anchor = item.center.rounded();
            if item.center != anchor {
                item.center = anchor;
            }

            let handle = simulation.create_attachment(item, anchor, &self.params);
            self.attachments.insert(
                key,
                SpringAttachment {
                    handle,
                    key,
                    anchor,
                    params: self.params,
                },
            );
            self.active.insert(key);
            added += 1;
        }
        added
    }

    /// Destroy every attachment.
    pub fn clear<S>(&mut self, simulation: &mut S) -> usize
    where
        S: SimulationService + ?Sized,
    {
        let count = self.attachments.len();
        for (_, attachment) in self.attachments.drain() {
            simulation.remove_attachment(attachment.handle);
        }
        self.active.clear();
        count
    }
}
