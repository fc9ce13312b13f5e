//! # Position Sequencer
//!
//! Keeps the items of a checklist in a dense, zero-based order: for N items
//! the positions are exactly `{0, 1, ..., N-1}`.
//!
//! The functions here only plan. Store implementations load a snapshot of
//! `(id, position)` pairs while holding the checklist lock, ask the sequencer
//! what to write, and apply the plan inside the same transaction.

use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::error::{ChecklistError, Result};
use crate::models::{ChecklistItem, PositionUpdate};

/// Identity and position of one item, the only data the sequencer needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSlot {
    pub id: Uuid,
    pub position: i32,
}

impl From<&ChecklistItem> for ItemSlot {
    fn from(item: &ChecklistItem) -> Self {
        Self {
            id: item.id,
            position: item.position,
        }
    }
}

/// Result of planning a delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePlan {
    pub deleted_position: i32,
    /// Items above the deleted one, each moved down by exactly one
    pub shifts: Vec<PositionUpdate>,
}

pub fn slots(items: &[ChecklistItem]) -> Vec<ItemSlot> {
    items.iter().map(ItemSlot::from).collect()
}

/// Position for an appended item: one past the current maximum, or 0
pub fn next_position(items: &[ItemSlot]) -> i32 {
    items
        .iter()
        .map(|slot| slot.position)
        .max()
        .map_or(0, |max| max + 1)
}

/// Plan the removal of `item_id` and the renumbering that closes the gap
pub fn plan_delete(items: &[ItemSlot], item_id: Uuid) -> Result<DeletePlan> {
    let deleted = items
        .iter()
        .find(|slot| slot.id == item_id)
        .ok_or_else(|| ChecklistError::item_not_found(item_id))?;

    let mut above: Vec<&ItemSlot> = items
        .iter()
        .filter(|slot| slot.position > deleted.position)
        .collect();
    above.sort_by_key(|slot| slot.position);

    Ok(DeletePlan {
        deleted_position: deleted.position,
        shifts: above
            .into_iter()
            .map(|slot| PositionUpdate::new(slot.id, slot.position - 1))
            .collect(),
    })
}

/// Validate a reorder batch against the current items.
///
/// Every id must belong to the checklist and appear at most once, and the
/// positions after merging the batch over the current ones must be dense.
/// Returns only the updates that actually move an item.
pub fn plan_reorder(items: &[ItemSlot], updates: &[PositionUpdate]) -> Result<Vec<PositionUpdate>> {
    let mut merged: HashMap<Uuid, i32> = items.iter().map(|slot| (slot.id, slot.position)).collect();
    let mut seen = HashSet::with_capacity(updates.len());

    for update in updates {
        if !seen.insert(update.id) {
            return Err(ChecklistError::validation(format!(
                "Item {} appears more than once in the reorder batch",
                update.id
            )));
        }
        match merged.get_mut(&update.id) {
            Some(position) => *position = update.position,
            None => return Err(ChecklistError::item_not_found(update.id)),
        }
    }

    if !is_dense(merged.values().copied()) {
        return Err(ChecklistError::validation(format!(
            "Reorder must leave positions 0..{} without gaps or duplicates",
            items.len()
        )));
    }

    let current: HashMap<Uuid, i32> = items.iter().map(|slot| (slot.id, slot.position)).collect();
    Ok(updates
        .iter()
        .filter(|update| current.get(&update.id) != Some(&update.position))
        .copied()
        .collect())
}

/// True when the positions are exactly `{0, .., N-1}`
pub fn is_dense(positions: impl IntoIterator<Item = i32>) -> bool {
    let mut sorted: Vec<i32> = positions.into_iter().collect();
    sorted.sort_unstable();
    sorted
        .iter()
        .enumerate()
        .all(|(index, position)| i32::try_from(index).is_ok_and(|index| index == *position))
}

/// Rewrite positions of an already ordered list to `0..N-1`
pub fn renumber(items: &mut [ChecklistItem]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.position = i32::try_from(index).unwrap_or(i32::MAX);
    }
}

/// Full permutation describing the current order of `items`
pub fn permutation_of(items: &[ChecklistItem]) -> Vec<PositionUpdate> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| PositionUpdate::new(item.id, i32::try_from(index).unwrap_or(i32::MAX)))
        .collect()
}
