//! Property-based tests for dense item ordering.

mod common;

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use uuid::Uuid;

use checklist_core::hash::{generate_unique_hash, is_well_formed};
use checklist_core::models::PositionUpdate;
use checklist_core::sequencer::{self, ItemSlot};
use checklist_core::store::{ChecklistStore, MemoryChecklistStore};
use common::strategies::{list_ops_strategy, ListOp};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn permutation(order: &[Uuid]) -> Vec<PositionUpdate> {
    order
        .iter()
        .enumerate()
        .map(|(index, id)| PositionUpdate::new(*id, index as i32))
        .collect()
}

fn dense_slots(count: usize) -> Vec<ItemSlot> {
    (0..count)
        .map(|position| ItemSlot {
            id: Uuid::new_v4(),
            position: position as i32,
        })
        .collect()
}

proptest! {
    /// Property: any sequence of appends, deletes and reorders leaves the
    /// stored order identical to a plain vector model, with dense positions
    #[test]
    fn store_order_follows_model_and_stays_dense(ops in list_ops_strategy()) {
        runtime().block_on(async {
            let store = MemoryChecklistStore::new();
            let checklist = store.create_checklist("prop0001", "Property").await.unwrap();
            let mut model: Vec<Uuid> = Vec::new();

            for op in ops {
                match op {
                    ListOp::Append => {
                        let item = store.create_item(checklist.id, "item").await.unwrap();
                        prop_assert_eq!(item.position as usize, model.len());
                        model.push(item.id);
                    }
                    ListOp::Delete(index) if !model.is_empty() => {
                        let removed = model.remove(index % model.len());
                        store.delete_item(checklist.id, removed).await.unwrap();
                    }
                    ListOp::Swap(a, b) if !model.is_empty() => {
                        let len = model.len();
                        model.swap(a % len, b % len);
                        store
                            .batch_update_positions(checklist.id, &permutation(&model))
                            .await
                            .unwrap();
                    }
                    ListOp::Rotate(by) if !model.is_empty() => {
                        let len = model.len();
                        model.rotate_left(by % len);
                        store
                            .batch_update_positions(checklist.id, &permutation(&model))
                            .await
                            .unwrap();
                    }
                    _ => {}
                }

                let items = store.list_items(checklist.id).await.unwrap();
                let ids: Vec<Uuid> = items.iter().map(|item| item.id).collect();
                prop_assert_eq!(&ids, &model);
                prop_assert!(sequencer::is_dense(items.iter().map(|item| item.position)));
            }
            Ok::<(), TestCaseError>(())
        })?;
    }

    /// Property: deleting shifts exactly the items above, each down by one
    #[test]
    fn delete_shifts_only_items_above(count in 1usize..30, pick in any::<usize>()) {
        let items = dense_slots(count);
        let target = pick % count;
        let plan = sequencer::plan_delete(&items, items[target].id).unwrap();

        prop_assert_eq!(plan.deleted_position, target as i32);
        prop_assert_eq!(plan.shifts.len(), count - target - 1);
        for (offset, shift) in plan.shifts.iter().enumerate() {
            prop_assert_eq!(shift.id, items[target + 1 + offset].id);
            prop_assert_eq!(shift.position, (target + offset) as i32);
        }
    }

    /// Property: any full permutation is accepted and only moved items are
    /// written
    #[test]
    fn full_permutations_are_accepted(order in Just((0..12).collect::<Vec<usize>>()).prop_shuffle()) {
        let items = dense_slots(order.len());
        let updates: Vec<PositionUpdate> = order
            .iter()
            .enumerate()
            .map(|(position, index)| PositionUpdate::new(items[*index].id, position as i32))
            .collect();

        let plan = sequencer::plan_reorder(&items, &updates).unwrap();
        let moved = order
            .iter()
            .enumerate()
            .filter(|(position, index)| position != *index)
            .count();
        prop_assert_eq!(plan.len(), moved);
    }

    /// Property: a batch that leaves two items on one position is rejected
    #[test]
    fn colliding_batches_are_rejected(count in 2usize..20, a in any::<usize>(), b in any::<usize>()) {
        let items = dense_slots(count);
        let (a, b) = (a % count, b % count);
        prop_assume!(a != b);

        let updates = vec![PositionUpdate::new(items[a].id, b as i32)];
        let err = sequencer::plan_reorder(&items, &updates).unwrap_err();
        prop_assert!(err.is_validation());
    }

    /// Property: generated hashes are well formed and of the requested length
    #[test]
    fn generated_hashes_are_well_formed(length in 1usize..32) {
        let hash = generate_unique_hash(length);
        prop_assert_eq!(hash.len(), length);
        prop_assert!(is_well_formed(&hash));
    }
}
