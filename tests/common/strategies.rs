use proptest::prelude::*;

/// One user action against a checklist; indices are taken modulo the
/// current item count
#[derive(Debug, Clone)]
pub enum ListOp {
    Append,
    Delete(usize),
    Swap(usize, usize),
    Rotate(usize),
}

pub fn list_op_strategy() -> impl Strategy<Value = ListOp> {
    prop_oneof![
        3 => Just(ListOp::Append),
        2 => any::<usize>().prop_map(ListOp::Delete),
        2 => (any::<usize>(), any::<usize>()).prop_map(|(a, b)| ListOp::Swap(a, b)),
        1 => any::<usize>().prop_map(ListOp::Rotate),
    ]
}

pub fn list_ops_strategy() -> impl Strategy<Value = Vec<ListOp>> {
    prop::collection::vec(list_op_strategy(), 1..40)
}
