//! Model-based property test against `std::vec::Vec`.
//!
//! Random operation sequences run against a `DynamicArray` and a `Vec`
//! side by side. After every step the contents must match and the
//! capacity must equal what the growth rules predict.

use proptest::prelude::*;
use vessel_array::DynamicArray;

#[derive(Clone, Debug)]
enum Op {
    Push(i32),
    Pop,
    Insert(usize, i32),
    Erase(usize),
    Resize(usize),
    Reserve(usize),
    Truncate(usize),
    Clear,
    CloneFrom(Vec<i32>),
    MoveOut,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<i32>().prop_map(Op::Push),
        2 => Just(Op::Pop),
        3 => (any::<usize>(), any::<i32>()).prop_map(|(at, v)| Op::Insert(at, v)),
        2 => any::<usize>().prop_map(Op::Erase),
        1 => (0usize..48).prop_map(Op::Resize),
        1 => (0usize..48).prop_map(Op::Reserve),
        1 => (0usize..48).prop_map(Op::Truncate),
        1 => Just(Op::Clear),
        1 => proptest::collection::vec(any::<i32>(), 0..24).prop_map(Op::CloneFrom),
        1 => Just(Op::MoveOut),
    ]
}

/// Capacity the array must have after `op`, given its state before it.
fn expected_capacity(op: &Op, len: usize, capacity: usize) -> usize {
    let grown = if capacity == 0 { 1 } else { capacity * 2 };
    match op {
        Op::Push(_) | Op::Insert(..) if len == capacity => grown,
        Op::Resize(n) | Op::Reserve(n) => capacity.max(*n),
        Op::CloneFrom(src) if src.len() > capacity => src.len(),
        Op::MoveOut => 0,
        _ => capacity,
    }
}

proptest! {
    #[test]
    fn matches_vec_under_random_operations(ops in proptest::collection::vec(arb_op(), 1..200)) {
        let mut array = DynamicArray::new();
        let mut model: Vec<i32> = Vec::new();

        for op in ops {
            let expected_cap = expected_capacity(&op, array.len(), array.capacity());
            match &op {
                Op::Push(v) => {
                    array.push_back(*v);
                    model.push(*v);
                }
                Op::Pop => {
                    prop_assert_eq!(array.pop(), model.pop());
                }
                Op::Insert(at, v) => {
                    let at = at % (model.len() + 1);
                    prop_assert_eq!(*array.insert(at, *v), *v);
                    model.insert(at, *v);
                }
                Op::Erase(at) => {
                    if !model.is_empty() {
                        let at = at % model.len();
                        prop_assert_eq!(array.erase(at), at);
                        model.remove(at);
                    }
                }
                Op::Resize(n) => {
                    array.resize(*n);
                    model.resize(*n, 0);
                }
                Op::Reserve(n) => array.reserve(*n),
                Op::Truncate(n) => {
                    array.truncate(*n);
                    model.truncate(*n);
                }
                Op::Clear => {
                    array.clear();
                    model.clear();
                }
                Op::CloneFrom(src) => {
                    array.clone_from(&DynamicArray::from(src.as_slice()));
                    model.clone_from(src);
                }
                Op::MoveOut => {
                    let moved = DynamicArray::take_from(&mut array);
                    prop_assert_eq!(moved.as_slice(), model.as_slice());
                    model.clear();
                }
            }

            prop_assert_eq!(array.as_slice(), model.as_slice());
            prop_assert_eq!(array.capacity(), expected_cap);
            prop_assert!(array.len() <= array.capacity());
        }
    }

    #[test]
    fn pushes_from_empty_double_capacity(count in 0usize..300) {
        let mut array = DynamicArray::new();
        for i in 0..count {
            array.push_back(i);
        }
        let expected = if count == 0 { 0 } else { count.next_power_of_two() };
        prop_assert_eq!(array.capacity(), expected);
        prop_assert!(array.iter().copied().eq(0..count));
    }

    #[test]
    fn clone_from_matches_source(
        target in proptest::collection::vec(any::<u8>(), 0..32),
        source in proptest::collection::vec(any::<u8>(), 0..32),
    ) {
        let mut array = DynamicArray::from(target.as_slice());
        let capacity = array.capacity();
        array.clone_from(&DynamicArray::from(source.as_slice()));
        prop_assert_eq!(array.as_slice(), source.as_slice());
        prop_assert_eq!(array.capacity(), capacity.max(source.len()));
    }
}
