//! Property-based invariant tests for observable state.
//!
//! Any interleaving of writes and scheduler passes must satisfy:
//!
//! 1. `take_pending` reports whether a write happened since the last pass.
//! 2. Subscribers run once per batch of writes, not once per write.
//! 3. Reads observe the last write.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use proptest::prelude::*;
use tessel_runtime::{ChangeNotifier, State};

#[derive(Debug, Clone)]
enum Op {
    Set(i32),
    Add(i32),
    Pass,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<i32>().prop_map(Op::Set),
        (-100i32..100).prop_map(Op::Add),
        Just(Op::Pass),
    ]
}

proptest! {
    #[test]
    fn writes_coalesce_between_passes(ops in proptest::collection::vec(op_strategy(), 0..64)) {
        let notifier = ChangeNotifier::new();
        let wakes = Arc::new(AtomicUsize::new(0));
        notifier.subscribe({
            let wakes = Arc::clone(&wakes);
            move || {
                wakes.fetch_add(1, Ordering::SeqCst);
            }
        });
        let state = State::new(0i32, &notifier);

        let mut value = 0i32;
        let mut dirty = false;
        let mut batches = 0usize;
        for op in ops {
            match op {
                Op::Set(v) | Op::Add(v) if !dirty => {
                    batches += 1;
                    dirty = true;
                    value = apply(&state, &op, value, v);
                }
                Op::Set(v) | Op::Add(v) => {
                    value = apply(&state, &op, value, v);
                }
                Op::Pass => {
                    prop_assert_eq!(notifier.take_pending(), dirty);
                    dirty = false;
                }
            }
            prop_assert_eq!(notifier.is_pending(), dirty);
            prop_assert_eq!(state.get(), value);
        }
        prop_assert_eq!(wakes.load(Ordering::SeqCst), batches);
    }
}

fn apply(state: &State<i32>, op: &Op, value: i32, v: i32) -> i32 {
    if let Op::Add(_) = op {
        state.update(|n| *n = n.wrapping_add(v));
        value.wrapping_add(v)
    } else {
        state.set(v);
        v
    }
}
