//! Property-based tests for the delete gate
//!
//! Random operation sequences are checked against a plain countdown model.

use peramore_admin::admin::{DeleteGate, DeleteTarget, GateState};
use peramore_admin::shared::{CatalogItem, ItemType};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Arm(usize),
    Tick,
    Cancel,
    Confirm,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..3).prop_map(Op::Arm),
        Just(Op::Tick),
        Just(Op::Tick),
        Just(Op::Cancel),
        Just(Op::Confirm),
    ]
}

proptest! {
    #[test]
    fn test_gate_follows_countdown_model(
        countdown in 1u32..6,
        ops in proptest::collection::vec(op(), 0..40),
    ) {
        let targets: Vec<DeleteTarget> = ["Chaise", "Lampe", "Vase"]
            .iter()
            .map(|nom| DeleteTarget::Item(CatalogItem::new(*nom, ItemType::Collection)))
            .collect();

        let mut gate = DeleteGate::new(countdown);
        // (armed target index, seconds remaining)
        let mut model: Option<(usize, u32)> = None;

        for op in ops {
            match op {
                Op::Arm(i) => {
                    gate.arm(targets[i].clone());
                    model = Some((i, countdown));
                }
                Op::Tick => {
                    let left = gate.tick();
                    if let Some((_, remaining)) = model.as_mut() {
                        *remaining = remaining.saturating_sub(1);
                    }
                    prop_assert_eq!(left, model.map(|(_, r)| r));
                }
                Op::Cancel => {
                    gate.cancel();
                    model = None;
                }
                Op::Confirm => {
                    let confirmed = gate.confirm();
                    match model {
                        Some((i, 0)) => {
                            prop_assert_eq!(confirmed, Some(targets[i].clone()));
                            model = None;
                        }
                        _ => prop_assert_eq!(confirmed, None),
                    }
                }
            }

            prop_assert_eq!(gate.can_confirm(), matches!(model, Some((_, 0))));
            match model {
                None => prop_assert_eq!(gate.state(), &GateState::Closed),
                Some((i, remaining)) => prop_assert_eq!(
                    gate.state(),
                    &GateState::Armed { target: targets[i].clone(), seconds_remaining: remaining }
                ),
            }
            let progress = gate.progress();
            prop_assert!((0.0..=1.0).contains(&progress));
        }
    }
}
