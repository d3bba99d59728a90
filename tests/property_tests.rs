//! Property-based tests for tray allocation and identifier checks.

use proptest::prelude::*;
use stateset_intake::intake::{
    identifier::is_valid_imei, DeviceEntry, IdentifierKind, IntakeSession, TrayAllocator,
};

#[derive(Debug, Clone)]
enum Op {
    Scan,
    Remove(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Scan),
        1 => (0usize..200).prop_map(Op::Remove),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Whatever the add/remove history, devices sit in tray start + index / capacity.
    #[test]
    fn trays_always_follow_position(
        start in 1u32..500,
        capacity in 1usize..60,
        ops in prop::collection::vec(op_strategy(), 0..150),
    ) {
        let allocator = TrayAllocator::new("TRAY", capacity, start);
        let mut session = IntakeSession::new(IdentifierKind::Cellular, allocator, "prop");
        let mut next = 0usize;

        for op in ops {
            match op {
                Op::Scan => {
                    session.push(DeviceEntry::new(format!("{:015}", next))).unwrap();
                    next += 1;
                }
                Op::Remove(i) => {
                    let had = session.len();
                    let removed = session.remove(i).is_ok();
                    prop_assert_eq!(removed, i < had);
                }
            }
        }

        for (index, entry) in session.entries().iter().enumerate() {
            let expected = format!("TRAY{:03}", start + (index / capacity) as u32);
            prop_assert_eq!(&entry.tray, &expected);
        }
        let occupancy = session.tray_occupancy();
        prop_assert_eq!(occupancy.iter().map(|t| t.devices).sum::<usize>(), session.len());
        prop_assert!(occupancy.iter().all(|t| t.devices <= capacity));
    }

    #[test]
    fn fifteen_digits_are_valid_imeis(s in "[0-9]{15}") {
        prop_assert!(is_valid_imei(&s));
        let padded = format!(" {}\t", s);
        prop_assert!(IdentifierKind::Cellular.normalize(&padded).is_ok());
    }

    #[test]
    fn other_lengths_are_not(s in "[0-9]{0,14}|[0-9]{16,20}") {
        prop_assert!(!is_valid_imei(&s));
    }
}
