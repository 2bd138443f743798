//! Property tests for the contact filter and rule classification.
//!
//! Every fixture-type pairing is drawn at random, on distinct or shared
//! entities, and checked for symmetry and coverage.

use proptest::prelude::*;
use tangent_contacts::prelude::*;
use tangent_world::prelude::*;

fn fixture_type() -> impl Strategy<Value = FixtureType> {
    (0..FixtureType::ALL.len()).prop_map(|i| FixtureType::ALL[i])
}

fn id(entity: u32, index: u16) -> FixtureId {
    FixtureId::new(EntityId::new(entity, 0), index)
}

fn unit(fixture_type: FixtureType) -> Fixture {
    Fixture::new(fixture_type, Rect::new(0.0, 0.0, 1.0, 1.0))
}

proptest! {
    #![proptest_config(ProptestConfig {
        max_global_rejects: 65_536,
        ..ProptestConfig::with_cases(1_000)
    })]

    #[test]
    fn filter_is_symmetric(a in fixture_type(), b in fixture_type(), ea in 0..4u32, eb in 0..4u32) {
        let filter = ContactFilter::new();
        let body = Body::default();
        let (fa, fb) = (unit(a), unit(b));
        let va = FixtureRef::new(id(ea, 0), &fa, &body);
        let vb = FixtureRef::new(id(eb, 1), &fb, &body);
        prop_assert_eq!(filter.filter(va, vb), filter.filter(vb, va));
        if ea == eb {
            prop_assert!(!filter.filter(va, vb));
        }
    }

    #[test]
    fn classification_ignores_argument_order(a in fixture_type(), b in fixture_type()) {
        let (ia, ib) = (id(1, 0), id(2, 0));
        let forward = classify((ia, a), (ib, b));
        let backward = classify((ib, b), (ia, a));
        prop_assert_eq!(forward.map(|m| m.kind), backward.map(|m| m.kind));
        if a != b {
            if let (Some(f), Some(r)) = (forward, backward) {
                prop_assert_eq!((f.first, f.second), (r.first, r.second));
            }
        }
    }

    #[test]
    fn table_pairs_always_have_a_rule(a in fixture_type(), b in fixture_type()) {
        let filter = ContactFilter::new();
        prop_assume!(filter.table_allows(a, b));
        prop_assert!(classify((id(1, 0), a), (id(2, 0), b)).is_some());
    }

    #[test]
    fn consumer_always_takes_the_contact(other in fixture_type()) {
        let matched = classify((id(1, 0), other), (id(2, 0), FixtureType::Consumer));
        let matched = matched.expect("consumer matches everything");
        prop_assert_eq!(matched.kind, RuleKind::Consumer);
        if other != FixtureType::Consumer {
            prop_assert_eq!(matched.first, id(2, 0));
        }
    }
}
