use auxlist_graph::*;
use auxlist_test_utils::*;
use proptest::prelude::*;

#[test]
fn test_four_node_scenario_round_trips_in_memory() {
    let f = four_node_scenario();
    let records = linearize(&f.arena, f.head).unwrap();
    assert_eq!(records.len(), 4);

    let mut arena = NodeArena::new();
    let head = reconstruct(&mut arena, records).unwrap();
    let n = handles(&arena, head);

    assert_eq!(arena[n[0]].previous(), None);
    assert_eq!(arena[n[1]].previous(), Some(n[0]));
    assert_eq!(arena[n[2]].previous(), Some(n[1]));
    assert_eq!(arena[n[3]].previous(), Some(n[2]));

    assert_eq!(arena[n[0]].next(), Some(n[1]));
    assert_eq!(arena[n[3]].next(), None);

    assert_eq!(arena[n[0]].auxiliary(), Some(n[2]));
    assert_eq!(arena[n[1]].auxiliary(), Some(n[0]));
    assert_eq!(arena[n[2]].auxiliary(), Some(n[0]));
    assert_eq!(arena[n[3]].auxiliary(), None);

    let data: Vec<_> = n.iter().map(|id| arena[*id].data()).collect();
    assert_eq!(
        data,
        vec![Some("first"), Some("second"), Some("third"), Some("fourth")]
    );
}

#[test]
fn test_four_node_scenario_deep_copy() {
    let mut f = four_node_scenario();
    let source = f.clone();
    let copy_head = deep_copy(&mut f.arena, f.head).unwrap();

    assert_disjoint(&source, &f.arena, copy_head);
    assert_reproduces(&source, &f.arena, copy_head);

    let n = handles(&f.arena, copy_head);
    assert_eq!(f.arena[n[0]].auxiliary(), Some(n[2]));
    assert_eq!(f.arena[n[3]].previous(), Some(n[2]));
}

#[test]
fn test_self_loop_round_trips() {
    let f = self_loop();
    let mut arena = NodeArena::new();
    let head = reconstruct(&mut arena, linearize(&f.arena, f.head).unwrap()).unwrap();
    assert_eq!(arena.len(), 1);
    assert_eq!(arena[head].auxiliary(), Some(head));
    assert_eq!(arena[head].next(), None);
    assert_eq!(arena[head].previous(), None);
}

#[test]
fn test_chain_without_auxiliaries_keeps_them_absent() {
    let f = plain_chain(5);
    let records = linearize(&f.arena, f.head).unwrap();
    assert!(records.iter().all(|r| r.auxiliary_id.is_none()));

    let mut arena = NodeArena::new();
    let head = reconstruct(&mut arena, records).unwrap();
    assert!(handles(&arena, head)
        .iter()
        .all(|id| arena[*id].auxiliary().is_none()));
}

#[test]
fn test_deep_copy_matches_round_trip() {
    let mut f = random_chain(200, 11);
    let source = f.clone();

    let mut rebuilt = NodeArena::new();
    let rebuilt_head =
        reconstruct(&mut rebuilt, linearize(&source.arena, source.head).unwrap()).unwrap();
    let copy_head = deep_copy(&mut f.arena, f.head).unwrap();

    assert_eq!(
        structurally_equivalent(&rebuilt, rebuilt_head, &f.arena, copy_head),
        Ok(())
    );
}

#[test]
fn test_copy_of_copy_is_equivalent() {
    let f = sparse_random_chain(64, 5, 0.5);
    let mut middle = NodeArena::new();
    let middle_head = deep_copy_into(&f.arena, f.head, &mut middle).unwrap();
    let mut last = NodeArena::new();
    let last_head = deep_copy_into(&middle, middle_head, &mut last).unwrap();
    assert_reproduces(&f, &last, last_head);
}

#[test]
fn test_unresolved_reference_is_surfaced() {
    let f = plain_chain(3);
    let mut records = linearize(&f.arena, f.head).unwrap();
    records[1].auxiliary_id = Some(IdentityToken::from_u128(u128::MAX));

    let mut arena = NodeArena::new();
    let err = reconstruct(&mut arena, records).unwrap_err();
    assert!(err.is_unresolved_reference());
    assert!(arena.is_empty());
}

#[test]
fn test_reconstruct_appends_after_existing_nodes() {
    let f = four_node_scenario();
    let mut arena = f.arena.clone();
    let head = reconstruct(&mut arena, linearize(&f.arena, f.head).unwrap()).unwrap();
    assert_eq!(arena.len(), 8);
    assert_disjoint(&f, &arena, head);
    assert_reproduces(&f, &arena, head);
}

proptest! {
    #[test]
    fn prop_round_trip_preserves_structure(
        len in 1..80usize,
        seed in any::<u64>(),
        density in 0.0..=1.0f64,
    ) {
        let f = sparse_random_chain(len, seed, density);
        let mut arena = NodeArena::new();
        let head = reconstruct(&mut arena, linearize(&f.arena, f.head).unwrap()).unwrap();
        prop_assert_eq!(structurally_equivalent(&f.arena, f.head, &arena, head), Ok(()));

        let last = *handles(&arena, head).last().unwrap();
        prop_assert_eq!(arena[last].next(), None);
        prop_assert_eq!(arena[head].previous(), None);
    }

    #[test]
    fn prop_deep_copy_is_disjoint_and_equivalent(len in 1..80usize, seed in any::<u64>()) {
        let mut f = random_chain(len, seed);
        let source = f.clone();
        let copy_head = deep_copy(&mut f.arena, f.head).unwrap();
        let copy = handles(&f.arena, copy_head);
        prop_assert!(copy.iter().all(|id| !source.nodes.contains(id)));
        prop_assert_eq!(
            structurally_equivalent(&source.arena, source.head, &f.arena, copy_head),
            Ok(())
        );
    }

    #[test]
    fn prop_identity_assignment_is_stable(len in 1..60usize, seed in any::<u64>()) {
        let f = random_chain(len, seed);
        let first = linearize(&f.arena, f.head).unwrap();
        let second: Vec<_> = Linearizer::new(&f.arena, f.head, SequentialTokens::new())
            .unwrap()
            .collect();
        prop_assert_eq!(alias_pattern(&first), alias_pattern(&second));
        prop_assert!(alias_pattern(&first).iter().all(|slot| !matches!(slot, Some(None))));
    }
}
