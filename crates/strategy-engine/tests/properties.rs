use proptest::prelude::*;

use strategy_engine::{
    build_profiles, decide, select_next, try_decide, Controller, Histories, Move,
    PeriodicForgiveness, RandomForgiveness,
};

fn arb_move() -> impl Strategy<Value = Move> {
    prop_oneof![Just(Move::Cooperate), Just(Move::Defect)]
}

/// Two synchronised histories of the same length.
fn arb_game(max_len: usize) -> impl Strategy<Value = (Vec<Move>, Vec<Move>)> {
    (0..=max_len).prop_flat_map(|n| {
        (
            prop::collection::vec(arb_move(), n),
            prop::collection::vec(arb_move(), n),
        )
    })
}

fn arb_histories() -> impl Strategy<Value = (Histories, Histories)> {
    prop::collection::btree_map(0u32..12, arb_game(60), 0..10).prop_map(|games| {
        let mut mine = Histories::new();
        let mut theirs = Histories::new();
        for (id, (m, t)) in games {
            mine.insert(id, m);
            theirs.insert(id, t);
        }
        (mine, theirs)
    })
}

proptest! {
    #[test]
    fn opening_move_always_cooperates(limit in proptest::option::of(1usize..500), seed in any::<u64>()) {
        let forgiver = RandomForgiveness::new(seed, 0, 20);
        prop_assert_eq!(decide(&[], &[], limit, &forgiver), Move::Cooperate);
    }

    #[test]
    fn last_round_always_defects((my, opp) in arb_game(80)) {
        prop_assume!(!my.is_empty());
        let forgiver = PeriodicForgiveness::new(5);
        prop_assert_eq!(decide(&my, &opp, Some(my.len() + 1), &forgiver), Move::Defect);
    }

    #[test]
    fn decisions_are_reproducible((my, opp) in arb_game(80), seed in any::<u64>()) {
        let a = RandomForgiveness::new(seed, 3, 20);
        let b = RandomForgiveness::new(seed, 3, 20);
        prop_assert_eq!(decide(&my, &opp, None, &a), decide(&my, &opp, None, &b));
        prop_assert!(try_decide(&my, &opp, None, &a).is_ok());
    }

    #[test]
    fn profiles_stay_in_range((mine, theirs) in arb_histories()) {
        let profiles = build_profiles(&mine, &theirs);
        prop_assert_eq!(profiles.len(), theirs.len());
        for (id, p) in &profiles {
            prop_assert!((0.0..=1.0).contains(&p.cooperation_rate));
            prop_assert!((0.0..=1.0).contains(&p.exploitability));
            prop_assert!((0.0..=1.0).contains(&p.stability));
            prop_assert!((0.0..=5.0).contains(&p.score_potential));
            prop_assert_eq!(p.rounds_played, mine[id].len());
        }
    }

    #[test]
    fn selection_picks_a_known_opponent((mine, theirs) in arb_histories(), current in 0u32..12) {
        let profiles = build_profiles(&mine, &theirs);
        let next = select_next(current, &profiles, &mine);
        prop_assert!(next == current || profiles.contains_key(&next));
    }

    #[test]
    fn controller_accepts_synchronised_histories((mine, theirs) in arb_histories(), current in 0u32..12) {
        let controller = Controller::default();
        let (chosen, next) = controller.try_play(current, &mine, &theirs).unwrap();
        prop_assert_eq!((chosen, next), controller.play(current, &mine, &theirs));
    }
}
