//! Property-based tests for the arrow algebra and its interpreters

use kleisli::prelude::*;
use proptest::prelude::*;

type A = Arrow<i64, i64, String>;

#[derive(Clone, Debug)]
enum Link {
    Add(i64),
    Mul(i64),
    FailAbove(i64),
    Bind(i64),
    Id,
}

fn link_strategy() -> impl Strategy<Value = Link> {
    prop_oneof![
        (-100i64..100).prop_map(Link::Add),
        (-3i64..4).prop_map(Link::Mul),
        (0i64..10_000).prop_map(Link::FailAbove),
        (-100i64..100).prop_map(Link::Bind),
        Just(Link::Id),
    ]
}

fn to_arrow(link: &Link) -> A {
    match *link {
        Link::Add(n) => lift_pure(move |x: i64| x.wrapping_add(n)),
        Link::Mul(n) => lift_pure(move |x: i64| x.wrapping_mul(n)),
        Link::FailAbove(limit) => arr(move |x: i64| {
            if x > limit {
                Err(format!("{} above {}", x, limit))
            } else {
                Ok(x)
            }
        }),
        Link::Bind(n) => id().flat_map(move |a: i64| lift_pure(move |x: i64| a.wrapping_add(x).wrapping_add(n))),
        Link::Id => id(),
    }
}

fn build(links: &[Link]) -> A {
    links
        .iter()
        .fold(id(), |acc, link| acc.and_then(to_arrow(link)))
}

fn reference(links: &[Link], input: i64) -> Result<i64, String> {
    links.iter().try_fold(input, |x, link| match *link {
        Link::Add(n) => Ok(x.wrapping_add(n)),
        Link::Mul(n) => Ok(x.wrapping_mul(n)),
        Link::FailAbove(limit) if x > limit => Err(format!("{} above {}", x, limit)),
        Link::FailAbove(_) => Ok(x),
        Link::Bind(n) => Ok(x.wrapping_add(x).wrapping_add(n)),
        Link::Id => Ok(x),
    })
}

fn stepped(arrow: &A, input: i64) -> Result<i64, String> {
    let mut steppable = arrow.to_steppable(input);
    while steppable.has_more_steps() {
        steppable = steppable.run_step();
    }
    steppable.get_result().expect("no steps remain")
}

proptest! {
    #[test]
    fn prop_run_matches_reference(
        links in prop::collection::vec(link_strategy(), 0..20),
        input in -1_000i64..1_000
    ) {
        prop_assert_eq!(build(&links).run(input), reference(&links, input));
    }

    #[test]
    fn prop_left_identity(link in link_strategy(), input in any::<i64>()) {
        let f = to_arrow(&link);
        prop_assert_eq!(id().and_then(f.clone()).run(input), f.run(input));
    }

    #[test]
    fn prop_right_identity(link in link_strategy(), input in any::<i64>()) {
        let f = to_arrow(&link);
        prop_assert_eq!(f.clone().and_then(id()).run(input), f.run(input));
    }

    #[test]
    fn prop_and_then_is_associative(
        f in link_strategy(),
        g in link_strategy(),
        h in link_strategy(),
        input in -1_000i64..1_000
    ) {
        let (f, g, h) = (to_arrow(&f), to_arrow(&g), to_arrow(&h));
        let left = f.clone().and_then(g.clone()).and_then(h.clone());
        let right = f.and_then(g.and_then(h));
        prop_assert_eq!(left.run(input), right.run(input));
    }

    #[test]
    fn prop_stepping_matches_direct_run(
        links in prop::collection::vec(link_strategy(), 0..20),
        input in -1_000i64..1_000
    ) {
        let arrow = build(&links);
        prop_assert_eq!(stepped(&arrow, input), arrow.run(input));
    }

    #[test]
    fn prop_fiber_matches_direct_run(
        links in prop::collection::vec(link_strategy(), 0..20),
        input in -1_000i64..1_000
    ) {
        let arrow = build(&links);
        let finished = arrow.to_fiber().start(input).run();
        prop_assert_eq!(finished.into_result(), arrow.run(input));
    }

    #[test]
    fn prop_flat_map_chain_steps_like_run(
        offsets in prop::collection::vec(-50i64..50, 1..20),
        input in -1_000i64..1_000
    ) {
        let mut arrow: A = lift_pure(|x: i64| x + 1);
        for n in offsets {
            arrow = arrow.flat_map(move |a: i64| lift_pure(move |x: i64| a + x + n));
        }
        prop_assert_eq!(stepped(&arrow, input), arrow.run(input));
    }

    #[test]
    fn prop_failure_short_circuits(
        before in prop::collection::vec(link_strategy(), 0..5),
        input in -1_000i64..1_000
    ) {
        let tail_probe = kleisli::testing::CallProbe::new();
        let counted = tail_probe.clone();
        let arrow = build(&before)
            .and_then(arr(|_: i64| Err::<i64, _>("stop".to_string())))
            .and_then(lift_pure(move |x: i64| {
                counted.hit();
                x
            }));

        prop_assert!(arrow.run(input).is_err());
        prop_assert!(stepped(&arrow, input).is_err());
        prop_assert_eq!(tail_probe.count(), 0);
    }

    #[test]
    fn prop_runtime_completes_every_fiber(
        inputs in prop::collection::vec(-1_000i64..1_000, 1..10),
        steps in 1usize..5
    ) {
        let links = vec![Link::Add(1), Link::Bind(2), Link::Mul(2), Link::Add(-3)];
        let arrow = build(&links);

        let mut runtime = Runtime::with_config(RuntimeConfig::default().with_steps_per_turn(steps));
        let ids: Vec<_> = inputs.iter().map(|&input| runtime.spawn(&arrow, input)).collect();
        let mut finished = runtime.run_all();
        finished.sort_by_key(|(id, _)| *id);

        prop_assert_eq!(finished.len(), inputs.len());
        for ((id, result), (expected_id, &input)) in finished.into_iter().zip(ids.into_iter().zip(&inputs)) {
            prop_assert_eq!(id, expected_id);
            prop_assert_eq!(result, reference(&links, input));
        }
    }
}
