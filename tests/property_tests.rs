use proptest::prelude::*;
use tapzone::adaptive::{PerformanceTracker, RadiusController};
use tapzone::geometry::{Magnifier, Point};
use tapzone::resolver::resolve;
use tapzone::targets::{Target, TargetLayout, TargetSet, Viewport};

// --- STRATEGIES ---

prop_compose! {
    fn arb_point()(x in -2000.0..2000.0f32, y in -2000.0..2000.0f32) -> Point {
        Point::new(x, y)
    }
}

prop_compose! {
    fn arb_magnifier()(
        center in arb_point(),
        scale in 0.5..8.0f32,
        radius in 10.0..300.0f32
    ) -> Magnifier {
        Magnifier::new(center, scale, radius)
    }
}

prop_compose! {
    fn arb_targets()(
        points in proptest::collection::vec(arb_point(), 1..40),
        radius in 20.0..150.0f32
    ) -> Vec<Target> {
        points
            .into_iter()
            .enumerate()
            .map(|(i, p)| Target::new(i, p, radius))
            .collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn test_radius_stays_in_bounds(
        current in 20.0..150.0f32,
        mean_distance in 0.0..5000.0f32,
        success in any::<bool>(),
        density in 0.0..50.0f32,
        rate in 0.0..=1.0f32
    ) {
        let c = RadiusController::default();
        let r = c.update_radius(current, mean_distance, success, density, rate);
        prop_assert!((20.0..=150.0).contains(&r), "radius {} escaped bounds", r);
    }

    #[test]
    fn test_success_never_grows_failure_never_shrinks(
        current in 20.0..150.0f32,
        mean_distance in 0.0..500.0f32,
        density in 0.0..50.0f32,
        rate in 0.0..=1.0f32
    ) {
        let c = RadiusController::default();
        prop_assert!(c.update_radius(current, mean_distance, true, density, rate) <= current);
        prop_assert!(c.update_radius(current, mean_distance, false, density, rate) >= current);
    }

    #[test]
    fn test_success_rate_stays_in_unit_interval(
        outcomes in proptest::collection::vec((0usize..5, 0.0..300.0f32, any::<bool>()), 1..200)
    ) {
        let mut tracker = PerformanceTracker::new();
        for (i, &(region, distance, success)) in outcomes.iter().enumerate() {
            let stats = tracker.record_attempt(i % 7, region, distance, success);
            prop_assert!((0.0..=1.0).contains(&stats.updated_success_rate));
        }
        for region in 0..5 {
            let rate = tracker.region_success_rate(region);
            prop_assert!((0.0..=1.0).contains(&rate));
        }
        prop_assert_eq!(tracker.attempts(), outcomes.len());
    }

    #[test]
    fn test_magnifier_inverse_undoes_forward(zoom in arb_magnifier(), p in arb_point()) {
        let back = zoom.inverse(zoom.forward(p));
        let tolerance = 0.05 * (1.0 + p.x.abs().max(p.y.abs()) / 1000.0);
        prop_assert!((back.x - p.x).abs() < tolerance, "{:?} -> {:?}", p, back);
        prop_assert!((back.y - p.y).abs() < tolerance, "{:?} -> {:?}", p, back);
    }

    #[test]
    fn test_resolver_picks_a_nearest_target(targets in arb_targets(), pointer in arb_point()) {
        let res = resolve(pointer, &targets).unwrap();
        let best = targets
            .iter()
            .map(|t| t.position.distance_to(pointer))
            .fold(f32::INFINITY, f32::min);
        prop_assert_eq!(res.distance, best);
        prop_assert!(targets[..res.position]
            .iter()
            .all(|t| t.position.distance_to(pointer) > best));
        prop_assert_eq!(res.within_radius, res.distance <= targets[res.position].hit_radius());
    }

    #[test]
    fn test_generated_targets_stay_inside_padding(
        seed in any::<u64>(),
        count in 0usize..120,
        uniform in any::<bool>()
    ) {
        let layout = if uniform { TargetLayout::Uniform } else { TargetLayout::PriceSeries };
        let mut rng = fastrand::Rng::with_seed(seed);
        let set = TargetSet::generate(&mut rng, layout, count, Viewport::new(1080.0, 1920.0), 50.0, 30.0);
        prop_assert_eq!(set.len(), count);
        for (i, t) in set.iter().enumerate() {
            prop_assert_eq!(t.index, i);
            prop_assert_eq!(t.hit_radius(), 30.0);
            prop_assert!(t.position.x >= 49.9 && t.position.x <= 1030.1);
            prop_assert!(t.position.y >= 49.9 && t.position.y <= 1870.1);
        }
    }
}
