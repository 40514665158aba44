//! Property-based invariant tests for geometry and the spring integrator.
//!
//! 1. Rounding is idempotent and always yields integral coordinates
//! 2. Rounding moves each axis by at most half a unit
//! 3. A negative inset contains the original rectangle
//! 4. Intersection is symmetric
//! 5. An attachment spring always settles exactly onto an integral target

use std::time::Duration;

use proptest::prelude::*;
use wavegrid_core::{Point, Rect, Spring};

fn coord() -> impl Strategy<Value = f64> {
    -10_000.0f64..10_000.0
}

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (coord(), coord(), 0.0f64..2_000.0, 0.0f64..2_000.0)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

proptest! {
    #[test]
    fn rounding_is_idempotent(x in coord(), y in coord()) {
        let once = Point::new(x, y).rounded();
        prop_assert_eq!(once.rounded(), once);
        prop_assert!(once.is_integral());
    }

    #[test]
    fn rounding_moves_less_than_half_unit(x in coord(), y in coord()) {
        let p = Point::new(x, y);
        let r = p.rounded();
        prop_assert!((r.x - p.x).abs() <= 0.5);
        prop_assert!((r.y - p.y).abs() <= 0.5);
    }

    #[test]
    fn buffered_rect_contains_original(r in rect_strategy(), margin in 0.0f64..500.0) {
        let b = r.inset_by(-margin, -margin);
        prop_assert!(b.x <= r.x && b.y <= r.y);
        prop_assert!(b.right() >= r.right() && b.bottom() >= r.bottom());
    }

    #[test]
    fn intersection_is_symmetric(a in rect_strategy(), b in rect_strategy()) {
        prop_assert_eq!(a.intersects(&b), b.intersects(&a));
    }

    #[test]
    fn attachment_spring_settles_integral(start in coord(), offset in -50.0f64..50.0) {
        let target = start.round();
        let mut spring = Spring::from_oscillation(target + offset, target, 1.0, 0.8);
        for _ in 0..(60 * 20) {
            spring.advance(Duration::from_millis(16));
        }
        prop_assert!(spring.is_at_rest());
        prop_assert_eq!(spring.position(), target);
    }
}
