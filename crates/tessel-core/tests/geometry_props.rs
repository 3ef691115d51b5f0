use proptest::prelude::*;
use tessel_core::geometry::{Constraints, Rect, Size};
use tessel_core::terminal_info::{TerminalInfo, TerminalInfoCell};

fn constraints() -> impl Strategy<Value = Constraints> {
    (any::<u16>(), any::<u16>(), any::<u16>(), any::<u16>()).prop_map(|(a, b, c, d)| {
        Constraints::new(a.min(b), a.max(b), c.min(d), c.max(d))
    })
}

proptest! {
    #[test]
    fn constrain_lands_inside_bounds(c in constraints(), w in any::<u16>(), h in any::<u16>()) {
        let size = c.constrain(Size::new(w, h));
        prop_assert!(size.width >= c.min_width && size.width <= c.max_width);
        prop_assert!(size.height >= c.min_height && size.height <= c.max_height);
    }

    #[test]
    fn constrain_is_idempotent(c in constraints(), w in any::<u16>(), h in any::<u16>()) {
        let once = c.constrain(Size::new(w, h));
        prop_assert_eq!(c.constrain(once), once);
    }

    #[test]
    fn shrink_keeps_bounds_ordered(c in constraints(), dw in any::<u16>(), dh in any::<u16>()) {
        let shrunk = c.shrink(dw, dh);
        prop_assert!(shrunk.min_width <= shrunk.max_width);
        prop_assert!(shrunk.min_height <= shrunk.max_height);
        prop_assert!(shrunk.max_width <= c.max_width);
        prop_assert!(shrunk.max_height <= c.max_height);
    }

    #[test]
    fn intersection_is_contained_in_both(
        a in (0u16..200, 0u16..200, 0u16..200, 0u16..200),
        b in (0u16..200, 0u16..200, 0u16..200, 0u16..200),
    ) {
        let a = Rect::new(a.0, a.1, a.2, a.3);
        let b = Rect::new(b.0, b.1, b.2, b.3);
        let i = a.intersection(&b);
        if !i.is_empty() {
            prop_assert!(a.contains(i.x, i.y) && b.contains(i.x, i.y));
            prop_assert!(i.right() <= a.right() && i.right() <= b.right());
            prop_assert!(i.bottom() <= a.bottom() && i.bottom() <= b.bottom());
        }
    }

    #[test]
    fn terminal_info_cell_round_trips(w in any::<u16>(), h in any::<u16>()) {
        let cell = TerminalInfoCell::default();
        cell.publish(TerminalInfo::new(w, h));
        prop_assert_eq!(cell.load(), TerminalInfo::new(w, h));
    }
}
