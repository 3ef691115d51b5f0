use proptest::prelude::*;
use tessel_core::geometry::Rect;
use tessel_render::canvas::Canvas;
use tessel_render::display_width;
use tessel_style::{ColorProfile, Style};

fn text() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            Just('a'),
            Just('Z'),
            Just(' '),
            Just('日'),
            Just('é'),
            Just('\u{301}'),
        ],
        0..24,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #[test]
    fn region_writes_stay_inside_region(
        width in 1u16..20,
        height in 1u16..6,
        rect in (0u16..20, 0u16..6, 0u16..20, 0u16..6),
        x in 0u16..10,
        s in text(),
    ) {
        let mut canvas = Canvas::new(width, height);
        let area = Rect::new(rect.0, rect.1, rect.2, rect.3);
        canvas.region(area).write(x, 0, &s, Style::new().bold());

        for cy in 0..height {
            for cx in 0..width {
                let cell = canvas.get(cx, cy).unwrap();
                if !area.contains(cx, cy) {
                    prop_assert!(cell.is_blank(), "painted outside at ({cx}, {cy})");
                }
            }
        }
    }

    #[test]
    fn plain_encoding_matches_row_text(width in 1u16..30, s in text()) {
        let mut canvas = Canvas::new(width, 1);
        canvas.write(0, 0, &s, Style::NONE);
        prop_assert_eq!(canvas.encode_row(0, ColorProfile::TrueColor), canvas.row_text(0));
        prop_assert!(display_width(&canvas.row_text(0)) <= width as usize);
    }

    #[test]
    fn advance_matches_display_width(s in text()) {
        let mut canvas = Canvas::new(0, 0);
        let advanced = canvas.write(0, 0, &s, Style::NONE);
        prop_assert_eq!(advanced as usize, display_width(&s));
    }
}
