///
/// @package filet-rs
///
/// @file Size hints tests
/// @copyright 2025-present Christoph Kappel <christoph@unexist.dev>
/// @version $Id$
///
/// This program can be distributed under the terms of the GNU GPLv3.
/// See the file LICENSE for details.
///

use proptest::prelude::*;
use crate::monitor::Monitor;
use crate::rect::Rect;
use crate::size_hints::{self, Bounds, Constraint, SizeHints, P_ASPECT, P_MIN_SIZE, P_RESIZE_INC};

fn monitors() -> Vec<Monitor> {
    vec![Monitor {
        is_primary: true,
        ..Monitor::new(Rect::from((0, 0, 1920, 1080)), 0.6, 1)
    }]
}

fn bounds(monitors: &[Monitor]) -> Bounds<'_> {
    Bounds {
        screen_width: 1920,
        screen_height: 1080,
        monitors,
        snap: 8,
        top_bar: true,
        bar_height: 0,
    }
}

fn constraint(hints: SizeHints, floating: bool, fullscreen: bool) -> Constraint {
    Constraint { hints, border_width: 0, floating, fullscreen }
}

#[test]
fn should_keep_aspect() {
    let monitors = monitors();
    let hints = SizeHints { min_aspect: 1.0, max_aspect: 1.0, ..SizeHints::default() };

    let constrained = size_hints::constrain(&constraint(hints, false, false),
        Rect::from((100, 100, 300, 100)), &bounds(&monitors));

    assert_eq!(constrained.geom, Rect::from((100, 100, 100, 100)));
    assert_eq!(constrained.floating, None);
}

#[test]
fn should_apply_increments_only_when_floating() {
    let monitors = monitors();
    let hints = SizeHints { inc_width: 10, inc_height: 20, ..SizeHints::default() };
    let candidate = Rect::from((100, 100, 305, 110));

    let floating = size_hints::constrain(&constraint(hints, true, false), candidate, &bounds(&monitors));
    let tiled = size_hints::constrain(&constraint(hints, false, false), candidate, &bounds(&monitors));

    assert_eq!(floating.geom, Rect::from((100, 100, 300, 100)));
    assert_eq!(floating.floating, Some(candidate));
    assert_eq!(tiled.geom, candidate);
}

#[test]
fn should_ignore_limits_in_fullscreen() {
    let monitors = monitors();
    let hints = SizeHints { max_width: 200, max_height: 200, ..SizeHints::default() };
    let candidate = Rect::from((0, 0, 1920, 1080));

    let constrained = size_hints::constrain(&constraint(hints, true, true), candidate, &bounds(&monitors));

    assert_eq!(constrained.geom, candidate);
}

#[test]
fn should_snap_to_monitor_edges() {
    let monitors = monitors();
    let candidate = Rect::from((5, 4, 1914, 1074));

    let constrained = size_hints::constrain(&constraint(SizeHints::default(), true, false),
        candidate, &bounds(&monitors));

    assert_eq!(constrained.geom, Rect::from((0, 0, 1920, 1080)));
    assert_eq!(constrained.floating, Some(candidate));
}

#[test]
fn should_parse_normal_hints() {
    let mut values = [0u32; 18];

    values[0] = P_MIN_SIZE | P_RESIZE_INC | P_ASPECT;
    values[5] = 50;
    values[6] = 60;
    values[9] = 8;
    values[10] = 16;
    values[11] = 1;
    values[12] = 2;
    values[13] = 3;
    values[14] = 1;

    let hints = SizeHints::from_wm_normal_hints(&values);

    assert_eq!((hints.min_width, hints.min_height), (50, 60));
    assert_eq!((hints.inc_width, hints.inc_height), (8, 16));
    assert_eq!(hints.min_aspect, 2.0);
    assert_eq!(hints.max_aspect, 3.0);
    assert!(hints.has_aspect());
}

#[test]
fn should_tolerate_short_hints() {
    assert_eq!(SizeHints::from_wm_normal_hints(&[]), SizeHints::default());
    assert_eq!(SizeHints::from_wm_normal_hints(&[P_MIN_SIZE]), SizeHints::default());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]
    #[test]
    fn should_stay_reachable(x in -5000i32..5000, y in -5000i32..5000, width in 1i32..3000, height in 1i32..3000) {
        let monitors = monitors();

        let constrained = size_hints::constrain(&constraint(SizeHints::default(), false, false),
            Rect::from((x, y, width, height)), &bounds(&monitors));

        let geom = constrained.geom;

        assert!(0 < geom.width && 0 < geom.height);
        assert!(geom.right() >= 1 && geom.x <= 1919);
        assert!(geom.bottom() >= 1 && geom.y <= 1079);
    }
}

fn gapped_monitors() -> Vec<Monitor> {
    vec![
        Monitor { is_primary: true, ..Monitor::new(Rect::from((0, 0, 1280, 1024)), 0.6, 1) },
        Monitor::new(Rect::from((1400, 0, 1920, 1080)), 0.6, 1),
        Monitor::new(Rect::from((3400, 100, 1024, 768)), 0.6, 1),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]
    #[test]
    fn should_snap_only_to_monitor_edges(x in -100i32..4500, y in -100i32..1100, width in 20i32..2500,
                                         height in 20i32..1100, border_width in 0i32..4)
    {
        let monitors = gapped_monitors();
        let bounds = Bounds {
            screen_width: 4424,
            screen_height: 1080,
            monitors: &monitors,
            snap: 8,
            top_bar: true,
            bar_height: 18,
        };

        let constrained = size_hints::constrain(&Constraint {
            hints: SizeHints::default(),
            border_width,
            floating: true,
            fullscreen: false,
        }, Rect::from((x, y, width, height)), &bounds);

        let before = constrained.floating.expect("Floating geometry missing");
        let geom = constrained.geom;

        let lefts: Vec<i32> = monitors.iter().map(|mon| mon.geom.x).collect();
        let rights: Vec<i32> = monitors.iter().map(|mon| mon.geom.right()).collect();
        let tops: Vec<i32> = monitors.iter()
            .map(|mon| if mon.is_primary { mon.geom.y + 18 } else { mon.geom.y })
            .collect();
        let bottoms: Vec<i32> = monitors.iter().map(|mon| mon.geom.bottom()).collect();

        // Every edge either stays or lands on a monitor edge within reach
        assert!(geom.x == before.x || (lefts.contains(&geom.x) && (geom.x - before.x).abs() < 8));
        assert!(geom.y == before.y || (tops.contains(&geom.y) && (geom.y - before.y).abs() < 8));
        assert!(geom.width == before.width || rights.contains(&(geom.right() + 2 * border_width)));
        assert!(geom.height == before.height || bottoms.contains(&(geom.bottom() + 2 * border_width)));
        assert!(0 < geom.width && 0 < geom.height);
    }
}
