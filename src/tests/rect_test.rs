///
/// @package filet-rs
///
/// @file Rect tests
/// @copyright 2025-present Christoph Kappel <christoph@unexist.dev>
/// @version $Id$
///
/// This program can be distributed under the terms of the GNU GPLv3.
/// See the file LICENSE for details.
///

use proptest::prelude::*;
use crate::rect::Rect;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]
    #[test]
    fn should_create_rect(x: i16, y: i16, width: u16, height: u16) {
        let rect = Rect::from((i32::from(x), i32::from(y), i32::from(width), i32::from(height)));

        assert_eq!(rect.x, i32::from(x));
        assert_eq!(rect.y, i32::from(y));
        assert_eq!(rect.right(), i32::from(x) + i32::from(width));
        assert_eq!(rect.bottom(), i32::from(y) + i32::from(height));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]
    #[test]
    fn should_contain_point(x in any::<i16>(), y in any::<i16>(), width in 10i32..1000, height in 10i32..1000) {
        let rect = Rect::from((i32::from(x), i32::from(y), width, height));

        assert!(rect.contains_point(rect.x + 5, rect.y + 5));
    }
}

#[test]
fn should_exclude_right_and_bottom_edge() {
    let rect = Rect::from((0, 0, 100, 50));

    assert!(rect.contains_point(0, 0));
    assert!(rect.contains_point(99, 49));
    assert!(!rect.contains_point(100, 10));
    assert!(!rect.contains_point(10, 50));
    assert!(!rect.contains_point(-1, 10));
}
