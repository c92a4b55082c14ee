use crate::config::ErrmsgConfig;
use crate::message::WorldAnchor;
use crate::services::{MainView, ScreenPoint};

/// Where a freshly laid out popup of `size` goes.
///
/// Without an anchor the popup is centred. A plain popup moves to the
/// screen quadrant opposite the anchor so the spot stays visible; a popup
/// with a company face sits on top of the anchor instead, kept between the
/// toolbar and the status bar.
pub fn initial_position(
    view: &dyn MainView,
    config: &ErrmsgConfig,
    anchor: Option<WorldAnchor>,
    has_face: bool,
    size: (i32, i32),
) -> ScreenPoint {
    let (screen_width, screen_height) = view.screen_size();
    let (width, height) = size;

    let Some(point) = anchor.and_then(|anchor| view.project(anchor)) else {
        return ScreenPoint {
            x: (screen_width - width) / 2,
            y: (screen_height - height) / 2,
        };
    };

    let scr_top = view.main_view_top() + config.bar_clearance;
    let scr_bot = view.main_view_bottom() - config.bar_clearance;

    if !has_face {
        let x = if point.x < screen_width / 2 {
            screen_width - width - config.edge_margin
        } else {
            config.edge_margin
        };
        let y = if point.y < screen_height / 2 {
            scr_bot - height
        } else {
            scr_top
        };
        return ScreenPoint { x, y };
    }

    ScreenPoint {
        x: clamp_high_wins(point.x - width / 2, 0, screen_width - width),
        y: clamp_high_wins(point.y - height / 2, scr_top, scr_bot - height),
    }
}

// `i32::clamp` panics when the range is inverted, which happens on screens
// smaller than the popup. The upper bound wins there.
fn clamp_high_wins(value: i32, low: i32, high: i32) -> i32 {
    value.max(low).min(high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeView;

    const SIZE: (i32, i32) = (200, 100);

    fn view_with_point(x: i32, y: i32) -> FakeView {
        let mut view = FakeView::new(1000, 800);
        view.projected = Some(ScreenPoint { x, y });
        view
    }

    fn anchor() -> Option<WorldAnchor> {
        Some(WorldAnchor { x: 5, y: 5 })
    }

    #[test]
    fn no_anchor_centres_on_screen() {
        let view = view_with_point(10, 10);
        let pos = initial_position(&view, &ErrmsgConfig::default(), None, false, SIZE);
        assert_eq!(pos, ScreenPoint { x: 400, y: 350 });
    }

    #[test]
    fn failed_projection_centres_on_screen() {
        let mut view = FakeView::new(1000, 800);
        view.projected = None;
        let pos = initial_position(&view, &ErrmsgConfig::default(), anchor(), false, SIZE);
        assert_eq!(pos, ScreenPoint { x: 400, y: 350 });
    }

    #[test]
    fn top_left_anchor_sends_popup_bottom_right() {
        let view = view_with_point(100, 100);
        let config = ErrmsgConfig::default();
        let pos = initial_position(&view, &config, anchor(), false, SIZE);

        assert_eq!(pos.x, 1000 - 200 - config.edge_margin);
        assert_eq!(pos.y, view.bottom - config.bar_clearance - 100);
    }

    #[test]
    fn bottom_right_anchor_sends_popup_top_left() {
        let view = view_with_point(900, 700);
        let config = ErrmsgConfig::default();
        let pos = initial_position(&view, &config, anchor(), false, SIZE);

        assert_eq!(pos.x, config.edge_margin);
        assert_eq!(pos.y, view.top + config.bar_clearance);
    }

    #[test]
    fn face_popup_centres_on_anchor() {
        let view = view_with_point(500, 400);
        let pos = initial_position(&view, &ErrmsgConfig::default(), anchor(), true, SIZE);
        assert_eq!(pos, ScreenPoint { x: 400, y: 350 });
    }

    #[test]
    fn face_popup_is_clamped_inside_bars_and_screen() {
        let config = ErrmsgConfig::default();

        let near_corner = view_with_point(5, 5);
        let pos = initial_position(&near_corner, &config, anchor(), true, SIZE);
        assert_eq!(pos.x, 0);
        assert_eq!(pos.y, near_corner.top + config.bar_clearance);

        let far_corner = view_with_point(995, 795);
        let pos = initial_position(&far_corner, &config, anchor(), true, SIZE);
        assert_eq!(pos.x, 800);
        assert_eq!(pos.y, far_corner.bottom - config.bar_clearance - 100);
    }

    #[test]
    fn face_popup_on_tiny_screen_keeps_bottom_bound() {
        let mut view = FakeView::new(100, 120);
        view.projected = Some(ScreenPoint { x: 50, y: 60 });
        let config = ErrmsgConfig::default();
        let pos = initial_position(&view, &config, anchor(), true, SIZE);
        assert_eq!(pos.x, 100 - SIZE.0);
        assert_eq!(pos.y, view.bottom - config.bar_clearance - SIZE.1);
        assert_eq!((pos.x, pos.y), (-100, -12));
    }
}
