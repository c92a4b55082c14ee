use crate::config::ErrmsgConfig;
use crate::message::{Severity, StringId};
use crate::services::{CompanyRegistry, ScreenRect, TextService};

use super::popup::PopupState;

const PANEL_BG_COLOR: [u8; 4] = [24, 20, 20, 235];
const CAPTION_BG_COLOR: [u8; 4] = [96, 24, 24, 255];
const FACE_FALLBACK_COLOR: [u8; 4] = [64, 64, 64, 255];
const INFO_BORDER_COLOR: [u8; 4] = [120, 140, 170, 255];
const WARNING_BORDER_COLOR: [u8; 4] = [220, 170, 40, 255];
const CRITICAL_BORDER_COLOR: [u8; 4] = [230, 40, 40, 255];

fn border_color(severity: Severity) -> [u8; 4] {
    match severity {
        Severity::Info => INFO_BORDER_COLOR,
        Severity::Warning => WARNING_BORDER_COLOR,
        Severity::Critical => CRITICAL_BORDER_COLOR,
    }
}

/// Paints the popup chrome into an RGBA8 frame and asks the text service to
/// fill in each text block.
pub fn draw_popup(
    frame: &mut [u8],
    width: u32,
    height: u32,
    popup: &PopupState,
    config: &ErrmsgConfig,
    text: &dyn TextService,
    companies: &dyn CompanyRegistry,
) {
    if width == 0 || height == 0 {
        return;
    }

    let bounds = popup.bounds();
    let snapshot = popup.snapshot();
    draw_filled_rect(frame, width, height, bounds, PANEL_BG_COLOR);

    let caption = ScreenRect {
        height: config.caption_height,
        ..bounds
    };
    draw_filled_rect(frame, width, height, caption, CAPTION_BG_COLOR);
    text.draw_text(
        frame,
        width,
        height,
        caption,
        popup.caption(),
        snapshot.params(),
    );

    let mut text_left = bounds.left + config.text_padding;
    if let Some(owner) = snapshot.owner() {
        let face = ScreenRect {
            left: bounds.left,
            top: bounds.top + config.caption_height,
            width: config.face_width,
            height: config.face_height,
        };
        let color = companies.colour(owner).unwrap_or(FACE_FALLBACK_COLOR);
        draw_filled_rect(frame, width, height, face, color);
        text_left += config.face_width;
    }

    let heights = popup.heights();
    let text_width = config.panel_width - 2 * config.text_padding;
    let mut text_top = bounds.top + config.caption_height + config.text_padding;
    let blocks: Vec<(StringId, i32)> = [
        (Some(snapshot.summary()), heights.summary),
        (snapshot.detail(), heights.detail),
        (snapshot.extra(), heights.extra),
    ]
    .into_iter()
    .filter_map(|(id, block_height)| id.map(|id| (id, block_height)))
    .collect();

    // Space left over next to a taller face panel is shared out evenly.
    let area_height = bounds.height - config.caption_height - 2 * config.text_padding;
    let used: i32 = blocks.iter().map(|(_, block_height)| block_height).sum::<i32>()
        + config.text_padding * (blocks.len() as i32 - 1);
    let share = ((area_height - used) / blocks.len() as i32).max(0);

    for (id, block_height) in blocks {
        let block_height = block_height + share;
        let rect = ScreenRect {
            left: text_left,
            top: text_top,
            width: text_width,
            height: block_height,
        };
        text.draw_text(frame, width, height, rect, id, snapshot.params());
        text_top += block_height + config.text_padding;
    }

    draw_rect_outline(frame, width, height, bounds, border_color(snapshot.severity()));
}

fn draw_filled_rect(frame: &mut [u8], width: u32, height: u32, rect: ScreenRect, color: [u8; 4]) {
    let start_x = rect.left.max(0);
    let start_y = rect.top.max(0);
    let end_x = (rect.left + rect.width).min(width as i32);
    let end_y = (rect.top + rect.height).min(height as i32);
    if end_x <= start_x || end_y <= start_y {
        return;
    }

    let width_usize = width as usize;
    for py in start_y..end_y {
        for px in start_x..end_x {
            let pixel = py as usize * width_usize + px as usize;
            let byte = pixel * 4;
            if byte + 3 >= frame.len() {
                continue;
            }
            frame[byte..byte + 4].copy_from_slice(&color);
        }
    }
}

fn draw_rect_outline(frame: &mut [u8], width: u32, height: u32, rect: ScreenRect, color: [u8; 4]) {
    if rect.width <= 1 || rect.height <= 1 {
        return;
    }
    let edges = [
        ScreenRect { height: 1, ..rect },
        ScreenRect {
            top: rect.top + rect.height - 1,
            height: 1,
            ..rect
        },
        ScreenRect { width: 1, ..rect },
        ScreenRect {
            left: rect.left + rect.width - 1,
            width: 1,
            ..rect
        },
    ];
    for edge in edges {
        draw_filled_rect(frame, width, height, edge, color);
    }
}
