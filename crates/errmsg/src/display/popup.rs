use crate::config::ErrmsgConfig;
use crate::message::{MessageSnapshot, StringId};
use crate::services::{MainView, ScreenPoint, ScreenRect, TextService};

use super::placement::initial_position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupPhase {
    Displayed,
    Closing,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextHeights {
    pub summary: i32,
    pub detail: i32,
    pub extra: i32,
}

/// The message currently on screen, plus what was derived to show it.
#[derive(Debug, Clone)]
pub struct PopupState {
    snapshot: MessageSnapshot,
    heights: TextHeights,
    size: (i32, i32),
    position: ScreenPoint,
    remaining_ms: u32,
    has_timeout: bool,
    phase: PopupPhase,
}

impl PopupState {
    pub(crate) fn open(
        snapshot: MessageSnapshot,
        config: &ErrmsgConfig,
        text: &dyn TextService,
        view: &dyn MainView,
    ) -> Self {
        let has_timeout = snapshot.display_duration_ms() > 0;
        let remaining_ms = snapshot.countdown_ms();
        let mut popup = Self {
            snapshot,
            heights: TextHeights::default(),
            size: (0, 0),
            position: ScreenPoint::default(),
            remaining_ms,
            has_timeout,
            phase: PopupPhase::Displayed,
        };
        popup.layout(config, text);
        popup.position = initial_position(
            view,
            config,
            popup.snapshot.anchor(),
            popup.snapshot.has_owner_face(),
            popup.size,
        );
        popup
    }

    fn layout(&mut self, config: &ErrmsgConfig, text: &dyn TextService) {
        let text_width = config.panel_width - 2 * config.text_padding;
        let params = self.snapshot.params();
        let measure = |id: Option<StringId>| {
            id.map_or(0, |id| text.measure_height(id, params, text_width))
        };

        self.heights = TextHeights {
            summary: measure(Some(self.snapshot.summary())),
            detail: measure(self.snapshot.detail()),
            extra: measure(self.snapshot.extra()),
        };

        let mut body_height = self.heights.summary;
        if self.snapshot.detail().is_some() {
            body_height += config.text_padding + self.heights.detail;
        }
        if self.snapshot.extra().is_some() {
            body_height += config.text_padding + self.heights.extra;
        }
        body_height += 2 * config.text_padding;

        let mut width = config.panel_width;
        if self.snapshot.has_owner_face() {
            body_height = body_height.max(config.face_height);
            width += config.face_width;
        }
        self.size = (width, config.caption_height + body_height);
    }

    /// Advances the countdown. Returns true once it has run out.
    pub(crate) fn advance(&mut self, elapsed_ms: u32) -> bool {
        if !self.has_timeout || self.phase == PopupPhase::Closing {
            return false;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
        if self.remaining_ms == 0 {
            self.phase = PopupPhase::Closing;
            return true;
        }
        false
    }

    pub(crate) fn begin_closing(&mut self) {
        self.phase = PopupPhase::Closing;
    }

    /// The snapshot to put back in the queue, carrying the countdown left.
    pub(crate) fn requeued_snapshot(&self) -> MessageSnapshot {
        let mut snapshot = self.snapshot.clone();
        snapshot.resume_at(self.remaining_ms);
        snapshot
    }

    pub fn snapshot(&self) -> &MessageSnapshot {
        &self.snapshot
    }

    pub fn is_critical(&self) -> bool {
        self.snapshot.is_critical()
    }

    pub fn has_timeout(&self) -> bool {
        self.has_timeout
    }

    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }

    /// Timer disabled popups never time out.
    pub fn has_timed_out(&self) -> bool {
        self.has_timeout && self.remaining_ms == 0
    }

    pub fn phase(&self) -> PopupPhase {
        self.phase
    }

    pub fn heights(&self) -> TextHeights {
        self.heights
    }

    pub fn size(&self) -> (i32, i32) {
        self.size
    }

    pub fn position(&self) -> ScreenPoint {
        self.position
    }

    pub fn bounds(&self) -> ScreenRect {
        ScreenRect {
            left: self.position.x,
            top: self.position.y,
            width: self.size.0,
            height: self.size.1,
        }
    }

    pub fn caption(&self) -> StringId {
        if self.snapshot.has_owner_face() {
            StringId::CAPTION_OTHER_COMPANY
        } else {
            StringId::CAPTION
        }
    }
}
