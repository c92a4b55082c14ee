use serde::{Deserialize, Serialize};

use crate::services::TextService;

use super::params::{StringParams, TextRefStack};

/// Countdown milliseconds per unit of the duration setting.
pub const DURATION_SCALE_MS: u32 = 3000;
pub const MAX_COMPANIES: u8 = 15;
const OWNER_PARAM_SLOT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StringId(pub u32);

impl StringId {
    pub const EMPTY: StringId = StringId(0);
    pub const CAPTION: StringId = StringId(1);
    pub const CAPTION_OTHER_COMPANY: StringId = StringId(2);
    pub const ERROR_OWNED_BY: StringId = StringId(3);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompanyId(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorldAnchor {
    pub x: i32,
    pub y: i32,
}

impl WorldAnchor {
    /// `(0, 0)` is the "no location" marker.
    pub fn from_coords(x: i32, y: i32) -> Option<Self> {
        if x == 0 && y == 0 {
            None
        } else {
            Some(Self { x, y })
        }
    }
}

/// Everything needed to draw one error message, frozen at report time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSnapshot {
    summary: StringId,
    detail: Option<StringId>,
    extra: Option<StringId>,
    severity: Severity,
    anchor: Option<WorldAnchor>,
    owner: Option<CompanyId>,
    params: StringParams,
    text_ref_stack: Option<TextRefStack>,
    display_duration_ms: u32,
    resume_ms: Option<u32>,
}

impl MessageSnapshot {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        summary: StringId,
        detail: Option<StringId>,
        severity: Severity,
        duration_units: u32,
        x: i32,
        y: i32,
        text_ref_stack: Option<TextRefStack>,
        extra: Option<StringId>,
    ) -> Self {
        Self {
            summary,
            detail,
            extra,
            severity,
            anchor: WorldAnchor::from_coords(x, y),
            owner: None,
            params: StringParams::new(),
            text_ref_stack,
            display_duration_ms: duration_units.saturating_mul(DURATION_SCALE_MS),
            resume_ms: None,
        }
    }

    /// Sets a numeric parameter on the frozen copy directly, for messages
    /// built without going through the live table.
    pub fn set_num(&mut self, index: usize, value: u64) {
        self.params.set_num(index, value);
    }

    pub fn set_str(&mut self, index: usize, value: impl Into<String>) {
        self.params.set_str(index, value);
    }

    /// Re-captures parameters from the live table.
    ///
    /// The detail string, when present, is the one whose parameter list is
    /// authoritative. An "owned by" detail carries the owning company in
    /// slot 2, which switches the popup to the face layout.
    pub fn refresh_params(&mut self, text: &mut dyn TextService) {
        self.params.clear();
        self.owner = None;

        let decoded = self.detail.unwrap_or(self.summary);
        if let Some(stack) = self.text_ref_stack.as_ref() {
            text.start_text_ref_stack(stack);
        }
        text.capture_params(decoded, &mut self.params);
        if self.text_ref_stack.is_some() {
            text.stop_text_ref_stack();
        }

        if self.detail == Some(StringId::ERROR_OWNED_BY) {
            self.owner = self
                .params
                .num(OWNER_PARAM_SLOT)
                .filter(|&company| company < u64::from(MAX_COMPANIES))
                .map(|company| CompanyId(company as u8));
        }
    }

    /// One plain-text line for the console, decoded against the live table.
    pub fn console_line(&self, text: &mut dyn TextService) -> String {
        if let Some(stack) = self.text_ref_stack.as_ref() {
            text.start_text_ref_stack(stack);
        }

        let live = text.live_params().clone();
        let mut line = text.render(self.summary, &live);
        for part in [self.detail, self.extra].into_iter().flatten() {
            line.push(' ');
            line.push_str(&text.render(part, &live));
        }

        if self.text_ref_stack.is_some() {
            text.stop_text_ref_stack();
        }
        line
    }

    pub fn summary(&self) -> StringId {
        self.summary
    }

    pub fn detail(&self) -> Option<StringId> {
        self.detail
    }

    pub fn extra(&self) -> Option<StringId> {
        self.extra
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }

    pub fn anchor(&self) -> Option<WorldAnchor> {
        self.anchor
    }

    pub fn owner(&self) -> Option<CompanyId> {
        self.owner
    }

    pub fn has_owner_face(&self) -> bool {
        self.owner.is_some()
    }

    pub fn params(&self) -> &StringParams {
        &self.params
    }

    pub fn text_ref_stack(&self) -> Option<&TextRefStack> {
        self.text_ref_stack.as_ref()
    }

    pub fn text_ref_stack_size(&self) -> usize {
        self.text_ref_stack.as_ref().map_or(0, TextRefStack::len)
    }

    pub fn display_duration_ms(&self) -> u32 {
        self.display_duration_ms
    }

    /// Countdown to start from when this snapshot is opened. A popup put
    /// back in the queue resumes where it stopped.
    pub fn countdown_ms(&self) -> u32 {
        self.resume_ms.unwrap_or(self.display_duration_ms)
    }

    pub(crate) fn resume_at(&mut self, remaining_ms: u32) {
        self.resume_ms = Some(remaining_ms);
    }
}
