use std::collections::VecDeque;

use tracing::{debug, info};

use crate::config::ErrmsgConfig;
use crate::message::{MessageSnapshot, PendingQueue, Severity, StringId, TextRefStack};
use crate::services::Services;

use super::popup::PopupState;

/// One error report as handed in by gameplay code.
#[derive(Debug, Clone)]
pub struct MessageRequest {
    pub summary: Option<StringId>,
    pub detail: Option<StringId>,
    pub extra: Option<StringId>,
    pub severity: Severity,
    pub x: i32,
    pub y: i32,
    pub text_ref_stack: Option<TextRefStack>,
}

impl MessageRequest {
    pub fn new(summary: Option<StringId>, severity: Severity) -> Self {
        Self {
            summary,
            detail: None,
            extra: None,
            severity,
            x: 0,
            y: 0,
            text_ref_stack: None,
        }
    }

    pub fn with_detail(mut self, detail: StringId) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn with_extra(mut self, extra: StringId) -> Self {
        self.extra = Some(extra);
        self
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_text_ref_stack(mut self, stack: TextRefStack) -> Self {
        self.text_ref_stack = Some(stack);
        self
    }
}

/// Failure details carried back by a rejected player command.
#[derive(Debug, Clone, Default)]
pub struct CommandError {
    pub detail: Option<StringId>,
    pub extra: Option<StringId>,
    pub text_ref_stack: Option<TextRefStack>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowOutcome {
    Dropped,
    Opened,
    Queued,
    Replaced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CloseReason {
    Hidden,
    Timeout,
    Dismissed,
    OwnerRemoved,
    Preempted,
    Teardown,
}

impl CloseReason {
    fn as_str(self) -> &'static str {
        match self {
            CloseReason::Hidden => "hidden",
            CloseReason::Timeout => "timeout",
            CloseReason::Dismissed => "dismissed",
            CloseReason::OwnerRemoved => "owner_removed",
            CloseReason::Preempted => "preempted",
            CloseReason::Teardown => "teardown",
        }
    }

    /// Whether an unexpired critical popup closed this way goes back to the
    /// head of the queue.
    fn requeues_critical(self) -> bool {
        matches!(self, CloseReason::Hidden)
    }

    fn reveals_next(self) -> bool {
        !matches!(self, CloseReason::Preempted | CloseReason::Teardown)
    }
}

/// Owns the single visible error popup and the backlog behind it.
#[derive(Debug)]
pub struct ErrorDisplay {
    config: ErrmsgConfig,
    pending: PendingQueue,
    visible: Option<PopupState>,
    window_system_initialized: bool,
}

impl ErrorDisplay {
    pub fn new(config: ErrmsgConfig) -> Self {
        Self {
            config,
            pending: PendingQueue::new(),
            visible: None,
            window_system_initialized: false,
        }
    }

    pub fn config(&self) -> &ErrmsgConfig {
        &self.config
    }

    pub fn visible(&self) -> Option<&PopupState> {
        self.visible.as_ref()
    }

    pub fn pending(&self) -> &PendingQueue {
        &self.pending
    }

    pub fn is_window_system_initialized(&self) -> bool {
        self.window_system_initialized
    }

    /// Reports a problem to the player.
    ///
    /// A visible critical popup holds the screen: further critical reports
    /// queue behind it and anything less urgent is dropped. Any other
    /// visible popup is replaced straight away.
    pub fn show(&mut self, services: &mut Services<'_>, request: MessageRequest) -> ShowOutcome {
        let severity = request.severity;
        if self.config.errmsg_duration == 0 && severity != Severity::Critical {
            debug!(?severity, "errmsg_suppressed_by_duration_setting");
            return ShowOutcome::Dropped;
        }

        let summary = request.summary.unwrap_or(StringId::EMPTY);
        let mut snapshot = MessageSnapshot::new(
            summary,
            request.detail,
            severity,
            self.config.errmsg_duration,
            request.x,
            request.y,
            request.text_ref_stack,
            request.extra,
        );

        if severity != Severity::Info {
            let line = snapshot.console_line(services.text);
            services.console.print(severity, &line);
        }

        snapshot.refresh_params(services.text);

        match self.visible.as_ref().map(PopupState::is_critical) {
            None => {
                self.open(services, snapshot);
                ShowOutcome::Opened
            }
            Some(true) if snapshot.is_critical() => {
                debug!(
                    summary = summary.0,
                    pending = self.pending.len() + 1,
                    "errmsg_queued_behind_critical"
                );
                self.pending.push_back(snapshot);
                ShowOutcome::Queued
            }
            Some(true) => {
                debug!(summary = summary.0, ?severity, "errmsg_dropped_behind_critical");
                ShowOutcome::Dropped
            }
            Some(false) => {
                self.close_visible(services, CloseReason::Preempted);
                self.open(services, snapshot);
                ShowOutcome::Replaced
            }
        }
    }

    /// Reports a failed command at a world location. Command failures are
    /// always informational.
    pub fn show_command_error(
        &mut self,
        services: &mut Services<'_>,
        summary: Option<StringId>,
        x: i32,
        y: i32,
        error: CommandError,
    ) -> ShowOutcome {
        let request = MessageRequest {
            summary,
            detail: error.detail,
            extra: error.extra,
            severity: Severity::Info,
            x,
            y,
            text_ref_stack: error.text_ref_stack,
        };
        self.show(services, request)
    }

    /// Closes the visible popup. Returns false when nothing was shown.
    pub fn hide(&mut self, services: &mut Services<'_>) -> bool {
        self.close_visible(services, CloseReason::Hidden)
    }

    /// Marks the window system as up and reveals the oldest pending message.
    pub fn show_first(&mut self, services: &mut Services<'_>) {
        self.window_system_initialized = true;
        if self.visible.is_some() {
            return;
        }
        if let Some(snapshot) = self.pending.pop_front() {
            self.open(services, snapshot);
        }
    }

    /// Takes the popup down ahead of a window system shutdown, keeping a
    /// critical one at the head of the queue for the next `show_first`.
    pub fn hide_critical(&mut self, services: &mut Services<'_>) {
        if !self.window_system_initialized {
            return;
        }
        let Some(popup) = self.visible.as_ref() else {
            return;
        };

        if popup.is_critical() {
            self.pending.push_front(popup.requeued_snapshot());
        }
        self.window_system_initialized = false;
        self.close_visible(services, CloseReason::Teardown);
    }

    /// Drops the popup and the whole backlog.
    pub fn clear_all(&mut self, services: &mut Services<'_>) {
        self.hide_critical(services);
        self.pending.clear();
    }

    pub fn schedule(&mut self, snapshot: MessageSnapshot) {
        self.pending.push_back(snapshot);
    }

    pub fn schedule_batch(&mut self, batch: &mut VecDeque<MessageSnapshot>) {
        self.pending.append(batch);
    }

    pub fn tick(&mut self, services: &mut Services<'_>, elapsed_ms: u32) {
        let expired = self
            .visible
            .as_mut()
            .is_some_and(|popup| popup.advance(elapsed_ms));
        if expired {
            self.close_visible(services, CloseReason::Timeout);
        }
    }

    /// Right-click dismissal. Critical popups and popups without a running
    /// countdown stay put.
    pub fn on_right_click(&mut self, services: &mut Services<'_>) -> bool {
        let dismissable = self.visible.as_ref().is_some_and(|popup| {
            !popup.is_critical() && popup.has_timeout() && !popup.has_timed_out()
        });
        if !dismissable {
            return false;
        }
        self.close_visible(services, CloseReason::Dismissed)
    }

    /// Closes a popup whose owning company no longer exists.
    pub fn on_companies_changed(&mut self, services: &mut Services<'_>) -> bool {
        let orphaned = self
            .visible
            .as_ref()
            .and_then(|popup| popup.snapshot().owner())
            .is_some_and(|owner| !services.companies.is_valid(owner));
        if !orphaned {
            return false;
        }
        self.close_visible(services, CloseReason::OwnerRemoved)
    }

    fn open(&mut self, services: &mut Services<'_>, snapshot: MessageSnapshot) {
        let popup = PopupState::open(snapshot, &self.config, &*services.text, &*services.view);
        let position = popup.position();
        let (width, height) = popup.size();
        info!(
            summary = popup.snapshot().summary().0,
            severity = ?popup.snapshot().severity(),
            x = position.x,
            y = position.y,
            width,
            height,
            timeout_ms = popup.remaining_ms(),
            "errmsg_opened"
        );
        self.visible = Some(popup);
    }

    fn close_visible(&mut self, services: &mut Services<'_>, reason: CloseReason) -> bool {
        let Some(mut popup) = self.visible.take() else {
            return false;
        };
        popup.begin_closing();
        services.view.clear_error_highlight();
        info!(
            summary = popup.snapshot().summary().0,
            reason = reason.as_str(),
            "errmsg_closed"
        );

        if !self.window_system_initialized || !reason.reveals_next() {
            return true;
        }
        if popup.is_critical() && !popup.has_timed_out() && reason.requeues_critical() {
            self.pending.push_front(popup.requeued_snapshot());
        }
        self.show_first(services);
        true
    }
}
