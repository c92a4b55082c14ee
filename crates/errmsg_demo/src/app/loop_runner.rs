use std::collections::HashMap;
use std::process::ExitCode;
use std::sync::Arc;

use errmsg::{
    draw_popup, CommandError, CompanyId, ConsoleLine, ConsoleLog, ContentSource, ErrmsgConfig,
    ErrorDisplay, MessageRequest, MessageSnapshot, Services, ShowOutcome, StringId, TextRefStack,
    ViewportView, WorldAnchor,
};
use tracing::{debug, info, warn};

use super::bootstrap::AppWiring;
use super::scenario::{Scenario, Step, TextRefDef};
use super::services::{CompanyBook, DemoText};

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let report = replay(app.config, &app.scenario);
    for line in &report.console_lines {
        debug!(severity = ?line.severity, text = line.text.as_str(), "console_line");
    }
    info!(
        opened = report.opened,
        replaced = report.replaced,
        queued = report.queued,
        dropped = report.dropped,
        frames_drawn = report.frames_drawn,
        console_lines = report.console_lines.len(),
        still_visible = report.still_visible,
        still_pending = report.still_pending,
        "scenario_finished"
    );
    ExitCode::SUCCESS
}

#[derive(Debug, Default)]
pub(crate) struct ReplayReport {
    pub(crate) opened: u32,
    pub(crate) replaced: u32,
    pub(crate) queued: u32,
    pub(crate) dropped: u32,
    pub(crate) frames_drawn: u32,
    pub(crate) console_lines: Vec<ConsoleLine>,
    pub(crate) still_visible: bool,
    pub(crate) still_pending: usize,
}

/// Collaborators the display talks to while the scenario runs.
struct World {
    view: ViewportView,
    text: DemoText,
    companies: CompanyBook,
    console: ConsoleLog,
}

impl World {
    fn services(&mut self) -> Services<'_> {
        Services {
            text: &mut self.text,
            view: &mut self.view,
            companies: &self.companies,
            console: &mut self.console,
        }
    }
}

struct Replay {
    display: ErrorDisplay,
    world: World,
    sources: HashMap<u32, Arc<ContentSource>>,
    frame: Vec<u8>,
    report: ReplayReport,
}

impl Replay {
    fn new(config: ErrmsgConfig, scenario: &Scenario) -> Self {
        let screen = scenario.screen;
        let sources = scenario
            .content_sources
            .iter()
            .map(|def| {
                let source = ContentSource {
                    grf_id: def.grf_id,
                    name: def.name.clone(),
                };
                (def.grf_id, Arc::new(source))
            })
            .collect();
        Self {
            display: ErrorDisplay::new(config),
            world: World {
                view: ViewportView::new(screen.width, screen.height),
                text: DemoText::new(&scenario.strings),
                companies: CompanyBook::new(&scenario.companies),
                console: ConsoleLog::new(),
            },
            sources,
            frame: vec![0; screen.width as usize * screen.height as usize * 4],
            report: ReplayReport::default(),
        }
    }

    fn apply(&mut self, index: usize, step: &Step) {
        match step {
            Step::SetNum { slot, value } => self.world.text.live_mut().set_num(*slot, *value),
            Step::SetStr { slot, value } => {
                self.world.text.live_mut().set_str(*slot, value.as_str())
            }
            Step::Show {
                summary,
                detail,
                extra,
                severity,
                x,
                y,
                text_ref,
            } => {
                let mut request = MessageRequest::new(summary.map(StringId), *severity).at(*x, *y);
                if let Some(detail) = detail {
                    request = request.with_detail(StringId(*detail));
                }
                if let Some(extra) = extra {
                    request = request.with_extra(StringId(*extra));
                }
                if let Some(stack) = text_ref.as_ref().and_then(|def| self.text_ref_stack(def)) {
                    request = request.with_text_ref_stack(stack);
                }

                let outcome = self.display.show(&mut self.world.services(), request);
                info!(step = index, ?outcome, "scenario_show");
                if self.count(outcome) {
                    if let Some(anchor) = WorldAnchor::from_coords(*x, *y) {
                        self.world.view.set_error_highlight(anchor);
                    }
                }
            }
            Step::Schedule {
                summary,
                severity,
                duration,
                values,
            } => {
                let mut snapshot = MessageSnapshot::new(
                    StringId(*summary),
                    None,
                    *severity,
                    *duration,
                    0,
                    0,
                    None,
                    None,
                );
                snapshot.refresh_params(&mut self.world.text);
                for (slot, value) in values.iter().enumerate() {
                    snapshot.set_num(slot, *value);
                }
                self.display.schedule(snapshot);
                debug!(
                    step = index,
                    pending = self.display.pending().len(),
                    "scenario_scheduled"
                );
            }
            Step::CommandError {
                summary,
                detail,
                extra,
                x,
                y,
                text_ref,
            } => {
                let error = CommandError {
                    detail: detail.map(StringId),
                    extra: extra.map(StringId),
                    text_ref_stack: text_ref.as_ref().and_then(|def| self.text_ref_stack(def)),
                };
                let outcome = self.display.show_command_error(
                    &mut self.world.services(),
                    summary.map(StringId),
                    *x,
                    *y,
                    error,
                );
                info!(step = index, ?outcome, "scenario_command_error");
                if self.count(outcome) {
                    if let Some(anchor) = WorldAnchor::from_coords(*x, *y) {
                        self.world.view.set_error_highlight(anchor);
                    }
                }
            }
            Step::Tick { ms } => self.display.tick(&mut self.world.services(), *ms),
            Step::RightClick => {
                let closed = self.display.on_right_click(&mut self.world.services());
                info!(step = index, closed, "scenario_right_click");
            }
            Step::Hide => {
                let closed = self.display.hide(&mut self.world.services());
                info!(step = index, closed, "scenario_hide");
            }
            Step::HideCritical => self.display.hide_critical(&mut self.world.services()),
            Step::ShowFirst => self.display.show_first(&mut self.world.services()),
            Step::RemoveCompany { id } => {
                let removed = self.world.companies.remove(CompanyId(*id));
                let closed = self.display.on_companies_changed(&mut self.world.services());
                info!(step = index, company = *id, removed, closed, "scenario_company_removed");
            }
            Step::ClearAll => self.display.clear_all(&mut self.world.services()),
        }
    }

    /// Tallies a show outcome. Returns true when a popup went up.
    fn count(&mut self, outcome: ShowOutcome) -> bool {
        match outcome {
            ShowOutcome::Opened => self.report.opened += 1,
            ShowOutcome::Replaced => self.report.replaced += 1,
            ShowOutcome::Queued => self.report.queued += 1,
            ShowOutcome::Dropped => self.report.dropped += 1,
        }
        matches!(outcome, ShowOutcome::Opened | ShowOutcome::Replaced)
    }

    fn text_ref_stack(&self, def: &TextRefDef) -> Option<TextRefStack> {
        let Some(source) = self.sources.get(&def.grf_id) else {
            warn!(grf_id = def.grf_id, "scenario_unknown_content_source");
            return None;
        };
        TextRefStack::from_parts(Some(Arc::clone(source)), &def.values)
    }

    fn draw_frame(&mut self) {
        let Some(popup) = self.display.visible() else {
            return;
        };
        let (width, height) = (self.world.view.screen_width, self.world.view.screen_height);
        self.frame.fill(0);
        draw_popup(
            &mut self.frame,
            width,
            height,
            popup,
            self.display.config(),
            &self.world.text,
            &self.world.companies,
        );
        self.report.frames_drawn += 1;

        let bounds = popup.bounds();
        debug!(
            left = bounds.left,
            top = bounds.top,
            width = bounds.width,
            height = bounds.height,
            remaining_ms = popup.remaining_ms(),
            "popup_drawn"
        );
    }

    fn finish(mut self) -> ReplayReport {
        self.world
            .console
            .drain_lines_into(&mut self.report.console_lines);
        self.report.still_visible = self.display.visible().is_some();
        self.report.still_pending = self.display.pending().len();
        self.report
    }
}

pub(crate) fn replay(config: ErrmsgConfig, scenario: &Scenario) -> ReplayReport {
    let mut replay = Replay::new(config, scenario);
    for (index, step) in scenario.steps.iter().enumerate() {
        replay.apply(index, step);
        replay.draw_frame();
    }
    replay.finish()
}
