use std::cell::RefCell;
use std::collections::HashMap;

use crate::message::{
    CompanyId, ParamValue, Severity, StringId, StringParams, TextRefStack, WorldAnchor,
};
use crate::services::{
    CompanyRegistry, ConsoleSink, MainView, ScreenPoint, ScreenRect, TextService,
};

#[derive(Debug, Default)]
pub(crate) struct FakeText {
    pub live: StringParams,
    pub active_stack: Option<StringParams>,
    pub stack_starts: usize,
    pub stack_stops: usize,
    pub drawn: RefCell<Vec<(StringId, ScreenRect)>>,
    param_counts: HashMap<StringId, usize>,
    texts: HashMap<StringId, String>,
}

impl FakeText {
    pub const LINE_HEIGHT: i32 = 10;
    const GLYPH_WIDTH: i32 = 6;

    pub fn set_param_count(&mut self, text: StringId, count: usize) {
        self.param_counts.insert(text, count);
    }

    pub fn set_text(&mut self, text: StringId, template: &str) {
        self.texts.insert(text, template.to_string());
    }
}

impl TextService for FakeText {
    fn param_count(&self, text: StringId) -> usize {
        self.param_counts.get(&text).copied().unwrap_or(0)
    }

    fn live_params(&self) -> &StringParams {
        self.active_stack.as_ref().unwrap_or(&self.live)
    }

    fn start_text_ref_stack(&mut self, stack: &TextRefStack) {
        let mut stacked = self.live.clone();
        for (index, value) in stack.values().iter().enumerate() {
            stacked.set_num(index, u64::from(*value));
        }
        self.active_stack = Some(stacked);
        self.stack_starts += 1;
    }

    fn stop_text_ref_stack(&mut self) {
        self.active_stack = None;
        self.stack_stops += 1;
    }

    fn render(&self, text: StringId, params: &StringParams) -> String {
        let Some(template) = self.texts.get(&text) else {
            return format!("#{}", text.0);
        };
        let mut rendered = template.clone();
        for (index, value) in params.iter().enumerate() {
            let placeholder = format!("{{{index}}}");
            if !rendered.contains(&placeholder) {
                continue;
            }
            let replacement = match value {
                ParamValue::Num(num) => num.to_string(),
                ParamValue::Str(text) => text.clone(),
            };
            rendered = rendered.replace(&placeholder, &replacement);
        }
        rendered
    }

    fn measure_height(&self, text: StringId, params: &StringParams, width: i32) -> i32 {
        let chars = self.render(text, params).chars().count() as i32;
        let per_line = (width / Self::GLYPH_WIDTH).max(1);
        let lines = ((chars + per_line - 1) / per_line).max(1);
        lines * Self::LINE_HEIGHT
    }

    fn draw_text(
        &self,
        _frame: &mut [u8],
        _frame_width: u32,
        _frame_height: u32,
        rect: ScreenRect,
        text: StringId,
        _params: &StringParams,
    ) {
        self.drawn.borrow_mut().push((text, rect));
    }
}

#[derive(Debug)]
pub(crate) struct FakeView {
    pub width: i32,
    pub height: i32,
    pub top: i32,
    pub bottom: i32,
    pub projected: Option<ScreenPoint>,
    pub highlight: Option<WorldAnchor>,
    pub highlight_clears: usize,
}

impl FakeView {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            top: 22,
            bottom: height - 12,
            projected: Some(ScreenPoint {
                x: width / 2,
                y: height / 2,
            }),
            highlight: None,
            highlight_clears: 0,
        }
    }
}

impl MainView for FakeView {
    fn screen_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn main_view_top(&self) -> i32 {
        self.top
    }

    fn main_view_bottom(&self) -> i32 {
        self.bottom
    }

    fn project(&self, _anchor: WorldAnchor) -> Option<ScreenPoint> {
        self.projected
    }

    fn clear_error_highlight(&mut self) {
        self.highlight = None;
        self.highlight_clears += 1;
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeCompanies {
    colours: HashMap<CompanyId, [u8; 4]>,
}

impl FakeCompanies {
    pub fn add(&mut self, company: CompanyId, colour: [u8; 4]) {
        self.colours.insert(company, colour);
    }

    pub fn remove(&mut self, company: CompanyId) {
        self.colours.remove(&company);
    }
}

impl CompanyRegistry for FakeCompanies {
    fn is_valid(&self, company: CompanyId) -> bool {
        self.colours.contains_key(&company)
    }

    fn colour(&self, company: CompanyId) -> Option<[u8; 4]> {
        self.colours.get(&company).copied()
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeConsole {
    pub lines: Vec<(Severity, String)>,
}

impl ConsoleSink for FakeConsole {
    fn print(&mut self, severity: Severity, line: &str) {
        self.lines.push((severity, line.to_string()));
    }
}
