use crate::message::{CompanyId, Severity, StringId, StringParams, TextRefStack, WorldAnchor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenRect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

/// Localization and string decoding.
pub trait TextService {
    /// Number of parameter slots consumed when decoding `text`.
    fn param_count(&self, text: StringId) -> usize;

    /// The mutable, process-wide parameter table producers fill before
    /// reporting an error.
    fn live_params(&self) -> &StringParams;

    fn start_text_ref_stack(&mut self, stack: &TextRefStack);

    fn stop_text_ref_stack(&mut self);

    fn render(&self, text: StringId, params: &StringParams) -> String;

    fn measure_height(&self, text: StringId, params: &StringParams, width: i32) -> i32;

    /// Copies the parameters `text` needs out of the live table.
    fn capture_params(&self, text: StringId, out: &mut StringParams) {
        out.copy_prefix_from(self.live_params(), self.param_count(text));
    }

    fn draw_text(
        &self,
        _frame: &mut [u8],
        _frame_width: u32,
        _frame_height: u32,
        _rect: ScreenRect,
        _text: StringId,
        _params: &StringParams,
    ) {
    }
}

/// The main game viewport and the screen furniture around it.
pub trait MainView {
    fn screen_size(&self) -> (i32, i32);

    /// First screen row below the top toolbar.
    fn main_view_top(&self) -> i32;

    /// Last screen row above the status bar.
    fn main_view_bottom(&self) -> i32;

    fn project(&self, anchor: WorldAnchor) -> Option<ScreenPoint>;

    fn clear_error_highlight(&mut self);
}

pub trait CompanyRegistry {
    fn is_valid(&self, company: CompanyId) -> bool;

    fn colour(&self, company: CompanyId) -> Option<[u8; 4]>;
}

pub trait ConsoleSink {
    fn print(&mut self, severity: Severity, line: &str);
}

pub struct Services<'a> {
    pub text: &'a mut dyn TextService,
    pub view: &'a mut dyn MainView,
    pub companies: &'a dyn CompanyRegistry,
    pub console: &'a mut dyn ConsoleSink,
}
