pub mod config;
pub mod console;
pub mod display;
pub mod message;
pub mod services;

#[cfg(test)]
mod test_support;

pub use config::{ConfigError, ErrmsgConfig};
pub use console::{ConsoleLine, ConsoleLog};
pub use display::{
    draw_popup, CommandError, ErrorDisplay, MessageRequest, PopupPhase, PopupState, ShowOutcome,
    ViewportView,
};
pub use message::{
    CompanyId, ContentSource, MessageSnapshot, ParamValue, PendingQueue, Severity, StringId,
    StringParams, TextRefStack, WorldAnchor, DURATION_SCALE_MS, MAX_COMPANIES, MAX_PARAMS,
};
pub use services::{
    CompanyRegistry, ConsoleSink, MainView, ScreenPoint, ScreenRect, Services, TextService,
};
