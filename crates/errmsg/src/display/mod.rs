mod controller;
mod draw;
mod placement;
mod popup;
mod viewport;

pub use controller::{CommandError, ErrorDisplay, MessageRequest, ShowOutcome};
pub use draw::draw_popup;
pub use placement::initial_position;
pub use popup::{PopupPhase, PopupState, TextHeights};
pub use viewport::{world_to_screen, Camera2D, Vec2, Viewport, ViewportView};
