mod params;
mod pending;
mod snapshot;

pub use params::{
    ContentSource, ParamValue, StringParams, TextRefStack, MAX_PARAMS, MAX_TEXT_REF_STACK,
};
pub use pending::PendingQueue;
pub use snapshot::{
    CompanyId, MessageSnapshot, Severity, StringId, WorldAnchor, DURATION_SCALE_MS, MAX_COMPANIES,
};
