mod engine;
mod record;

pub use engine::Ledger;
pub use record::{TimerId, TimerRecord, DEFAULT_FIRST_LABEL};
