//! 抽出・編集セッション

pub mod controller;
pub mod progress;
pub mod state;

pub use controller::{ExtractionOutcome, SessionController, SessionOptions};
pub use progress::{ProgressCurve, ProgressTicker, PROGRESS_CAP};
pub use state::{ExtractionFailure, Session, SAVED_NOTICE_DURATION};
