//! Adaptive review engine: item models, SM-2 scheduling, answer judging,
//! priority selection and the question-answer session loop.

pub mod coverage;
pub mod judge;
pub mod models;
pub mod schedule;
pub mod selector;
pub mod session;
pub mod stats;

pub use models::{Item, QuestionKind, Session};
pub use selector::Selected;
pub use session::{InputSource, Presenter, SessionController, StdinInput};
