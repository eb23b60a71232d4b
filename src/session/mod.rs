//! Diagnostic sessions
//!
//! A [`DiagnosticSession`] walks one user through a domain's questions and
//! produces a single [`DiagnosticResult`]. The [`SessionManager`] keeps many
//! sessions side by side for the HTTP front door and hands completed ones to
//! a [`SessionArchive`].
//!
//! # Guarantees
//!
//! - A rejected or failed call changes nothing
//! - `Completed` is absorbing; later answers are rejected
//! - Same domain and same answers give the same questions and result

mod answer;
mod archive;
mod controller;
mod errors;
mod manager;
mod result;
mod state;

pub use answer::Answer;
pub use archive::{FileSessionArchive, MemorySessionArchive, SessionArchive};
pub use controller::DiagnosticSession;
pub use errors::{SessionError, SessionResult};
pub use manager::{SessionManager, SessionStatus, StartedSession};
pub use result::{DiagnosticResult, SessionRecord, TranscriptEntry};
pub use state::{PendingQuestion, SessionState, Step};
