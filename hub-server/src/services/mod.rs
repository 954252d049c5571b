//! Domain services: quota ledger, unlock flow, session gate, member
//! watch and the AI notes analyzer

pub mod notes_ai;
pub mod quota;
pub mod session;
pub mod unlock;
pub mod watch;

pub use notes_ai::{NotesAnalysis, NotesAnalyzer};
pub use quota::QuotaService;
pub use session::SessionGate;
pub use unlock::{UnlockOutcome, UnlockService};
pub use watch::{MemberEvent, MemberEventKind, MemberWatch, ResourceVersions};
