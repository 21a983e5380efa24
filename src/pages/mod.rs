//! Page components for ClinicDesk.

mod diagnostics;
mod inbox;

pub use diagnostics::Diagnostics;
pub use inbox::Inbox;
