//! Add-server wizard
//!
//! ```text
//! select-type ─┬─ registry ──> select-schema ─┬─> select-package ──> configure
//!              │                              └─> configure (single option)
//!              ├─ custom ────> custom-form
//!              ├─ remote ────> remote-form
//!              ├─ clipboard ─> clipboard-import
//!              └─ ai ────────> ai-chat
//! ```

pub mod form;
pub mod session;
pub mod state;

pub use form::{parse_env_lines, parse_header_lines, split_args};
pub use session::WizardSession;
pub use state::{ServerType, Step, WizardState};
