//! Burnout: timed marks that erase themselves.
//!
//! ```text
//! ┌────────────┐  add_object   ┌──────────────┐  expired batch  ┌──────────────┐
//! │ Foreground │ ────────────▶ │ BurnoutQueue │ ──────────────▶ │ BurnoutActor │
//! └────────────┘               └──────────────┘                 └──────┬───────┘
//!                                                                      │ revert under
//!                                                                      ▼ canvas lock
//!                                                               ┌──────────────┐
//!                                                               │ Canvas state │
//!                                                               └──────────────┘
//! ```

mod queue;
mod scheduler;

pub use queue::{BurnoutObject, BurnoutQueue};
pub use scheduler::BurnoutActor;
