//! Navigation state machine.
//!
//! ```text
//!            drill                drill                 drill
//!  Global ─────────► Drilling(4) ─────► … Drilling(12) ─────► Terminal
//!    ▲                  │  ▲                                   │   ▲
//!    └──── back/reset ──┘  └─────────────── back ──────────────┘   │
//!                                                      tap inside ─┘
//!                                                      (FocusedCell)
//! ```
//!
//! A tap outside the current selection is a lateral switch at the same
//! depth; it never grows the stack.

pub mod command;
pub mod navigator;
pub mod stack;

pub use command::{CommandOutcome, IgnoreReason, NavCommand, NavState, ZoomDirection};
pub use navigator::Navigator;
pub use stack::SelectionStack;
