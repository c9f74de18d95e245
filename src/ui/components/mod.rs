//! Reusable UI primitives.
//!
//! # Components
//!
//! - [`Button`]: icon button with variants
//! - [`icons`]: inline SVG icons and the CSS spinner

mod button;
mod icons;

pub use button::{Button, ButtonSize, ButtonVariant};
pub use icons::*;
