//! Declarative layouts.
//!
//! Rows and columns justify their children along the main axis with
//! flexible spacers kept in the host's box layout. The flow layout computes
//! its own wrapping placement.
//!
//! # Architecture
//!
//! ```text
//! LayoutConfig + [ChildSlot] -> Row/Column -> host BoxLayout slots -> geometry pass
//! ```

mod config;
pub mod container;
pub mod flow;

pub use config::{Axis, ChildSlot, Justify, LayoutConfig, Paddings, Spacing, spacing};
pub use container::{BoxContainer, Child, Column, Row};
pub use flow::FlowLayout;
