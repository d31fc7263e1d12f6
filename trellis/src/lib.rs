//! Trellis: declarative rows, columns, flows and forms.
//!
//! Trellis is a layout and styling layer over a retained-mode widget host.
//! It provides:
//! - Row / column containers with flexbox-style justification (`start`,
//!   `center`, `end`, `even`) and per-axis cross alignment
//! - Incremental mutation (append, insert, remove, clear) that keeps the
//!   justification spacers consistent without rebuilding
//! - A wrapping flow layout with height-for-width sizing
//! - Scoped style rules and a label/field form builder
//!
//! # Architecture
//!
//! The [`host`] module is the substrate: an arena of widgets and box layouts
//! keyed by ids. [`Ui`] pairs the host with the [`StyleApplier`], whose side
//! table records how each widget wants to be placed in its parent.
//!
//! # Usage
//!
//! ```ignore
//! use trellis::{Ui, Row, LayoutConfig, Justify, widgets};
//!
//! let mut ui = Ui::new();
//! let ok = widgets::button(&mut ui, "OK", Default::default());
//! let cancel = widgets::button(&mut ui, "Cancel", Default::default());
//! let row = Row::new(&mut ui, &LayoutConfig::new().justify(Justify::End), [ok.into(), cancel.into()])?;
//! ```

// Core primitives
pub mod error;
pub mod primitives;

// Widget host substrate
pub mod host;

// Styling and placement metadata
pub mod style;

// Containers and flow layout
pub mod layout;

// Leaf widgets and forms
pub mod form;
pub mod widgets;

pub use error::ConfigError;
pub use form::{Form, FormFields, FormOptions, create_form};
pub use host::{Host, HostStyle, LayoutId, Orientation, WidgetId, WidgetKind};
pub use layout::{Axis, BoxContainer, Child, ChildSlot, Column, FlowLayout, Justify, LayoutConfig, Paddings, Row, Spacing};
pub use primitives::{Margins, Point, Rect, Size};
pub use style::{Placement, StyleApplier, StyleOptions};

/// The host plus the styling side table: everything a container needs.
#[derive(Debug, Default)]
pub struct Ui {
    pub host: Host,
    pub styles: StyleApplier,
}

impl Ui {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: HostStyle) -> Self {
        Self {
            host: Host::with_style(style),
            styles: StyleApplier::new(),
        }
    }

    /// End the current event step: run deferred deletions and forget
    /// placement records of destroyed widgets.
    pub fn process_events(&mut self) -> usize {
        let destroyed = self.host.process_events();
        if destroyed > 0 {
            self.styles.prune(&self.host);
        }
        destroyed
    }
}
