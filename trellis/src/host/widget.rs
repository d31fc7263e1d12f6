//! Widget nodes held by the host arena.
//!
//! A `WidgetNode` carries the native properties the declarative layer drives:
//! size constraints, size policy, object name, style sheet, and the handful of
//! per-kind properties (placeholder, echo mode, validator) leaf widgets expose.

use serde::{Deserialize, Serialize};

use crate::primitives::{Rect, Size};

use super::{LayoutId, Orientation, WidgetId};

/// Approximate advance of one character of the default UI font.
pub const CHAR_WIDTH: i32 = 8;
/// Height of one line of the default UI font.
pub const LINE_HEIGHT: i32 = 18;

// =========================================================================
// Enumerations
// =========================================================================

/// The primitive widget types the host provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// Plain container surface, typically owning a box layout.
    Frame,
    Label,
    Button,
    /// Single-line text field.
    LineEdit,
    /// Multi-line editable text.
    TextArea,
    /// Multi-line read-only rich text.
    TextBrowser,
    /// Thin horizontal divider.
    HorizontalLine,
    /// Thin vertical divider.
    VerticalLine,
}

impl WidgetKind {
    /// Separator lines expand along their length and must never be aligned,
    /// otherwise they collapse to zero length.
    pub fn is_separator(&self) -> bool {
        matches!(self, WidgetKind::HorizontalLine | WidgetKind::VerticalLine)
    }

    /// Whether the kind carries user-editable text.
    pub fn is_editable(&self) -> bool {
        matches!(self, WidgetKind::LineEdit | WidgetKind::TextArea)
    }

    /// Default size policy (horizontal, vertical) of a freshly created widget.
    pub fn default_policy(&self) -> (SizePolicy, SizePolicy) {
        match self {
            WidgetKind::Frame | WidgetKind::Label => (SizePolicy::Preferred, SizePolicy::Preferred),
            WidgetKind::Button => (SizePolicy::Minimum, SizePolicy::Fixed),
            WidgetKind::LineEdit => (SizePolicy::Expanding, SizePolicy::Fixed),
            WidgetKind::TextArea | WidgetKind::TextBrowser => {
                (SizePolicy::Expanding, SizePolicy::Expanding)
            }
            WidgetKind::HorizontalLine => (SizePolicy::Expanding, SizePolicy::Fixed),
            WidgetKind::VerticalLine => (SizePolicy::Fixed, SizePolicy::Expanding),
        }
    }

    /// Intrinsic preferred size for the given text content.
    pub(crate) fn intrinsic_size(&self, text: &str) -> Size {
        let text_width = text.chars().count() as i32 * CHAR_WIDTH;
        match self {
            WidgetKind::Frame => Size::ZERO,
            WidgetKind::Label => Size::new(text_width, LINE_HEIGHT),
            WidgetKind::Button => Size::new((text_width + 24).max(80), LINE_HEIGHT + 12),
            WidgetKind::LineEdit => Size::new(160, LINE_HEIGHT + 10),
            WidgetKind::TextArea | WidgetKind::TextBrowser => Size::new(256, 192),
            WidgetKind::HorizontalLine => Size::new(0, 1),
            WidgetKind::VerticalLine => Size::new(1, 0),
        }
    }

    /// Smallest size the kind can render legibly.
    pub(crate) fn intrinsic_minimum(&self, text: &str) -> Size {
        match self {
            WidgetKind::LineEdit => Size::new(60, LINE_HEIGHT + 10),
            WidgetKind::TextArea | WidgetKind::TextBrowser => Size::new(64, 64),
            _ => self.intrinsic_size(text),
        }
    }
}

/// How a widget's extent along one axis reacts to available space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizePolicy {
    /// Exactly the size hint.
    Fixed,
    /// The hint is a minimum; may grow.
    Minimum,
    /// The hint is a maximum; may shrink.
    Maximum,
    /// The hint is preferred; may grow or shrink.
    #[default]
    Preferred,
    /// Actively claims any leftover space.
    Expanding,
}

impl SizePolicy {
    pub fn can_grow(&self) -> bool {
        matches!(self, SizePolicy::Minimum | SizePolicy::Preferred | SizePolicy::Expanding)
    }

    pub fn can_shrink(&self) -> bool {
        matches!(self, SizePolicy::Maximum | SizePolicy::Preferred | SizePolicy::Expanding)
    }

    pub fn expands(&self) -> bool {
        matches!(self, SizePolicy::Expanding)
    }
}

/// Native alignment flags used when placing an item inside its layout cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    Left,
    Right,
    HCenter,
    Top,
    Bottom,
    VCenter,
}

impl Alignment {
    /// The axis this alignment positions along.
    pub fn orientation(&self) -> Orientation {
        match self {
            Alignment::Left | Alignment::Right | Alignment::HCenter => Orientation::Horizontal,
            Alignment::Top | Alignment::Bottom | Alignment::VCenter => Orientation::Vertical,
        }
    }
}

/// How a line edit displays what is typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EchoMode {
    #[default]
    Normal,
    NoEcho,
    Password,
    PasswordEchoOnEdit,
}

/// Where an inline action icon sits inside a line edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPosition {
    Leading,
    Trailing,
}

/// An image shown by a label, optionally scaled to a width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    pub path: String,
    pub scaled_width: Option<i32>,
}

// =========================================================================
// WidgetNode
// =========================================================================

/// A widget in the host arena.
#[derive(Debug, Clone)]
pub struct WidgetNode {
    pub(crate) kind: WidgetKind,
    pub(crate) text: String,
    pub(crate) placeholder: Option<String>,
    pub(crate) object_name: Option<String>,
    pub(crate) style_sheet: String,
    /// Overrides the kind's intrinsic size hint.
    pub(crate) intrinsic: Option<Size>,
    pub(crate) min_size: Size,
    pub(crate) max_size: Size,
    pub(crate) policy: (SizePolicy, SizePolicy),
    pub(crate) geometry: Rect,
    pub(crate) parent: Option<WidgetId>,
    pub(crate) layout: Option<LayoutId>,
    pub(crate) text_alignment: Option<Alignment>,
    pub(crate) echo_mode: EchoMode,
    pub(crate) int_only: bool,
    pub(crate) actions: Vec<(ActionPosition, String)>,
    pub(crate) pixmap: Option<Pixmap>,
}

impl WidgetNode {
    pub(crate) fn new(kind: WidgetKind) -> Self {
        Self {
            kind,
            text: String::new(),
            placeholder: None,
            object_name: None,
            style_sheet: String::new(),
            intrinsic: None,
            min_size: Size::ZERO,
            max_size: Size::MAX,
            policy: kind.default_policy(),
            geometry: Rect::ZERO,
            parent: None,
            layout: None,
            text_alignment: None,
            echo_mode: EchoMode::Normal,
            int_only: false,
            actions: Vec::new(),
            pixmap: None,
        }
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn object_name(&self) -> Option<&str> {
        self.object_name.as_deref()
    }

    pub fn style_sheet(&self) -> &str {
        &self.style_sheet
    }

    pub fn minimum_size(&self) -> Size {
        self.min_size
    }

    pub fn maximum_size(&self) -> Size {
        self.max_size
    }

    /// Size policy as (horizontal, vertical).
    pub fn size_policy(&self) -> (SizePolicy, SizePolicy) {
        self.policy
    }

    /// Size policy along one axis.
    pub fn policy_along(&self, orientation: Orientation) -> SizePolicy {
        match orientation {
            Orientation::Horizontal => self.policy.0,
            Orientation::Vertical => self.policy.1,
        }
    }

    /// Geometry relative to the parent widget.
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    /// The box layout this widget owns, if any.
    pub fn layout(&self) -> Option<LayoutId> {
        self.layout
    }

    pub fn text_alignment(&self) -> Option<Alignment> {
        self.text_alignment
    }

    pub fn echo_mode(&self) -> EchoMode {
        self.echo_mode
    }

    pub fn is_int_only(&self) -> bool {
        self.int_only
    }

    pub fn actions(&self) -> &[(ActionPosition, String)] {
        &self.actions
    }

    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Intrinsic preferred size before min/max constraints are applied.
    pub(crate) fn base_hint(&self) -> Size {
        if let Some(size) = self.intrinsic {
            return size;
        }
        if let Some(pixmap) = &self.pixmap {
            let side = pixmap.scaled_width.unwrap_or(32);
            return Size::new(side, side);
        }
        self.kind.intrinsic_size(&self.text)
    }

    pub(crate) fn base_minimum(&self) -> Size {
        if let Some(size) = self.intrinsic {
            return size;
        }
        if self.pixmap.is_some() {
            return self.base_hint();
        }
        self.kind.intrinsic_minimum(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_are_flagged() {
        assert!(WidgetKind::HorizontalLine.is_separator());
        assert!(WidgetKind::VerticalLine.is_separator());
        assert!(!WidgetKind::Label.is_separator());
    }

    #[test]
    fn button_hint_grows_with_text() {
        let short = WidgetKind::Button.intrinsic_size("Ok");
        let long = WidgetKind::Button.intrinsic_size("A considerably longer caption");
        assert_eq!(short.width, 80);
        assert!(long.width > short.width);
    }

    #[test]
    fn policy_flags() {
        assert!(SizePolicy::Expanding.expands());
        assert!(!SizePolicy::Fixed.can_grow());
        assert!(!SizePolicy::Minimum.can_shrink());
        assert!(SizePolicy::Maximum.can_shrink());
    }
}
