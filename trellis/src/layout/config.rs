//! Container configuration.
//!
//! Keyword types for main-axis justification, spacing and paddings, plus the
//! `LayoutConfig` a row or column consumes at construction. All of them load
//! from JSON; invalid keywords surface as [`ConfigError`] messages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;
use crate::host::{Alignment, LayoutId, Orientation, WidgetId};
use crate::primitives::Margins;
use crate::style::StyleOptions;

// =========================================================================
// Axis
// =========================================================================

/// Direction a box container arranges its children in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Row,
    Column,
}

impl Axis {
    pub fn orientation(&self) -> Orientation {
        match self {
            Axis::Row => Orientation::Horizontal,
            Axis::Column => Orientation::Vertical,
        }
    }

    /// Resolve a cross-axis keyword against this axis' table.
    ///
    /// Rows accept `center`, `top`, `bottom`; columns accept `center`,
    /// `left`, `right`.
    pub fn alignment(&self, keyword: &str) -> Result<Alignment, ConfigError> {
        let alignment = match (self, keyword) {
            (Axis::Row, "center") => Alignment::VCenter,
            (Axis::Row, "top") => Alignment::Top,
            (Axis::Row, "bottom") => Alignment::Bottom,
            (Axis::Column, "center") => Alignment::HCenter,
            (Axis::Column, "left") => Alignment::Left,
            (Axis::Column, "right") => Alignment::Right,
            _ => {
                return Err(ConfigError::InvalidAlign {
                    keyword: keyword.to_owned(),
                    axis: *self,
                });
            }
        };
        Ok(alignment)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => f.write_str("row"),
            Axis::Column => f.write_str("column"),
        }
    }
}

// =========================================================================
// Justify
// =========================================================================

/// Main-axis distribution of leftover space. Absence means no spacers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Justify {
    /// Slack after the children.
    Start,
    /// Slack split before and after the children.
    Center,
    /// Slack before the children.
    End,
    /// Slack between every adjacent pair, none at the ends.
    Even,
}

impl Justify {
    pub fn as_str(&self) -> &'static str {
        match self {
            Justify::Start => "start",
            Justify::Center => "center",
            Justify::End => "end",
            Justify::Even => "even",
        }
    }

    /// Whether an empty container of this mode holds a leading spacer.
    pub fn has_leading_spacer(&self) -> bool {
        matches!(self, Justify::Center | Justify::End)
    }

    /// Whether an empty container of this mode holds a trailing spacer.
    pub fn has_trailing_spacer(&self) -> bool {
        matches!(self, Justify::Start | Justify::Center)
    }
}

impl fmt::Display for Justify {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Justify {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Justify::Start),
            "center" => Ok(Justify::Center),
            "end" => Ok(Justify::End),
            "even" => Ok(Justify::Even),
            other => Err(ConfigError::InvalidJustify(other.to_owned())),
        }
    }
}

impl Serialize for Justify {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Justify {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let keyword = String::deserialize(deserializer)?;
        keyword.parse().map_err(serde::de::Error::custom)
    }
}

// =========================================================================
// Spacing
// =========================================================================

/// Gap between adjacent children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spacing {
    /// A fixed gap in pixels.
    Fixed(u32),
    /// No gap; leftover space is spread evenly between children instead.
    /// Equivalent to `Justify::Even`.
    Auto,
}

impl Default for Spacing {
    fn default() -> Self {
        Spacing::Fixed(10)
    }
}

impl FromStr for Spacing {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "auto" {
            return Ok(Spacing::Auto);
        }
        s.parse::<i64>()
            .map(Spacing::from_signed)
            .map_err(|_| ConfigError::InvalidSpacing(s.to_owned()))
    }
}

impl Spacing {
    /// Negative gaps clamp to zero.
    fn from_signed(value: i64) -> Self {
        Spacing::Fixed(value.clamp(0, u32::MAX as i64) as u32)
    }
}

impl Serialize for Spacing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Spacing::Fixed(n) => serializer.serialize_u32(*n),
            Spacing::Auto => serializer.serialize_str("auto"),
        }
    }
}

impl<'de> Deserialize<'de> for Spacing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Keyword(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Spacing::from_signed(n)),
            Raw::Keyword(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

// =========================================================================
// Paddings
// =========================================================================

/// Inner padding of a container, applied as its layout margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Paddings {
    Uniform(i32),
    /// `(left, top, right, bottom)`.
    Sides(i32, i32, i32, i32),
}

impl Default for Paddings {
    fn default() -> Self {
        Paddings::Uniform(0)
    }
}

impl Paddings {
    pub fn to_margins(&self) -> Margins {
        match *self {
            Paddings::Uniform(n) => Margins::all(n),
            Paddings::Sides(left, top, right, bottom) => Margins::new(left, top, right, bottom),
        }
    }
}

// =========================================================================
// LayoutConfig
// =========================================================================

/// Construction-time configuration of a row or column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub justify: Option<Justify>,
    /// Cross-axis keyword applied to every child; see [`Axis::alignment`].
    pub align: Option<String>,
    pub spacing: Spacing,
    pub paddings: Paddings,
    /// Sizing, styling and placement of the container itself.
    pub style: StyleOptions,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            justify: None,
            align: None,
            spacing: Spacing::default(),
            paddings: Paddings::default(),
            style: StyleOptions::default().expand(true, true),
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn justify(mut self, justify: Justify) -> Self {
        self.justify = Some(justify);
        self
    }

    pub fn align(mut self, keyword: impl Into<String>) -> Self {
        self.align = Some(keyword.into());
        self
    }

    pub fn spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn paddings(mut self, paddings: Paddings) -> Self {
        self.paddings = paddings;
        self
    }

    pub fn style(mut self, style: StyleOptions) -> Self {
        self.style = style;
        self
    }

    /// The effective justify mode, folding `Spacing::Auto` into `Even`.
    pub fn resolved_justify(&self) -> Result<Option<Justify>, ConfigError> {
        match (self.spacing, self.justify) {
            (Spacing::Auto, None | Some(Justify::Even)) => Ok(Some(Justify::Even)),
            (Spacing::Auto, Some(other)) => Err(ConfigError::ConflictingSpacing(other.to_string())),
            (Spacing::Fixed(_), justify) => Ok(justify),
        }
    }

    /// Layout spacing in pixels. Even distribution always uses zero.
    pub fn effective_spacing(&self, justify: Option<Justify>) -> i32 {
        match (justify, self.spacing) {
            (Some(Justify::Even), _) | (_, Spacing::Auto) => 0,
            (_, Spacing::Fixed(n)) => n.min(i32::MAX as u32) as i32,
        }
    }
}

// =========================================================================
// Child slots
// =========================================================================

/// One entry of a container's construction list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildSlot {
    Widget(WidgetId),
    Layout(LayoutId),
    /// A flexible spacer consuming leftover space.
    Stretch,
    /// A fixed spacer of the given size.
    Spacing(i32),
}

/// Shorthand for a fixed spacer slot.
pub fn spacing(size: i32) -> ChildSlot {
    ChildSlot::Spacing(size)
}

impl From<WidgetId> for ChildSlot {
    fn from(id: WidgetId) -> Self {
        ChildSlot::Widget(id)
    }
}

impl From<LayoutId> for ChildSlot {
    fn from(id: LayoutId) -> Self {
        ChildSlot::Layout(id)
    }
}

impl FromStr for ChildSlot {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "stretch" {
            return Ok(ChildSlot::Stretch);
        }
        match s.strip_prefix("spacing:") {
            Some(value) => value
                .trim()
                .parse()
                .map(ChildSlot::Spacing)
                .map_err(|_| ConfigError::InvalidSpacing(s.to_owned())),
            None => Err(ConfigError::UnknownSentinel(s.to_owned())),
        }
    }
}
