//! Declarative styling.
//!
//! [`StyleApplier`] turns a flat [`StyleOptions`] set into native size
//! constraints, a size policy and a single style rule scoped to the target's
//! object name. It also keeps the placement side table (stretch factor and
//! self-alignment) that a parent container reads when the widget is attached.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::host::{Host, SizePolicy, WidgetId};
use crate::primitives::Size;

/// Length of generated object names.
const FRESH_ID_LEN: usize = 20;

/// A random object name of lowercase ASCII letters.
pub fn fresh_id() -> String {
    let mut rng = rand::thread_rng();
    (0..FRESH_ID_LEN)
        .map(|_| rng.gen_range(b'a'..=b'z') as char)
        .collect()
}

// =========================================================================
// StyleOptions
// =========================================================================

/// Sizing, visual and placement options for a widget or container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOptions {
    pub size: Option<Size>,
    /// Fixed width.
    pub width: Option<i32>,
    /// Fixed height.
    pub height: Option<i32>,
    pub min_width: Option<i32>,
    pub min_height: Option<i32>,
    pub max_width: Option<i32>,
    pub max_height: Option<i32>,

    /// Share of leftover space in the parent container.
    pub stretch_factor: u32,
    /// Cross-axis keyword for this widget inside its parent container.
    pub self_align: Option<String>,

    pub color: Option<String>,
    pub background_color: Option<String>,
    /// Font size in pixels.
    pub font_size: Option<u32>,
    pub font_weight: Option<String>,
    pub font_family: Option<String>,
    pub border: Option<String>,
    pub padding: Option<String>,

    pub horizontal_expand: bool,
    pub vertical_expand: bool,

    /// Object name; generated when a style rule needs one.
    pub name: Option<String>,
    /// Appended verbatim after the scoped rule.
    pub raw_style: String,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            size: None,
            width: None,
            height: None,
            min_width: None,
            min_height: None,
            max_width: None,
            max_height: None,
            stretch_factor: 0,
            self_align: None,
            color: None,
            background_color: None,
            font_size: None,
            font_weight: None,
            font_family: None,
            border: None,
            padding: None,
            horizontal_expand: true,
            vertical_expand: false,
            name: None,
            raw_style: String::new(),
        }
    }
}

impl StyleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, width: i32, height: i32) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }

    pub fn width(mut self, width: i32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: i32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn min_width(mut self, width: i32) -> Self {
        self.min_width = Some(width);
        self
    }

    pub fn min_height(mut self, height: i32) -> Self {
        self.min_height = Some(height);
        self
    }

    pub fn max_width(mut self, width: i32) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn max_height(mut self, height: i32) -> Self {
        self.max_height = Some(height);
        self
    }

    pub fn stretch(mut self, factor: u32) -> Self {
        self.stretch_factor = factor;
        self
    }

    pub fn self_align(mut self, keyword: impl Into<String>) -> Self {
        self.self_align = Some(keyword.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn background(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    pub fn font_size(mut self, px: u32) -> Self {
        self.font_size = Some(px);
        self
    }

    pub fn font_weight(mut self, weight: impl Into<String>) -> Self {
        self.font_weight = Some(weight.into());
        self
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn border(mut self, border: impl Into<String>) -> Self {
        self.border = Some(border.into());
        self
    }

    pub fn padding(mut self, padding: impl Into<String>) -> Self {
        self.padding = Some(padding.into());
        self
    }

    pub fn expand(mut self, horizontal: bool, vertical: bool) -> Self {
        self.horizontal_expand = horizontal;
        self.vertical_expand = vertical;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn raw_style(mut self, style: impl Into<String>) -> Self {
        self.raw_style = style.into();
        self
    }

    /// Style properties in rule order, one `  prop: value;\n` line each.
    /// Containers leave `padding` to their layout margins.
    fn properties(&self, with_padding: bool) -> String {
        let mut out = String::new();
        let mut push = |property: &str, value: Option<String>| {
            if let Some(value) = value {
                out.push_str(&format!("  {property}: {value};\n"));
            }
        };
        push("border", self.border.clone());
        push("color", self.color.clone());
        push("background-color", self.background_color.clone());
        push("font-size", self.font_size.map(|px| format!("{px}px")));
        push("font-weight", self.font_weight.clone());
        push("font-family", self.font_family.clone());
        if with_padding {
            push("padding", self.padding.clone());
        }
        out
    }
}

/// A style rule that only selects the object called `name`.
pub fn scoped_style_sheet(name: &str, properties: &str, raw: &str) -> String {
    format!("#{name} {{\n{properties}\n}}\n\n{raw}")
}

// =========================================================================
// StyleApplier
// =========================================================================

/// How a widget wants to sit in its parent container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    pub stretch_factor: u32,
    pub self_align: Option<String>,
}

/// Applies [`StyleOptions`] and owns the placement side table.
#[derive(Debug, Default)]
pub struct StyleApplier {
    placements: HashMap<WidgetId, Placement>,
}

impl StyleApplier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Style a leaf widget. Returns `target` for chaining.
    pub fn apply(&mut self, host: &mut Host, target: WidgetId, options: &StyleOptions) -> WidgetId {
        self.apply_with(host, target, options, SizePolicy::Maximum, true)
    }

    /// Style a container frame: non-expanding axes are fixed and padding is
    /// handled by the caller as layout margins.
    pub fn apply_container(&mut self, host: &mut Host, target: WidgetId, options: &StyleOptions) -> WidgetId {
        self.apply_with(host, target, options, SizePolicy::Fixed, false)
    }

    fn apply_with(
        &mut self,
        host: &mut Host,
        target: WidgetId,
        options: &StyleOptions,
        rigid: SizePolicy,
        with_padding: bool,
    ) -> WidgetId {
        if let Some(size) = options.size {
            host.resize(target, size);
        }
        if let Some(width) = options.width {
            host.set_fixed_width(target, width);
        }
        if let Some(height) = options.height {
            host.set_fixed_height(target, height);
        }
        if let Some(width) = options.min_width {
            host.set_minimum_width(target, width);
        }
        if let Some(height) = options.min_height {
            host.set_minimum_height(target, height);
        }
        if let Some(width) = options.max_width {
            host.set_maximum_width(target, width);
        }
        if let Some(height) = options.max_height {
            host.set_maximum_height(target, height);
        }

        let name = options.name.as_deref().filter(|n| !n.is_empty());
        if let Some(name) = name {
            host.set_object_name(target, name);
        }
        let properties = options.properties(with_padding);
        if !properties.is_empty() || !options.raw_style.is_empty() {
            let name = match name {
                Some(name) => name.to_owned(),
                None => {
                    let generated = fresh_id();
                    host.set_object_name(target, &generated);
                    generated
                }
            };
            host.set_style_sheet(target, &scoped_style_sheet(&name, &properties, &options.raw_style));
        }

        let policy = |expand: bool| if expand { SizePolicy::Expanding } else { rigid };
        host.set_size_policy(target, policy(options.horizontal_expand), policy(options.vertical_expand));

        let placement = Placement {
            stretch_factor: options.stretch_factor,
            self_align: options.self_align.clone(),
        };
        if placement == Placement::default() {
            self.placements.remove(&target);
        } else {
            self.placements.insert(target, placement);
        }
        target
    }

    /// Placement recorded for a widget, if any differs from the default.
    pub fn placement(&self, id: WidgetId) -> Option<&Placement> {
        self.placements.get(&id)
    }

    pub fn stretch_factor(&self, id: WidgetId) -> u32 {
        self.placement(id).map_or(0, |p| p.stretch_factor)
    }

    pub fn self_align(&self, id: WidgetId) -> Option<&str> {
        self.placement(id).and_then(|p| p.self_align.as_deref())
    }

    /// Drop entries for widgets the host no longer has.
    pub fn prune(&mut self, host: &Host) {
        self.placements.retain(|id, _| host.is_alive(*id));
    }
}
