//! Flow layout - wrapping, left-to-right placement.
//!
//! Items are laid out horizontally until the next one would cross the right
//! edge of the content rectangle, then wrap to a new line. Wrapping is greedy
//! and order-sensitive: first fit, no justification.
//!
//! Adding a widget makes it a child of the widget the layout lives on, so it
//! is destroyed with that widget. Once installed with [`Host::install_flow`]
//! the host drives the layout from its own geometry pass.

use tracing::trace;

use crate::host::{Host, LayoutItem, LayoutParent, Orientation, PixelMetric, WidgetId};
use crate::primitives::{Margins, Point, Rect, Size};

/// Sentinel for "derive from the host style".
const DERIVED: i32 = -1;

// =========================================================================
// FlowLayout
// =========================================================================

/// A wrapping layout with height-for-width sizing.
#[derive(Debug, Clone)]
pub struct FlowLayout {
    /// Items in placement order.
    items: Vec<LayoutItem>,
    /// What the layout is installed on; used to derive spacing and margins.
    parent: Option<LayoutParent>,
    /// Uniform content margin, or [`DERIVED`].
    margin: i32,
    /// Gap between items on a line, or [`DERIVED`].
    horizontal_spacing: i32,
    /// Gap between lines, or [`DERIVED`].
    vertical_spacing: i32,
    /// Last rectangle passed to `set_geometry`.
    geometry: Rect,
}

/// Result of one layout pass.
struct FlowPass {
    placements: Vec<(LayoutItem, Rect)>,
    height: i32,
}

impl FlowLayout {
    /// Create a flow layout. Margin and spacing default to host style values.
    pub fn new(parent: Option<LayoutParent>) -> Self {
        Self {
            items: Vec::new(),
            parent,
            margin: DERIVED,
            horizontal_spacing: DERIVED,
            vertical_spacing: DERIVED,
            geometry: Rect::ZERO,
        }
    }

    /// Set a uniform content margin. Negative derives it from the host.
    pub fn margin(mut self, margin: i32) -> Self {
        self.margin = margin;
        self
    }

    /// Set the gap between items on a line. Negative derives it from the host.
    pub fn horizontal_spacing(mut self, spacing: i32) -> Self {
        self.horizontal_spacing = spacing;
        self
    }

    /// Set the gap between lines. Negative derives it from the host.
    pub fn vertical_spacing(mut self, spacing: i32) -> Self {
        self.vertical_spacing = spacing;
        self
    }

    /// Append an item. A widget is reparented onto the widget this layout
    /// lives on, or left without a parent when the layout has no owner yet.
    pub fn add_item(&mut self, host: &mut Host, item: LayoutItem) {
        if let LayoutItem::Widget(widget) = item {
            let owner = self.owner(host);
            host.set_widget_parent(widget, owner);
        }
        self.items.push(item);
    }

    pub fn add_widget(&mut self, host: &mut Host, widget: WidgetId) {
        self.add_item(host, LayoutItem::Widget(widget));
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn item_at(&self, index: usize) -> Option<&LayoutItem> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[LayoutItem] {
        &self.items
    }

    pub fn take_at(&mut self, index: usize) -> Option<LayoutItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn parent(&self) -> Option<LayoutParent> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<LayoutParent>) {
        self.parent = parent;
    }

    /// Drop every reference to a destroyed widget.
    pub(crate) fn forget_widget(&mut self, widget: WidgetId) {
        self.items.retain(|item| *item != LayoutItem::Widget(widget));
    }

    /// The widget this layout ultimately lives on.
    fn owner(&self, host: &Host) -> Option<WidgetId> {
        match self.parent? {
            LayoutParent::Widget(widget) => Some(widget),
            LayoutParent::Layout(id) => host.layout_host_widget(id),
        }
    }

    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    /// A flow layout never claims leftover space on either axis.
    pub fn expanding_directions(&self) -> Option<Orientation> {
        None
    }

    pub fn has_height_for_width(&self) -> bool {
        true
    }

    // ---------------------------------------------------------------------
    // Metrics
    // ---------------------------------------------------------------------

    /// Content margins; a derived margin is the style's layout margin on a
    /// widget and zero inside another layout.
    pub fn contents_margins(&self, host: &Host) -> Margins {
        if self.margin >= 0 {
            return Margins::all(self.margin);
        }
        match self.parent {
            Some(LayoutParent::Widget(_)) => Margins::all(host.style().pixel_metric(PixelMetric::LayoutMargin)),
            _ => Margins::ZERO,
        }
    }

    /// Configured horizontal spacing, or the parent's when derived. `-1` if
    /// neither is known.
    pub fn effective_horizontal_spacing(&self, host: &Host) -> i32 {
        if self.horizontal_spacing >= 0 {
            self.horizontal_spacing
        } else {
            self.smart_spacing(host, PixelMetric::LayoutHorizontalSpacing)
        }
    }

    /// Configured vertical spacing, or the parent's when derived. `-1` if
    /// neither is known.
    pub fn effective_vertical_spacing(&self, host: &Host) -> i32 {
        if self.vertical_spacing >= 0 {
            self.vertical_spacing
        } else {
            self.smart_spacing(host, PixelMetric::LayoutVerticalSpacing)
        }
    }

    fn smart_spacing(&self, host: &Host, metric: PixelMetric) -> i32 {
        match self.parent {
            None => DERIVED,
            Some(LayoutParent::Widget(_)) => host.style().pixel_metric(metric),
            Some(LayoutParent::Layout(id)) => host.layout(id).map_or(DERIVED, |layout| layout.spacing()),
        }
    }

    /// Union of every item's minimum size plus margins.
    pub fn minimum_size(&self, host: &Host) -> Size {
        let size = self
            .items
            .iter()
            .map(|item| host.item_minimum_size(item, Orientation::Horizontal))
            .fold(Size::ZERO, |acc, s| acc.expanded_to(s));
        size + self.contents_margins(host).size()
    }

    pub fn size_hint(&self, host: &Host) -> Size {
        self.minimum_size(host)
    }

    /// Height needed to lay out every item within `width`.
    pub fn height_for_width(&self, host: &Host, width: i32) -> i32 {
        self.compute(host, Rect::new(0, 0, width, 0)).height
    }

    // ---------------------------------------------------------------------
    // Layout
    // ---------------------------------------------------------------------

    /// Place every item inside `rect`.
    pub fn set_geometry(&mut self, host: &mut Host, rect: Rect) {
        self.geometry = rect;
        let pass = self.compute(host, rect);
        for (item, cell) in pass.placements {
            host.set_item_geometry(&item, cell);
        }
    }

    /// One placement pass over `rect`; geometry is only computed, never applied.
    fn compute(&self, host: &Host, rect: Rect) -> FlowPass {
        let margins = self.contents_margins(host);
        let effective = rect.shrunk_by(margins);
        let mut x = effective.x;
        let mut y = effective.y;
        let mut line_height = 0;
        let mut placements = Vec::with_capacity(self.items.len());

        let h_space = match self.effective_horizontal_spacing(host) {
            DERIVED => host.layout_spacing(Orientation::Horizontal),
            n => n,
        };
        let v_space = match self.effective_vertical_spacing(host) {
            DERIVED => host.layout_spacing(Orientation::Vertical),
            n => n,
        };

        for item in &self.items {
            let hint = host.item_size_hint(item, Orientation::Horizontal);
            let mut next_x = x + hint.width + h_space;
            // The right edge is exclusive: an item ending exactly on it fits.
            if next_x - h_space > effective.right() && line_height > 0 {
                x = effective.x;
                y += line_height + v_space;
                next_x = x + hint.width + h_space;
                line_height = 0;
            }
            placements.push((*item, Rect::from_origin_size(Point::new(x, y), hint)));
            x = next_x;
            line_height = line_height.max(hint.height);
        }

        let height = y + line_height - rect.y + margins.bottom;
        trace!(
            width = rect.width,
            items = self.items.len(),
            height,
            "flow pass"
        );
        FlowPass { placements, height }
    }
}
