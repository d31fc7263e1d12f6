//! Headless widget host.
//!
//! The host is the retained-mode substrate the declarative layer drives. It
//! owns every widget and box layout in an arena keyed by process-unique ids,
//! provides the native operations containers need (ordered slot insertion
//! and removal, alignment, geometry assignment), emits widget signals, and
//! implements deferred deletion.
//!
//! # Threading
//!
//! The host is single-threaded. All mutation happens on the thread that owns
//! it, typically inside an event callback.
//!
//! # Deferred deletion
//!
//! [`Host::delete_later`] only queues a widget. It is destroyed by the next
//! [`Host::process_events`], i.e. after the current event step completes, so
//! a callback can safely schedule the deletion of the widget that invoked it.
//! [`Host::delete_layout_later`] does the same for a detached box layout.
//!
//! # Flow layouts
//!
//! A widget owns either a box layout or a [`FlowLayout`]. An installed flow
//! layout is driven like a box layout: [`Host::set_geometry`] places its
//! items and [`Host::height_for_width`] reports the height it needs.

pub mod box_layout;
pub mod style;
pub mod widget;

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::layout::FlowLayout;
use crate::primitives::{Margins, Rect, Size};

pub use box_layout::{BoxLayout, BoxSlot, LayoutItem, LayoutParent, Spacer};
pub use style::{HostStyle, PixelMetric};
pub use widget::{ActionPosition, Alignment, EchoMode, Pixmap, SizePolicy, WidgetKind, WidgetNode};

use box_layout::{CrossPlacement, SlotMetrics};

// =========================================================================
// Identifiers
// =========================================================================

/// Counter shared by widget and layout ids.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, AtomicOrdering::Relaxed)
}

/// Identity of a widget in a [`Host`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u64);

impl WidgetId {
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

/// Identity of a box layout in a [`Host`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayoutId(u64);

impl LayoutId {
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

/// A layout or geometry axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// The perpendicular axis.
    pub fn cross(&self) -> Orientation {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    /// Component of `size` along this axis.
    pub fn main_of(&self, size: Size) -> i32 {
        match self {
            Orientation::Horizontal => size.width,
            Orientation::Vertical => size.height,
        }
    }

    /// Build a size from main- and cross-axis extents.
    pub fn size(&self, main: i32, cross: i32) -> Size {
        match self {
            Orientation::Horizontal => Size::new(main, cross),
            Orientation::Vertical => Size::new(cross, main),
        }
    }
}

type ClickHandler = Box<dyn FnMut(&mut Host)>;
type TextChangedHandler = Box<dyn FnMut(&mut Host, &str)>;

// =========================================================================
// Host
// =========================================================================

/// The widget arena.
pub struct Host {
    widgets: HashMap<WidgetId, WidgetNode>,
    layouts: HashMap<LayoutId, BoxLayout>,
    /// Flow layouts keyed by the widget they are installed on.
    flows: HashMap<WidgetId, FlowLayout>,
    style: HostStyle,
    pending_deletes: Vec<WidgetId>,
    pending_layout_deletes: Vec<LayoutId>,
    click_handlers: HashMap<WidgetId, Vec<ClickHandler>>,
    text_handlers: HashMap<WidgetId, Vec<TextChangedHandler>>,
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("widgets", &self.widgets.len())
            .field("layouts", &self.layouts.len())
            .field("flows", &self.flows.len())
            .field("pending_deletes", &self.pending_deletes.len())
            .field("pending_layout_deletes", &self.pending_layout_deletes.len())
            .finish()
    }
}

impl Host {
    /// Create a host with the default style metrics.
    pub fn new() -> Self {
        Self::with_style(HostStyle::default())
    }

    pub fn with_style(style: HostStyle) -> Self {
        Self {
            widgets: HashMap::new(),
            layouts: HashMap::new(),
            flows: HashMap::new(),
            style,
            pending_deletes: Vec::new(),
            pending_layout_deletes: Vec::new(),
            click_handlers: HashMap::new(),
            text_handlers: HashMap::new(),
        }
    }

    pub fn style(&self) -> &HostStyle {
        &self.style
    }

    // ---------------------------------------------------------------------
    // Widgets
    // ---------------------------------------------------------------------

    pub fn create_widget(&mut self, kind: WidgetKind) -> WidgetId {
        let id = WidgetId(next_id());
        self.widgets.insert(id, WidgetNode::new(kind));
        id
    }

    /// Create a widget and set its text in one step.
    pub fn create_widget_with_text(&mut self, kind: WidgetKind, text: &str) -> WidgetId {
        let id = self.create_widget(kind);
        self.with_node(id, |node| node.text = text.to_owned());
        id
    }

    pub fn widget(&self, id: WidgetId) -> Option<&WidgetNode> {
        self.widgets.get(&id)
    }

    pub fn is_alive(&self, id: WidgetId) -> bool {
        self.widgets.contains_key(&id)
    }

    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    fn with_node(&mut self, id: WidgetId, f: impl FnOnce(&mut WidgetNode)) {
        if let Some(node) = self.widgets.get_mut(&id) {
            f(node);
        }
    }

    pub fn text(&self, id: WidgetId) -> Option<&str> {
        self.widget(id).map(|w| w.text())
    }

    /// Set a widget's text. Editable widgets emit `text_changed` on change.
    pub fn set_text(&mut self, id: WidgetId, text: &str) {
        let Some(node) = self.widgets.get_mut(&id) else {
            return;
        };
        if node.text == text {
            return;
        }
        node.text = text.to_owned();
        if node.kind.is_editable() {
            self.emit_text_changed(id, text);
        }
    }

    pub fn set_placeholder(&mut self, id: WidgetId, placeholder: &str) {
        self.with_node(id, |node| node.placeholder = Some(placeholder.to_owned()));
    }

    pub fn set_object_name(&mut self, id: WidgetId, name: &str) {
        self.with_node(id, |node| node.object_name = Some(name.to_owned()));
    }

    pub fn set_style_sheet(&mut self, id: WidgetId, sheet: &str) {
        self.with_node(id, |node| node.style_sheet = sheet.to_owned());
    }

    /// Resize the widget without touching its constraints.
    pub fn resize(&mut self, id: WidgetId, size: Size) {
        let Some(node) = self.widgets.get(&id) else {
            return;
        };
        let size = size.clamped(node.min_size, node.max_size);
        let rect = Rect::from_origin_size(node.geometry.origin(), size);
        self.set_geometry(id, rect);
    }

    pub fn set_fixed_width(&mut self, id: WidgetId, width: i32) {
        self.with_node(id, |node| {
            node.min_size.width = width;
            node.max_size.width = width;
        });
    }

    pub fn set_fixed_height(&mut self, id: WidgetId, height: i32) {
        self.with_node(id, |node| {
            node.min_size.height = height;
            node.max_size.height = height;
        });
    }

    pub fn set_minimum_width(&mut self, id: WidgetId, width: i32) {
        self.with_node(id, |node| node.min_size.width = width);
    }

    pub fn set_minimum_height(&mut self, id: WidgetId, height: i32) {
        self.with_node(id, |node| node.min_size.height = height);
    }

    pub fn set_maximum_width(&mut self, id: WidgetId, width: i32) {
        self.with_node(id, |node| node.max_size.width = width);
    }

    pub fn set_maximum_height(&mut self, id: WidgetId, height: i32) {
        self.with_node(id, |node| node.max_size.height = height);
    }

    pub fn set_size_policy(&mut self, id: WidgetId, horizontal: SizePolicy, vertical: SizePolicy) {
        self.with_node(id, |node| node.policy = (horizontal, vertical));
    }

    /// Override the preferred size the widget's kind would report.
    pub fn set_intrinsic_size(&mut self, id: WidgetId, size: Size) {
        self.with_node(id, |node| node.intrinsic = Some(size));
    }

    pub fn set_text_alignment(&mut self, id: WidgetId, alignment: Alignment) {
        self.with_node(id, |node| node.text_alignment = Some(alignment));
    }

    pub fn set_echo_mode(&mut self, id: WidgetId, mode: EchoMode) {
        self.with_node(id, |node| node.echo_mode = mode);
    }

    /// Restrict a line edit to integer input.
    pub fn set_int_validator(&mut self, id: WidgetId, enabled: bool) {
        self.with_node(id, |node| node.int_only = enabled);
    }

    pub fn add_action(&mut self, id: WidgetId, icon: &str, position: ActionPosition) {
        self.with_node(id, |node| node.actions.push((position, icon.to_owned())));
    }

    pub fn set_pixmap(&mut self, id: WidgetId, pixmap: Pixmap) {
        self.with_node(id, |node| node.pixmap = Some(pixmap));
    }

    /// Preferred size of a widget; a widget owning a layout reports the layout's.
    pub fn size_hint(&self, id: WidgetId) -> Size {
        let Some(node) = self.widget(id) else {
            return Size::ZERO;
        };
        if node.intrinsic.is_none() {
            if let Some(flow) = self.flows.get(&id) {
                return flow.size_hint(self);
            }
        }
        match node.layout {
            Some(lid) if node.intrinsic.is_none() => self.layout_size_hint(lid),
            _ => node.base_hint(),
        }
    }

    /// Smallest size a widget can usefully take.
    pub fn minimum_size_hint(&self, id: WidgetId) -> Size {
        let Some(node) = self.widget(id) else {
            return Size::ZERO;
        };
        if node.intrinsic.is_none() {
            if let Some(flow) = self.flows.get(&id) {
                return flow.minimum_size(self);
            }
        }
        match node.layout {
            Some(lid) if node.intrinsic.is_none() => self.layout_minimum_size(lid),
            _ => node.base_minimum(),
        }
    }

    pub fn geometry(&self, id: WidgetId) -> Option<Rect> {
        self.widget(id).map(|w| w.geometry)
    }

    /// Assign a widget's geometry and lay out its own layout inside it.
    pub fn set_geometry(&mut self, id: WidgetId, rect: Rect) {
        let Some(node) = self.widgets.get_mut(&id) else {
            return;
        };
        node.geometry = rect;
        let inner = Rect::new(0, 0, rect.width, rect.height);
        if let Some(lid) = node.layout {
            self.set_layout_geometry(lid, inner);
        }
        // Out of the map for the pass, which needs the host mutably.
        if let Some(mut flow) = self.flows.remove(&id) {
            flow.set_geometry(self, inner);
            self.flows.insert(id, flow);
        }
    }

    /// Height the flow layout installed on `id` needs at `width`, or `None`
    /// when the widget has no flow layout.
    pub fn height_for_width(&self, id: WidgetId, width: i32) -> Option<i32> {
        self.flows.get(&id).map(|flow| flow.height_for_width(self, width))
    }

    // ---------------------------------------------------------------------
    // Signals
    // ---------------------------------------------------------------------

    /// Connect a handler to a widget's `clicked` signal.
    pub fn on_clicked(&mut self, id: WidgetId, handler: impl FnMut(&mut Host) + 'static) {
        self.click_handlers.entry(id).or_default().push(Box::new(handler));
    }

    /// Connect a handler to a widget's `text_changed` signal.
    pub fn on_text_changed(&mut self, id: WidgetId, handler: impl FnMut(&mut Host, &str) + 'static) {
        self.text_handlers.entry(id).or_default().push(Box::new(handler));
    }

    /// Simulate a click, invoking every connected handler in connection order.
    pub fn click(&mut self, id: WidgetId) {
        let Some(mut handlers) = self.click_handlers.remove(&id) else {
            return;
        };
        for handler in handlers.iter_mut() {
            handler(self);
        }
        // Handlers connected during dispatch were stored under a fresh entry.
        if let Some(added) = self.click_handlers.remove(&id) {
            handlers.extend(added);
        }
        if self.is_alive(id) {
            self.click_handlers.insert(id, handlers);
        }
    }

    fn emit_text_changed(&mut self, id: WidgetId, text: &str) {
        let Some(mut handlers) = self.text_handlers.remove(&id) else {
            return;
        };
        for handler in handlers.iter_mut() {
            handler(self, text);
        }
        if let Some(added) = self.text_handlers.remove(&id) {
            handlers.extend(added);
        }
        if self.is_alive(id) {
            self.text_handlers.insert(id, handlers);
        }
    }

    // ---------------------------------------------------------------------
    // Deferred deletion
    // ---------------------------------------------------------------------

    /// Schedule a widget for destruction at the end of the current event step.
    pub fn delete_later(&mut self, id: WidgetId) {
        if self.is_alive(id) && !self.pending_deletes.contains(&id) {
            self.pending_deletes.push(id);
        }
    }

    /// Schedule a box layout for destruction at the end of the current event
    /// step. Nested layouts still in it go too; its widgets do not.
    pub fn delete_layout_later(&mut self, id: LayoutId) {
        if self.layouts.contains_key(&id) && !self.pending_layout_deletes.contains(&id) {
            self.pending_layout_deletes.push(id);
        }
    }

    /// Widgets queued for destruction.
    pub fn pending_deletions(&self) -> &[WidgetId] {
        &self.pending_deletes
    }

    /// Finish the current event step: destroy every widget queued with
    /// [`Host::delete_later`] and every layout queued with
    /// [`Host::delete_layout_later`]. Returns the number of widgets
    /// destroyed, descendants included.
    pub fn process_events(&mut self) -> usize {
        let mut destroyed = 0;
        while !self.pending_deletes.is_empty() || !self.pending_layout_deletes.is_empty() {
            let queue = std::mem::take(&mut self.pending_deletes);
            for id in queue {
                destroyed += self.destroy(id);
            }
            let layouts = std::mem::take(&mut self.pending_layout_deletes);
            for lid in layouts {
                self.destroy_layout(lid);
            }
        }
        destroyed
    }

    fn destroy(&mut self, id: WidgetId) -> usize {
        if !self.is_alive(id) {
            return 0;
        }
        let mut destroyed = 0;
        let children: Vec<WidgetId> = self
            .widgets
            .iter()
            .filter(|(_, node)| node.parent == Some(id))
            .map(|(child, _)| *child)
            .collect();
        for child in children {
            destroyed += self.destroy(child);
        }

        self.detach_from_layouts(id);
        for flow in self.flows.values_mut() {
            flow.forget_widget(id);
        }
        self.flows.remove(&id);
        if let Some(lid) = self.widgets.get(&id).and_then(|node| node.layout) {
            self.drop_layout(lid);
        }
        self.widgets.remove(&id);
        self.click_handlers.remove(&id);
        self.text_handlers.remove(&id);
        destroyed + 1
    }

    /// Drop a layout that may still be referenced: its slot in a parent
    /// layout and its owner widget's handle go with it.
    fn destroy_layout(&mut self, lid: LayoutId) {
        if !self.layouts.contains_key(&lid) {
            return;
        }
        for layout in self.layouts.values_mut() {
            layout.slots.retain(|slot| slot.item != LayoutItem::Layout(lid));
        }
        for node in self.widgets.values_mut() {
            if node.layout == Some(lid) {
                node.layout = None;
            }
        }
        self.drop_layout(lid);
    }

    fn drop_layout(&mut self, lid: LayoutId) {
        if let Some(layout) = self.layouts.remove(&lid) {
            for slot in layout.slots {
                if let LayoutItem::Layout(child) = slot.item {
                    self.drop_layout(child);
                }
            }
        }
    }

    // ---------------------------------------------------------------------
    // Box layouts
    // ---------------------------------------------------------------------

    /// Create a free-standing box layout.
    pub fn create_box_layout(&mut self, orientation: Orientation) -> LayoutId {
        let id = LayoutId(next_id());
        self.layouts.insert(id, BoxLayout::new(orientation));
        id
    }

    /// Install `layout` as the layout of `widget`. Ignored when the widget
    /// already owns a flow layout.
    pub fn install_layout(&mut self, widget: WidgetId, layout: LayoutId) {
        if !self.is_alive(widget) || !self.layouts.contains_key(&layout) || self.flows.contains_key(&widget) {
            return;
        }
        self.with_node(widget, |node| node.layout = Some(layout));
        if let Some(l) = self.layouts.get_mut(&layout) {
            l.parent = Some(LayoutParent::Widget(widget));
        }
        self.reparent_layout_widgets(layout);
    }

    pub fn layout(&self, id: LayoutId) -> Option<&BoxLayout> {
        self.layouts.get(&id)
    }

    // ---------------------------------------------------------------------
    // Flow layouts
    // ---------------------------------------------------------------------

    /// Install `flow` on `widget`, which takes ownership of it: the flow's
    /// widgets become children of `widget` and die with it. Returns `false`,
    /// dropping `flow`, when the widget is gone or already owns a box layout.
    pub fn install_flow(&mut self, widget: WidgetId, mut flow: FlowLayout) -> bool {
        if self.widget(widget).is_none_or(|node| node.layout.is_some()) {
            return false;
        }
        flow.set_parent(Some(LayoutParent::Widget(widget)));
        for item in flow.items() {
            if let LayoutItem::Widget(child) = *item {
                self.set_widget_parent(child, Some(widget));
            }
        }
        self.flows.insert(widget, flow);
        true
    }

    /// The flow layout installed on `widget`.
    pub fn flow(&self, widget: WidgetId) -> Option<&FlowLayout> {
        self.flows.get(&widget)
    }

    /// Add a widget to the flow layout installed on `owner`. Returns `false`
    /// when `owner` has no flow layout.
    pub fn add_flow_widget(&mut self, owner: WidgetId, widget: WidgetId) -> bool {
        let Some(mut flow) = self.flows.remove(&owner) else {
            return false;
        };
        flow.add_widget(self, widget);
        self.flows.insert(owner, flow);
        true
    }

    pub fn set_spacing(&mut self, id: LayoutId, spacing: i32) {
        if let Some(layout) = self.layouts.get_mut(&id) {
            layout.spacing = spacing.max(0);
        }
    }

    pub fn set_contents_margins(&mut self, id: LayoutId, margins: Margins) {
        if let Some(layout) = self.layouts.get_mut(&id) {
            layout.margins = margins;
        }
    }

    /// The widget a layout ultimately lives on, following nested layouts upward.
    pub fn layout_host_widget(&self, id: LayoutId) -> Option<WidgetId> {
        let mut current = id;
        loop {
            match self.layouts.get(&current)?.parent? {
                LayoutParent::Widget(widget) => return Some(widget),
                LayoutParent::Layout(parent) => current = parent,
            }
        }
    }

    fn reparent_layout_widgets(&mut self, id: LayoutId) {
        let owner = self.layout_host_widget(id);
        let Some(layout) = self.layouts.get(&id) else {
            return;
        };
        let items: Vec<LayoutItem> = layout.slots.iter().map(|s| s.item).collect();
        for item in items {
            match item {
                LayoutItem::Widget(widget) => self.with_node(widget, |node| node.parent = owner),
                LayoutItem::Layout(child) => self.reparent_layout_widgets(child),
                LayoutItem::Spacer(_) => {}
            }
        }
    }

    /// Set a widget's parent; used by layouts that live outside the arena.
    pub(crate) fn set_widget_parent(&mut self, id: WidgetId, parent: Option<WidgetId>) {
        self.with_node(id, |node| node.parent = parent);
    }

    /// Remove a widget from whatever layout currently holds it.
    fn detach_from_layouts(&mut self, id: WidgetId) {
        for layout in self.layouts.values_mut() {
            layout.slots.retain(|slot| slot.item != LayoutItem::Widget(id));
        }
    }

    fn insert_slot(&mut self, id: LayoutId, index: Option<usize>, slot: BoxSlot) -> Option<usize> {
        let layout = self.layouts.get_mut(&id)?;
        Some(match index {
            Some(index) => layout.insert_slot(index, slot),
            None => layout.push_slot(slot),
        })
    }

    /// Add a widget at the end of a layout.
    pub fn add_widget(&mut self, id: LayoutId, widget: WidgetId, stretch: u32) -> bool {
        self.place_widget(id, None, widget, stretch)
    }

    /// Insert a widget at `index`; an out-of-range index appends.
    pub fn insert_widget(&mut self, id: LayoutId, index: usize, widget: WidgetId, stretch: u32) -> bool {
        self.place_widget(id, Some(index), widget, stretch)
    }

    fn place_widget(&mut self, id: LayoutId, index: Option<usize>, widget: WidgetId, stretch: u32) -> bool {
        if !self.is_alive(widget) || !self.layouts.contains_key(&id) {
            return false;
        }
        self.detach_from_layouts(widget);
        self.insert_slot(id, index, BoxSlot::new(LayoutItem::Widget(widget), stretch));
        let owner = self.layout_host_widget(id);
        self.with_node(widget, |node| node.parent = owner);
        true
    }

    /// Add a nested layout at the end of a layout.
    pub fn add_layout(&mut self, id: LayoutId, child: LayoutId, stretch: u32) -> bool {
        self.place_layout(id, None, child, stretch)
    }

    /// Insert a nested layout at `index`; an out-of-range index appends.
    pub fn insert_layout(&mut self, id: LayoutId, index: usize, child: LayoutId, stretch: u32) -> bool {
        self.place_layout(id, Some(index), child, stretch)
    }

    fn place_layout(&mut self, id: LayoutId, index: Option<usize>, child: LayoutId, stretch: u32) -> bool {
        if id == child || !self.layouts.contains_key(&id) || !self.layouts.contains_key(&child) {
            return false;
        }
        self.insert_slot(id, index, BoxSlot::new(LayoutItem::Layout(child), stretch));
        if let Some(l) = self.layouts.get_mut(&child) {
            l.parent = Some(LayoutParent::Layout(id));
        }
        self.reparent_layout_widgets(child);
        true
    }

    /// Add a flexible spacer at the end of a layout.
    pub fn add_stretch(&mut self, id: LayoutId, stretch: u32) {
        self.insert_slot(id, None, BoxSlot::new(LayoutItem::Spacer(Spacer::Stretch), stretch));
    }

    /// Insert a flexible spacer at `index`; an out-of-range index appends.
    pub fn insert_stretch(&mut self, id: LayoutId, index: usize, stretch: u32) {
        self.insert_slot(
            id,
            Some(index),
            BoxSlot::new(LayoutItem::Spacer(Spacer::Stretch), stretch),
        );
    }

    /// Add a fixed-size spacer at the end of a layout.
    pub fn add_spacing(&mut self, id: LayoutId, size: i32) {
        self.insert_slot(id, None, BoxSlot::new(LayoutItem::Spacer(Spacer::Fixed(size)), 0));
    }

    /// Insert a fixed-size spacer at `index`; an out-of-range index appends.
    pub fn insert_spacing(&mut self, id: LayoutId, index: usize, size: i32) {
        self.insert_slot(
            id,
            Some(index),
            BoxSlot::new(LayoutItem::Spacer(Spacer::Fixed(size)), 0),
        );
    }

    /// Remove and return the slot item at `index`.
    pub fn take_at(&mut self, id: LayoutId, index: usize) -> Option<LayoutItem> {
        self.layouts.get_mut(&id)?.take_at(index).map(|slot| slot.item)
    }

    /// Remove a widget from a layout and detach it from its parent.
    /// Returns `false` if the widget is not in this layout.
    pub fn remove_widget(&mut self, id: LayoutId, widget: WidgetId) -> bool {
        let Some(index) = self.layouts.get(&id).and_then(|l| l.index_of_widget(widget)) else {
            return false;
        };
        self.take_at(id, index);
        self.with_node(widget, |node| node.parent = None);
        true
    }

    /// Remove a nested layout slot. The nested layout keeps its own slots.
    pub fn remove_layout(&mut self, id: LayoutId, child: LayoutId) -> bool {
        let Some(index) = self.layouts.get(&id).and_then(|l| l.index_of_layout(child)) else {
            return false;
        };
        self.take_at(id, index);
        if let Some(l) = self.layouts.get_mut(&child) {
            l.parent = None;
        }
        true
    }

    /// Put `new` in the slot `old` occupies, keeping stretch and alignment.
    /// Returns the slot index, or `None` if `old` is not in this layout.
    pub fn replace_widget(&mut self, id: LayoutId, old: WidgetId, new: WidgetId) -> Option<usize> {
        if old == new || !self.is_alive(new) {
            return None;
        }
        self.layouts.get(&id)?.index_of_widget(old)?;
        self.detach_from_layouts(new);
        let layout = self.layouts.get_mut(&id)?;
        let index = layout.index_of_widget(old)?;
        layout.slots[index].item = LayoutItem::Widget(new);

        let owner = self.layout_host_widget(id);
        self.with_node(new, |node| node.parent = owner);
        self.with_node(old, |node| node.parent = None);
        Some(index)
    }

    /// Set the cell alignment of a widget or nested layout already in `id`.
    pub fn set_alignment(&mut self, id: LayoutId, item: LayoutItem, alignment: Alignment) -> bool {
        let Some(layout) = self.layouts.get_mut(&id) else {
            return false;
        };
        match layout.slots.iter_mut().find(|slot| slot.item == item) {
            Some(slot) => {
                slot.alignment = Some(alignment);
                true
            }
            None => false,
        }
    }

    /// Take every slot out of a layout, recursively emptying nested layouts
    /// and detaching their widgets.
    pub fn clear_layout(&mut self, id: LayoutId) {
        let Some(layout) = self.layouts.get_mut(&id) else {
            return;
        };
        let slots = std::mem::take(&mut layout.slots);
        for slot in slots {
            match slot.item {
                LayoutItem::Widget(widget) => self.with_node(widget, |node| node.parent = None),
                LayoutItem::Layout(child) => {
                    self.clear_layout(child);
                    if let Some(l) = self.layouts.get_mut(&child) {
                        l.parent = None;
                    }
                }
                LayoutItem::Spacer(_) => {}
            }
        }
    }

    // ---------------------------------------------------------------------
    // Layout item sizing
    // ---------------------------------------------------------------------

    /// Spacing between two push-button-style controls, used when a layout
    /// leaves spacing to the platform.
    pub fn layout_spacing(&self, orientation: Orientation) -> i32 {
        self.style.push_button_spacing(orientation)
    }

    /// Preferred size of a widget as a layout item: hint bounded by constraints.
    pub fn widget_item_size_hint(&self, id: WidgetId) -> Size {
        let Some(node) = self.widget(id) else {
            return Size::ZERO;
        };
        self.size_hint(id).expanded_to(node.min_size).bounded_to(node.max_size)
    }

    /// Minimum size of a widget as a layout item, honouring its size policy.
    pub fn widget_item_minimum_size(&self, id: WidgetId) -> Size {
        let Some(node) = self.widget(id) else {
            return Size::ZERO;
        };
        let hint = self.size_hint(id);
        let min_hint = self.minimum_size_hint(id);
        let pick = |policy: SizePolicy, hint: i32, min_hint: i32| {
            if policy.can_shrink() { min_hint } else { hint }
        };
        Size::new(
            pick(node.policy.0, hint.width, min_hint.width),
            pick(node.policy.1, hint.height, min_hint.height),
        )
        .expanded_to(node.min_size)
        .bounded_to(node.max_size)
    }

    /// Maximum size of a widget as a layout item, honouring its size policy.
    pub fn widget_item_maximum_size(&self, id: WidgetId) -> Size {
        let Some(node) = self.widget(id) else {
            return Size::ZERO;
        };
        let hint = self.widget_item_size_hint(id);
        let pick = |policy: SizePolicy, hint: i32, max: i32| if policy.can_grow() { max } else { hint };
        Size::new(
            pick(node.policy.0, hint.width, node.max_size.width),
            pick(node.policy.1, hint.height, node.max_size.height),
        )
    }

    /// Preferred size of any layout item placed in a layout of `orientation`.
    pub fn item_size_hint(&self, item: &LayoutItem, orientation: Orientation) -> Size {
        match item {
            LayoutItem::Widget(id) => self.widget_item_size_hint(*id),
            LayoutItem::Layout(id) => self.layout_size_hint(*id),
            LayoutItem::Spacer(Spacer::Fixed(n)) => orientation.size(*n, 0),
            LayoutItem::Spacer(Spacer::Stretch) => Size::ZERO,
        }
    }

    /// Minimum size of any layout item placed in a layout of `orientation`.
    pub fn item_minimum_size(&self, item: &LayoutItem, orientation: Orientation) -> Size {
        match item {
            LayoutItem::Widget(id) => self.widget_item_minimum_size(*id),
            LayoutItem::Layout(id) => self.layout_minimum_size(*id),
            LayoutItem::Spacer(Spacer::Fixed(n)) => orientation.size(*n, 0),
            LayoutItem::Spacer(Spacer::Stretch) => Size::ZERO,
        }
    }

    /// Assign geometry to any layout item.
    pub fn set_item_geometry(&mut self, item: &LayoutItem, rect: Rect) {
        match item {
            LayoutItem::Widget(id) => self.set_geometry(*id, rect),
            LayoutItem::Layout(id) => self.set_layout_geometry(*id, rect),
            LayoutItem::Spacer(_) => {}
        }
    }

    /// Whether an item claims leftover space along `axis`.
    fn item_expands(&self, item: &LayoutItem, parent: Orientation, axis: Orientation) -> bool {
        match item {
            LayoutItem::Widget(id) => self
                .widget(*id)
                .is_some_and(|node| node.policy_along(axis).expands()),
            LayoutItem::Layout(id) => self.layout(*id).is_some_and(|layout| {
                layout
                    .slots
                    .iter()
                    .any(|slot| self.item_expands(&slot.item, layout.orientation, axis))
            }),
            LayoutItem::Spacer(Spacer::Stretch) => parent == axis,
            LayoutItem::Spacer(Spacer::Fixed(_)) => false,
        }
    }

    fn item_grows(&self, item: &LayoutItem, parent: Orientation, axis: Orientation) -> bool {
        match item {
            LayoutItem::Widget(id) => self
                .widget(*id)
                .is_some_and(|node| node.policy_along(axis).can_grow()),
            LayoutItem::Layout(_) => true,
            LayoutItem::Spacer(Spacer::Stretch) => parent == axis,
            LayoutItem::Spacer(Spacer::Fixed(_)) => false,
        }
    }

    fn item_shrinks(&self, item: &LayoutItem, axis: Orientation) -> bool {
        match item {
            LayoutItem::Widget(id) => self
                .widget(*id)
                .is_some_and(|node| node.policy_along(axis).can_shrink()),
            LayoutItem::Layout(_) | LayoutItem::Spacer(Spacer::Stretch) => true,
            LayoutItem::Spacer(Spacer::Fixed(_)) => false,
        }
    }

    fn slot_metrics(&self, slot: &BoxSlot, orientation: Orientation) -> SlotMetrics {
        let cross = orientation.cross();
        let hint = self.item_size_hint(&slot.item, orientation);
        let min = self.item_minimum_size(&slot.item, orientation);
        let max = match &slot.item {
            LayoutItem::Widget(id) => self.widget_item_maximum_size(*id),
            LayoutItem::Layout(_) | LayoutItem::Spacer(Spacer::Stretch) => Size::MAX,
            LayoutItem::Spacer(Spacer::Fixed(_)) => hint,
        };
        SlotMetrics {
            hint: orientation.main_of(hint),
            min: orientation.main_of(min),
            max: orientation.main_of(max),
            cross_hint: cross.main_of(hint),
            cross_min: cross.main_of(min),
            cross_max: cross.main_of(max),
            grows: self.item_grows(&slot.item, orientation, orientation),
            shrinks: self.item_shrinks(&slot.item, orientation),
            expands: self.item_expands(&slot.item, orientation, orientation),
            cross_grows: self.item_grows(&slot.item, orientation, cross),
            stretch: slot.stretch,
            is_spacer: slot.item.is_spacer(),
        }
    }

    fn layout_metrics(&self, layout: &BoxLayout) -> Vec<SlotMetrics> {
        layout
            .slots
            .iter()
            .map(|slot| self.slot_metrics(slot, layout.orientation))
            .collect()
    }

    /// Preferred size of a box layout including its margins.
    pub fn layout_size_hint(&self, id: LayoutId) -> Size {
        let Some(layout) = self.layout(id) else {
            return Size::ZERO;
        };
        let metrics = self.layout_metrics(layout);
        let main = box_layout::total_hint(&metrics, layout.spacing);
        let cross = metrics.iter().map(|m| m.cross_hint).max().unwrap_or(0);
        layout.orientation.size(main, cross) + layout.margins.size()
    }

    /// Minimum size of a box layout including its margins.
    pub fn layout_minimum_size(&self, id: LayoutId) -> Size {
        let Some(layout) = self.layout(id) else {
            return Size::ZERO;
        };
        let metrics = self.layout_metrics(layout);
        let main = box_layout::total_minimum(&metrics, layout.spacing);
        let cross = metrics.iter().map(|m| m.cross_min).max().unwrap_or(0);
        layout.orientation.size(main, cross) + layout.margins.size()
    }

    /// Lay out every slot of a box layout inside `rect`.
    pub fn set_layout_geometry(&mut self, id: LayoutId, rect: Rect) {
        let Some(layout) = self.layout(id) else {
            return;
        };
        let orientation = layout.orientation;
        let content = rect.shrunk_by(layout.margins);
        let metrics = self.layout_metrics(layout);
        let main_avail = orientation.main_of(content.size());
        let cross_avail = orientation.cross().main_of(content.size());
        let placed = box_layout::distribute(&metrics, main_avail, layout.spacing);

        let assignments: Vec<(LayoutItem, Rect)> = layout
            .slots
            .iter()
            .zip(metrics.iter())
            .zip(placed)
            .map(|((slot, m), (offset, size))| {
                let placement = slot
                    .alignment
                    .and_then(|a| CrossPlacement::from_alignment(a, orientation));
                let (cross_offset, cross_size) = box_layout::place_cross(m, placement, cross_avail);
                let cell = match orientation {
                    Orientation::Horizontal => {
                        Rect::new(content.x + offset, content.y + cross_offset, size, cross_size)
                    }
                    Orientation::Vertical => {
                        Rect::new(content.x + cross_offset, content.y + offset, cross_size, size)
                    }
                };
                (slot.item, cell)
            })
            .collect();

        if let Some(layout) = self.layouts.get_mut(&id) {
            layout.geometry = rect;
        }
        for (item, cell) in assignments {
            self.set_item_geometry(&item, cell);
        }
    }
}
