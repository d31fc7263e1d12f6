//! Box layout primitive.
//!
//! A `BoxLayout` is an ordered sequence of slots along one axis. Each slot is
//! a widget, a nested layout, or a spacer. The host resolves slot metrics
//! (size hints, policies) and hands them to [`distribute`] and [`place_cross`]
//! to compute geometry.

use crate::primitives::{Margins, Rect};

use super::widget::Alignment;
use super::{LayoutId, Orientation, WidgetId};

// =========================================================================
// Slot types
// =========================================================================

/// A spacer occupying layout space without rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spacer {
    /// A spacer of fixed extent along the layout axis.
    Fixed(i32),
    /// A flexible spacer that claims leftover space.
    Stretch,
}

/// Anything a layout can arrange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutItem {
    Widget(WidgetId),
    Layout(LayoutId),
    Spacer(Spacer),
}

impl LayoutItem {
    pub fn is_spacer(&self) -> bool {
        matches!(self, LayoutItem::Spacer(_))
    }

    pub fn is_stretch(&self) -> bool {
        matches!(self, LayoutItem::Spacer(Spacer::Stretch))
    }

    pub fn widget(&self) -> Option<WidgetId> {
        match self {
            LayoutItem::Widget(id) => Some(*id),
            _ => None,
        }
    }

    pub fn layout(&self) -> Option<LayoutId> {
        match self {
            LayoutItem::Layout(id) => Some(*id),
            _ => None,
        }
    }
}

/// One position in a box layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoxSlot {
    pub item: LayoutItem,
    /// Share of leftover main-axis space relative to sibling stretch factors.
    pub stretch: u32,
    /// Cell alignment; `None` lets the item fill its cell.
    pub alignment: Option<Alignment>,
}

impl BoxSlot {
    pub fn new(item: LayoutItem, stretch: u32) -> Self {
        Self {
            item,
            stretch,
            alignment: None,
        }
    }
}

/// What a layout is installed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutParent {
    Widget(WidgetId),
    Layout(LayoutId),
}

// =========================================================================
// BoxLayout
// =========================================================================

/// An ordered row or column of slots.
#[derive(Debug, Clone)]
pub struct BoxLayout {
    pub(crate) orientation: Orientation,
    pub(crate) slots: Vec<BoxSlot>,
    pub(crate) spacing: i32,
    pub(crate) margins: Margins,
    pub(crate) parent: Option<LayoutParent>,
    pub(crate) geometry: Rect,
}

impl BoxLayout {
    pub(crate) fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            slots: Vec::new(),
            spacing: 0,
            margins: Margins::ZERO,
            parent: None,
            geometry: Rect::ZERO,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Slots in layout order.
    pub fn slots(&self) -> &[BoxSlot] {
        &self.slots
    }

    pub fn count(&self) -> usize {
        self.slots.len()
    }

    pub fn spacing(&self) -> i32 {
        self.spacing
    }

    pub fn contents_margins(&self) -> Margins {
        self.margins
    }

    pub fn parent(&self) -> Option<LayoutParent> {
        self.parent
    }

    /// Last geometry assigned by the host.
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    /// Number of flexible spacers currently in the layout.
    pub fn stretch_count(&self) -> usize {
        self.slots.iter().filter(|s| s.item.is_stretch()).count()
    }

    pub fn index_of_widget(&self, id: WidgetId) -> Option<usize> {
        self.slots.iter().position(|s| s.item == LayoutItem::Widget(id))
    }

    pub fn index_of_layout(&self, id: LayoutId) -> Option<usize> {
        self.slots.iter().position(|s| s.item == LayoutItem::Layout(id))
    }

    /// Insert a slot; an index outside `0..=count` appends.
    pub(crate) fn insert_slot(&mut self, index: usize, slot: BoxSlot) -> usize {
        let index = index.min(self.slots.len());
        self.slots.insert(index, slot);
        index
    }

    pub(crate) fn push_slot(&mut self, slot: BoxSlot) -> usize {
        self.slots.push(slot);
        self.slots.len() - 1
    }

    pub(crate) fn take_at(&mut self, index: usize) -> Option<BoxSlot> {
        if index < self.slots.len() {
            Some(self.slots.remove(index))
        } else {
            None
        }
    }
}

// =========================================================================
// Geometry distribution
// =========================================================================

/// Resolved sizing facts for one slot, along the layout's main and cross axes.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SlotMetrics {
    pub hint: i32,
    pub min: i32,
    pub max: i32,
    pub cross_hint: i32,
    pub cross_min: i32,
    pub cross_max: i32,
    pub grows: bool,
    pub shrinks: bool,
    pub expands: bool,
    pub cross_grows: bool,
    pub stretch: u32,
    pub is_spacer: bool,
}

/// Gap inserted before slot `index`. Spacers never get layout spacing.
fn gap_before(metrics: &[SlotMetrics], index: usize, spacing: i32) -> i32 {
    if index == 0 || metrics[index].is_spacer || metrics[index - 1].is_spacer {
        0
    } else {
        spacing
    }
}

/// Total main-axis extent of all hints plus spacing.
pub(crate) fn total_hint(metrics: &[SlotMetrics], spacing: i32) -> i32 {
    (0..metrics.len())
        .map(|i| metrics[i].hint + gap_before(metrics, i, spacing))
        .sum()
}

/// Total main-axis extent of all minimums plus spacing.
pub(crate) fn total_minimum(metrics: &[SlotMetrics], spacing: i32) -> i32 {
    (0..metrics.len())
        .map(|i| metrics[i].min + gap_before(metrics, i, spacing))
        .sum()
}

/// Split `amount` across `weights` proportionally. Rounding remainders go to
/// the earliest weighted entries.
fn share(amount: i32, weights: &[u32]) -> Vec<i32> {
    let total: u64 = weights.iter().map(|w| *w as u64).sum();
    if total == 0 || amount <= 0 {
        return vec![0; weights.len()];
    }
    let mut out: Vec<i32> = weights
        .iter()
        .map(|w| ((amount as u64 * *w as u64) / total) as i32)
        .collect();
    let mut remainder = amount - out.iter().sum::<i32>();
    for (slot, w) in out.iter_mut().zip(weights) {
        if remainder == 0 {
            break;
        }
        if *w > 0 {
            *slot += 1;
            remainder -= 1;
        }
    }
    out
}

/// Compute `(offset, size)` along the main axis for each slot.
///
/// Leftover space goes to slots with a positive stretch factor; without any,
/// to expanding slots; without any, to slots that can grow. A deficit is taken
/// from shrinkable slots in proportion to how far they can shrink.
pub(crate) fn distribute(metrics: &[SlotMetrics], available: i32, spacing: i32) -> Vec<(i32, i32)> {
    let mut sizes: Vec<i32> = metrics.iter().map(|m| m.hint).collect();
    let wanted = total_hint(metrics, spacing);

    if available >= wanted {
        let leftover = available - wanted;
        let weights: Vec<u32> = if metrics.iter().any(|m| m.stretch > 0 && m.grows) {
            metrics.iter().map(|m| if m.grows { m.stretch } else { 0 }).collect()
        } else if metrics.iter().any(|m| m.expands) {
            metrics.iter().map(|m| m.expands as u32).collect()
        } else {
            metrics.iter().map(|m| m.grows as u32).collect()
        };
        for ((size, extra), m) in sizes.iter_mut().zip(share(leftover, &weights)).zip(metrics) {
            *size = (*size + extra).min(m.max.max(m.hint));
        }
    } else {
        let capacity: Vec<u32> = metrics
            .iter()
            .map(|m| if m.shrinks { (m.hint - m.min).max(0) as u32 } else { 0 })
            .collect();
        let total_capacity: i32 = capacity.iter().map(|c| *c as i32).sum();
        let deficit = (wanted - available).min(total_capacity);
        for ((size, cut), m) in sizes.iter_mut().zip(share(deficit, &capacity)).zip(metrics) {
            *size = (*size - cut).max(m.min);
        }
    }

    let mut cursor = 0;
    let mut out = Vec::with_capacity(metrics.len());
    for (i, size) in sizes.into_iter().enumerate() {
        cursor += gap_before(metrics, i, spacing);
        out.push((cursor, size));
        cursor += size;
    }
    out
}

/// Where an alignment positions an item on an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CrossPlacement {
    Start,
    Center,
    End,
}

impl CrossPlacement {
    /// Interpret a native alignment flag for the cross axis of `orientation`.
    /// Flags that position along the main axis do not affect the cross axis.
    pub(crate) fn from_alignment(alignment: Alignment, main: Orientation) -> Option<Self> {
        if alignment.orientation() == main {
            return None;
        }
        Some(match alignment {
            Alignment::Left | Alignment::Top => CrossPlacement::Start,
            Alignment::HCenter | Alignment::VCenter => CrossPlacement::Center,
            Alignment::Right | Alignment::Bottom => CrossPlacement::End,
        })
    }
}

/// Compute `(offset, size)` on the cross axis for one slot.
///
/// An aligned item keeps its hint; an unaligned one fills the cell up to its
/// maximum when its policy lets it grow. Leftover room centers the item.
pub(crate) fn place_cross(m: &SlotMetrics, placement: Option<CrossPlacement>, available: i32) -> (i32, i32) {
    let size = match placement {
        Some(_) => m.cross_hint.min(available),
        None if m.cross_grows => available.min(m.cross_max),
        None => m.cross_hint.min(available),
    }
    .max(m.cross_min.min(available))
    .max(0);

    let offset = match placement.unwrap_or(CrossPlacement::Center) {
        CrossPlacement::Start => 0,
        CrossPlacement::Center => (available - size) / 2,
        CrossPlacement::End => available - size,
    };
    (offset, size)
}
