//! Row and column containers.
//!
//! A container is a frame widget owning a box layout. Besides its children
//! the layout holds flexible spacers that implement the justify mode:
//!
//! ```text
//! start   | A B C ~ |
//! end     | ~ A B C |
//! center  | ~ A B C ~ |
//! even    | A ~ B ~ C |
//! none    | A B C |
//! ```
//!
//! Every mutation derives its slot position from the current layout so the
//! spacer pattern above holds after each call, without rebuilding.

use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::Ui;
use crate::error::ConfigError;
use crate::host::{Alignment, BoxSlot, Host, LayoutId, LayoutItem, WidgetId, WidgetKind};

use super::config::{Axis, ChildSlot, Justify, LayoutConfig};

// =========================================================================
// Child
// =========================================================================

/// A visible child: a widget or a nested layout. Spacers never appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Child {
    Widget(WidgetId),
    Layout(LayoutId),
}

impl Child {
    pub fn item(&self) -> LayoutItem {
        match *self {
            Child::Widget(id) => LayoutItem::Widget(id),
            Child::Layout(id) => LayoutItem::Layout(id),
        }
    }

    pub fn widget(&self) -> Option<WidgetId> {
        match *self {
            Child::Widget(id) => Some(id),
            Child::Layout(_) => None,
        }
    }
}

impl From<WidgetId> for Child {
    fn from(id: WidgetId) -> Self {
        Child::Widget(id)
    }
}

impl From<LayoutId> for Child {
    fn from(id: LayoutId) -> Self {
        Child::Layout(id)
    }
}

impl From<Child> for ChildSlot {
    fn from(child: Child) -> Self {
        match child {
            Child::Widget(id) => ChildSlot::Widget(id),
            Child::Layout(id) => ChildSlot::Layout(id),
        }
    }
}

// =========================================================================
// BoxContainer
// =========================================================================

/// Shared implementation of [`Row`] and [`Column`].
#[derive(Debug)]
pub struct BoxContainer {
    axis: Axis,
    frame: WidgetId,
    layout: LayoutId,
    justify: Option<Justify>,
    /// Cross-axis alignment applied to every child.
    align: Option<Alignment>,
    children: Vec<Child>,
}

impl BoxContainer {
    /// Validate `config`, create the frame and emit one layout slot per entry
    /// of `children` plus the spacers the justify mode calls for.
    ///
    /// Nothing is created when validation fails.
    pub fn new(
        ui: &mut Ui,
        axis: Axis,
        config: &LayoutConfig,
        children: impl IntoIterator<Item = ChildSlot>,
    ) -> Result<Self, ConfigError> {
        let slots: Vec<ChildSlot> = children.into_iter().collect();

        let justify = config.resolved_justify()?;
        if justify.is_some() && slots.contains(&ChildSlot::Stretch) {
            return Err(ConfigError::StretchWithJustify);
        }
        let align = config
            .align
            .as_deref()
            .map(|keyword| axis.alignment(keyword))
            .transpose()?;
        let alignments = slots
            .iter()
            .map(|slot| match visible(slot) {
                Some(child) => cell_alignment(ui, axis, align, child),
                None => Ok(None),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let frame = ui.host.create_widget(WidgetKind::Frame);
        let layout = ui.host.create_box_layout(axis.orientation());
        ui.host.install_layout(frame, layout);
        ui.styles.apply_container(&mut ui.host, frame, &config.style);
        ui.host.set_contents_margins(layout, config.paddings.to_margins());
        ui.host.set_spacing(layout, config.effective_spacing(justify));

        let mut container = Self {
            axis,
            frame,
            layout,
            justify,
            align,
            children: Vec::with_capacity(slots.len()),
        };

        if justify.is_some_and(|j| j.has_leading_spacer()) {
            ui.host.add_stretch(layout, 0);
        }
        let visible_count = slots.iter().filter(|slot| visible(slot).is_some()).count();
        for (slot, alignment) in slots.iter().zip(alignments) {
            match *slot {
                ChildSlot::Stretch => ui.host.add_stretch(layout, 0),
                ChildSlot::Spacing(size) => ui.host.add_spacing(layout, size),
                ChildSlot::Widget(_) | ChildSlot::Layout(_) => {
                    let Some(child) = visible(slot) else { continue };
                    container.attach(ui, None, child, alignment);
                    container.children.push(child);
                    if justify == Some(Justify::Even) && container.children.len() < visible_count {
                        ui.host.add_stretch(layout, 0);
                    }
                }
            }
        }
        if justify.is_some_and(|j| j.has_trailing_spacer()) {
            ui.host.add_stretch(layout, 0);
        }

        debug!(
            axis = %axis,
            justify = ?justify,
            children = container.children.len(),
            slots = container.slots(&ui.host).len(),
            "built container"
        );
        Ok(container)
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The frame widget hosting the layout; this is what a parent attaches.
    pub fn frame(&self) -> WidgetId {
        self.frame
    }

    pub fn layout(&self) -> LayoutId {
        self.layout
    }

    pub fn justify(&self) -> Option<Justify> {
        self.justify
    }

    /// Visible children in order.
    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn contains(&self, child: impl Into<Child>) -> bool {
        self.children.contains(&child.into())
    }

    /// The layout's slot sequence, spacers included.
    pub fn slots<'h>(&self, host: &'h Host) -> &'h [BoxSlot] {
        host.layout(self.layout).map(|layout| layout.slots()).unwrap_or(&[])
    }

    /// Add a child after the existing ones.
    pub fn append(&mut self, ui: &mut Ui, child: impl Into<Child>) -> Result<(), ConfigError> {
        let child = child.into();
        let alignment = cell_alignment(ui, self.axis, self.align, child)?;
        match self.justify {
            Some(Justify::Even) => {
                if !self.children.is_empty() {
                    ui.host.add_stretch(self.layout, 0);
                }
                self.attach(ui, None, child, alignment);
            }
            Some(Justify::Start | Justify::Center) => {
                // Before the trailing spacer; stretch sentinels are rejected
                // under a justify mode, so the last stretch is that spacer.
                let at = self.slots(&ui.host).iter().rposition(|s| s.item.is_stretch());
                self.attach(ui, at, child, alignment);
            }
            Some(Justify::End) | None => self.attach(ui, None, child, alignment),
        }
        self.children.push(child);
        debug!(justify = ?self.justify, children = self.children.len(), "appended child");
        Ok(())
    }

    /// Insert a child before the child currently at `index`. A negative or
    /// out-of-range index appends.
    pub fn insert(&mut self, ui: &mut Ui, index: isize, child: impl Into<Child>) -> Result<(), ConfigError> {
        let child = child.into();
        let Some(index) = usize::try_from(index).ok().filter(|i| *i < self.children.len()) else {
            return self.append(ui, child);
        };
        let Some(anchor) = self.slot_of(&ui.host, self.children[index]) else {
            return self.append(ui, child);
        };
        let alignment = cell_alignment(ui, self.axis, self.align, child)?;

        if self.justify == Some(Justify::Even) {
            if index == 0 {
                self.attach(ui, Some(anchor), child, alignment);
                ui.host.insert_stretch(self.layout, anchor + 1, 0);
            } else {
                ui.host.insert_stretch(self.layout, anchor, 0);
                self.attach(ui, Some(anchor), child, alignment);
            }
        } else {
            self.attach(ui, Some(anchor), child, alignment);
        }
        self.children.insert(index, child);
        debug!(index, justify = ?self.justify, children = self.children.len(), "inserted child");
        Ok(())
    }

    /// Detach a child. A child not in this container is ignored.
    ///
    /// With `delete_also` the child is scheduled for deferred deletion and
    /// stays alive until the host finishes the current event step. A nested
    /// layout is emptied first, so only the layout object goes; its widgets
    /// are detached, not deleted.
    pub fn remove(&mut self, ui: &mut Ui, child: impl Into<Child>, delete_also: bool) {
        let child = child.into();
        let Some(index) = self.children.iter().position(|c| *c == child) else {
            debug!(?child, "remove: not a child, ignoring");
            return;
        };

        if self.justify == Some(Justify::Even) && self.children.len() > 1 {
            let adjacent = self
                .slot_of(&ui.host, child)
                .and_then(|slot| adjacent_stretch(self.slots(&ui.host), slot, index == 0));
            if let Some(adjacent) = adjacent {
                ui.host.take_at(self.layout, adjacent);
            }
        }

        match child {
            Child::Widget(id) => {
                ui.host.remove_widget(self.layout, id);
                if delete_also {
                    ui.host.delete_later(id);
                }
            }
            Child::Layout(id) => {
                ui.host.clear_layout(id);
                ui.host.remove_layout(self.layout, id);
                if delete_also {
                    ui.host.delete_layout_later(id);
                }
            }
        }
        self.children.remove(index);
        debug!(index, justify = ?self.justify, children = self.children.len(), "removed child");
    }

    /// Detach every slot and restore the spacers of an empty container.
    pub fn clear(&mut self, ui: &mut Ui) {
        ui.host.clear_layout(self.layout);
        self.children.clear();
        if self.justify.is_some_and(|j| j.has_leading_spacer()) {
            ui.host.add_stretch(self.layout, 0);
        }
        if self.justify.is_some_and(|j| j.has_trailing_spacer()) {
            ui.host.add_stretch(self.layout, 0);
        }
        debug!(justify = ?self.justify, "cleared container");
    }

    /// The visible child before `child`.
    pub fn pre_sibling(&self, child: impl Into<Child>) -> Option<Child> {
        let index = self.position(child.into())?;
        index.checked_sub(1).map(|i| self.children[i])
    }

    /// The visible child after `child`.
    pub fn next_sibling(&self, child: impl Into<Child>) -> Option<Child> {
        let index = self.position(child.into())?;
        self.children.get(index + 1).copied()
    }

    /// Swap `new` into the slot `old` occupies. Returns `false`, changing
    /// nothing, when `old` is not attached to this container or `new` is
    /// already one of its children.
    pub fn replace_widget(&mut self, ui: &mut Ui, old: WidgetId, new: WidgetId, delete_old: bool) -> bool {
        if self.contains(new) {
            debug!(?new, "replace_widget: already a child, ignoring");
            return false;
        }
        if ui.host.replace_widget(self.layout, old, new).is_none() {
            debug!(?old, "replace_widget: not attached, ignoring");
            return false;
        }
        if let Some(index) = self.position(Child::Widget(old)) {
            self.children[index] = Child::Widget(new);
        }
        if delete_old {
            ui.host.delete_later(old);
        }
        true
    }

    /// Schedule deferred deletion of the container frame and its contents.
    pub fn delete(self, ui: &mut Ui) {
        ui.host.delete_later(self.frame);
    }

    fn position(&self, child: Child) -> Option<usize> {
        self.children.iter().position(|c| *c == child)
    }

    fn slot_of(&self, host: &Host, child: Child) -> Option<usize> {
        let item = child.item();
        self.slots(host).iter().position(|slot| slot.item == item)
    }

    /// Place `child` at `slot` (or the end) with its recorded stretch factor.
    fn attach(&self, ui: &mut Ui, slot: Option<usize>, child: Child, alignment: Option<Alignment>) {
        match (child, slot) {
            (Child::Widget(id), None) => {
                let stretch = ui.styles.stretch_factor(id);
                ui.host.add_widget(self.layout, id, stretch);
            }
            (Child::Widget(id), Some(at)) => {
                let stretch = ui.styles.stretch_factor(id);
                ui.host.insert_widget(self.layout, at, id, stretch);
            }
            (Child::Layout(id), None) => {
                ui.host.add_layout(self.layout, id, 0);
            }
            (Child::Layout(id), Some(at)) => {
                ui.host.insert_layout(self.layout, at, id, 0);
            }
        }
        if let Some(alignment) = alignment {
            ui.host.set_alignment(self.layout, child.item(), alignment);
        }
    }
}

/// The flexible spacer separating the child at `slot` from its neighbour:
/// the next one when `forward`, else the previous one. Fixed spacers in
/// between are skipped; a visible item ends the search.
fn adjacent_stretch(slots: &[BoxSlot], slot: usize, forward: bool) -> Option<usize> {
    let is_stretch = |(_, s): &(usize, &BoxSlot)| s.item.is_stretch();
    let between = |(_, s): &(usize, &BoxSlot)| s.item.is_spacer();
    let found = if forward {
        slots.iter().enumerate().skip(slot + 1).take_while(between).find(is_stretch)
    } else {
        slots.iter().enumerate().take(slot).rev().take_while(between).find(is_stretch)
    };
    found.map(|(i, _)| i)
}

fn visible(slot: &ChildSlot) -> Option<Child> {
    match *slot {
        ChildSlot::Widget(id) => Some(Child::Widget(id)),
        ChildSlot::Layout(id) => Some(Child::Layout(id)),
        ChildSlot::Stretch | ChildSlot::Spacing(_) => None,
    }
}

/// Alignment of `child`'s cell: its own self-alignment if recorded, else the
/// container's. Separator lines never take the container's alignment, which
/// would collapse them.
fn cell_alignment(
    ui: &Ui,
    axis: Axis,
    align: Option<Alignment>,
    child: Child,
) -> Result<Option<Alignment>, ConfigError> {
    let Child::Widget(id) = child else {
        return Ok(align);
    };
    let own = ui
        .styles
        .self_align(id)
        .map(|keyword| axis.alignment(keyword))
        .transpose()?;
    let separator = ui.host.widget(id).is_some_and(|node| node.kind().is_separator());
    Ok(own.or(if separator { None } else { align }))
}

// =========================================================================
// Row / Column
// =========================================================================

/// Children arranged left to right.
#[derive(Debug)]
pub struct Row(BoxContainer);

impl Row {
    pub fn new(
        ui: &mut Ui,
        config: &LayoutConfig,
        children: impl IntoIterator<Item = ChildSlot>,
    ) -> Result<Self, ConfigError> {
        BoxContainer::new(ui, Axis::Row, config, children).map(Row)
    }

    pub fn into_inner(self) -> BoxContainer {
        self.0
    }
}

/// Children arranged top to bottom.
#[derive(Debug)]
pub struct Column(BoxContainer);

impl Column {
    pub fn new(
        ui: &mut Ui,
        config: &LayoutConfig,
        children: impl IntoIterator<Item = ChildSlot>,
    ) -> Result<Self, ConfigError> {
        BoxContainer::new(ui, Axis::Column, config, children).map(Column)
    }

    pub fn into_inner(self) -> BoxContainer {
        self.0
    }
}

macro_rules! container_wrapper {
    ($ty:ident) => {
        impl Deref for $ty {
            type Target = BoxContainer;
            fn deref(&self) -> &BoxContainer {
                &self.0
            }
        }

        impl DerefMut for $ty {
            fn deref_mut(&mut self) -> &mut BoxContainer {
                &mut self.0
            }
        }

        impl From<&$ty> for ChildSlot {
            fn from(container: &$ty) -> Self {
                ChildSlot::Widget(container.frame())
            }
        }

        impl From<&$ty> for Child {
            fn from(container: &$ty) -> Self {
                Child::Widget(container.frame())
            }
        }
    };
}

container_wrapper!(Row);
container_wrapper!(Column);

impl From<&BoxContainer> for ChildSlot {
    fn from(container: &BoxContainer) -> Self {
        ChildSlot::Widget(container.frame)
    }
}

impl From<&BoxContainer> for Child {
    fn from(container: &BoxContainer) -> Self {
        Child::Widget(container.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Spacer;
    use crate::style::StyleOptions;

    fn labels(ui: &mut Ui, n: usize) -> Vec<WidgetId> {
        (0..n)
            .map(|i| ui.host.create_widget_with_text(WidgetKind::Label, &format!("label {i}")))
            .collect()
    }

    /// Render the slot sequence as `W`/`L` for children, `~` for stretch and
    /// `_` for fixed spacers.
    fn pattern(ui: &Ui, container: &BoxContainer) -> String {
        container
            .slots(&ui.host)
            .iter()
            .map(|slot| match slot.item {
                LayoutItem::Widget(_) => 'W',
                LayoutItem::Layout(_) => 'L',
                LayoutItem::Spacer(Spacer::Stretch) => '~',
                LayoutItem::Spacer(Spacer::Fixed(_)) => '_',
            })
            .collect()
    }

    #[test]
    fn construct_patterns_per_justify() {
        let cases = [
            (None, "WWW"),
            (Some(Justify::Start), "WWW~"),
            (Some(Justify::End), "~WWW"),
            (Some(Justify::Center), "~WWW~"),
            (Some(Justify::Even), "W~W~W"),
        ];
        for (justify, expected) in cases {
            let mut ui = Ui::new();
            let kids = labels(&mut ui, 3);
            let mut config = LayoutConfig::new();
            config.justify = justify;
            let row = Row::new(&mut ui, &config, kids.iter().copied().map(ChildSlot::from)).unwrap();
            assert_eq!(pattern(&ui, &row), expected, "justify {justify:?}");
            assert_eq!(row.children().len(), 3);
        }
    }

    #[test]
    fn sentinels_become_spacers() {
        let mut ui = Ui::new();
        let kids = labels(&mut ui, 2);
        let column = Column::new(
            &mut ui,
            &LayoutConfig::new(),
            [kids[0].into(), ChildSlot::Stretch, crate::layout::spacing(8), kids[1].into()],
        )
        .unwrap();
        assert_eq!(pattern(&ui, &column), "W~_W");
        assert_eq!(column.children(), &[Child::Widget(kids[0]), Child::Widget(kids[1])]);
    }

    #[test]
    fn even_uses_zero_layout_spacing() {
        let mut ui = Ui::new();
        let row = Row::new(&mut ui, &LayoutConfig::new().justify(Justify::Even), []).unwrap();
        assert_eq!(ui.host.layout(row.layout()).unwrap().spacing(), 0);

        let row = Row::new(&mut ui, &LayoutConfig::new(), []).unwrap();
        assert_eq!(ui.host.layout(row.layout()).unwrap().spacing(), 10);
    }

    #[test]
    fn container_align_skips_separators() {
        let mut ui = Ui::new();
        let label = ui.host.create_widget(WidgetKind::Label);
        let line = ui.host.create_widget(WidgetKind::HorizontalLine);
        let column = Column::new(
            &mut ui,
            &LayoutConfig::new().align("right"),
            [label.into(), line.into()],
        )
        .unwrap();
        let slots = column.slots(&ui.host);
        assert_eq!(slots[0].alignment, Some(Alignment::Right));
        assert_eq!(slots[1].alignment, None);
    }

    #[test]
    fn self_align_and_stretch_come_from_side_table() {
        let mut ui = Ui::new();
        let button = ui.host.create_widget(WidgetKind::Button);
        ui.styles
            .apply(&mut ui.host, button, &StyleOptions::new().stretch(3).self_align("bottom"));
        let row = Row::new(&mut ui, &LayoutConfig::new().align("top"), [button.into()]).unwrap();
        let slot = row.slots(&ui.host)[0];
        assert_eq!(slot.stretch, 3);
        assert_eq!(slot.alignment, Some(Alignment::Bottom));
    }

    #[test]
    fn invalid_self_align_fails_before_mutation() {
        let mut ui = Ui::new();
        let button = ui.host.create_widget(WidgetKind::Button);
        ui.styles
            .apply(&mut ui.host, button, &StyleOptions::new().self_align("left"));
        let widgets_before = ui.host.widget_count();
        let err = Row::new(&mut ui, &LayoutConfig::new(), [button.into()]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAlign { axis: Axis::Row, .. }));
        assert_eq!(ui.host.widget_count(), widgets_before);

        let mut row = Row::new(&mut ui, &LayoutConfig::new(), []).unwrap();
        assert!(row.append(&mut ui, button).is_err());
        assert!(row.is_empty());
        assert_eq!(row.slots(&ui.host).len(), 0);
    }

    #[test]
    fn nested_container_is_a_widget_child() {
        let mut ui = Ui::new();
        let kids = labels(&mut ui, 2);
        let inner = Row::new(&mut ui, &LayoutConfig::new(), kids.iter().copied().map(ChildSlot::from)).unwrap();
        let outer = Column::new(&mut ui, &LayoutConfig::new(), [(&inner).into()]).unwrap();
        assert_eq!(outer.children(), &[Child::Widget(inner.frame())]);
        assert_eq!(ui.host.widget(inner.frame()).unwrap().parent(), Some(outer.frame()));
        assert_eq!(ui.host.widget(kids[0]).unwrap().parent(), Some(inner.frame()));
    }

    #[test]
    fn remove_nested_layout_clears_and_detaches_it() {
        let mut ui = Ui::new();
        let kids = labels(&mut ui, 2);
        let nested = ui.host.create_box_layout(crate::host::Orientation::Horizontal);
        ui.host.add_widget(nested, kids[0], 0);
        let mut column = Column::new(
            &mut ui,
            &LayoutConfig::new().justify(Justify::Even),
            [nested.into(), kids[1].into()],
        )
        .unwrap();
        assert_eq!(pattern(&ui, &column), "L~W");

        column.remove(&mut ui, nested, false);
        assert_eq!(pattern(&ui, &column), "W");
        assert_eq!(ui.host.layout(nested).unwrap().count(), 0);
        assert_eq!(ui.host.widget(kids[0]).unwrap().parent(), None);
    }

    #[test]
    fn replace_widget_updates_children() {
        let mut ui = Ui::new();
        let kids = labels(&mut ui, 3);
        let mut row = Row::new(
            &mut ui,
            &LayoutConfig::new().justify(Justify::Center),
            [kids[0].into(), kids[1].into()],
        )
        .unwrap();

        assert!(row.replace_widget(&mut ui, kids[1], kids[2], true));
        assert_eq!(row.children(), &[Child::Widget(kids[0]), Child::Widget(kids[2])]);
        assert_eq!(row.slots(&ui.host)[2].item, LayoutItem::Widget(kids[2]));
        assert!(ui.host.is_alive(kids[1]));
        ui.process_events();
        assert!(!ui.host.is_alive(kids[1]));

        assert!(!row.replace_widget(&mut ui, kids[1], kids[0], false));
        assert_eq!(row.children(), &[Child::Widget(kids[0]), Child::Widget(kids[2])]);
    }

    #[test]
    fn siblings() {
        let mut ui = Ui::new();
        let kids = labels(&mut ui, 3);
        let stranger = ui.host.create_widget(WidgetKind::Label);
        let column = Column::new(&mut ui, &LayoutConfig::new(), kids.iter().copied().map(ChildSlot::from)).unwrap();

        assert_eq!(column.pre_sibling(kids[0]), None);
        assert_eq!(column.pre_sibling(kids[1]), Some(Child::Widget(kids[0])));
        assert_eq!(column.next_sibling(kids[1]), Some(Child::Widget(kids[2])));
        assert_eq!(column.next_sibling(kids[2]), None);
        assert_eq!(column.next_sibling(stranger), None);
    }

    #[test]
    fn delete_is_deferred() {
        let mut ui = Ui::new();
        let kids = labels(&mut ui, 1);
        let row = Row::new(&mut ui, &LayoutConfig::new(), [kids[0].into()]).unwrap();
        let frame = row.frame();
        row.into_inner().delete(&mut ui);
        assert!(ui.host.is_alive(frame));
        ui.process_events();
        assert!(!ui.host.is_alive(frame));
        assert!(!ui.host.is_alive(kids[0]));
    }
}
