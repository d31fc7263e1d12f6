//! Integration tests for row/column containers.
//!
//! These exercise the spacer bookkeeping through the public API only: every
//! mutation must leave the host layout in the same slot pattern a fresh
//! construction with the same children would produce.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use trellis::host::{BoxSlot, LayoutItem, Spacer};
use trellis::{
    Axis, BoxContainer, Child, ChildSlot, Column, ConfigError, Justify, LayoutConfig, Orientation, Row,
    StyleOptions, Ui, WidgetId, WidgetKind,
};

const ALL_JUSTIFY: [Option<Justify>; 5] = [
    None,
    Some(Justify::Start),
    Some(Justify::Center),
    Some(Justify::End),
    Some(Justify::Even),
];

/// Test harness owning a `Ui` and handing out fresh labels.
struct Harness {
    ui: Ui,
    next: usize,
}

impl Harness {
    fn new() -> Self {
        Self { ui: Ui::new(), next: 0 }
    }

    fn label(&mut self) -> WidgetId {
        self.next += 1;
        self.ui
            .host
            .create_widget_with_text(WidgetKind::Label, &format!("label {}", self.next))
    }

    fn labels(&mut self, n: usize) -> Vec<WidgetId> {
        (0..n).map(|_| self.label()).collect()
    }

    fn row(&mut self, justify: Option<Justify>, children: &[WidgetId]) -> Row {
        let mut config = LayoutConfig::new();
        config.justify = justify;
        Row::new(&mut self.ui, &config, children.iter().copied().map(ChildSlot::from)).expect("valid config")
    }

    fn slots(&self, container: &BoxContainer) -> Vec<BoxSlot> {
        container.slots(&self.ui.host).to_vec()
    }

    /// Slot sequence as a string: `W` widget, `L` layout, `~` stretch, `_` fixed.
    fn pattern(&self, container: &BoxContainer) -> String {
        container
            .slots(&self.ui.host)
            .iter()
            .map(|slot| match slot.item {
                LayoutItem::Widget(_) => 'W',
                LayoutItem::Layout(_) => 'L',
                LayoutItem::Spacer(Spacer::Stretch) => '~',
                LayoutItem::Spacer(Spacer::Fixed(_)) => '_',
            })
            .collect()
    }

    /// Assert the slot layout matches the justify mode and the visible list.
    fn assert_invariant(&self, container: &BoxContainer) {
        let n = container.len();
        let children = "W".repeat(n);
        let expected = match container.justify() {
            None => children,
            Some(Justify::Start) => format!("{children}~"),
            Some(Justify::End) => format!("~{children}"),
            Some(Justify::Center) => format!("~{children}~"),
            Some(Justify::Even) => vec!["W"; n].join("~"),
        };
        assert_eq!(self.pattern(container), expected, "justify {:?}", container.justify());

        let in_layout: Vec<Child> = container
            .slots(&self.ui.host)
            .iter()
            .filter_map(|slot| slot.item.widget().map(Child::Widget))
            .collect();
        assert_eq!(in_layout, container.children());
    }
}

// =========================================================================
// Spacer invariant
// =========================================================================

#[test]
fn even_spacers_sit_between_children_under_random_mutation() {
    let mut rng = StdRng::seed_from_u64(0x7e11);
    let mut h = Harness::new();
    let mut row = h.row(Some(Justify::Even), &[]);
    let pool = h.labels(12);

    for _ in 0..400 {
        let candidate = pool[rng.gen_range(0..pool.len())];
        match rng.gen_range(0..3) {
            0 if !row.contains(candidate) => row.append(&mut h.ui, candidate).unwrap(),
            1 if !row.contains(candidate) => {
                let index = rng.gen_range(-2..row.len() as isize + 3);
                row.insert(&mut h.ui, index, candidate).unwrap();
            }
            _ => row.remove(&mut h.ui, candidate, false),
        }

        let stretches = row.slots(&h.ui.host).iter().filter(|s| s.item.is_stretch()).count();
        assert_eq!(stretches, row.len().saturating_sub(1));
        h.assert_invariant(&row);
    }
}

#[test]
fn every_justify_mode_survives_random_mutation() {
    for (seed, justify) in ALL_JUSTIFY.into_iter().enumerate() {
        let mut rng = StdRng::seed_from_u64(seed as u64);
        let mut h = Harness::new();
        let pool = h.labels(8);
        let mut column = {
            let mut config = LayoutConfig::new();
            config.justify = justify;
            Column::new(&mut h.ui, &config, pool[..3].iter().copied().map(ChildSlot::from)).unwrap()
        };
        h.assert_invariant(&column);

        for step in 0..200 {
            let candidate = pool[rng.gen_range(0..pool.len())];
            if step % 50 == 49 {
                column.clear(&mut h.ui);
            } else if column.contains(candidate) {
                column.remove(&mut h.ui, candidate, false);
            } else if rng.gen_bool(0.5) {
                column.append(&mut h.ui, candidate).unwrap();
            } else {
                let index = rng.gen_range(-1..column.len() as isize + 2);
                column.insert(&mut h.ui, index, candidate).unwrap();
            }
            h.assert_invariant(&column);
        }
    }
}

// =========================================================================
// Equivalences
// =========================================================================

#[test]
fn construct_equals_sequential_append() {
    for justify in ALL_JUSTIFY {
        let mut h = Harness::new();
        let kids = h.labels(3);
        let styled = kids[1];
        h.ui.styles.apply(
            &mut h.ui.host,
            styled,
            &StyleOptions::new().stretch(2).self_align("top"),
        );

        let mut config = LayoutConfig::new().align("bottom");
        config.justify = justify;
        let built = Row::new(&mut h.ui, &config, kids.iter().copied().map(ChildSlot::from)).unwrap();
        let expected = h.slots(&built);

        let mut appended = Row::new(&mut h.ui, &config, []).unwrap();
        for kid in &kids {
            appended.append(&mut h.ui, *kid).unwrap();
        }
        assert_eq!(h.slots(&appended), expected, "justify {justify:?}");
        assert_eq!(appended.children(), built.children());
    }
}

#[test]
fn boundary_insert_equals_append() {
    for justify in ALL_JUSTIFY {
        for index in [2, -1, 999] {
            let mut h = Harness::new();
            let kids = h.labels(2);
            let extra = h.label();

            let mut inserted = h.row(justify, &kids);
            inserted.insert(&mut h.ui, index, extra).unwrap();
            let expected = h.slots(&inserted);
            let expected_children = inserted.children().to_vec();

            let mut appended = h.row(justify, &kids);
            appended.append(&mut h.ui, extra).unwrap();
            assert_eq!(h.slots(&appended), expected, "justify {justify:?}, index {index}");
            assert_eq!(appended.children(), expected_children.as_slice());
        }
    }
}

#[test]
fn insert_positions_child_in_visible_order() {
    for justify in ALL_JUSTIFY {
        let mut h = Harness::new();
        let kids = h.labels(3);
        let extra = h.labels(2);
        let mut row = h.row(justify, &kids);

        row.insert(&mut h.ui, 0, extra[0]).unwrap();
        row.insert(&mut h.ui, 2, extra[1]).unwrap();
        let order: Vec<Child> = [extra[0], kids[0], extra[1], kids[1], kids[2]]
            .into_iter()
            .map(Child::Widget)
            .collect();
        assert_eq!(row.children(), order.as_slice(), "justify {justify:?}");
        h.assert_invariant(&row);
    }
}

#[test]
fn clear_then_append_matches_fresh_construct() {
    for justify in ALL_JUSTIFY {
        let mut h = Harness::new();
        let kids = h.labels(3);
        let a = h.label();

        let mut row = h.row(justify, &kids);
        row.clear(&mut h.ui);
        let empty = h.row(justify, &[]);
        assert_eq!(h.pattern(&row), h.pattern(&empty), "justify {justify:?}");
        row.append(&mut h.ui, a).unwrap();
        let after_clear = h.slots(&row);

        let fresh = h.row(justify, &[a]);
        assert_eq!(h.slots(&fresh), after_clear, "justify {justify:?}");
    }
}

#[test]
fn clear_detaches_children() {
    let mut h = Harness::new();
    let kids = h.labels(2);
    let mut row = h.row(Some(Justify::Center), &kids);
    row.clear(&mut h.ui);
    assert!(row.is_empty());
    for kid in kids {
        assert!(h.ui.host.is_alive(kid));
        assert_eq!(h.ui.host.widget(kid).unwrap().parent(), None);
    }
}

// =========================================================================
// Validation
// =========================================================================

#[test]
fn unknown_justify_is_rejected() {
    assert_eq!(
        "sideways".parse::<Justify>(),
        Err(ConfigError::InvalidJustify("sideways".into()))
    );
    let err = serde_json::from_str::<LayoutConfig>(r#"{ "justify": "sideways" }"#).unwrap_err();
    assert!(err.to_string().contains("justify must be one of"));
}

#[test]
fn stretch_with_justify_fails_before_mutation() {
    let mut h = Harness::new();
    let kid = h.label();
    let widgets_before = h.ui.host.widget_count();

    let result = Row::new(
        &mut h.ui,
        &LayoutConfig::new().justify(Justify::Start),
        [kid.into(), "stretch".parse::<ChildSlot>().unwrap()],
    );
    assert_eq!(result.unwrap_err(), ConfigError::StretchWithJustify);
    assert_eq!(h.ui.host.widget_count(), widgets_before);
    assert_eq!(h.ui.host.widget(kid).unwrap().parent(), None);

    // Without a justify mode the sentinel is an ordinary spacer.
    let row = Row::new(&mut h.ui, &LayoutConfig::new(), [kid.into(), ChildSlot::Stretch]).unwrap();
    assert_eq!(h.pattern(&row), "W~");
}

#[test]
fn alignment_keywords_are_axis_specific() {
    let mut h = Harness::new();
    let diagonal = Row::new(&mut h.ui, &LayoutConfig::new().align("diagonal"), []);
    assert_eq!(
        diagonal.unwrap_err(),
        ConfigError::InvalidAlign {
            keyword: "diagonal".into(),
            axis: Axis::Row
        }
    );

    assert!(Column::new(&mut h.ui, &LayoutConfig::new().align("left"), []).is_ok());
    let err = Row::new(&mut h.ui, &LayoutConfig::new().align("left"), []).unwrap_err();
    assert_eq!(err.to_string(), "align `left` is not valid for a row");
}

#[test]
fn auto_spacing_conflicts_with_explicit_justify() {
    let mut h = Harness::new();
    let config: LayoutConfig = serde_json::from_str(r#"{ "justify": "center", "spacing": "auto" }"#).unwrap();
    assert_eq!(
        Row::new(&mut h.ui, &config, []).unwrap_err(),
        ConfigError::ConflictingSpacing("center".into())
    );

    let kids = h.labels(3);
    let config: LayoutConfig = serde_json::from_str(r#"{ "spacing": "auto" }"#).unwrap();
    let row = Row::new(&mut h.ui, &config, kids.iter().copied().map(ChildSlot::from)).unwrap();
    assert_eq!(row.justify(), Some(Justify::Even));
    assert_eq!(h.pattern(&row), "W~W~W");
}

// =========================================================================
// Tolerant mutation
// =========================================================================

#[test]
fn removing_a_stranger_is_a_no_op() {
    for justify in ALL_JUSTIFY {
        let mut h = Harness::new();
        let kids = h.labels(3);
        let stranger = h.label();
        let mut row = h.row(justify, &kids);
        let before = h.slots(&row);

        row.remove(&mut h.ui, stranger, true);
        assert_eq!(h.slots(&row), before);
        assert_eq!(row.len(), 3);
        assert!(h.ui.host.pending_deletions().is_empty());
    }
}

#[test]
fn remove_with_delete_is_deferred() {
    let mut h = Harness::new();
    let kids = h.labels(3);
    let mut row = h.row(Some(Justify::Even), &kids);

    row.remove(&mut h.ui, kids[0], true);
    assert_eq!(h.pattern(&row), "W~W");
    assert!(h.ui.host.is_alive(kids[0]));
    assert_eq!(h.ui.host.pending_deletions(), &[kids[0]]);

    assert_eq!(h.ui.process_events(), 1);
    assert!(!h.ui.host.is_alive(kids[0]));
    h.assert_invariant(&row);
}

#[test]
fn remove_nested_layout_with_delete_is_deferred() {
    let mut h = Harness::new();
    let inner_label = h.label();
    let inner = h.ui.host.create_box_layout(Orientation::Horizontal);
    h.ui.host.add_widget(inner, inner_label, 0);
    let outer_label = h.label();
    let mut row = Row::new(
        &mut h.ui,
        &LayoutConfig::new(),
        [ChildSlot::from(inner), ChildSlot::from(outer_label)],
    )
    .unwrap();
    assert_eq!(h.pattern(&row), "LW");

    row.remove(&mut h.ui, inner, true);
    assert_eq!(h.pattern(&row), "W");
    assert!(h.ui.host.layout(inner).is_some());

    assert_eq!(h.ui.process_events(), 0);
    assert!(h.ui.host.layout(inner).is_none());
    // The nested layout's widgets are detached, not deleted.
    assert!(h.ui.host.is_alive(inner_label));
    assert_eq!(h.ui.host.widget(inner_label).unwrap().parent(), None);
    h.assert_invariant(&row);
}

#[test]
fn replace_with_existing_child_is_refused() {
    for justify in ALL_JUSTIFY {
        let mut h = Harness::new();
        let kids = h.labels(2);
        let mut row = h.row(justify, &kids);
        let before = h.slots(&row);

        assert!(!row.replace_widget(&mut h.ui, kids[0], kids[1], true));
        assert_eq!(h.slots(&row), before);
        assert_eq!(row.children(), &[Child::Widget(kids[0]), Child::Widget(kids[1])]);
        assert_eq!(h.ui.host.widget(kids[0]).unwrap().parent(), Some(row.frame()));
        assert!(h.ui.host.pending_deletions().is_empty());
        h.assert_invariant(&row);
    }
}

// =========================================================================
// Fixed spacing entries
// =========================================================================

fn row_with_spacing(h: &mut Harness, justify: Justify, slots: &[ChildSlot]) -> Row {
    Row::new(&mut h.ui, &LayoutConfig::new().justify(justify), slots.iter().copied()).unwrap()
}

fn stretch_count(h: &Harness, container: &BoxContainer) -> usize {
    h.pattern(container).matches('~').count()
}

#[test]
fn even_remove_finds_stretch_across_fixed_spacing() {
    let mut h = Harness::new();
    let [a, b] = [h.label(), h.label()];
    let slots = [ChildSlot::from(a), ChildSlot::Spacing(8), ChildSlot::from(b)];

    let mut row = row_with_spacing(&mut h, Justify::Even, &slots);
    assert_eq!(h.pattern(&row), "W~_W");
    row.remove(&mut h.ui, b, false);
    assert_eq!(h.pattern(&row), "W_");
    assert_eq!(stretch_count(&h, &row), 0);
    assert_eq!(row.children(), &[Child::Widget(a)]);

    let mut row = row_with_spacing(&mut h, Justify::Even, &slots);
    row.remove(&mut h.ui, a, false);
    assert_eq!(h.pattern(&row), "_W");
    assert_eq!(row.children(), &[Child::Widget(b)]);
}

#[test]
fn even_remove_keeps_stretch_beyond_a_neighbour() {
    let mut h = Harness::new();
    let [a, b, c] = [h.label(), h.label(), h.label()];
    let slots = [ChildSlot::from(a), ChildSlot::Spacing(4), ChildSlot::from(b), ChildSlot::from(c)];
    let mut row = row_with_spacing(&mut h, Justify::Even, &slots);
    assert_eq!(h.pattern(&row), "W~_W~W");

    row.remove(&mut h.ui, c, false);
    assert_eq!(h.pattern(&row), "W~_W");
    assert_eq!(stretch_count(&h, &row), row.len() - 1);
}

#[test]
fn append_lands_before_trailing_stretch_after_fixed_spacing() {
    let mut h = Harness::new();
    let [a, b] = [h.label(), h.label()];
    let slots = [ChildSlot::from(a), ChildSlot::Spacing(6)];

    let mut start = row_with_spacing(&mut h, Justify::Start, &slots);
    start.append(&mut h.ui, b).unwrap();
    assert_eq!(h.pattern(&start), "W_W~");

    let [c, d] = [h.label(), h.label()];
    let mut center = row_with_spacing(&mut h, Justify::Center, &[ChildSlot::from(c), ChildSlot::Spacing(6)]);
    center.append(&mut h.ui, d).unwrap();
    assert_eq!(h.pattern(&center), "~W_W~");
    assert_eq!(center.children(), &[Child::Widget(c), Child::Widget(d)]);
}
