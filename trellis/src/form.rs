//! Label-and-field forms with OK / Cancel actions.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::Ui;
use crate::error::ConfigError;
use crate::host::{Host, Orientation, WidgetId};
use crate::layout::{ChildSlot, Column, LayoutConfig, Spacing};
use crate::widgets::{self, ButtonOptions, LabelOptions};

/// Gap after each field.
const FIELD_GAP: i32 = 20;
/// Gap between the last field and the action buttons.
const ACTIONS_GAP: i32 = 8;

/// The body of a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormFields {
    /// Named fields, each shown under a caption label.
    Named(Vec<(String, WidgetId)>),
    /// A single widget shown as-is.
    Single(WidgetId),
}

impl<S: Into<String>> FromIterator<(S, WidgetId)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (S, WidgetId)>>(iter: I) -> Self {
        FormFields::Named(iter.into_iter().map(|(name, id)| (name.into(), id)).collect())
    }
}

/// Button captions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormOptions {
    pub ok_text: String,
    pub cancel_text: String,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            ok_text: "OK".to_owned(),
            cancel_text: "Cancel".to_owned(),
        }
    }
}

/// A built form.
#[derive(Debug)]
pub struct Form {
    pub column: Column,
    pub ok: WidgetId,
    pub cancel: WidgetId,
}

/// Build a form: each field under its caption, then an OK / Cancel row.
///
/// Callbacks receive the host and the form's frame.
pub fn create_form(
    ui: &mut Ui,
    fields: FormFields,
    options: &FormOptions,
    mut on_ok: impl FnMut(&mut Host, WidgetId) + 'static,
    mut on_cancel: impl FnMut(&mut Host, WidgetId) + 'static,
) -> Result<Form, ConfigError> {
    let mut slots: Vec<ChildSlot> = Vec::new();
    match fields {
        FormFields::Named(fields) => {
            for (name, widget) in fields {
                slots.push(widgets::label(ui, &name, LabelOptions::default()).into());
                slots.push(widget.into());
                slots.push(ChildSlot::Spacing(FIELD_GAP));
            }
        }
        FormFields::Single(widget) => slots.push(widget.into()),
    }

    // The frame id only exists once the column is built; the buttons read it
    // from this cell when clicked.
    let frame_cell: Rc<RefCell<Option<WidgetId>>> = Rc::new(RefCell::new(None));
    let ok_frame = Rc::clone(&frame_cell);
    let ok = widgets::button(
        ui,
        &options.ok_text,
        ButtonOptions::default().on_click(move |host| {
            if let Some(frame) = *ok_frame.borrow() {
                on_ok(host, frame);
            }
        }),
    );
    let cancel_frame = Rc::clone(&frame_cell);
    let cancel = widgets::button(
        ui,
        &options.cancel_text,
        ButtonOptions::default().on_click(move |host| {
            if let Some(frame) = *cancel_frame.borrow() {
                on_cancel(host, frame);
            }
        }),
    );

    let actions = ui.host.create_box_layout(Orientation::Horizontal);
    let gap = ui.host.style().layout_horizontal_spacing;
    ui.host.set_spacing(actions, gap);
    ui.host.add_widget(actions, ok, 0);
    ui.host.add_widget(actions, cancel, 0);
    slots.push(ChildSlot::Spacing(ACTIONS_GAP));
    slots.push(actions.into());

    let column = Column::new(ui, &LayoutConfig::new().spacing(Spacing::Fixed(0)), slots)?;
    *frame_cell.borrow_mut() = Some(column.frame());
    Ok(Form { column, ok, cancel })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{LayoutItem, Spacer};
    use crate::widgets::InputOptions;

    #[test]
    fn named_fields_layout() {
        let mut ui = Ui::new();
        let user = widgets::input(&mut ui, InputOptions::default());
        let pass = widgets::input(&mut ui, InputOptions::default().echo_mode("password"));
        let fields: FormFields = [("User", user), ("Password", pass)].into_iter().collect();
        let form = create_form(&mut ui, fields, &FormOptions::default(), |_, _| {}, |_, _| {}).unwrap();

        let slots = form.column.slots(&ui.host);
        assert_eq!(slots.len(), 8);
        let caption = slots[0].item.widget().unwrap();
        assert_eq!(ui.host.text(caption), Some("User"));
        assert_eq!(slots[1].item, LayoutItem::Widget(user));
        assert_eq!(slots[2].item, LayoutItem::Spacer(Spacer::Fixed(FIELD_GAP)));
        assert_eq!(slots[6].item, LayoutItem::Spacer(Spacer::Fixed(ACTIONS_GAP)));
        assert!(matches!(slots[7].item, LayoutItem::Layout(_)));
        assert_eq!(ui.host.layout(form.column.layout()).unwrap().spacing(), 0);
    }

    #[test]
    fn single_widget_form() {
        let mut ui = Ui::new();
        let body = widgets::text_browser(&mut ui, &Default::default());
        let options = FormOptions {
            ok_text: "Save".into(),
            ..Default::default()
        };
        let form = create_form(&mut ui, FormFields::Single(body), &options, |_, _| {}, |_, _| {}).unwrap();
        assert_eq!(form.column.children().len(), 2);
        assert_eq!(ui.host.text(form.ok), Some("Save"));
        assert_eq!(ui.host.text(form.cancel), Some("Cancel"));
    }

    #[test]
    fn callbacks_receive_frame() {
        let mut ui = Ui::new();
        let field = widgets::input(&mut ui, InputOptions::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (ok_seen, cancel_seen) = (Rc::clone(&seen), Rc::clone(&seen));
        let form = create_form(
            &mut ui,
            [("Name", field)].into_iter().collect(),
            &FormOptions::default(),
            move |_, frame| ok_seen.borrow_mut().push(("ok", frame)),
            move |host, frame| {
                cancel_seen.borrow_mut().push(("cancel", frame));
                host.delete_later(frame);
            },
        )
        .unwrap();
        let frame = form.column.frame();

        ui.host.click(form.ok);
        ui.host.click(form.cancel);
        assert_eq!(*seen.borrow(), vec![("ok", frame), ("cancel", frame)]);

        assert!(ui.host.is_alive(frame));
        ui.process_events();
        assert!(!ui.host.is_alive(frame));
        assert!(!ui.host.is_alive(field));
    }
}
