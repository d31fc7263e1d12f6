//! Leaf widget constructors.
//!
//! Each constructor creates a host widget, applies its [`StyleOptions`] and
//! wires optional callbacks. Keyword options that don't resolve (text
//! alignment, echo mode) are logged and skipped rather than failing.

use tracing::warn;

use crate::Ui;
use crate::host::{ActionPosition, Alignment, EchoMode, Host, Pixmap, SizePolicy, WidgetId, WidgetKind};
use crate::style::StyleOptions;

type ClickCallback = Box<dyn FnMut(&mut Host)>;
type ChangeCallback = Box<dyn FnMut(&mut Host, &str)>;

// =========================================================================
// Label / Button
// =========================================================================

#[derive(Debug, Clone, Default)]
pub struct LabelOptions {
    /// Image path shown instead of text.
    pub image: Option<String>,
    /// Scale the image to this width.
    pub image_width: Option<i32>,
    pub style: StyleOptions,
}

pub fn label(ui: &mut Ui, text: &str, options: LabelOptions) -> WidgetId {
    let id = ui.host.create_widget_with_text(WidgetKind::Label, text);
    ui.styles.apply(&mut ui.host, id, &options.style);
    if let Some(path) = options.image {
        ui.host.set_pixmap(
            id,
            Pixmap {
                path,
                scaled_width: options.image_width,
            },
        );
    }
    id
}

#[derive(Default)]
pub struct ButtonOptions {
    pub style: StyleOptions,
    pub on_click: Option<ClickCallback>,
}

impl ButtonOptions {
    pub fn on_click(mut self, handler: impl FnMut(&mut Host) + 'static) -> Self {
        self.on_click = Some(Box::new(handler));
        self
    }
}

pub fn button(ui: &mut Ui, text: &str, options: ButtonOptions) -> WidgetId {
    let id = ui.host.create_widget_with_text(WidgetKind::Button, text);
    ui.styles.apply(&mut ui.host, id, &options.style);
    if let Some(handler) = options.on_click {
        ui.host.on_clicked(id, handler);
    }
    id
}

// =========================================================================
// Text inputs
// =========================================================================

/// Options of a single-line text field.
#[derive(Default)]
pub struct InputOptions {
    pub placeholder: Option<String>,
    /// `center`, `left` or `right`.
    pub text_align: Option<String>,
    /// `normal`, `no-echo`, `password` or `password-echo-on-edit`.
    pub echo_mode: Option<String>,
    pub leading_icon: Option<String>,
    pub trailing_icon: Option<String>,
    pub int_only: bool,
    pub on_change: Option<ChangeCallback>,
    pub style: StyleOptions,
}

impl InputOptions {
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    pub fn text_align(mut self, keyword: impl Into<String>) -> Self {
        self.text_align = Some(keyword.into());
        self
    }

    pub fn echo_mode(mut self, keyword: impl Into<String>) -> Self {
        self.echo_mode = Some(keyword.into());
        self
    }

    pub fn on_change(mut self, handler: impl FnMut(&mut Host, &str) + 'static) -> Self {
        self.on_change = Some(Box::new(handler));
        self
    }

    pub fn style(mut self, style: StyleOptions) -> Self {
        self.style = style;
        self
    }
}

fn text_alignment(keyword: &str) -> Option<Alignment> {
    match keyword {
        "center" => Some(Alignment::HCenter),
        "left" => Some(Alignment::Left),
        "right" => Some(Alignment::Right),
        _ => None,
    }
}

fn echo_mode(keyword: &str) -> Option<EchoMode> {
    match keyword {
        "normal" => Some(EchoMode::Normal),
        "no-echo" => Some(EchoMode::NoEcho),
        "password" => Some(EchoMode::Password),
        "password-echo-on-edit" => Some(EchoMode::PasswordEchoOnEdit),
        _ => None,
    }
}

pub fn input(ui: &mut Ui, options: InputOptions) -> WidgetId {
    let id = ui.host.create_widget(WidgetKind::LineEdit);
    ui.styles.apply(&mut ui.host, id, &options.style);
    if let Some(text) = &options.placeholder {
        ui.host.set_placeholder(id, text);
    }
    if let Some(keyword) = &options.text_align {
        match text_alignment(keyword) {
            Some(alignment) => ui.host.set_text_alignment(id, alignment),
            None => warn!(keyword = %keyword, "unknown text alignment, expected center, left or right"),
        }
    }
    if let Some(keyword) = &options.echo_mode {
        match echo_mode(keyword) {
            Some(mode) => ui.host.set_echo_mode(id, mode),
            None => warn!(
                keyword = %keyword,
                "unknown echo mode, expected normal, no-echo, password or password-echo-on-edit"
            ),
        }
    }
    if let Some(icon) = &options.leading_icon {
        ui.host.add_action(id, icon, ActionPosition::Leading);
    }
    if let Some(icon) = &options.trailing_icon {
        ui.host.add_action(id, icon, ActionPosition::Trailing);
    }
    if options.int_only {
        ui.host.set_int_validator(id, true);
    }
    if let Some(handler) = options.on_change {
        ui.host.on_text_changed(id, handler);
    }
    id
}

/// Options of a multi-line editor.
#[derive(Default)]
pub struct TextAreaOptions {
    pub placeholder: Option<String>,
    pub on_change: Option<ChangeCallback>,
    pub style: StyleOptions,
}

pub fn text_area(ui: &mut Ui, options: TextAreaOptions) -> WidgetId {
    let id = ui.host.create_widget(WidgetKind::TextArea);
    ui.styles.apply(&mut ui.host, id, &options.style);
    if let Some(text) = &options.placeholder {
        ui.host.set_placeholder(id, text);
    }
    if let Some(handler) = options.on_change {
        ui.host.on_text_changed(id, handler);
    }
    id
}

pub fn text_browser(ui: &mut Ui, style: &StyleOptions) -> WidgetId {
    let id = ui.host.create_widget(WidgetKind::TextBrowser);
    ui.styles.apply(&mut ui.host, id, style);
    id
}

// =========================================================================
// Separators
// =========================================================================

/// A one-pixel divider spanning the width of its cell.
pub fn horizontal_line(ui: &mut Ui) -> WidgetId {
    let id = ui.host.create_widget(WidgetKind::HorizontalLine);
    ui.host.set_fixed_height(id, 1);
    ui.host.set_size_policy(id, SizePolicy::Expanding, SizePolicy::Fixed);
    id
}

/// A one-pixel divider spanning the height of its cell.
pub fn vertical_line(ui: &mut Ui) -> WidgetId {
    let id = ui.host.create_widget(WidgetKind::VerticalLine);
    ui.host.set_fixed_width(id, 1);
    ui.host.set_size_policy(id, SizePolicy::Fixed, SizePolicy::Expanding);
    id
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn input_resolves_keywords() {
        let mut ui = Ui::new();
        let id = input(
            &mut ui,
            InputOptions::default()
                .placeholder("Port")
                .text_align("right")
                .echo_mode("password"),
        );
        let node = ui.host.widget(id).unwrap();
        assert_eq!(node.placeholder(), Some("Port"));
        assert_eq!(node.text_alignment(), Some(Alignment::Right));
        assert_eq!(node.echo_mode(), EchoMode::Password);
    }

    #[test]
    fn unknown_keywords_are_soft() {
        let mut ui = Ui::new();
        let id = input(&mut ui, InputOptions::default().text_align("justify").echo_mode("mirror"));
        let node = ui.host.widget(id).unwrap();
        assert_eq!(node.text_alignment(), None);
        assert_eq!(node.echo_mode(), EchoMode::Normal);
    }

    #[test]
    fn input_icons_and_validator() {
        let mut ui = Ui::new();
        let options = InputOptions {
            leading_icon: Some("search.svg".into()),
            trailing_icon: Some("clear.svg".into()),
            int_only: true,
            ..Default::default()
        };
        let id = input(&mut ui, options);
        let node = ui.host.widget(id).unwrap();
        assert!(node.is_int_only());
        assert_eq!(
            node.actions(),
            &[
                (ActionPosition::Leading, "search.svg".to_owned()),
                (ActionPosition::Trailing, "clear.svg".to_owned()),
            ]
        );
    }

    #[test]
    fn callbacks_are_connected() {
        let mut ui = Ui::new();
        let log = Rc::new(RefCell::new(Vec::<String>::new()));

        let clicks = Rc::clone(&log);
        let ok = button(
            &mut ui,
            "OK",
            ButtonOptions::default().on_click(move |_| clicks.borrow_mut().push("clicked".into())),
        );
        let edits = Rc::clone(&log);
        let field = input(
            &mut ui,
            InputOptions::default().on_change(move |_, text| edits.borrow_mut().push(text.to_owned())),
        );

        ui.host.click(ok);
        ui.host.set_text(field, "hello");
        assert_eq!(*log.borrow(), vec!["clicked".to_owned(), "hello".to_owned()]);
    }

    #[test]
    fn label_image() {
        let mut ui = Ui::new();
        let id = label(
            &mut ui,
            "",
            LabelOptions {
                image: Some("logo.png".into()),
                image_width: Some(48),
                ..Default::default()
            },
        );
        let node = ui.host.widget(id).unwrap();
        assert_eq!(node.pixmap().map(|p| p.scaled_width), Some(Some(48)));
        assert_eq!(ui.host.size_hint(id).width, 48);
    }

    #[test]
    fn separators_are_thin_and_stretch_along() {
        let mut ui = Ui::new();
        let h = horizontal_line(&mut ui);
        let v = vertical_line(&mut ui);
        let node = ui.host.widget(h).unwrap();
        assert_eq!(node.maximum_size().height, 1);
        assert_eq!(node.size_policy(), (SizePolicy::Expanding, SizePolicy::Fixed));
        assert_eq!(ui.host.widget(v).unwrap().maximum_size().width, 1);
    }
}
