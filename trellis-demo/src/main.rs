//! Trellis demo.
//!
//! Builds a login form, a toolbar row and a wrapping tag panel, runs a
//! geometry pass at a few window widths and logs where everything lands.
//!
//! An optional JSON file overrides the toolbar layout and the form captions:
//!
//! ```json
//! { "toolbar": { "justify": "even", "paddings": 4 }, "form": { "ok_text": "Sign in" } }
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use trellis::host::LayoutParent;
use trellis::widgets::{self, ButtonOptions, InputOptions};
use trellis::{
    ChildSlot, Column, FlowLayout, FormFields, FormOptions, Justify, LayoutConfig, Paddings, Rect, Row, Spacing, Ui,
    WidgetId, WidgetKind, create_form,
};

const TAGS: &[&str] = &["layout", "rust", "flow", "wrap", "justify", "even", "center", "forms"];

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    toolbar: LayoutConfig,
    form: FormOptions,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            toolbar: LayoutConfig::new().justify(Justify::End).spacing(Spacing::Fixed(6)),
            form: FormOptions::default(),
        }
    }
}

fn load_config() -> Result<DemoConfig> {
    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        return Ok(DemoConfig::default());
    };
    let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn log_widget(ui: &Ui, name: &str, id: WidgetId) {
    if let Some(rect) = ui.host.geometry(id) {
        tracing::info!(widget = name, x = rect.x, y = rect.y, width = rect.width, height = rect.height);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = load_config()?;
    tracing::info!(?config, "Starting trellis demo");

    let mut ui = Ui::new();

    // Login form
    let user = widgets::input(&mut ui, InputOptions::default().placeholder("user name"));
    let password = widgets::input(
        &mut ui,
        InputOptions::default().placeholder("password").echo_mode("password"),
    );
    let fields: FormFields = [("User", user), ("Password", password)].into_iter().collect();
    let form = create_form(
        &mut ui,
        fields,
        &config.form,
        move |host, frame| tracing::info!(?frame, user = host.text(user).unwrap_or_default(), "form accepted"),
        |host, frame| {
            tracing::info!(?frame, "form cancelled");
            host.delete_later(frame);
        },
    )?;

    // Toolbar
    let buttons: Vec<WidgetId> = ["New", "Open", "Save"]
        .into_iter()
        .map(|caption| {
            widgets::button(
                &mut ui,
                caption,
                ButtonOptions::default().on_click(move |_| tracing::info!(caption, "toolbar click")),
            )
        })
        .collect();
    let mut toolbar = Row::new(&mut ui, &config.toolbar, buttons.iter().copied().map(ChildSlot::from))
        .context("building toolbar")?;
    let help = widgets::button(&mut ui, "Help", ButtonOptions::default());
    toolbar.append(&mut ui, help)?;

    // Tag panel
    let panel = ui.host.create_widget(WidgetKind::Frame);
    let mut tags = FlowLayout::new(Some(LayoutParent::Widget(panel)));
    let tag_ids: Vec<WidgetId> = TAGS
        .iter()
        .map(|tag| widgets::button(&mut ui, tag, ButtonOptions::default()))
        .collect();
    for id in &tag_ids {
        tags.add_widget(&mut ui.host, *id);
    }
    if !ui.host.install_flow(panel, tags) {
        anyhow::bail!("tag panel cannot take a flow layout");
    }

    let divider = widgets::horizontal_line(&mut ui);
    let root = Column::new(
        &mut ui,
        &LayoutConfig::new().paddings(Paddings::Uniform(12)),
        [ChildSlot::from(&toolbar), ChildSlot::from(divider), ChildSlot::from(&form.column)],
    )?;

    for width in [320, 480, 720] {
        let form_height = ui.host.size_hint(root.frame()).height;
        ui.host.set_geometry(root.frame(), Rect::new(0, 0, width, form_height));
        let tags_height = ui.host.height_for_width(panel, width).unwrap_or_default();
        ui.host.set_geometry(panel, Rect::new(0, form_height, width, tags_height));

        tracing::info!(width, form_height, tags_height, "geometry pass");
        for (caption, id) in ["New", "Open", "Save"].iter().zip(&buttons) {
            log_widget(&ui, caption, *id);
        }
        log_widget(&ui, "Help", help);
        log_widget(&ui, "OK", form.ok);
        log_widget(&ui, "Cancel", form.cancel);
        for (tag, id) in TAGS.iter().zip(&tag_ids) {
            log_widget(&ui, tag, *id);
        }
    }

    ui.host.click(buttons[0]);
    ui.host.click(form.cancel);
    let destroyed = ui.process_events();
    tracing::info!(destroyed, alive = ui.host.widget_count(), "processed deferred deletions");
    Ok(())
}
