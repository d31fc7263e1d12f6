//! Host style metrics.
//!
//! The subset of platform style values layouts consult when a spacing or
//! margin is left to "whatever the platform uses".

use serde::{Deserialize, Serialize};

use super::Orientation;

/// A named style metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelMetric {
    LayoutHorizontalSpacing,
    LayoutVerticalSpacing,
    LayoutMargin,
}

/// Platform style values, loadable from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostStyle {
    /// Default gap between horizontally adjacent layout items.
    pub layout_horizontal_spacing: i32,
    /// Default gap between vertically adjacent layout items.
    pub layout_vertical_spacing: i32,
    /// Gap between two adjacent push-button-like controls, horizontally.
    pub push_button_horizontal_spacing: i32,
    /// Gap between two adjacent push-button-like controls, vertically.
    pub push_button_vertical_spacing: i32,
    /// Default content margin of a layout installed on a widget.
    pub layout_margin: i32,
}

impl Default for HostStyle {
    fn default() -> Self {
        Self {
            layout_horizontal_spacing: 6,
            layout_vertical_spacing: 6,
            push_button_horizontal_spacing: 6,
            push_button_vertical_spacing: 6,
            layout_margin: 9,
        }
    }
}

impl HostStyle {
    pub fn pixel_metric(&self, metric: PixelMetric) -> i32 {
        match metric {
            PixelMetric::LayoutHorizontalSpacing => self.layout_horizontal_spacing,
            PixelMetric::LayoutVerticalSpacing => self.layout_vertical_spacing,
            PixelMetric::LayoutMargin => self.layout_margin,
        }
    }

    /// Spacing between two push-button-style controls along an axis.
    pub fn push_button_spacing(&self, orientation: Orientation) -> i32 {
        match orientation {
            Orientation::Horizontal => self.push_button_horizontal_spacing,
            Orientation::Vertical => self.push_button_vertical_spacing,
        }
    }
}
