//! Identity backend for non-geographic axes.

use crate::canvas::artist::Artist;
use crate::canvas::figure::Axes;
use crate::layout::ticks::{axis_ticks, format_ticks, MaxNLocator};

use super::{grid_lines, tick_set, AxisDecoration, PlotBackend};

/// Data coordinates are axes coordinates; ticks come from a
/// [`MaxNLocator`] over each coordinate axis.
#[derive(Debug, Clone, Default)]
pub struct PlainBackend {
    pub locator: MaxNLocator,
}

impl PlotBackend for PlainBackend {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn project(&self, x: f64, y: f64) -> (f64, f64) {
        (x, y)
    }

    fn overlay_basemap(&self, _axes: &mut Axes, _clean: bool, _imagery: bool) {}

    fn label_axes(&self, axes: &mut Axes, decoration: &AxisDecoration<'_>) {
        let xticks = axis_ticks(decoration.x, &self.locator);
        let yticks = axis_ticks(decoration.y, &self.locator);
        let xlabels = format_ticks(&xticks);
        let ylabels = format_ticks(&yticks);
        axes.xticks = tick_set(xticks, xlabels, decoration.labels.category, decoration.hide_labels);
        axes.yticks = tick_set(yticks, ylabels, decoration.labels.value, decoration.hide_labels);

        if decoration.grid {
            if let Some(lines) = grid_lines(axes, decoration.grid_color) {
                axes.add_artist(Artist::GridLines(lines));
            }
        }
    }
}
