//! Figure layout: subplot label policy, axis ticks and colorbars.

pub mod colorbar;
pub mod geometry;
pub mod ticks;

pub use colorbar::{
    place_colorbar, stagger_ticks, ColorbarPlacement, ColorbarRequest, LegendScope, Orientation,
    SubplotAdjust, TickLayout,
};
pub use geometry::{
    effective_fontsize, index_to_letter, labels_for_position, panel_title, AxisLabels, LabelAxes,
    SideFlags, SubplotGeometry,
};
pub use ticks::{format_ticks, MaxNLocator};
