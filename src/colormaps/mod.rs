//! Colormaps, normalizations and center-aware colormap splitting.

pub mod colormap;
pub mod extend;
pub mod norm;
pub mod ramp;
pub mod split;

pub use colormap::{
    get_colormap, lerp_color, parse_color, Colormap, DEFAULT_COLORMAP, PRESET_NAMES, TRANSPARENT,
};
pub use extend::Extend;
pub use norm::{BinIndex, BoundaryNorm, LinearNorm, Norm, TwoSlopeNorm};
pub use ramp::{ListedColormap, SampledRamp};
pub use split::{adjust_colormap, remap_colormap, SplitMode};
