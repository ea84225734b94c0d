//! In-memory figure scene and its raster renderer.
//!
//! Plot methods never draw pixels themselves: they append artists to an
//! [`figure::Axes`], and [`raster::render`] paints the finished scene.

pub mod artist;
pub mod barbs;
pub mod contour;
pub mod figure;
pub mod raster;

pub use artist::{Artist, Coords};
pub use barbs::{find_tails, BarbIncrements, BarbTail};
pub use figure::{ArtistId, Axes, AxesId, Figure, Rect, SubplotParams, TickSet, Title};
pub use raster::{encode_png, render, save_png};
