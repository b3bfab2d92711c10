//! Core library for packing rectangles into fixed-size bins.
//!
//! - Algorithm: MaxRects free-list maintenance (split + prune) with BL/BAF/BLSF/BSSF scoring and a bottom-edge Linear mode
//! - Rectangles: plain or windowed (a frame whose aperture becomes free space once placed), with per-rectangle flip policies
//! - Pipeline: `pack_rectangles` opens bins until everything is placed; `pack_auto` picks the best of a heuristic portfolio
//! - Output: JSON export, plus SVG/PNG visualisation behind the `render` feature.
//!
//! Quick example:
//! ```ignore
//! use rect_packer_core::prelude::*;
//! # fn main() -> rect_packer_core::Result<()> {
//! let mut bin = Bin::new(500, 500, true)?;
//! let frame = Rectangle::windowed(300, 300, Borders::uniform(100))?.with_label("frame");
//! let placed = bin.insert(&frame, Heuristic::BestAreaFit);
//! println!("placed: {:?}, usage: {:.1}%", placed.map(|r| r.rect()), bin.usage() * 100.0);
//! # Ok(()) }
//! ```

pub mod bin;
pub mod config;
pub mod error;
pub mod export;
pub mod free_space;
pub mod heuristic;
pub mod model;
pub mod pipeline;
#[cfg(feature = "render")]
pub mod render;

pub use bin::*;
pub use config::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use pipeline::*;
#[cfg(feature = "render")]
pub use render::{VisualisationOptions, bin_to_svg, render_bin, wrap_label};

#[cfg(feature = "render")]
pub use image;

/// Convenience prelude for common types and functions.
/// Importing `rect_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::bin::Bin;
    pub use crate::config::{
        AutoMode, FlipTrigger, Heuristic, PackerConfig, PackerConfigBuilder,
    };
    pub use crate::heuristic::{Candidate, PlacementHeuristic, Score};
    pub use crate::model::{Borders, FlipPolicy, PackStats, Rect, Rectangle};
    pub use crate::{PackOutput, pack_auto, pack_rectangles};
    #[cfg(feature = "render")]
    pub use crate::render::VisualisationOptions;
}
