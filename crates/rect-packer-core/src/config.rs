use crate::error::{RectPackerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placement heuristics.
/// Key notes:
///   - the four MaxRects rules score every free rectangle and keep the best
///   - `Linear` only fills the bottom edge, shelf style
///   - serde accepts the lowercase name, the long method name and the short alias
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Heuristic {
    /// Lowest resulting top edge, then lowest x.
    #[serde(alias = "RectBottomLeftRule", alias = "bl", alias = "BottomLeft")]
    BottomLeft,
    /// Smallest leftover area, then shortest leftover side.
    #[serde(alias = "RectBestAreaFit", alias = "baf", alias = "BestAreaFit")]
    BestAreaFit,
    /// Shortest longer leftover side, then shortest shorter side.
    #[serde(alias = "RectBestLongSideFit", alias = "blsf", alias = "BestLongSideFit")]
    BestLongSideFit,
    /// Shortest shorter leftover side, then shortest longer side.
    #[serde(alias = "RectBestShortSideFit", alias = "bssf", alias = "BestShortSideFit")]
    BestShortSideFit,
    /// First bottom-aligned free rectangle wide enough.
    #[serde(alias = "RectLinear", alias = "Linear")]
    Linear,
}

impl Heuristic {
    /// The four heuristics that search the whole free list.
    pub const MAXRECTS: [Heuristic; 4] = [
        Heuristic::BottomLeft,
        Heuristic::BestAreaFit,
        Heuristic::BestLongSideFit,
        Heuristic::BestShortSideFit,
    ];

    /// Long-form method name.
    pub fn method_name(&self) -> &'static str {
        match self {
            Self::BottomLeft => "RectBottomLeftRule",
            Self::BestAreaFit => "RectBestAreaFit",
            Self::BestLongSideFit => "RectBestLongSideFit",
            Self::BestShortSideFit => "RectBestShortSideFit",
            Self::Linear => "RectLinear",
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

impl FromStr for Heuristic {
    type Err = RectPackerError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rectbottomleftrule" | "bl" | "bottomleft" => Ok(Self::BottomLeft),
            "rectbestareafit" | "baf" | "bestareafit" => Ok(Self::BestAreaFit),
            "rectbestlongsidefit" | "blsf" | "bestlongsidefit" => Ok(Self::BestLongSideFit),
            "rectbestshortsidefit" | "bssf" | "bestshortsidefit" => Ok(Self::BestShortSideFit),
            "rectlinear" | "linear" => Ok(Self::Linear),
            _ => Err(RectPackerError::UnknownHeuristic(s.to_string())),
        }
    }
}

/// When an `AllowFlip` rectangle tries its rotated orientation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum FlipTrigger {
    /// Only rectangles wider than tall are tried rotated.
    #[default]
    WiderThanTall,
    /// Both orientations are always tried.
    Always,
}

impl FromStr for FlipTrigger {
    type Err = RectPackerError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "wider_than_tall" | "widerthantall" | "gated" => Ok(Self::WiderThanTall),
            "always" => Ok(Self::Always),
            other => Err(RectPackerError::InvalidConfig(format!(
                "unknown flip trigger: {other}"
            ))),
        }
    }
}

/// Auto presets for the heuristic portfolio.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AutoMode {
    Fast,
    Quality,
}

impl FromStr for AutoMode {
    type Err = RectPackerError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "quality" => Ok(Self::Quality),
            other => Err(RectPackerError::InvalidConfig(format!(
                "unknown auto mode: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackerConfig {
    /// Width of every bin.
    pub bin_width: u32,
    /// Height of every bin.
    pub bin_height: u32,
    /// Bin-level permission to rotate `AllowFlip` rectangles.
    pub allow_flip: bool,
    /// Unusable margin along the left edge.
    #[serde(default)]
    pub left_border: u32,
    /// Unusable margin along the bottom edge.
    #[serde(default)]
    pub bottom_border: u32,

    #[serde(default = "default_heuristic")]
    pub heuristic: Heuristic,
    #[serde(default)]
    pub flip_trigger: FlipTrigger,

    /// Try a portfolio of heuristics and keep the best result. None disables.
    #[serde(default)]
    pub auto_mode: Option<AutoMode>,
    /// Optional time budget for the auto portfolio (milliseconds). None or 0 disables.
    #[serde(default)]
    pub time_budget_ms: Option<u64>,
    /// Evaluate auto candidates in parallel when feature "parallel" is on.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            bin_width: 1024,
            bin_height: 1024,
            allow_flip: true,
            left_border: 0,
            bottom_border: 0,
            heuristic: default_heuristic(),
            flip_trigger: FlipTrigger::default(),
            auto_mode: None,
            time_budget_ms: None,
            parallel: false,
        }
    }
}

fn default_heuristic() -> Heuristic {
    Heuristic::BestAreaFit
}

impl PackerConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if:
    /// - Dimensions are zero
    /// - A border leaves no usable space
    pub fn validate(&self) -> Result<()> {
        validate_bin(
            self.bin_width,
            self.bin_height,
            self.left_border,
            self.bottom_border,
        )
    }

    /// Create a fluent builder for `PackerConfig`.
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }
}

pub(crate) fn validate_bin(width: u32, height: u32, left: u32, bottom: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(RectPackerError::InvalidDimensions { width, height });
    }
    if left >= width || bottom >= height {
        return Err(RectPackerError::InvalidConfig(format!(
            "left_border ({left}) / bottom_border ({bottom}) leave no usable space in {width}x{height}"
        )));
    }
    Ok(())
}

/// Builder for `PackerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn with_bin_dimensions(mut self, w: u32, h: u32) -> Self {
        self.cfg.bin_width = w;
        self.cfg.bin_height = h;
        self
    }
    pub fn allow_flip(mut self, v: bool) -> Self {
        self.cfg.allow_flip = v;
        self
    }
    pub fn left_border(mut self, v: u32) -> Self {
        self.cfg.left_border = v;
        self
    }
    pub fn bottom_border(mut self, v: u32) -> Self {
        self.cfg.bottom_border = v;
        self
    }
    pub fn heuristic(mut self, v: Heuristic) -> Self {
        self.cfg.heuristic = v;
        self
    }
    pub fn flip_trigger(mut self, v: FlipTrigger) -> Self {
        self.cfg.flip_trigger = v;
        self
    }
    pub fn auto_mode(mut self, v: Option<AutoMode>) -> Self {
        self.cfg.auto_mode = v;
        self
    }
    pub fn time_budget_ms(mut self, v: Option<u64>) -> Self {
        self.cfg.time_budget_ms = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}
