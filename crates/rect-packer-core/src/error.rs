use thiserror::Error;

#[derive(Debug, Error)]
pub enum RectPackerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "render")]
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid rectangle geometry: {width}x{height} (both sides must be positive)")]
    InvalidGeometry { width: u32, height: u32 },
    #[error(
        "Invalid window: borders leave a {window_width}x{window_height} aperture inside {width}x{height}"
    )]
    InvalidWindow {
        width: u32,
        height: u32,
        window_width: i64,
        window_height: i64,
    },
    #[error("Invalid bin dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Method {0} not recognised")]
    UnknownHeuristic(String),
    #[error("Rectangle does not fit an empty bin ({placed}/{total} placed)")]
    OutOfSpace { placed: usize, total: usize },
    #[error("Nothing to pack")]
    Empty,
    #[error("Render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, RectPackerError>;
