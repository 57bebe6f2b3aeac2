use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeomError>;

#[derive(Error, Debug)]
pub enum GeomError {
    #[error("invalid geometry: need at least 3 non-collinear points, got {points}")]
    InvalidGeometry { points: usize },
}
