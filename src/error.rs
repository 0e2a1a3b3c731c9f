use thiserror::Error;

/// Everything that can go wrong while building a barn filter frustum or loading a scene for it.
#[derive(Error, Debug)]
pub enum FrustumError {
    /// The rounded rect is made of 4 equal arcs, so the subdivision count has to split evenly.
    #[error("subdivision count must be a positive multiple of 4, got {0}")]
    InvalidSubdivisions(u32),

    #[error("shape axis must be 0, 1 or 2, got {0}")]
    InvalidAxis(usize),

    /// Connector edges would not land on matching vertices of the near and far shapes.
    #[error(
        "{vertex_count} vertices per shape can't be split into {edge_count} evenly spaced \
         connector edges"
    )]
    UnevenStride { vertex_count: usize, edge_count: usize },

    #[error("unknown barn mode {0}, expected 0 (physical) or 1 (analytic)")]
    InvalidBarnMode(i64),

    #[error("failed to parse scene description: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FrustumError>;
