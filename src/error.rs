use thiserror::Error;

/// Top-level error type for navmesh baking and querying.
#[derive(Debug, Error)]
pub enum NavError {
    #[error(transparent)]
    Bake(#[from] BakeError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Errors raised while setting up or running a bake.
#[derive(Debug, Error)]
pub enum BakeError {
    #[error("invalid bake parameters: {0}")]
    InvalidParameters(String),

    #[error("scene bounds are empty or degenerate")]
    EmptyScene,
}

/// Errors related to the structure of a navigation graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node {node} references vertex {vertex}, but only {count} vertices exist")]
    VertexOutOfRange {
        node: usize,
        vertex: usize,
        count: usize,
    },

    #[error("node {node} references neighbor {neighbor}, but only {count} nodes exist")]
    NodeOutOfRange {
        node: usize,
        neighbor: usize,
        count: usize,
    },

    #[error("node {node} lists {neighbor} as neighbor across ({a}, {b}), but not vice versa")]
    AsymmetricNeighbor {
        node: usize,
        neighbor: usize,
        a: usize,
        b: usize,
    },
}

/// Errors related to path queries.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid path parameters: {0}")]
    InvalidParameters(String),
}

/// Convenience type alias for results using [`NavError`].
pub type Result<T> = std::result::Result<T, NavError>;
