use std::fmt;
use thiserror::Error;

/// Level of the document tree a node lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Page,
    Zone,
    Line,
    Word,
    Chunk,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Page => write!(f, "page"),
            NodeKind::Zone => write!(f, "zone"),
            NodeKind::Line => write!(f, "line"),
            NodeKind::Word => write!(f, "word"),
            NodeKind::Chunk => write!(f, "chunk"),
        }
    }
}

/// Structural defects that make a document tree unusable.
#[derive(Debug, Error, PartialEq)]
pub enum TreeError {
    #[error("{kind} {index} has a non-finite bounding box")]
    NonFiniteBounds { kind: NodeKind, index: usize },

    #[error("{kind} {index} is owned by more than one parent")]
    SharedChild { kind: NodeKind, index: usize },

    #[error("{kind} handle {index} does not belong to this document")]
    DanglingHandle { kind: NodeKind, index: usize },
}

#[derive(Debug, Error)]
pub enum LabelingError {
    #[error("malformed document tree: {0}")]
    MalformedTree(#[from] TreeError),

    #[error("ground-truth field `{field}` has unparseable value {value:?}")]
    UnparseableField { field: &'static str, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LabelingError>;
