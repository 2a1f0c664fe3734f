//! Error types shared by the graph and concurrency layers.
//!
//! Structural errors are reported by the operation that detects them. Failures of work
//! dispatched through an execution model are deferred until results are collected.

use thiserror::Error;

/// Errors raised by graph construction and mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A node index was at or beyond the graph order.
    #[error("{operation}: node index {index} out of range - graph order is {order}")]
    NodeOutOfRange {
        /// Operation that rejected the index.
        operation: &'static str,
        /// Offending node index.
        index: usize,
        /// Order of the graph at the time of the call.
        order: usize,
    },

    /// An edge position was at or beyond the number of edges hosted by a node.
    #[error("{operation}: edge index {index} out of range for node {node} - number of edges is {len}")]
    EdgeOutOfRange {
        /// Operation that rejected the position.
        operation: &'static str,
        /// Node hosting the edge.
        node: usize,
        /// Offending edge position.
        index: usize,
        /// Number of edges hosted by `node`.
        len: usize,
    },

    /// An insertion position was beyond the end of a node's edges.
    #[error("{operation}: insertion position {index} out of range for node {node} - number of edges is {len}")]
    InsertionOutOfRange {
        /// Operation that rejected the position.
        operation: &'static str,
        /// Node hosting the edges.
        node: usize,
        /// Offending insertion position.
        index: usize,
        /// Number of edges hosted by `node`.
        len: usize,
    },

    /// A half-open range had its start after its end.
    #[error("{operation}: invalid range [{first}, {last})")]
    InvalidRange {
        /// Operation that rejected the range.
        operation: &'static str,
        /// Start of the range.
        first: usize,
        /// End of the range.
        last: usize,
    },

    /// The mirror of an undirected edge could not be located.
    #[error("partner of edge {index} of node {node} not found in partition {partner}")]
    MissingPartner {
        /// Node hosting the edge.
        node: usize,
        /// Position of the edge.
        index: usize,
        /// Node expected to host the partner.
        partner: usize,
    },

    /// An edge list passed to a constructor breaks a structural invariant.
    #[error("invalid edge list at node {node}, edge {index}: {reason}")]
    InvalidEdgeList {
        /// Node whose partition holds the offending entry.
        node: usize,
        /// Position of the offending entry.
        index: usize,
        /// Description of the broken invariant.
        reason: &'static str,
    },

    /// The number of node weights does not match the number of edge partitions.
    #[error("inconsistent initialization: {nodes} node weights for {partitions} edge partitions")]
    InconsistentInitialization {
        /// Number of node weights supplied.
        nodes: usize,
        /// Number of edge partitions supplied.
        partitions: usize,
    },

    /// A fixed-size graph was built from data of the wrong shape.
    #[error("static graph expects order {expected_order} and size {expected_size}, found order {order} and size {size}")]
    StaticShapeMismatch {
        /// Order fixed by the type.
        expected_order: usize,
        /// Size fixed by the type.
        expected_size: usize,
        /// Order of the supplied data.
        order: usize,
        /// Size of the supplied data.
        size: usize,
    },
}

/// Failures of tasks dispatched through an execution model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The task panicked; the payload message is preserved where it was a string.
    #[error("task panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },

    /// The task was dropped before producing a result.
    #[error("task was dropped before producing a result")]
    Disconnected,
}

impl TaskError {
    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            String::from("non-string panic payload")
        };
        TaskError::Panicked { message }
    }
}

/// Result alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

pub(crate) fn check_node(operation: &'static str, index: usize, order: usize) -> Result<()> {
    if index < order {
        Ok(())
    } else {
        Err(GraphError::NodeOutOfRange {
            operation,
            index,
            order,
        })
    }
}

pub(crate) fn check_edge(
    operation: &'static str,
    node: usize,
    index: usize,
    len: usize,
) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(GraphError::EdgeOutOfRange {
            operation,
            node,
            index,
            len,
        })
    }
}
