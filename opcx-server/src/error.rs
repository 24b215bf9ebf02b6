use opcx_types::NodeId;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum NodeError {
    #[error("Invalid browse name: {0}")]
    InvalidBrowseName(String),
    #[error("Missing browse name")]
    MissingBrowseName,
    #[error("Node id must not be null")]
    NullNodeId,
    #[error("Duplicate node {0}")]
    DuplicateNode(NodeId),
}
