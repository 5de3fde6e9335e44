//! Identifier parsing errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("Not an ARN: {0}")]
    NotAnArn(String),

    #[error("Expected {expected} segments in {arn}, found {found}")]
    SegmentCount {
        arn: String,
        expected: usize,
        found: usize,
    },

    #[error("Unexpected service '{service}' in {arn}")]
    WrongService { arn: String, service: String },

    #[error("Expected resource type '{expected}' in {arn}, found '{found}'")]
    WrongResource {
        arn: String,
        expected: &'static str,
        found: String,
    },

    #[error("Empty segment {position} in {arn}")]
    EmptySegment { arn: String, position: usize },
}
