//! Carousel error types

use thiserror::Error;

/// Errors produced while building or driving a carousel
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CarouselError {
    /// No container element was supplied in the configuration
    #[error("Please specify a carousel container")]
    MissingContainer,

    /// A required sub-element could not be resolved inside the container
    #[error("Carousel {role} element not found (selector `{selector}`)")]
    MissingElement {
        /// Which part of the markup is missing (viewport, list, ...)
        role: &'static str,
        /// The selector used for the lookup
        selector: String,
    },

    /// A selector handed to the document could not be parsed
    #[error("Invalid selector `{selector}`: {message}")]
    InvalidSelector {
        /// The offending selector text
        selector: String,
        /// Parser diagnostic
        message: String,
    },

    /// A "go to slide" value that is neither prev, next, nor an integer
    #[error("Invalid slide target: {0:?}")]
    InvalidTarget(String),
}

/// Result type for carousel operations
pub type Result<T> = std::result::Result<T, CarouselError>;
