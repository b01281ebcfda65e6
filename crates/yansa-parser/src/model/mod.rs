//! Data model shared by every pipeline stage.

mod removed;
mod result;
mod token;

pub use removed::{Confidence, RemovedToken};
pub use result::{ParseResult, SequenceKind};
pub use token::{Token, TokenKind};
