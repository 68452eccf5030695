//! Command string parsing.

mod tokenizer;

pub use tokenizer::tokenize;
