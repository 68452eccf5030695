//! Media information decoding from engine output.

mod information;
mod parser;

pub use information::{MediaInformation, StreamInformation};
pub use parser::parse;
