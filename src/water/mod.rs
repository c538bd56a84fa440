//! 물 배관망 구간 사이징 모듈 모음.

pub mod analyzer;
pub mod hazen_williams;
pub mod network;
pub mod segment;

pub use analyzer::*;
pub use hazen_williams::*;
pub use network::*;
pub use segment::*;
