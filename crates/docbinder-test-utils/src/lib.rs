pub mod helpers;
pub mod mock_extractor;

pub use helpers::*;
pub use mock_extractor::MockExtractor;
