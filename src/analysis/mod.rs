pub mod margin;
pub mod piece_pair;
pub mod session;
pub mod swaps;

pub use margin::{margin, performance_diff, swing};
pub use piece_pair::{analyze_piece_pair, InsufficientBoatsError};
pub use session::analyze_session;
pub use swaps::detect_swaps;
