pub mod models;

pub use models::{
    AthleteId, Boat, Piece, PiecePairAnalysis, RatingType, Session, Side, SwapReport,
    SwappedAthlete, TeamId,
};
