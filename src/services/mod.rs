pub mod recalculation;
pub mod server;

pub use recalculation::{RecalculationService, RecalculationSummary};
pub use server::ServerService;
