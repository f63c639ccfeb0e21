// ============================================================================
// Interfaces Module
// Contains all trait definitions and contracts
// ============================================================================

mod event_handler;
mod matching_algorithm;
mod token_contract;

pub use event_handler::{
    EventHandler, ExchangeEvent, LoggingEventHandler, NoOpEventHandler, RecordingEventHandler,
};
pub use matching_algorithm::{Fill, IncomingOrder, MatchPlan, MatchingAlgorithm};
pub use token_contract::{NativeCurrency, TokenContract};
