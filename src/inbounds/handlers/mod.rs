/// +----------------------------------------------------------+
/// | MODULES                                                  |
/// +----------+-------+-------+------------------------------+
/// | Exports:                                                 |
/// |   - match_event_handler                                  |
/// |   - match_saved_handler                                  |
/// +----------------------------------------------------------+

/// Handler for newly recorded match events
pub mod match_event_handler;

/// Handler for match create/update requests
pub mod match_saved_handler;

pub use match_event_handler::handle_match_event;
pub use match_saved_handler::handle_match_saved;
