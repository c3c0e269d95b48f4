/// +----------------------------------------------------------+
/// | MODULES                                                  |
/// +----------+-------+-------+------------------------------+
/// | Exports:                                                 |
/// |   - dtos                                                 |
/// |   - handlers                                             |
/// +----------------------------------------------------------+

/// Data transfer objects for inbound mutations and their responses.
pub mod dtos;

/// Handlers that persist a mutation and hand it to the lifecycle orchestrator.
pub mod handlers;
