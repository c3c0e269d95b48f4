/// In-process record store adapter.
pub mod in_memory_store;

/// Bounded-queue delivery channel used by websocket connections.
pub mod queue_channel;

/// Record store port consumed by the engine.
pub mod record_store;
