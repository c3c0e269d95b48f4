// Expose the modules
pub mod api;
pub mod config;
pub mod domain;
pub mod inbounds;
pub mod outbounds;

// Re-export key types for easier usage
pub use api::{Api, AppState};
pub use config::Config;
pub use domain::models::standing::Standing;
pub use domain::models::types::{
    CardColor, EventKind, EventValidationError, League, Match, MatchEvent, MatchSnapshot,
    MatchStatus, Player, Side, Team, ValidationError,
};
pub use domain::services::broadcast::{
    Broadcaster, DeliveryChannel, DeliveryError, PublishReport, SubscriptionGuard,
    SubscriptionRegistry,
};
pub use domain::services::change_detector::{detect, ChangeSet};
pub use domain::services::match_lifecycle::{
    LifecycleError, MatchLifecycleService, MatchLifecycleServiceImpl, MatchSavedOutcome,
    StandingsStatus,
};
pub use domain::services::payloads::{score_update, EventPayloadBuilder, Frame, Payload, PayloadError};
pub use domain::services::standings::{compute_table, RecomputeOutcome, StandingsAggregator, StandingsError};
pub use outbounds::record_store::{RecordStore, RecordStoreError};
