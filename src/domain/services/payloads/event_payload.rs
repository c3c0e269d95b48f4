use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::domain::models::types::{EventKind, EventValidationError, MatchEvent};
use crate::outbounds::record_store::RecordStore;

use super::{EventDetails, MatchEventPayload, Payload, PayloadError, PlayerRef, TeamRef};

/// Turns recorded match events into `match_event` payloads.
///
/// Player names and the acting player's team are looked up through the record
/// store; the event itself only carries references.
pub struct EventPayloadBuilder {
    store: Arc<dyn RecordStore>,
}

impl EventPayloadBuilder {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Builds the payload for an event.
    ///
    /// # Arguments
    /// * `event` - The recorded event
    ///
    /// # Returns
    /// * `Ok(Payload)` - A `match_event` payload with the kind-specific extension
    /// * `Err(PayloadError)` - If the event misses a required field or a reference
    ///   cannot be resolved
    pub async fn build(&self, event: &MatchEvent) -> Result<Payload, PayloadError> {
        event.validate()?;

        let player = self.player_ref(event.player_id).await?;
        let team = self.store.lookup_player_team(event.player_id).await?;

        let details = match event.kind {
            EventKind::Goal => {
                let assistant = match event.assisting_player_id {
                    Some(id) => Some(self.player_ref(id).await?),
                    None => None,
                };
                Some(EventDetails::Goal { assistant })
            }
            EventKind::Card => Some(EventDetails::Card {
                card_color: event.card_color.ok_or(EventValidationError::MissingRequiredField {
                    kind: event.kind,
                    field: "card_color",
                })?,
            }),
            EventKind::Substitution => {
                let (sub_in, sub_out) = match (event.sub_in, event.sub_out) {
                    (Some(sub_in), Some(sub_out)) => (sub_in, sub_out),
                    (None, _) => return Err(missing(event.kind, "sub_in")),
                    (_, None) => return Err(missing(event.kind, "sub_out")),
                };
                Some(EventDetails::Substitution {
                    sub_in: self.player_ref(sub_in).await?,
                    sub_out: self.player_ref(sub_out).await?,
                })
            }
            EventKind::Injury | EventKind::Shot | EventKind::Penalty | EventKind::PeriodEnd => None,
        };

        debug!("Built {} payload for event {}", event.kind, event.id);

        Ok(Payload::MatchEvent(MatchEventPayload {
            event_id: event.id,
            match_id: event.match_id,
            event_type: event.kind,
            minute: event.minute,
            player,
            team: TeamRef { id: team.id, name: team.name },
            details,
        }))
    }

    async fn player_ref(&self, player_id: Uuid) -> Result<PlayerRef, PayloadError> {
        let player = self.store.lookup_player(player_id).await?;
        Ok(PlayerRef { id: player.id, name: player.display_name() })
    }
}

fn missing(kind: EventKind, field: &'static str) -> PayloadError {
    EventValidationError::MissingRequiredField { kind, field }.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::types::{CardColor, Player, Team};
    use crate::outbounds::in_memory_store::InMemoryRecordStore;
    use crate::outbounds::record_store::{MockRecordStore, RecordStoreError};

    struct Fixture {
        builder: EventPayloadBuilder,
        team: Team,
        scorer: Player,
        assist: Player,
    }

    fn setup() -> Fixture {
        let store = Arc::new(InMemoryRecordStore::new());
        let team = Team::new("Harbour Hawks", "HAW");
        let scorer = Player::new("Ana", "Ruiz", 9, team.id);
        let assist = Player::new("Mia", "Okafor", 7, team.id);
        store.add_team(team.clone());
        store.add_player(scorer.clone());
        store.add_player(assist.clone());
        Fixture { builder: EventPayloadBuilder::new(store), team, scorer, assist }
    }

    #[tokio::test]
    async fn test_goal_with_assist() {
        let f = setup();
        let event = MatchEvent::new(Uuid::new_v4(), 23, EventKind::Goal, f.scorer.id)
            .with_assist(f.assist.id);

        let Payload::MatchEvent(payload) = f.builder.build(&event).await.unwrap() else {
            panic!("expected a match_event payload");
        };
        assert_eq!(payload.player.name, "Ana Ruiz");
        assert_eq!(payload.team.id, f.team.id);
        assert_eq!(
            payload.details,
            Some(EventDetails::Goal {
                assistant: Some(PlayerRef { id: f.assist.id, name: "Mia Okafor".to_string() })
            })
        );
    }

    #[tokio::test]
    async fn test_goal_without_assist() {
        let f = setup();
        let event = MatchEvent::new(Uuid::new_v4(), 23, EventKind::Goal, f.scorer.id);
        let Payload::MatchEvent(payload) = f.builder.build(&event).await.unwrap() else {
            panic!("expected a match_event payload");
        };
        assert_eq!(payload.details, Some(EventDetails::Goal { assistant: None }));
    }

    #[tokio::test]
    async fn test_card_and_plain_kinds() {
        let f = setup();
        let card = MatchEvent::new(Uuid::new_v4(), 40, EventKind::Card, f.scorer.id)
            .with_card(CardColor::Green);
        let Payload::MatchEvent(payload) = f.builder.build(&card).await.unwrap() else {
            panic!("expected a match_event payload");
        };
        assert_eq!(payload.details, Some(EventDetails::Card { card_color: CardColor::Green }));

        for kind in [EventKind::Injury, EventKind::Shot, EventKind::Penalty, EventKind::PeriodEnd] {
            let event = MatchEvent::new(Uuid::new_v4(), 70, kind, f.scorer.id);
            let Payload::MatchEvent(payload) = f.builder.build(&event).await.unwrap() else {
                panic!("expected a match_event payload");
            };
            assert_eq!(payload.event_type, kind);
            assert_eq!(payload.details, None);
        }
    }

    #[tokio::test]
    async fn test_substitution_missing_player_is_rejected() {
        let f = setup();
        let mut event = MatchEvent::new(Uuid::new_v4(), 55, EventKind::Substitution, f.scorer.id)
            .with_substitution(f.assist.id, f.scorer.id);
        event.sub_out = None;

        assert_eq!(
            f.builder.build(&event).await,
            Err(PayloadError::InvalidEvent(EventValidationError::MissingRequiredField {
                kind: EventKind::Substitution,
                field: "sub_out",
            }))
        );
    }

    #[tokio::test]
    async fn test_invalid_event_never_reaches_the_store() {
        let mut store = MockRecordStore::new();
        store.expect_lookup_player().never();
        store.expect_lookup_player_team().never();
        let builder = EventPayloadBuilder::new(Arc::new(store));

        let event = MatchEvent::new(Uuid::new_v4(), 5, EventKind::Card, Uuid::new_v4());
        assert!(matches!(builder.build(&event).await, Err(PayloadError::InvalidEvent(_))));
    }

    #[tokio::test]
    async fn test_unknown_player_is_a_lookup_error() {
        let f = setup();
        let unknown = Uuid::new_v4();
        let event = MatchEvent::new(Uuid::new_v4(), 5, EventKind::Shot, unknown);
        assert_eq!(
            f.builder.build(&event).await,
            Err(PayloadError::Lookup(RecordStoreError::NotFound { entity: "Player", id: unknown }))
        );
    }
}
