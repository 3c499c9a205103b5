use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Event, InviteDecision, InviteResponse};
use crate::store::{EventPatch, EventStore};

#[derive(Clone)]
pub struct InviteService {
    events: Arc<dyn EventStore>,
}

impl InviteService {
    pub fn new(events: Arc<dyn EventStore>) -> Self {
        Self { events }
    }

    /// Record an invite decision. Replace semantics: any prior entry for the
    /// user is dropped from both lists before the new one is appended, so a
    /// user sits in at most one list and repeat calls never duplicate.
    pub async fn respond(
        &self,
        event_id: Uuid,
        responder: InviteResponse,
        decision: InviteDecision,
    ) -> Result<Event> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        let mut accepted: Vec<InviteResponse> = event
            .accepted
            .into_iter()
            .filter(|r| r.id != responder.id)
            .collect();
        let mut declined: Vec<InviteResponse> = event
            .declined
            .into_iter()
            .filter(|r| r.id != responder.id)
            .collect();

        match decision {
            InviteDecision::Accepted => accepted.push(responder),
            InviteDecision::Declined => declined.push(responder),
        }

        self.events
            .update_by_id(
                event_id,
                EventPatch {
                    accepted: Some(accepted),
                    declined: Some(declined),
                    ..Default::default()
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
    }
}
