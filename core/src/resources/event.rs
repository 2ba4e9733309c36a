//! HubSpot enterprise event tracking.

use crate::client::HubSpotClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::params::Params;
use crate::properties::PropertyHash;

pub const TRACK_EVENT_PATH: &str = "/v1/event/";

impl HubSpotClient {
    /// Record an occurrence of `event_id`. Caller params (typically `email`)
    /// precede the event id in the query.
    pub fn build_track_event(&self, event_id: &str, params: &Params) -> Result<HttpRequest, ApiError> {
        let params = params.clone().with("_n", event_id);
        self.build_track(TRACK_EVENT_PATH, &params)
    }

    pub fn parse_track_event(&self, response: HttpResponse) -> Result<(), ApiError> {
        self.parse_empty(response)
    }

    /// Upsert the contact by email, then track the event. Execute the two
    /// requests in order.
    pub fn build_track_and_set_properties(
        &self,
        event_id: &str,
        contact_email: &str,
        contact_properties: &PropertyHash,
    ) -> Result<(HttpRequest, HttpRequest), ApiError> {
        let upsert = self.build_create_or_update_contact_by_email(contact_email, contact_properties)?;
        let track = self.build_track_event(event_id, &Params::new())?;
        Ok((upsert, track))
    }
}
