use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

use super::{require_user, ServiceError};
use crate::config::DirectoryConfig;
use crate::domain::{ConnectionRequest, ConnectionStatus, Identity, StartupId, StartupProfile};
use crate::matching::{
    rank_matches, DirectoryFilter, DirectoryStats, DirectorySurface, RankedProfile,
};
use crate::normalize::{self, encode_timestamp};
use crate::store::{Collection, CollectionPath, Document, DocumentStore};

const UNKNOWN_SENDER: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryEntry {
    #[serde(flatten)]
    pub ranked: RankedProfile,
    /// A pending request from the viewer already targets this member.
    pub request_sent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryPage {
    pub surface: DirectorySurface,
    /// Counts over every loaded member, before filters.
    pub stats: DirectoryStats,
    pub entries: Vec<DirectoryEntry>,
}

/// Discovery surfaces and connection requests.
pub struct DirectoryService<S> {
    store: Arc<S>,
    config: DirectoryConfig,
}

impl<S> DirectoryService<S>
where
    S: DocumentStore + 'static,
{
    pub fn new(store: Arc<S>, config: DirectoryConfig) -> Self {
        Self { store, config }
    }

    /// Rank every other member against the viewer, then apply the surface's filters.
    pub fn browse(
        &self,
        identity: &Identity,
        surface: DirectorySurface,
        filter: &DirectoryFilter,
    ) -> Result<DirectoryPage, ServiceError> {
        let user = require_user(identity)?;
        let me = self.profile(user)?;

        let candidates: Vec<StartupProfile> = self
            .store
            .list(&CollectionPath::root(Collection::Startups))?
            .iter()
            .take(self.config.candidate_limit)
            .filter(|document| document.id != user.as_str())
            .map(normalize::startup_profile)
            .collect();

        let stats = DirectoryStats::from_profiles(&candidates);
        let sent = self.sent_requests(identity)?;
        let ranked = filter.apply(surface, rank_matches(me.as_ref(), candidates));

        debug!(
            viewer = %user,
            %surface,
            members = stats.members,
            shown = ranked.len(),
            "ranked directory"
        );

        let entries = ranked
            .into_iter()
            .map(|ranked| DirectoryEntry {
                request_sent: sent.contains(&ranked.profile.id),
                ranked,
            })
            .collect();

        Ok(DirectoryPage {
            surface,
            stats,
            entries,
        })
    }

    /// Targets of pending requests the viewer has already sent.
    pub fn sent_requests(&self, identity: &Identity) -> Result<HashSet<StartupId>, ServiceError> {
        let user = require_user(identity)?;
        Ok(self
            .store
            .list(&CollectionPath::root(Collection::ConnectionRequests))?
            .iter()
            .map(normalize::connection_request)
            .filter(|request| {
                &request.from_id == user && request.status == ConnectionStatus::Pending
            })
            .map(|request| request.to_id)
            .collect())
    }

    pub fn send_connection_request(
        &self,
        identity: &Identity,
        to_id: &StartupId,
        now: DateTime<Utc>,
    ) -> Result<ConnectionRequest, ServiceError> {
        let user = require_user(identity)?;
        if to_id == user {
            return Err(ServiceError::InvalidRequest(
                "cannot send a connection request to yourself".to_string(),
            ));
        }

        let target = self
            .profile(to_id)?
            .ok_or_else(|| ServiceError::ProfileNotFound(to_id.clone()))?;

        if self.sent_requests(identity)?.contains(to_id) {
            warn!(from = %user, to = %to_id, "duplicate connection request suppressed");
            return Err(ServiceError::DuplicateRequest(to_id.clone()));
        }

        let from_name = self
            .profile(user)?
            .map(|profile| profile.name)
            .unwrap_or_else(|| UNKNOWN_SENDER.to_string());

        let document = Document::from_value(
            "",
            json!({
                "fromId": user.as_str(),
                "toId": to_id.as_str(),
                "fromName": from_name,
                "toName": target.name,
                "status": ConnectionStatus::Pending.key(),
                "createdAt": encode_timestamp(now),
            }),
        );
        let path = CollectionPath::root(Collection::ConnectionRequests);
        let id = self.store.insert(&path, document.clone())?;

        info!(from = %user, to = %to_id, request = %id, "connection request sent");

        Ok(normalize::connection_request(&Document { id, ..document }))
    }

    fn profile(&self, id: &StartupId) -> Result<Option<StartupProfile>, ServiceError> {
        Ok(self
            .store
            .fetch(&CollectionPath::root(Collection::Startups), id.as_str())?
            .map(|document| normalize::startup_profile(&document)))
    }
}
