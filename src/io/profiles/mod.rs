use std::fmt::{Display, Formatter};
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use crate::config::ApiConfig;
use crate::io::transport::{post_json, AuthenticatedTransport, TransportError};
use crate::profile::priority::ProfileList;
use crate::profile::Profile;
use wire::{parse_profiles, DeleteProfileRequest, PriorityRequest, SaveProfileRequest};

pub mod wire;

#[derive(Debug)]
pub enum StoreError {
    Transport(TransportError),
    Json(serde_json::Error),
    /// The default profile is never deleted.
    DefaultProfile,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Transport(e) => write!(f, "{}", e),
            StoreError::Json(e) => write!(f, "Unreadable profiles: {}", e),
            StoreError::DefaultProfile => write!(f, "The default profile cannot be deleted."),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<TransportError> for StoreError {
    fn from(e: TransportError) -> Self {
        StoreError::Transport(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Json(e)
    }
}

/// Where profiles are kept between editing sessions.
#[async_trait]
pub trait ProfileStore {
    async fn list_profiles(&self) -> Result<ProfileList, StoreError>;

    async fn save_profile(&self, request: &SaveProfileRequest<'_>) -> Result<(), StoreError>;

    async fn delete_profile(&self, profile: &Profile) -> Result<(), StoreError>;

    /// Send the whole priority order, after a profile has been moved.
    async fn update_priorities(&self, profiles: &ProfileList) -> Result<(), StoreError>;
}

pub struct HttpProfileStore {
    transport: Arc<dyn AuthenticatedTransport>,
    api: ApiConfig,
}

impl HttpProfileStore {
    pub fn new(transport: Arc<dyn AuthenticatedTransport>, api: ApiConfig) -> Self {
        Self { transport, api }
    }
}

#[async_trait]
impl ProfileStore for HttpProfileStore {
    async fn list_profiles(&self) -> Result<ProfileList, StoreError> {
        let s = self.transport.get(self.api.get_profiles_url()).await?;
        let profiles = parse_profiles(&s)?;
        debug!("Retrieved {} profiles", profiles.len());
        Ok(ProfileList::from_profiles(profiles))
    }

    async fn save_profile(&self, request: &SaveProfileRequest<'_>) -> Result<(), StoreError> {
        post_json(&*self.transport, self.api.get_save_profile_url(), request).await?;
        info!("Profile saved successfully");
        Ok(())
    }

    async fn delete_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        if profile.is_default() {
            return Err(StoreError::DefaultProfile);
        }
        let request = DeleteProfileRequest::from(profile);
        post_json(&*self.transport, self.api.get_delete_profile_url(), &request).await?;
        info!("Profile {} deleted successfully", profile);
        Ok(())
    }

    async fn update_priorities(&self, profiles: &ProfileList) -> Result<(), StoreError> {
        let request = PriorityRequest::from(profiles);
        post_json(&*self.transport, self.api.get_priority_url(), &request).await?;
        debug!("Saved priority order of {} profiles", profiles.get_ordered().len());
        Ok(())
    }
}
