//! UseCase: ユーザープロフィール
//!
//! Profiles are mirrored into the store by the account system so that a
//! relayed message can carry its sender's name and avatar.

use std::sync::Arc;

use crate::domain::{MessageStore, UserId, UserProfile};

use super::error::ProfileError;

/// プロフィール登録（upsert）のユースケース
pub struct UpsertProfileUseCase {
    store: Arc<dyn MessageStore>,
}

impl UpsertProfileUseCase {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, profile: UserProfile) -> Result<UserProfile, ProfileError> {
        let saved = self.store.save_user(profile).await?;
        tracing::info!("Profile of user {} saved ({})", saved.id, saved.name);
        Ok(saved)
    }
}

/// プロフィール取得のユースケース
pub struct GetProfileUseCase {
    store: Arc<dyn MessageStore>,
}

impl GetProfileUseCase {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, user_id: UserId) -> Result<UserProfile, ProfileError> {
        self.store
            .find_user(user_id)
            .await?
            .ok_or(ProfileError::NotFound(user_id.value()))
    }
}
