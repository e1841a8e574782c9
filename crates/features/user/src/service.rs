use crate::error::{UserError, UserErrorExt};
use serde::Serialize;
use tessera_auth::{ApiClient, SessionManager};
use tessera_domain::session::Identity;
use tracing::info;

/// Fields to change on a profile; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UserService {
    client: ApiClient,
}

impl UserService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// The signed-in user, as last loaded by the session.
    pub fn current(&self) -> Result<Identity, UserError> {
        self.session().and_then(SessionManager::identity).ok_or_else(|| UserError::NotAuthenticated {
            message: "Sign in to view the profile".into(),
            context: None,
        })
    }

    pub async fn get(&self, id: &str) -> Result<Identity, UserError> {
        let path = user_path(id)?;
        let envelope = self.client.get::<Identity>(&path).await.context(path)?;
        Ok(envelope.into_data())
    }

    /// Updates a profile. Updating the signed-in user also reloads the session identity so
    /// the persisted copy stays current.
    pub async fn update(&self, id: &str, update: &ProfileUpdate) -> Result<Identity, UserError> {
        let path = user_path(id)?;
        let updated =
            self.client.put::<Identity, _>(&path, update).await.context(path)?.into_data();
        info!(user = %updated.id, "Profile updated");

        let is_me = |s: &&SessionManager| s.identity().is_some_and(|me| me.id == id);
        if let Some(session) = self.session().filter(is_me) {
            session.load_current_user().await.context("Reloading session identity")?;
        }
        Ok(updated)
    }

    fn session(&self) -> Option<&SessionManager> {
        self.client.session()
    }
}

fn user_path(id: &str) -> Result<String, UserError> {
    let is_legal = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
    if id.is_empty() || !id.chars().all(is_legal) {
        return Err(UserError::InvalidId { id: id.to_owned() });
    }
    Ok(format!("/users/{id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_paths_for_safe_ids_only() {
        assert_eq!(user_path("u-1").unwrap(), "/users/u-1");
        assert!(matches!(user_path(""), Err(UserError::InvalidId { .. })));
        assert!(matches!(user_path("../admin"), Err(UserError::InvalidId { .. })));
        assert!(matches!(user_path("a b"), Err(UserError::InvalidId { .. })));
    }

    #[test]
    fn update_serializes_only_changed_fields() {
        let update = ProfileUpdate { display_name: Some("Ada".into()), email: None };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({ "display_name": "Ada" }));
    }
}
