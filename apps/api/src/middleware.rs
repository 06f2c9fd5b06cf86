use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use integrations_core::{AppError, OrgId, Principal};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::state::AppState;

pub const IDENTITY_HEADER: &str = "x-rh-identity";

#[derive(Debug, Deserialize)]
struct IdentityEnvelope {
    identity: Identity,
}

#[derive(Debug, Deserialize)]
struct Identity {
    org_id: String,
    user: Option<IdentityUser>,
}

#[derive(Debug, Deserialize)]
struct IdentityUser {
    username: String,
}

/// Decodes the identity header into an org id and username.
fn decode_identity(raw_identity: &str) -> Result<(OrgId, String), AppError> {
    let bytes = STANDARD
        .decode(raw_identity.trim())
        .map_err(|_| AppError::Unauthorized("identity header is not valid base64".to_owned()))?;
    let envelope = serde_json::from_slice::<IdentityEnvelope>(&bytes)
        .map_err(|_| AppError::Unauthorized("identity header is not a valid identity".to_owned()))?;

    let org_id = OrgId::new(envelope.identity.org_id)
        .map_err(|_| AppError::Unauthorized("identity has no org id".to_owned()))?;
    let username = envelope
        .identity
        .user
        .map(|user| user.username)
        .filter(|username| !username.trim().is_empty())
        .ok_or_else(|| AppError::Unauthorized("identity has no username".to_owned()))?;

    Ok((org_id, username))
}

pub async fn require_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let raw_identity = request
        .headers()
        .get(IDENTITY_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("identity header is required".to_owned()))?
        .to_owned();

    let (org_id, username) = decode_identity(raw_identity.as_str())?;
    let roles = state
        .role_resolver
        .resolve_roles(&org_id, username.as_str(), raw_identity.as_str())
        .await?;

    request
        .extensions_mut()
        .insert(Principal::new(org_id, username, roles));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use integrations_core::AppError;

    use super::decode_identity;

    #[test]
    fn decodes_org_and_username() {
        let header = STANDARD.encode(r#"{"identity":{"org_id":"org-1","user":{"username":"alice"}}}"#);

        let decoded = decode_identity(header.as_str());

        assert!(matches!(
            decoded,
            Ok((ref org_id, ref username)) if org_id.as_str() == "org-1" && username == "alice"
        ));
    }

    #[test]
    fn rejects_garbage_and_incomplete_identities() {
        let no_user = STANDARD.encode(r#"{"identity":{"org_id":"org-1"}}"#);
        let blank_org = STANDARD.encode(r#"{"identity":{"org_id":" ","user":{"username":"a"}}}"#);

        assert!(matches!(
            decode_identity("%%%"),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            decode_identity(no_user.as_str()),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            decode_identity(blank_org.as_str()),
            Err(AppError::Unauthorized(_))
        ));
    }
}
