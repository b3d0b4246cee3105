//! Per-request principal resolution.

use tracing::{debug, warn};

use super::carrier::extract_from_carrier;
use super::{TokenCarrier, TokenService};
use crate::models::User;
use crate::store::UserStore;

/// Resolve the user a request is acting as.
///
/// Runs carrier extraction, token validation and user lookup in order. A
/// missing carrier, a rejected token, a deleted subject and a failed lookup
/// all yield `None`; there is no partially trusted result.
pub async fn resolve_principal<S>(
    tokens: &TokenService,
    carrier: Option<TokenCarrier<'_>>,
    users: &S,
) -> Option<User>
where
    S: UserStore + ?Sized,
{
    let token = extract_from_carrier(carrier)?;

    let username = match tokens.validate(token) {
        Ok(username) => username,
        Err(e) => {
            debug!(reason = %e, "rejected identity token");
            return None;
        }
    };

    match users.find_by_username(&username).await {
        Ok(Some(record)) => Some(record.user),
        Ok(None) => {
            debug!(username = %username, "token subject no longer exists");
            None
        }
        Err(e) => {
            warn!(error = %e, "user lookup failed while resolving principal");
            None
        }
    }
}
