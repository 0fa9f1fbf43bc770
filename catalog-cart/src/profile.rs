use crate::error::CartResult;
use catalog_store::DocumentStore;
use catalog_types::{UserId, UserProfile};
use tracing::debug;

/// Collection and document id of a user's profile.
pub fn profile_path(user: &UserId) -> (&'static str, &str) {
    ("users", user.as_str())
}

/// Loads the `users/{uid}` profile. Signed-out users and users without a
/// profile document have no profile.
pub async fn load_profile(
    store: &dyn DocumentStore,
    user: Option<&UserId>,
) -> CartResult<Option<UserProfile>> {
    let Some(user) = user else {
        return Ok(None);
    };
    let (collection, id) = profile_path(user);
    let Some(doc) = store.get(collection, id).await? else {
        debug!(user = %user, "no profile document");
        return Ok(None);
    };
    Ok(Some(doc.decode()?))
}
