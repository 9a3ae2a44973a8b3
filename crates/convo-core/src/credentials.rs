//! Credential persistence seam.

use crate::user::{User, UserRole};

/// Key under which the user's account name is persisted.
pub const KEY_USER_NAME: &str = "user.name";
/// Key under which the user's role is persisted.
pub const KEY_USER_ROLE: &str = "user.role";
/// Key under which the user's auth token is persisted.
pub const KEY_USER_AUTH_TOKEN: &str = "user.authToken";

/// String key/value store for persisting login credentials across client
/// restarts (a browser would use cookies; a desktop app a config file).
/// The session controller decides *what* to persist, never *how*.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn delete(&self, key: &str);
}

/// Writes the three user keys to the store.
pub fn persist_user(store: &dyn CredentialStore, user: &User) {
    store.set(KEY_USER_NAME, &user.name);
    store.set(KEY_USER_ROLE, user.role.as_wire());
    store.set(KEY_USER_AUTH_TOKEN, &user.auth_token);
}

/// Reconstructs a user from the store, if all three keys are present.
pub fn load_user(store: &dyn CredentialStore) -> Option<User> {
    let name = store.get(KEY_USER_NAME)?;
    let role = store.get(KEY_USER_ROLE)?;
    let auth_token = store.get(KEY_USER_AUTH_TOKEN)?;
    Some(User::new(name, UserRole::from_wire(&role), auth_token))
}

/// Removes the three user keys from the store.
pub fn clear_user(store: &dyn CredentialStore) {
    store.delete(KEY_USER_NAME);
    store.delete(KEY_USER_ROLE);
    store.delete(KEY_USER_AUTH_TOKEN);
}
