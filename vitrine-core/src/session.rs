//! Signed-in customer state persisted next to the cart.
use crate::config::StorageKeys;
use crate::storage::KeyValueStore;
use serde::Deserialize;
use serde_json::Value;

pub const NOT_PROVIDED: &str = "Não informado";

/// Successful login response from the auth endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, alias = "user")]
    pub usuario: Option<Value>,
}

/// Access to the session keys.
pub struct Session<'a, S> {
    storage: &'a S,
    keys: &'a StorageKeys,
}

impl<'a, S: KeyValueStore> Session<'a, S> {
    pub const fn new(storage: &'a S, keys: &'a StorageKeys) -> Self {
        Self { storage, keys }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(err) => {
                log::warn!("could not read {key}: {err}");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(err) = self.storage.set_item(key, value) {
            log::error!("could not persist {key}: {err}");
        }
    }

    /// Signed-in customer email; gates checkout.
    #[must_use]
    pub fn identity(&self) -> Option<String> {
        self.read(&self.keys.user_email)
    }

    #[must_use]
    pub fn auth_token(&self) -> Option<String> {
        self.read(&self.keys.auth_token)
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.auth_token().is_some()
    }

    /// Persist a login. Token and email are stored only when a token came back.
    pub fn record_login(&self, email: &str, response: &LoginResponse) {
        if let Some(token) = response.token.as_deref() {
            self.write(&self.keys.auth_token, token);
            self.write(&self.keys.user_email, email);
        }
        if let Some(user) = &response.usuario {
            self.write(&self.keys.user_data, &user.to_string());
        }
    }

    /// Remove every session key.
    pub fn logout(&self) {
        for key in [
            &self.keys.auth_token,
            &self.keys.user_email,
            &self.keys.user_data,
        ] {
            if let Err(err) = self.storage.remove_item(key) {
                log::error!("could not clear {key}: {err}");
            }
        }
    }

    /// For pages that need a customer: returns the email, or wipes any stale
    /// session and returns `None` so the caller can redirect.
    pub fn require_identity(&self) -> Option<String> {
        let identity = self.identity();
        if identity.is_none() {
            self.logout();
        }
        identity
    }

    #[must_use]
    pub fn profile(&self) -> Profile {
        Profile::from_parts(
            self.read(&self.keys.user_data).as_deref(),
            self.identity().as_deref(),
        )
    }
}

/// Name and email shown on the profile page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub email: String,
}

impl Profile {
    #[must_use]
    pub fn from_parts(user_data: Option<&str>, stored_email: Option<&str>) -> Self {
        let record = user_data.and_then(|raw| serde_json::from_str::<Value>(raw).ok());
        let field = |keys: [&str; 2]| {
            record.as_ref().and_then(|r| {
                keys.iter()
                    .filter_map(|k| r.get(*k).and_then(Value::as_str))
                    .find(|v| !v.is_empty())
                    .map(str::to_string)
            })
        };
        let name = field(["nome", "Nome"]).unwrap_or_else(|| NOT_PROVIDED.to_string());
        let email = field(["email", "Email"])
            .or_else(|| stored_email.map(str::to_string))
            .unwrap_or_else(|| NOT_PROVIDED.to_string());
        Self { name, email }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    #[test]
    fn login_without_token_keeps_session_empty() {
        let storage = MemoryStore::new();
        let keys = StorageKeys::default();
        let session = Session::new(&storage, &keys);
        session.record_login("ana@loja.com", &LoginResponse::default());
        assert!(session.identity().is_none());

        let response = LoginResponse {
            token: Some("jwt".into()),
            usuario: Some(json!({ "nome": "Ana" })),
        };
        session.record_login("ana@loja.com", &response);
        assert_eq!(session.identity().as_deref(), Some("ana@loja.com"));
        assert!(session.is_logged_in());
        assert_eq!(session.profile().name, "Ana");
        assert_eq!(session.profile().email, "ana@loja.com");
    }

    #[test]
    fn logout_clears_all_keys() {
        let storage = MemoryStore::new();
        let keys = StorageKeys::default();
        let session = Session::new(&storage, &keys);
        session.record_login(
            "ana@loja.com",
            &LoginResponse {
                token: Some("jwt".into()),
                usuario: Some(json!({})),
            },
        );
        session.logout();
        assert!(storage.raw(&keys.auth_token).is_none());
        assert!(storage.raw(&keys.user_email).is_none());
        assert!(storage.raw(&keys.user_data).is_none());
    }

    #[test]
    fn require_identity_wipes_orphan_token() {
        let storage = MemoryStore::new();
        let keys = StorageKeys::default();
        storage.insert_raw(&keys.auth_token, "stale");
        let session = Session::new(&storage, &keys);
        assert!(session.require_identity().is_none());
        assert!(storage.raw(&keys.auth_token).is_none());
    }

    #[test]
    fn profile_falls_back_when_record_is_missing_or_broken() {
        assert_eq!(
            Profile::from_parts(None, None),
            Profile {
                name: NOT_PROVIDED.into(),
                email: NOT_PROVIDED.into()
            }
        );
        let broken = Profile::from_parts(Some("{oops"), Some("ana@loja.com"));
        assert_eq!(broken.name, NOT_PROVIDED);
        assert_eq!(broken.email, "ana@loja.com");
        let upper = Profile::from_parts(Some(r#"{"Nome":"Bia","Email":"bia@x.io"}"#), None);
        assert_eq!(upper.name, "Bia");
        assert_eq!(upper.email, "bia@x.io");
    }
}
