//! User state held by a session.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::Address;

/// Profile fields returned by a profile provider.
pub type Profile = Map<String, Value>;

/// A connected user: the signer address merged with its profile record.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Signer address reported by the wallet.
    pub address: Address,
    /// Profile fields for that address.
    pub profile: Profile,
}

impl User {
    /// Create a user from an address and its profile.
    pub fn new(address: Address, profile: Profile) -> Self {
        Self { address, profile }
    }

    /// Look up a single profile field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.profile.get(key)
    }
}

/// Serializes as one flat object: `address` first, then the profile fields.
///
/// A profile field named `address` is skipped, so the signer address the
/// wallet reported always wins. A plain object spread (`{ address, ...profile }`)
/// would let the profile overwrite it; here the published address is always
/// the well-formed one the session verified.
impl Serialize for User {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let shadowed = usize::from(self.profile.contains_key("address"));
        let mut map = serializer.serialize_map(Some(1 + self.profile.len() - shadowed))?;
        map.serialize_entry("address", &self.address)?;
        for (key, value) in self.profile.iter().filter(|(k, _)| *k != "address") {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// The value published by a session.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UserState {
    /// No user is connected.
    #[default]
    Absent,
    /// A wallet is connected and its profile has been loaded.
    Present(User),
}

impl UserState {
    /// Check if a user is connected.
    pub fn is_present(&self) -> bool {
        matches!(self, UserState::Present(_))
    }

    /// Get the connected user, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            UserState::Present(user) => Some(user),
            UserState::Absent => None,
        }
    }

    /// Get the connected address, if any.
    pub fn address(&self) -> Option<&Address> {
        self.user().map(|u| &u.address)
    }
}

impl From<User> for UserState {
    fn from(user: User) -> Self {
        UserState::Present(user)
    }
}

impl From<Option<User>> for UserState {
    fn from(user: Option<User>) -> Self {
        user.map_or(UserState::Absent, UserState::Present)
    }
}

/// `Absent` serializes as `null`.
impl Serialize for UserState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            UserState::Absent => serializer.serialize_none(),
            UserState::Present(user) => user.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(value: Value) -> Profile {
        match value {
            Value::Object(map) => map,
            _ => panic!("profile must be an object"),
        }
    }

    fn alice() -> User {
        User::new(
            Address::parse("0xABC").unwrap(),
            profile(json!({ "name": "Alice" })),
        )
    }

    #[test]
    fn test_default() {
        let state = UserState::default();
        assert_eq!(state, UserState::Absent);
        assert!(!state.is_present());
        assert!(state.user().is_none());
        assert!(state.address().is_none());
    }

    #[test]
    fn test_present_accessors() {
        let state = UserState::from(alice());
        assert!(state.is_present());
        assert_eq!(state.address().unwrap().as_str(), "0xABC");
        assert_eq!(state.user().unwrap().field("name"), Some(&json!("Alice")));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(UserState::from(None), UserState::Absent);
        assert!(UserState::from(Some(alice())).is_present());
    }

    #[test]
    fn test_absent_serializes_as_null() {
        assert_eq!(serde_json::to_value(UserState::Absent).unwrap(), Value::Null);
    }

    #[test]
    fn test_user_serializes_flat() {
        let value = serde_json::to_value(UserState::from(alice())).unwrap();
        assert_eq!(value, json!({ "address": "0xABC", "name": "Alice" }));
    }

    #[test]
    fn test_profile_address_is_shadowed() {
        let user = User::new(
            Address::parse("0x1").unwrap(),
            profile(json!({ "address": "0xdead", "email": "a@b.com" })),
        );
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value, json!({ "address": "0x1", "email": "a@b.com" }));
    }
}
