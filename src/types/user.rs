use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::password;
use crate::auth::token::TokenSigner;
use crate::types::error::AppError;

/// A fully loaded user record: profile, secret material, and both
/// relation sets. Plain value, no live ORM document behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub salt: String,
    pub hash: String,
    pub following: HashSet<Uuid>,
    pub favorites: HashSet<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration payload. `validated()` must run before the password is
/// hashed or anything touches the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// What a client gets back right after login or registration. `image`
/// serializes as `null` when unset rather than being omitted; secret
/// material never appears here.
#[derive(Debug, Clone, Serialize)]
pub struct AuthView {
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub token: String,
    pub image: Option<String>,
}

/// Public profile as seen by an (optional) viewer. `image` is always
/// present; leaving it out breaks every client that renders avatars.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub username: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub following: bool,
}

impl NewUser {
    /// Lowercases username and email and checks field shape. Uniqueness
    /// is the store's problem; only local validity is decided here.
    pub fn validated(mut self) -> Result<Self, AppError> {
        self.username = self.username.to_lowercase();
        self.email = self.email.to_lowercase();

        if self.username.is_empty() {
            return Err(AppError::blank("username"));
        }
        if !self.username.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AppError::invalid("username"));
        }
        if self.email.is_empty() {
            return Err(AppError::blank("email"));
        }
        if !email_shape_ok(&self.email) {
            return Err(AppError::invalid("email"));
        }
        if self.password.is_empty() {
            return Err(AppError::blank("password"));
        }
        Ok(self)
    }
}

// mirrors the classic \S+@\S+\.\S+ check: something either side of the
// `@`, a dot somewhere in the domain, no whitespace anywhere
fn email_shape_ok(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

impl User {
    /// Bare record with empty secret material and empty relations.
    /// Callers set a password before first persistence.
    pub fn new(id: Uuid, username: String, email: String, now: DateTime<Utc>) -> Self {
        User {
            id,
            username,
            email,
            bio: None,
            image: None,
            salt: String::new(),
            hash: String::new(),
            following: HashSet::new(),
            favorites: HashSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites salt and hash from a fresh random salt.
    pub fn set_password(&mut self, password: &str) {
        let derived = password::derive(password);
        self.salt = derived.salt;
        self.hash = derived.hash;
    }

    /// True iff `password` rederives the stored hash under the stored salt.
    pub fn valid_password(&self, password: &str) -> bool {
        password::verify(password, &self.salt, &self.hash)
    }

    /// Adds to `following`; returns whether the set changed.
    pub fn follow(&mut self, target: Uuid) -> bool {
        self.following.insert(target)
    }

    pub fn unfollow(&mut self, target: Uuid) -> bool {
        self.following.remove(&target)
    }

    pub fn is_following(&self, target: Uuid) -> bool {
        self.following.contains(&target)
    }

    /// Adds to `favorites`; returns whether the set changed.
    pub fn favorite(&mut self, item: Uuid) -> bool {
        self.favorites.insert(item)
    }

    pub fn unfavorite(&mut self, item: Uuid) -> bool {
        self.favorites.remove(&item)
    }

    pub fn is_favorite(&self, item: Uuid) -> bool {
        self.favorites.contains(&item)
    }

    /// The post-login/registration representation, token included.
    pub fn auth_view(&self, signer: &TokenSigner) -> Result<AuthView, AppError> {
        Ok(AuthView {
            username: self.username.clone(),
            email: self.email.clone(),
            bio: self.bio.clone(),
            token: signer.sign(self)?,
            image: self.image.clone(),
        })
    }

    /// Profile as seen by `viewer`; `following` is false for anonymous
    /// viewers.
    pub fn profile_view(&self, viewer: Option<&User>) -> ProfileView {
        ProfileView {
            username: self.username.clone(),
            bio: self.bio.clone(),
            image: self.image.clone(),
            following: viewer.map_or(false, |v| v.is_following(self.id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::error::{BLANK, INVALID};

    fn payload(username: &str, email: &str, password: &str) -> NewUser {
        NewUser {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn validated_lowercases_identity_fields() {
        let new = payload("ChuckNorris", "CN@x.com", "p").validated().unwrap();
        assert_eq!(new.username, "chucknorris");
        assert_eq!(new.email, "cn@x.com");
    }

    #[test]
    fn validated_rejects_blank_fields() {
        for (p, field) in [
            (payload("", "a@b.com", "p"), "username"),
            (payload("a", "", "p"), "email"),
            (payload("a", "a@b.com", ""), "password"),
        ] {
            match p.validated() {
                Err(AppError::Validation { field: f, message }) => {
                    assert_eq!(f, field);
                    assert_eq!(message, BLANK);
                }
                other => panic!("expected blank {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn validated_rejects_bad_shapes() {
        for (p, field) in [
            (payload("has space", "a@b.com", "p"), "username"),
            (payload("dash-ed", "a@b.com", "p"), "username"),
            (payload("a", "not-an-email", "p"), "email"),
            (payload("a", "a@b", "p"), "email"),
            (payload("a", "a @b.com", "p"), "email"),
        ] {
            match p.validated() {
                Err(AppError::Validation { field: f, message }) => {
                    assert_eq!(f, field);
                    assert_eq!(message, INVALID);
                }
                other => panic!("expected invalid {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn relation_sets_deduplicate() {
        let mut user = User::new(Uuid::new_v4(), "a".into(), "a@b.com".into(), Utc::now());
        let item = Uuid::new_v4();

        assert!(user.favorite(item));
        assert!(!user.favorite(item));
        assert_eq!(user.favorites.len(), 1);
        assert!(user.is_favorite(item));
        assert!(user.unfavorite(item));
        assert!(!user.is_favorite(item));
    }

    #[test]
    fn profile_view_reports_viewer_following() {
        let target = User::new(Uuid::new_v4(), "t".into(), "t@x.com".into(), Utc::now());
        let mut viewer = User::new(Uuid::new_v4(), "v".into(), "v@x.com".into(), Utc::now());

        assert!(!target.profile_view(Some(&viewer)).following);
        assert!(!target.profile_view(None).following);

        viewer.follow(target.id);
        assert!(target.profile_view(Some(&viewer)).following);
    }

    #[test]
    fn profile_view_always_serializes_image() {
        // regression: an image-less profile must still carry the key
        let user = User::new(Uuid::new_v4(), "a".into(), "a@b.com".into(), Utc::now());
        let json = serde_json::to_value(user.profile_view(None)).unwrap();

        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("image"));
        assert!(obj["image"].is_null());
    }
}
