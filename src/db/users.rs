use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::db::store::UserStore;
use crate::types::error::AppError;
use crate::types::user::{NewUser, ProfileView, User};

/// Model operations over a [`UserStore`]. This is the complete surface
/// the HTTP layer calls; mutations return only after the store has
/// confirmed them, so a success is a durable success.
pub struct UserService<S> {
    store: S,
}

impl<S: UserStore> UserService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Registration: validate, hash the password, persist. The salt and
    /// hash are computed before the record ever reaches the store.
    pub async fn register(&self, new: NewUser) -> Result<User, AppError> {
        let new = new.validated()?;
        if self.store.find_by_username(&new.username).await?.is_some() {
            return Err(AppError::taken("username"));
        }
        if self.store.find_by_email(&new.email).await?.is_some() {
            return Err(AppError::taken("email"));
        }

        let mut user = User::new(Uuid::new_v4(), new.username, new.email, Utc::now());
        user.set_password(&new.password);
        self.store.insert(&user).await?;
        debug!(username = %user.username, "registered user");
        Ok(user)
    }

    /// Login by email. Unknown email and wrong password are
    /// indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = email.to_lowercase();
        let user = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;
        if !user.valid_password(password) {
            return Err(AppError::InvalidCredentials);
        }
        Ok(user)
    }

    pub async fn change_password(&self, user: &mut User, password: &str) -> Result<(), AppError> {
        if password.is_empty() {
            return Err(AppError::blank("password"));
        }
        user.set_password(password);
        user.updated_at = Utc::now();
        self.store.save(user).await
    }

    /// Profile of `username` as seen by `viewer`. Missing users are
    /// `NotFound`, not a validation failure.
    pub async fn profile(
        &self,
        username: &str,
        viewer: Option<&User>,
    ) -> Result<ProfileView, AppError> {
        let username = username.to_lowercase();
        let user = self
            .store
            .find_by_username(&username)
            .await?
            .ok_or(AppError::NotFound)?;
        Ok(user.profile_view(viewer))
    }

    /// Follow requires the target to exist; a dangling edge would show
    /// up as a phantom profile later.
    pub async fn follow(&self, user: &mut User, target: Uuid) -> Result<(), AppError> {
        if self.store.find_by_id(target).await?.is_none() {
            return Err(AppError::NotFound);
        }
        if user.follow(target) {
            if let Err(e) = self.touch_and_save(user).await {
                user.unfollow(target);
                return Err(e);
            }
        }
        Ok(())
    }

    pub async fn unfollow(&self, user: &mut User, target: Uuid) -> Result<(), AppError> {
        if user.unfollow(target) {
            if let Err(e) = self.touch_and_save(user).await {
                user.follow(target);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Favorite targets are content items owned by another service, so
    /// no existence check happens here.
    pub async fn favorite(&self, user: &mut User, item: Uuid) -> Result<(), AppError> {
        if user.favorite(item) {
            if let Err(e) = self.touch_and_save(user).await {
                user.unfavorite(item);
                return Err(e);
            }
        }
        Ok(())
    }

    pub async fn unfavorite(&self, user: &mut User, item: Uuid) -> Result<(), AppError> {
        if user.unfavorite(item) {
            if let Err(e) = self.touch_and_save(user).await {
                user.favorite(item);
                return Err(e);
            }
        }
        Ok(())
    }

    // bumps updated_at around the save so a failed save leaves the
    // caller's value exactly as it was; relation ops undo their set
    // change on the error branch for the same reason
    async fn touch_and_save(&self, user: &mut User) -> Result<(), AppError> {
        let prev = user.updated_at;
        user.updated_at = Utc::now();
        if let Err(e) = self.store.save(user).await {
            user.updated_at = prev;
            return Err(e);
        }
        Ok(())
    }
}
