//! Registration, login and the persisted current session.

use std::sync::Arc;

use domains::{
    Collection, DomainError, PasswordHasher, ProfileUpdate, RegistrationForm, Result, Role,
    Session, User,
};
use tracing::{info, warn};

use crate::store::Store;

#[derive(Clone)]
pub struct UserService {
    store: Store,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    pub fn new(store: Store, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    pub fn register(&self, form: RegistrationForm) -> Result<User> {
        let name = required("name", &form.name)?;
        let email = required("email", &form.email)?;
        let phone = required("phone", &form.phone)?;
        if form.password.is_empty() || form.confirm_password.is_empty() {
            return Err(DomainError::validation("password and confirmation are required"));
        }
        let role = form
            .role
            .ok_or_else(|| DomainError::validation("role is required"))?;
        if form.password != form.confirm_password {
            return Err(DomainError::validation("passwords do not match"));
        }

        let mut users = self.users();
        if users.iter().any(|u| u.email == email) {
            return Err(DomainError::Conflict(format!("email {email} is already registered")));
        }

        let user = User {
            name,
            email,
            phone,
            password: self.hasher.hash(&form.password)?,
            role,
        };
        users.push(user.clone());
        self.store.save(Collection::RegisteredUsers, &users)?;

        info!(email = %user.email, role = %user.role, "user registered");
        Ok(user)
    }

    /// Checks credentials and stores the resulting session.
    pub fn login(&self, email: &str, password: &str, role: Role) -> Result<Session> {
        let email = email.trim();
        let user = self
            .find(email)
            .ok_or_else(|| DomainError::not_found("User", email))?;

        if !self.hasher.verify(password, &user.password) {
            warn!(email, "login rejected: wrong password");
            return Err(DomainError::InvalidCredentials("incorrect password".into()));
        }
        if user.role != role {
            return Err(DomainError::RoleMismatch {
                registered: user.role,
                requested: role,
            });
        }

        let session = Session::from(&user);
        self.store.save_session(&session)?;
        info!(email, role = %role, "user logged in");
        Ok(session)
    }

    /// Updates name, phone and optionally the password of the session user.
    /// The stored session is refreshed to the new name.
    pub fn update_profile(&self, session: &Session, update: ProfileUpdate) -> Result<Session> {
        let name = required("name", &update.name)?;
        let phone = update.phone.trim().to_string();

        let new_password = match update.password.filter(|p| !p.is_empty()) {
            Some(password) => {
                if update.confirm_password.as_deref() != Some(password.as_str()) {
                    return Err(DomainError::validation("passwords do not match"));
                }
                Some(self.hasher.hash(&password)?)
            }
            None => None,
        };

        let mut users = self.users();
        let user = users
            .iter_mut()
            .find(|u| u.email == session.email)
            .ok_or_else(|| DomainError::not_found("User", session.email.as_str()))?;
        user.name = name;
        user.phone = phone;
        if let Some(hash) = new_password {
            user.password = hash;
        }
        let refreshed = Session::from(&*user);
        self.store.save(Collection::RegisteredUsers, &users)?;
        self.store.save_session(&refreshed)?;

        info!(email = %refreshed.email, "profile updated");
        Ok(refreshed)
    }

    pub fn current_session(&self) -> Option<Session> {
        self.store.load_session()
    }

    pub fn logout(&self) -> Result<()> {
        self.store.clear_session()?;
        info!("session cleared");
        Ok(())
    }

    pub fn find(&self, email: &str) -> Option<User> {
        self.users().into_iter().find(|u| u.email == email)
    }

    fn users(&self) -> Vec<User> {
        self.store.load(Collection::RegisteredUsers)
    }
}

fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}
