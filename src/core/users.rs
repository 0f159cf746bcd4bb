//! Staff account business logic - creation, authentication, and lifecycle.
//!
//! Three roles exist: one admin (no unit), supervisors and employees (each
//! assigned to a unit). Passwords are stored as argon2 PHC strings. There is
//! no ambient session anywhere in the crate; callers that record an actor
//! pass the username explicitly.

use crate::{
    entities::{Unit, User, user},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Staff roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Company-wide administrator, not assigned to a unit
    Admin,
    /// Manages one unit's employees and purchases
    Supervisor,
    /// Sells products in one unit
    Employee,
}

impl Role {
    /// Returns the string stored in the `role` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Supervisor => "supervisor",
            Self::Employee => "employee",
        }
    }

    /// Parses a stored `role` string.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "supervisor" => Some(Self::Supervisor),
            "employee" => Some(Self::Employee),
            _ => None,
        }
    }
}

/// Attributes of a staff account to be created.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique login name
    pub username: String,
    /// Plain-text password, hashed before storage
    pub password: String,
    /// First name
    pub name: String,
    /// Surname
    pub surname: String,
    /// Account role
    pub role: Role,
    /// Unit assignment; required for supervisors and employees, absent for admins
    pub unit_id: Option<String>,
}

fn hash_password(password: &str) -> Result<String> {
    use argon2::{
        Argon2, PasswordHasher,
        password_hash::{SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash {
            message: e.to_string(),
        })
}

fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Creates a new staff account with a hashed password.
///
/// # Errors
/// - [`Error::Config`] for empty username/password, a unit assignment on an
///   admin, or a missing one on a supervisor/employee
/// - [`Error::UnitNotFound`] if the assigned unit does not exist
/// - [`Error::DuplicateUsername`] if the username is taken
pub async fn create_user(db: &DatabaseConnection, new: NewUser) -> Result<user::Model> {
    if new.username.trim().is_empty() {
        return Err(Error::Config {
            message: "Username cannot be empty".to_string(),
        });
    }
    if new.password.is_empty() {
        return Err(Error::Config {
            message: "Password cannot be empty".to_string(),
        });
    }

    match (new.role, &new.unit_id) {
        (Role::Admin, Some(_)) => {
            return Err(Error::Config {
                message: "Admin accounts are not assigned to a unit".to_string(),
            });
        }
        (Role::Supervisor | Role::Employee, None) => {
            return Err(Error::Config {
                message: format!("A {} must be assigned to a unit", new.role.as_str()),
            });
        }
        (Role::Supervisor | Role::Employee, Some(unit_id)) => {
            Unit::find_by_id(unit_id.clone())
                .one(db)
                .await?
                .ok_or_else(|| Error::UnitNotFound {
                    unit_id: unit_id.clone(),
                })?;
        }
        (Role::Admin, None) => {}
    }

    let username = new.username.trim().to_string();
    if get_user(db, &username).await?.is_some() {
        return Err(Error::DuplicateUsername { username });
    }

    let now = chrono::Utc::now();
    let model = user::ActiveModel {
        username: Set(username),
        password_hash: Set(hash_password(&new.password)?),
        name: Set(new.name),
        surname: Set(new.surname),
        role: Set(new.role.as_str().to_string()),
        unit_id: Set(new.unit_id),
        created_at: Set(now),
        updated_at: Set(now),
    };

    model.insert(db).await.map_err(Into::into)
}

/// Verifies credentials and returns the account on success.
///
/// An optional unit id scopes the lookup, mirroring the per-unit login of
/// supervisors and employees; the admin authenticates without one. Returns
/// `None` for an unknown username, a wrong password, or a unit mismatch.
pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
    unit_id: Option<&str>,
) -> Result<Option<user::Model>> {
    let mut select = User::find().filter(user::Column::Username.eq(username));
    if let Some(unit_id) = unit_id {
        select = select.filter(user::Column::UnitId.eq(unit_id));
    }

    let account = select.one(db).await?;
    Ok(account.filter(|a| verify_password(password, &a.password_hash)))
}

/// Retrieves an account by username.
pub async fn get_user(db: &DatabaseConnection, username: &str) -> Result<Option<user::Model>> {
    User::find_by_id(username.to_owned())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the accounts assigned to a unit, ordered by username, optionally
/// restricted to one role.
pub async fn users_in_unit(
    db: &DatabaseConnection,
    unit_id: &str,
    role: Option<Role>,
) -> Result<Vec<user::Model>> {
    let mut select = User::find().filter(user::Column::UnitId.eq(unit_id));
    if let Some(role) = role {
        select = select.filter(user::Column::Role.eq(role.as_str()));
    }

    select
        .order_by_asc(user::Column::Username)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns all supervisor accounts, ordered by username.
pub async fn supervisors(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .filter(user::Column::Role.eq(Role::Supervisor.as_str()))
        .order_by_asc(user::Column::Username)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Replaces an account's password with a fresh hash.
///
/// # Errors
/// Returns [`Error::UserNotFound`] for an unknown username or
/// [`Error::Config`] for an empty password.
pub async fn update_password(
    db: &DatabaseConnection,
    username: &str,
    new_password: &str,
) -> Result<user::Model> {
    if new_password.is_empty() {
        return Err(Error::Config {
            message: "Password cannot be empty".to_string(),
        });
    }

    let account = get_user(db, username)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            username: username.to_owned(),
        })?;

    let mut active: user::ActiveModel = account.into();
    active.password_hash = Set(hash_password(new_password)?);
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await.map_err(Into::into)
}

/// Deletes an account.
///
/// The account's past transactions stay in the log; history is never
/// rewritten.
///
/// # Errors
/// Returns [`Error::UserNotFound`] for an unknown username.
pub async fn delete_user(db: &DatabaseConnection, username: &str) -> Result<()> {
    let account = get_user(db, username)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            username: username.to_owned(),
        })?;

    account.delete(db).await?;
    Ok(())
}

/// Creates the admin account if it does not exist yet. Returns `true` when a
/// fresh account was created. Idempotent; used at bootstrap.
pub async fn ensure_admin(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<bool> {
    if get_user(db, username).await?.is_some() {
        return Ok(false);
    }

    create_user(
        db,
        NewUser {
            username: username.to_owned(),
            password: password.to_owned(),
            name: "System".to_string(),
            surname: "Administrator".to_string(),
            role: Role::Admin,
            unit_id: None,
        },
    )
    .await?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_and_authenticate() -> Result<()> {
        let db = setup_test_db().await?;
        let unit = create_test_unit(&db, "Depot A").await?;

        let account = create_user(
            &db,
            NewUser {
                username: "jane.doe.001".to_string(),
                password: "secret123".to_string(),
                name: "Jane".to_string(),
                surname: "Doe".to_string(),
                role: Role::Employee,
                unit_id: Some(unit.id.clone()),
            },
        )
        .await?;

        // The hash is a PHC string, never the plain password
        assert_ne!(account.password_hash, "secret123");
        assert!(account.password_hash.starts_with("$argon2"));

        let authenticated = authenticate(&db, "jane.doe.001", "secret123", None).await?;
        assert!(authenticated.is_some());

        let wrong_password = authenticate(&db, "jane.doe.001", "nope", None).await?;
        assert!(wrong_password.is_none());

        let unknown = authenticate(&db, "ghost", "secret123", None).await?;
        assert!(unknown.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_authenticate_with_unit_scope() -> Result<()> {
        let db = setup_test_db().await?;
        let unit = create_test_unit(&db, "Depot A").await?;
        create_test_employee(&db, "jane.doe.001", &unit.id).await?;

        let matching = authenticate(&db, "jane.doe.001", "secret123", Some(&unit.id)).await?;
        assert!(matching.is_some());

        let wrong_unit = authenticate(&db, "jane.doe.001", "secret123", Some("999")).await?;
        assert!(wrong_unit.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let unit = create_test_unit(&db, "Depot A").await?;
        create_test_employee(&db, "jane.doe.001", &unit.id).await?;

        let result = create_user(
            &db,
            NewUser {
                username: "jane.doe.001".to_string(),
                password: "other".to_string(),
                name: "Janet".to_string(),
                surname: "Doe".to_string(),
                role: Role::Employee,
                unit_id: Some(unit.id.clone()),
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::DuplicateUsername { username: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_staff_requires_existing_unit() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_user(
            &db,
            NewUser {
                username: "jane.doe.001".to_string(),
                password: "secret123".to_string(),
                name: "Jane".to_string(),
                surname: "Doe".to_string(),
                role: Role::Supervisor,
                unit_id: Some("999".to_string()),
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::UnitNotFound { unit_id: _ }
        ));

        // And the assignment is mandatory for non-admin roles
        let result = create_user(
            &db,
            NewUser {
                username: "john.roe.001".to_string(),
                password: "secret123".to_string(),
                name: "John".to_string(),
                surname: "Roe".to_string(),
                role: Role::Employee,
                unit_id: None,
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_users_in_unit_filters_by_role() -> Result<()> {
        let db = setup_test_db().await?;
        let unit = create_test_unit(&db, "Depot A").await?;
        create_test_employee(&db, "bob.ray.001", &unit.id).await?;
        create_test_employee(&db, "ann.kay.001", &unit.id).await?;
        create_user(
            &db,
            NewUser {
                username: "sue.lim.001".to_string(),
                password: "secret123".to_string(),
                name: "Sue".to_string(),
                surname: "Lim".to_string(),
                role: Role::Supervisor,
                unit_id: Some(unit.id.clone()),
            },
        )
        .await?;

        let everyone = users_in_unit(&db, &unit.id, None).await?;
        assert_eq!(everyone.len(), 3);
        // Ordered by username
        assert_eq!(everyone[0].username, "ann.kay.001");

        let employees = users_in_unit(&db, &unit.id, Some(Role::Employee)).await?;
        assert_eq!(employees.len(), 2);

        let unit_supervisors = supervisors(&db).await?;
        assert_eq!(unit_supervisors.len(), 1);
        assert_eq!(unit_supervisors[0].username, "sue.lim.001");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_password() -> Result<()> {
        let db = setup_test_db().await?;
        let unit = create_test_unit(&db, "Depot A").await?;
        create_test_employee(&db, "jane.doe.001", &unit.id).await?;

        update_password(&db, "jane.doe.001", "newsecret").await?;

        assert!(
            authenticate(&db, "jane.doe.001", "newsecret", None)
                .await?
                .is_some()
        );
        assert!(
            authenticate(&db, "jane.doe.001", "secret123", None)
                .await?
                .is_none()
        );

        let result = update_password(&db, "ghost", "whatever").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::UserNotFound { username: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_user() -> Result<()> {
        let db = setup_test_db().await?;
        let unit = create_test_unit(&db, "Depot A").await?;
        create_test_employee(&db, "jane.doe.001", &unit.id).await?;

        delete_user(&db, "jane.doe.001").await?;
        assert!(get_user(&db, "jane.doe.001").await?.is_none());

        let result = delete_user(&db, "jane.doe.001").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::UserNotFound { username: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_admin_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;

        assert!(ensure_admin(&db, "admin", "admin123").await?);
        assert!(!ensure_admin(&db, "admin", "admin123").await?);

        let account = get_user(&db, "admin").await?.unwrap();
        assert_eq!(account.role, "admin");
        assert!(account.unit_id.is_none());

        Ok(())
    }

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::Supervisor, Role::Employee] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("manager"), None);
    }
}
