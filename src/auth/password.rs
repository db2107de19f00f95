use rusqlite::{params, OptionalExtension};

use crate::backend::{new_key, now_timestamp};
use crate::db::models::AdminUser;
use crate::error::{AppError, AppResult};
use crate::state::DbPool;

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn admin_count(pool: &DbPool) -> AppResult<i64> {
    let conn = pool.get()?;
    let count = conn.query_row("SELECT COUNT(*) FROM admin_users", [], |row| row.get(0))?;
    Ok(count)
}

/// Store the first admin with a bcrypt hash of `password`.
///
/// Returns None when an admin already exists. The emptiness check and the
/// insert are a single statement, so concurrent setups cannot both succeed.
pub fn create_first_admin(
    pool: &DbPool,
    username: &str,
    password: &str,
) -> AppResult<Option<AdminUser>> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::BadRequest("Username is required".into()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
    let admin = AdminUser {
        id: new_key(),
        username: username.to_string(),
        created_at: now_timestamp(),
    };

    let conn = pool.get()?;
    let inserted = conn.execute(
        "INSERT INTO admin_users (id, username, password_hash, created_at)
         SELECT ?1, ?2, ?3, ?4 WHERE NOT EXISTS (SELECT 1 FROM admin_users)",
        params![admin.id, admin.username, hash, admin.created_at],
    )?;
    if inserted == 0 {
        tracing::warn!("Setup for {} refused: an admin already exists", admin.username);
        return Ok(None);
    }
    tracing::info!("Created admin account {}", admin.username);
    Ok(Some(admin))
}

/// The admin whose password matches, or None for an unknown user or wrong password.
pub fn verify_login(pool: &DbPool, username: &str, password: &str) -> AppResult<Option<AdminUser>> {
    let conn = pool.get()?;
    let row = conn
        .query_row(
            "SELECT id, username, created_at, password_hash FROM admin_users WHERE username = ?1",
            params![username.trim()],
            |row| {
                Ok((
                    AdminUser {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        created_at: row.get(2)?,
                    },
                    row.get::<_, String>(3)?,
                ))
            },
        )
        .optional()?;

    let Some((admin, hash)) = row else {
        return Ok(None);
    };
    if bcrypt::verify(password, &hash)? {
        Ok(Some(admin))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn pool() -> DbPool {
        let pool = db::memory_pool().unwrap();
        db::run_migrations(&pool).unwrap();
        pool
    }

    #[test]
    fn login_checks_the_password() {
        let pool = pool();
        assert_eq!(admin_count(&pool).unwrap(), 0);
        create_first_admin(&pool, " owner ", "masala-dosa")
            .unwrap()
            .unwrap();
        assert_eq!(admin_count(&pool).unwrap(), 1);

        let admin = verify_login(&pool, "owner", "masala-dosa").unwrap();
        assert_eq!(admin.unwrap().username, "owner");
        assert!(verify_login(&pool, "owner", "wrong-pass").unwrap().is_none());
        assert!(verify_login(&pool, "nobody", "masala-dosa").unwrap().is_none());
    }

    #[test]
    fn short_passwords_and_blank_names_are_rejected() {
        let pool = pool();
        assert!(matches!(
            create_first_admin(&pool, "owner", "short"),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            create_first_admin(&pool, "   ", "long-enough"),
            Err(AppError::BadRequest(_))
        ));
        assert_eq!(admin_count(&pool).unwrap(), 0);
    }

    #[test]
    fn only_the_first_admin_is_created() {
        let pool = pool();
        let first = create_first_admin(&pool, "owner", "masala-dosa").unwrap();
        assert_eq!(first.unwrap().username, "owner");

        let second = create_first_admin(&pool, "intruder", "takeover-pass").unwrap();
        assert!(second.is_none());
        assert_eq!(admin_count(&pool).unwrap(), 1);
        assert!(verify_login(&pool, "intruder", "takeover-pass")
            .unwrap()
            .is_none());
    }
}
