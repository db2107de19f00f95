use rand::Rng;
use rusqlite::{params, OptionalExtension};

use crate::db::models::AdminUser;
use crate::error::AppResult;
use crate::state::DbPool;

/// Create a new session for an admin. Returns the session token.
pub fn create_session(pool: &DbPool, admin_id: &str, hours: u64) -> AppResult<String> {
    let conn = pool.get()?;

    let token = generate_token();
    let id = uuid::Uuid::now_v7().to_string();

    conn.execute(
        "INSERT INTO sessions (id, user_id, token, expires_at) VALUES (?1, ?2, ?3, datetime('now', ?4))",
        params![id, admin_id, token, format!("+{} hours", hours)],
    )?;

    Ok(token)
}

/// The admin owning an unexpired session.
pub fn find_admin(pool: &DbPool, token: &str) -> AppResult<Option<AdminUser>> {
    let conn = pool.get()?;
    let admin = conn
        .query_row(
            "SELECT a.id, a.username, a.created_at FROM sessions s \
             JOIN admin_users a ON a.id = s.user_id \
             WHERE s.token = ?1 AND s.expires_at > datetime('now')",
            params![token],
            |row| {
                Ok(AdminUser {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    created_at: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(admin)
}

/// Delete a session by token.
pub fn delete_session(pool: &DbPool, token: &str) -> AppResult<()> {
    let conn = pool.get()?;
    conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
    Ok(())
}

/// Drop every expired session. Returns how many were removed.
pub fn purge_expired(pool: &DbPool) -> AppResult<usize> {
    let conn = pool.get()?;
    let removed = conn.execute(
        "DELETE FROM sessions WHERE expires_at <= datetime('now')",
        [],
    )?;
    Ok(removed)
}

pub fn session_cookie(name: &str, token: &str, max_age_hours: u64) -> String {
    let max_age_secs = max_age_hours * 3600;
    format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        name, token, max_age_secs
    )
}

pub fn clear_session_cookie(name: &str) -> String {
    format!("{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0", name)
}

/// Generate a cryptographically random 32-byte hex token.
fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password;
    use crate::db;

    fn pool() -> DbPool {
        let pool = db::memory_pool().unwrap();
        db::run_migrations(&pool).unwrap();
        pool
    }

    #[test]
    fn generate_token_is_64_hex_chars() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generate_token_is_unique() {
        let t1 = generate_token();
        let t2 = generate_token();
        assert_ne!(t1, t2);
    }

    #[test]
    fn session_resolves_to_admin_until_deleted() {
        let pool = pool();
        let admin = password::create_first_admin(&pool, "chef", "tandoor123")
            .unwrap()
            .unwrap();
        let token = create_session(&pool, &admin.id, 1).unwrap();

        let found = find_admin(&pool, &token).unwrap().unwrap();
        assert_eq!(found.username, "chef");

        delete_session(&pool, &token).unwrap();
        assert!(find_admin(&pool, &token).unwrap().is_none());
    }

    #[test]
    fn expired_sessions_are_ignored_and_purged() {
        let pool = pool();
        let admin = password::create_first_admin(&pool, "chef", "tandoor123")
            .unwrap()
            .unwrap();
        let token = create_session(&pool, &admin.id, 0).unwrap();

        assert!(find_admin(&pool, &token).unwrap().is_none());
        assert_eq!(purge_expired(&pool).unwrap(), 1);
    }

    #[test]
    fn cookies_use_configured_name() {
        let cookie = session_cookie("spice_session", "abc", 2);
        assert_eq!(
            cookie,
            "spice_session=abc; HttpOnly; SameSite=Strict; Path=/; Max-Age=7200"
        );
        assert!(clear_session_cookie("spice_session").contains("Max-Age=0"));
    }
}
