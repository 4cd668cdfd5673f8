use sqlx::PgPool;

/// The external teacher directory. The only question this service ever asks
/// it is whether a username names an existing teacher account.
pub struct TeacherDirectory;

impl TeacherDirectory {
    pub async fn exists(pool: &PgPool, username: &str) -> anyhow::Result<bool> {
        let found: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM teachers WHERE username = $1")
                .bind(username)
                .fetch_optional(pool)
                .await?;
        Ok(found.is_some())
    }
}
