use thiserror::Error;

/// Failures reported by the persistence layer. Only "no such row" is told
/// apart; everything else is an opaque storage failure.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("row does not exist")]
    NotExists,
    #[error("{message}: {source}")]
    Db {
        message: String,
        #[source]
        source: sqlx::Error,
    },
}

impl RepositoryError {
    pub fn db(message: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Db {
            message: message.into(),
            source,
        }
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => RepositoryError::NotExists,
            _ => RepositoryError::db("exec", e),
        }
    }
}
