use std::env;

/// Process-wide configuration, loaded once at startup and immutable for
/// the process lifetime. The token secret feeds [`crate::TokenSigner`]
/// at construction; rotating it invalidates every outstanding token.
#[derive(Clone, Debug)]
pub struct EnvConfig {
    pub database_url: String,
    pub token_secret: String,
}

impl EnvConfig {
    fn get_env(key: &str) -> String {
        env::var(key).unwrap_or_else(|_| panic!("Environment variable {} not set", key))
    }

    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        EnvConfig {
            database_url: Self::get_env("DATABASE_URL"),
            token_secret: Self::get_env("TOKEN_SECRET"),
        }
    }
}
