use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,

    pub jwt_secret: String,
    pub jwt_ttl_secs: i64,

    pub gemini_api_key: Option<String>,
    pub gemini_model: String,

    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,

    /// When true, error responses carry the underlying failure detail.
    pub development: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".into())
                .parse()
                .expect("PORT must be a number"),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),

            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            jwt_ttl_secs: env::var("JWT_TTL_SECS")
                .unwrap_or_else(|_| "604800".into()) // 7 days
                .parse()
                .expect("JWT_TTL_SECS must be a number"),

            gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|s| !s.is_empty()),
            gemini_model: env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".into()),

            supabase_url: env::var("SUPABASE_URL").ok().filter(|s| !s.is_empty()),
            supabase_anon_key: env::var("SUPABASE_ANON_KEY")
                .ok()
                .filter(|s| !s.is_empty()),

            development: env::var("APP_ENV")
                .map(|v| v == "development")
                .unwrap_or(false),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
