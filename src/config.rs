use std::env;
use std::path::PathBuf;

#[derive(Clone)]
pub struct Config {
    pub backend_base_url: String,
    pub geocoding_base_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub admin_token_file: PathBuf,
    pub estimate_debounce_ms: u64,
    pub lookup_debounce_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            backend_base_url: env::var("BACKEND_BASE_URL")
                .expect("BACKEND_BASE_URL must be set"),
            geocoding_base_url: env::var("GEOCODING_BASE_URL")
                .unwrap_or_else(|_| "https://api-adresse.data.gouv.fr".to_string()),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            admin_token_file: env::var("ADMIN_TOKEN_FILE")
                .unwrap_or_else(|_| "admin_token.txt".to_string())
                .into(),
            estimate_debounce_ms: env::var("ESTIMATE_DEBOUNCE_MS")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .expect("ESTIMATE_DEBOUNCE_MS must be a number"),
            lookup_debounce_ms: env::var("LOOKUP_DEBOUNCE_MS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .expect("LOOKUP_DEBOUNCE_MS must be a number"),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
