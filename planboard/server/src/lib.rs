pub mod config {
    use serde::Deserialize;

    #[derive(Deserialize, Debug, Clone)]
    pub struct Config {
        pub db_url: String,
        #[serde(default = "default_port")]
        pub port: u16,
        /// Origin of the board client allowed by CORS.
        #[serde(default = "default_client_origin")]
        pub client_origin: String,
        /// Attempts made to assign an order before giving up on a conflict.
        #[serde(default = "default_order_retry_limit")]
        pub order_retry_limit: u32,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(config::Environment::default())
                .build()?;

            Self::from_settings(settings)
        }

        pub fn from_settings(settings: config::Config) -> anyhow::Result<Self> {
            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_client_origin() -> String {
        "http://localhost:8080".to_string()
    }

    fn default_order_retry_limit() -> u32 {
        3
    }

}
pub mod board;
pub mod entities;
pub mod project;
pub mod web;
