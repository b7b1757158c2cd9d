//! Application state for portal-server

use aws_sdk_sesv2::Client as SesClient;
use sqlx::PgPool;

use crate::auth::rate_limit::RateLimiter;
use crate::config::Config;
use crate::email::EmailService;
use crate::notify::Notifier;
use crate::storage::DocumentStore;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// On-disk store for licence documents and stock files
    pub documents: DocumentStore,
    /// Queue handle for outbound notification emails
    pub notifier: Notifier,
    /// JWT secret for partner/admin authentication
    pub jwt_secret: String,
    /// Rate limiter for login/registration routes
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Create a new AppState
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let ses = if let Ok(ses_region) = std::env::var("SES_REGION") {
            let ses_config = aws_config
                .to_builder()
                .region(aws_config::Region::new(ses_region))
                .build();
            SesClient::new(&ses_config)
        } else {
            SesClient::new(&aws_config)
        };

        let email = EmailService::new(ses, config.ses_from_email.clone());
        let notifier = Notifier::spawn(email);

        let documents = DocumentStore::new(&config.upload_dir);

        if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
            let hashed = crate::util::hash_password(password)
                .map_err(|e| format!("Failed to hash admin password: {e}"))?;
            let seeded = crate::db::users::ensure_admin(&pool, email, &hashed).await?;
            if seeded {
                tracing::info!(email = %email, "Seeded bootstrap admin account");
            }
        }

        Ok(Self {
            pool,
            documents,
            notifier,
            jwt_secret: config.jwt_secret.clone(),
            rate_limiter: RateLimiter::new(),
        })
    }
}
