use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// USDA FoodData Central search API.
#[derive(Debug, Clone, Deserialize)]
pub struct UsdaConfig {
    pub api_key: String,
    pub base_url: String,
}

/// Chat-completion API used for meal generation.
#[derive(Debug, Clone, Deserialize)]
pub struct GroqConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

/// Transactional email. Optional: without it the server logs OTP codes
/// instead of sending them.
#[derive(Debug, Clone, Deserialize)]
pub struct MailgunConfig {
    pub api_key: String,
    pub domain: String,
    pub base_url: String,
}

/// Newsletter subscriptions. Optional: without it enrollment is skipped.
#[derive(Debug, Clone, Deserialize)]
pub struct BeehiivConfig {
    pub api_key: String,
    pub publication_id: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub usda: UsdaConfig,
    pub groq: GroqConfig,
    pub mailgun: Option<MailgunConfig>,
    pub beehiiv: Option<BeehiivConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "calofree".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "calofree-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };
        let usda = UsdaConfig {
            api_key: std::env::var("USDA_API_KEY")?,
            base_url: std::env::var("USDA_BASE_URL")
                .unwrap_or_else(|_| "https://api.nal.usda.gov/fdc".into()),
        };
        let groq = GroqConfig {
            api_key: std::env::var("GROQ_API_KEY")?,
            base_url: std::env::var("GROQ_BASE_URL")
                .unwrap_or_else(|_| "https://api.groq.com/v1".into()),
            model: std::env::var("GROQ_MODEL")
                .unwrap_or_else(|_| "llama-3.1-8b-instant".into()),
        };
        // Mail is deliberately optional: a missing key degrades to logging
        // the code server-side rather than blocking login.
        let mailgun = match (std::env::var("MAILGUN_API_KEY"), std::env::var("MAILGUN_DOMAIN")) {
            (Ok(api_key), Ok(domain)) => Some(MailgunConfig {
                api_key,
                domain,
                base_url: std::env::var("MAILGUN_BASE_URL")
                    .unwrap_or_else(|_| "https://api.mailgun.net/v3".into()),
            }),
            _ => None,
        };
        let beehiiv = match (
            std::env::var("BEEHIIV_API_KEY"),
            std::env::var("BEEHIIV_PUBLICATION_ID"),
        ) {
            (Ok(api_key), Ok(publication_id)) => Some(BeehiivConfig {
                api_key,
                publication_id,
                base_url: std::env::var("BEEHIIV_BASE_URL")
                    .unwrap_or_else(|_| "https://api.beehiiv.com/v2".into()),
            }),
            _ => None,
        };
        Ok(Self {
            database_url,
            jwt,
            usda,
            groq,
            mailgun,
            beehiiv,
        })
    }
}
