use crate::leave::accrual::AccrualPolicy;
use crate::leave::validator::LeavePolicy;
use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,
    pub refresh_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,
    pub rate_refresh_per_min: u32,
    pub rate_protected_per_min: u32,

    // Leave policy
    pub min_advance_notice_days: i64,
    pub max_leave_span_days: i64,
    pub min_reason_words: usize,
    pub min_reason_chars: usize,
    pub max_reason_chars: usize,
    pub monthly_accrual_days: i64,
    pub rollover_cap_days: i64,

    pub api_prefix: String,
}

fn env_or<T: std::str::FromStr>(key: &str, default: &str) -> T
where
    T::Err: std::fmt::Debug,
{
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap()
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_token_ttl: env_or("ACCESS_TOKEN_TTL", "900"), // default 15 min
            refresh_token_ttl: env_or("REFRESH_TOKEN_TTL", "604800"), // default 7 days

            rate_login_per_min: env_or("RATE_LOGIN_PER_MIN", "60"),
            rate_register_per_min: env_or("RATE_REGISTER_PER_MIN", "30"),
            rate_refresh_per_min: env_or("RATE_REFRESH_PER_MIN", "30"),
            rate_protected_per_min: env_or("RATE_PROTECTED_PER_MIN", "1000"),

            min_advance_notice_days: env_or("MIN_ADVANCE_NOTICE_DAYS", "1"),
            max_leave_span_days: env_or("MAX_LEAVE_SPAN_DAYS", "30"),
            min_reason_words: env_or("MIN_REASON_WORDS", "7"),
            min_reason_chars: env_or("MIN_REASON_CHARS", "30"),
            max_reason_chars: env_or("MAX_REASON_CHARS", "500"),
            monthly_accrual_days: env_or("MONTHLY_ACCRUAL_DAYS", "1"),
            rollover_cap_days: env_or("ROLLOVER_CAP_DAYS", "10"),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),
        }
    }

    pub fn leave_policy(&self) -> LeavePolicy {
        LeavePolicy {
            min_advance_notice_days: self.min_advance_notice_days,
            max_span_days: self.max_leave_span_days,
            min_reason_words: self.min_reason_words,
            min_reason_chars: self.min_reason_chars,
            max_reason_chars: self.max_reason_chars,
        }
    }

    pub fn accrual_policy(&self) -> AccrualPolicy {
        AccrualPolicy {
            monthly_accrual_days: self.monthly_accrual_days,
            rollover_cap_days: self.rollover_cap_days,
        }
    }
}
