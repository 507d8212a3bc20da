/// Auth service configuration loaded from environment variables.
///
/// Built once at startup and carried in [`crate::state::AppState`]; every
/// required variable is validated eagerly so a misconfigured deployment fails
/// at boot rather than on first use.
#[derive(Debug)]
pub struct AuthConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL` (required).
    pub database_url: String,
    /// HMAC secret for signing session tokens. Env var: `JWT_SECRET` (required).
    pub jwt_secret: String,
    /// Mailer collaborator endpoint that delivers login codes.
    /// Env var: `MAILER_URL` (required).
    pub mailer_url: String,
    /// Cookie domain attribute. Env var: `COOKIE_DOMAIN` (required).
    pub cookie_domain: String,
    /// Session-token lifetime, parsed from a duration string such as "7d",
    /// "12h" or "30m". Env var: `TOKEN_TTL` (default "7d").
    pub token_ttl_secs: u64,
    /// Maximum session age in days; sessions older than this are invalid and
    /// get removed by cleanup. Env var: `SESSION_MAX_AGE_DAYS` (default 7).
    pub session_max_age_days: i64,
    /// Login-code time-to-live in minutes. Env var: `OTP_TTL_MINUTES` (default 10).
    pub otp_ttl_minutes: i64,
    /// Max code requests per student per window. Env var: `RATE_LIMIT_MAX_REQUESTS`
    /// (default 3).
    pub rate_limit_max_requests: u64,
    /// Rate-limit window in minutes. Env var: `RATE_LIMIT_WINDOW_MINUTES`
    /// (default 10).
    pub rate_limit_window_minutes: i64,
    /// When true, a store failure during the rate-limit check denies issuance
    /// instead of allowing it. Env var: `RATE_LIMIT_FAIL_CLOSED` (default false).
    pub rate_limit_fail_closed: bool,
    /// How long used or expired login codes are retained before cleanup.
    /// Env var: `CODE_RETENTION_HOURS` (default 24).
    pub code_retention_hours: i64,
    /// TCP port to listen on. Env var: `AUTH_PORT` (default 3117).
    pub auth_port: u16,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        let token_ttl = std::env::var("TOKEN_TTL").unwrap_or_else(|_| "7d".to_owned());
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            mailer_url: std::env::var("MAILER_URL").expect("MAILER_URL"),
            cookie_domain: std::env::var("COOKIE_DOMAIN").expect("COOKIE_DOMAIN"),
            token_ttl_secs: parse_duration(&token_ttl)
                .unwrap_or_else(|| panic!("TOKEN_TTL: cannot parse duration {token_ttl:?}")),
            session_max_age_days: env_or("SESSION_MAX_AGE_DAYS", 7),
            otp_ttl_minutes: env_or("OTP_TTL_MINUTES", 10),
            rate_limit_max_requests: env_or("RATE_LIMIT_MAX_REQUESTS", 3),
            rate_limit_window_minutes: env_or("RATE_LIMIT_WINDOW_MINUTES", 10),
            rate_limit_fail_closed: env_or("RATE_LIMIT_FAIL_CLOSED", false),
            code_retention_hours: env_or("CODE_RETENTION_HOURS", 24),
            auth_port: env_or("AUTH_PORT", 3117),
        }
    }

    /// Cookie Max-Age in seconds; the cookie lives as long as the session may.
    pub fn cookie_max_age_secs(&self) -> u64 {
        (self.session_max_age_days as u64) * 86_400
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(v) => v
            .parse()
            .unwrap_or_else(|_| panic!("{name}: cannot parse {v:?}")),
        Err(_) => default,
    }
}

/// Parse a duration string into seconds. Accepts a bare number of seconds or
/// a number with an `s`, `m`, `h` or `d` suffix ("90", "30m", "12h", "7d").
pub fn parse_duration(s: &str) -> Option<u64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let (value, unit) = match s.char_indices().last()? {
        (i, c) if c.is_ascii_alphabetic() => (&s[..i], Some(c)),
        _ => (s, None),
    };
    let value: u64 = value.parse().ok()?;
    let factor = match unit {
        None | Some('s') => 1,
        Some('m') => 60,
        Some('h') => 3_600,
        Some('d') => 86_400,
        _ => return None,
    };
    Some(value * factor)
}
