use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::EnvironmentProvider;
use crate::config::config_spec::ConfigSpec;
use crate::config::errors::ApplicationError;

pub const DEFAULT_SESSION_MAX_AGE_DAYS: u64 = 30;
pub const DEFAULT_GUARD_TIMEOUT: Duration = Duration::from_millis(5000);
pub const MIN_GUARD_TIMEOUT: Duration = Duration::from_millis(2000);
pub const MAX_GUARD_TIMEOUT: Duration = Duration::from_millis(10_000);
pub const DEFAULT_TENANT_LOOKUP_TIMEOUT: Duration = Duration::from_millis(2000);
/// Extra exact-match public paths; the API auth and health routes are always public
pub const DEFAULT_PUBLIC_PATHS: &str = "";

/// What the route guard does when a session lookup does not finish in time
#[derive(Debug, Clone, PartialEq)]
pub enum GuardFailurePolicy {
    /// Redirect to sign-in with an `auth_timeout` reason
    FailClosed,
    /// Operator override: forward without identity until `until`, then fail closed again
    FailOpen { until: DateTime<Utc> },
}

impl GuardFailurePolicy {
    /// Whether the override is in force at `now`
    pub fn is_fail_open_at(&self, now: DateTime<Utc>) -> bool {
        match self {
            Self::FailClosed => false,
            Self::FailOpen { until } => now < *until,
        }
    }
}

/// Settings for session issuance, the route guard and tenant resolution
#[derive(Debug, Clone)]
pub struct GateSettings {
    pub session_max_age: Duration,
    pub guard_timeout: Duration,
    pub tenant_lookup_timeout: Duration,
    pub failure_policy: GuardFailurePolicy,
    /// Exact-match paths that skip the session lookup
    pub public_paths: Vec<String>,
    pub sign_in_path: String,
    pub sign_up_path: String,
    pub cookie_secure: bool,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            session_max_age: Duration::from_secs(DEFAULT_SESSION_MAX_AGE_DAYS * 86_400),
            guard_timeout: DEFAULT_GUARD_TIMEOUT,
            tenant_lookup_timeout: DEFAULT_TENANT_LOOKUP_TIMEOUT,
            failure_policy: GuardFailurePolicy::FailClosed,
            public_paths: ConfigSpec::parse_list(DEFAULT_PUBLIC_PATHS),
            sign_in_path: "/auth/signin".to_string(),
            sign_up_path: "/auth/signup".to_string(),
            cookie_secure: true,
        }
    }
}

impl GateSettings {
    pub fn from_env_provider(
        env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    ) -> Result<Self, ApplicationError> {
        let spec = |name: &str| ConfigSpec::new(env_provider.clone()).env_override(name);

        let max_age_days = spec("SESSION_MAX_AGE_DAYS")
            .default_value(&DEFAULT_SESSION_MAX_AGE_DAYS.to_string())
            .load()?;
        let session_max_age = ConfigSpec::parse_duration_days(&max_age_days, "SESSION_MAX_AGE_DAYS")?;

        let guard_timeout_ms = spec("AUTH_GUARD_TIMEOUT_MS")
            .default_value(&DEFAULT_GUARD_TIMEOUT.as_millis().to_string())
            .load()?;
        let guard_timeout = clamp_guard_timeout(ConfigSpec::parse_duration_millis(
            &guard_timeout_ms,
            "AUTH_GUARD_TIMEOUT_MS",
        )?);

        let tenant_timeout_ms = spec("TENANT_LOOKUP_TIMEOUT_MS")
            .default_value(&DEFAULT_TENANT_LOOKUP_TIMEOUT.as_millis().to_string())
            .load()?;
        let tenant_lookup_timeout =
            ConfigSpec::parse_duration_millis(&tenant_timeout_ms, "TENANT_LOOKUP_TIMEOUT_MS")?;

        let fail_open = spec("AUTH_GUARD_FAIL_OPEN").default_value("false").load()?;
        let failure_policy = if ConfigSpec::parse_bool(&fail_open, "AUTH_GUARD_FAIL_OPEN")? {
            let until = spec("AUTH_GUARD_FAIL_OPEN_UNTIL").required(true).load()?;
            let until = ConfigSpec::parse_timestamp(&until, "AUTH_GUARD_FAIL_OPEN_UNTIL")?;
            tracing::warn!(
                "Route guard fail-open override active until {}; timed-out session checks will be forwarded",
                until.to_rfc3339()
            );
            GuardFailurePolicy::FailOpen { until }
        } else {
            GuardFailurePolicy::FailClosed
        };

        let public_paths = spec("AUTH_PUBLIC_PATHS")
            .default_value(DEFAULT_PUBLIC_PATHS)
            .validator(ConfigSpec::validate_path_list)
            .load()?;

        let sign_in_path = spec("AUTH_SIGN_IN_PATH")
            .default_value("/auth/signin")
            .validator(ConfigSpec::validate_path)
            .load()?;

        let sign_up_path = spec("AUTH_SIGN_UP_PATH")
            .default_value("/auth/signup")
            .validator(ConfigSpec::validate_path)
            .load()?;

        let app_env = spec("APP_ENV").default_value("production").load()?;
        let default_secure = if app_env == "development" { "false" } else { "true" };
        let cookie_secure = spec("COOKIE_SECURE").default_value(default_secure).load()?;
        let cookie_secure = ConfigSpec::parse_bool(&cookie_secure, "COOKIE_SECURE")?;

        Ok(Self {
            session_max_age,
            guard_timeout,
            tenant_lookup_timeout,
            failure_policy,
            public_paths: ConfigSpec::parse_list(&public_paths),
            sign_in_path,
            sign_up_path,
            cookie_secure,
        })
    }

    pub fn from_env() -> Result<Self, ApplicationError> {
        use crate::config::SystemEnvironment;
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    pub fn with_guard_timeout(mut self, timeout: Duration) -> Self {
        self.guard_timeout = timeout;
        self
    }

    pub fn with_failure_policy(mut self, policy: GuardFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_public_paths(mut self, paths: &[&str]) -> Self {
        self.public_paths = paths.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }
}

fn clamp_guard_timeout(requested: Duration) -> Duration {
    let clamped = requested.clamp(MIN_GUARD_TIMEOUT, MAX_GUARD_TIMEOUT);
    if clamped != requested {
        tracing::warn!(
            "AUTH_GUARD_TIMEOUT_MS {}ms outside {}..={}ms, using {}ms",
            requested.as_millis(),
            MIN_GUARD_TIMEOUT.as_millis(),
            MAX_GUARD_TIMEOUT.as_millis(),
            clamped.as_millis()
        );
    }
    clamped
}
