//! `AppConfig` struct, TOML loading and environment overrides.

use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use tvhgate_api::tvheadend::{AuthScheme, Credentials, TvheadendClient};
use tvhgate_core::{DeviceDescriptor, LineupSettings, RefreshMode};
use url::Url;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Tvheadend connection.
    pub backend: BackendConfig,
    /// HTTP listener and advertised address.
    pub server: ServerConfig,
    /// Emulated device identity.
    pub device: DeviceConfig,
    /// Stream URL parameters.
    pub stream: StreamConfig,
    /// Refresh scheduling.
    pub refresh: RefreshConfig,
}

/// Tvheadend connection settings.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend base URL; may carry `user:password@`.
    pub url: String,
    /// Account name.
    pub username: Option<String>,
    /// Account password.
    pub password: Option<String>,
    /// Authentication scheme.
    pub auth: AuthScheme,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::from("http://localhost:9981"),
            username: None,
            password: None,
            auth: AuthScheme::Digest,
            timeout_secs: 10,
        }
    }
}

/// Listener settings.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind (`""` binds all interfaces).
    pub bind_addr: String,
    /// Port to bind and advertise.
    pub port: u16,
    /// Externally visible base URL, when behind a reverse proxy.
    pub proxy_url: Option<String>,
    /// Host advertised in `BaseURL`; defaults to the machine hostname.
    pub advertise_host: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: String::new(),
            port: 5004,
            proxy_url: None,
            advertise_host: None,
        }
    }
}

/// Emulated device identity.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DeviceConfig {
    /// `DeviceID` reported to clients.
    pub id: String,
    /// `TunerCount` reported to clients.
    pub tuner_count: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            id: String::from("12345678"),
            tuner_count: 6,
        }
    }
}

/// Stream URL parameters.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StreamConfig {
    /// Tvheadend streaming profile.
    pub profile: String,
    /// Subscription weight.
    pub weight: u32,
    /// Base URL for stream links; defaults to the backend URL as configured.
    pub base_url: Option<String>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            profile: String::from("pass"),
            weight: 300,
            base_url: None,
        }
    }
}

/// Refresh scheduling settings.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RefreshConfig {
    /// Interval or on-demand.
    pub mode: RefreshModeSetting,
    /// Interval period in seconds.
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            mode: RefreshModeSetting::Interval,
            interval_secs: 60,
        }
    }
}

/// Refresh mode as written in config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefreshModeSetting {
    /// Background refresh every `interval_secs`.
    #[default]
    Interval,
    /// Recompute on every request.
    #[serde(alias = "ondemand")]
    OnDemand,
}

impl FromStr for RefreshModeSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interval" => Ok(Self::Interval),
            "on-demand" | "ondemand" | "on_demand" => Ok(Self::OnDemand),
            other => Err(format!(
                "unknown refresh mode '{other}' (expected interval or on-demand)"
            )),
        }
    }
}

/// Parses an environment value, naming the variable on failure.
fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| anyhow!("invalid {name}={value}: {e}"))
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Applies `TVH_*` and `DEVICE_ID` overrides. Empty values are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error naming the variable when a value does not parse.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(v) = var("TVH_URL") {
            self.backend.url = v;
        }
        if let Some(v) = var("TVH_USER") {
            self.backend.username = Some(v);
        }
        if let Some(v) = var("TVH_PASSWORD") {
            self.backend.password = Some(v);
        }
        if let Some(v) = var("TVH_AUTH") {
            self.backend.auth = parse_var("TVH_AUTH", &v)?;
        }
        if let Some(v) = var("TVH_TIMEOUT") {
            self.backend.timeout_secs = parse_var("TVH_TIMEOUT", &v)?;
        }
        if let Some(v) = var("TVH_BINDADDR") {
            self.server.bind_addr = v;
        }
        if let Some(v) = var("TVH_PROXY_URL") {
            self.server.proxy_url = Some(v);
        }
        if let Some(v) = var("TVH_PROXY_HOST") {
            self.server.advertise_host = Some(v);
        }
        if let Some(v) = var("TVH_PROXY_PORT") {
            self.server.port = parse_var("TVH_PROXY_PORT", &v)?;
        }
        if let Some(v) = var("TVH_TUNER_COUNT") {
            self.device.tuner_count = parse_var("TVH_TUNER_COUNT", &v)?;
        }
        if let Some(v) = var("DEVICE_ID") {
            self.device.id = v;
        }
        if let Some(v) = var("TVH_WEIGHT") {
            self.stream.weight = parse_var("TVH_WEIGHT", &v)?;
        }
        if let Some(v) = var("TVH_PROFILE") {
            self.stream.profile = v;
        }
        if let Some(v) = var("TVH_STREAM_URL") {
            self.stream.base_url = Some(v);
        }
        if let Some(v) = var("TVH_REFRESH_MODE") {
            self.refresh.mode = parse_var("TVH_REFRESH_MODE", &v)?;
        }
        if let Some(v) = var("TVH_REFRESH_INTERVAL") {
            self.refresh.interval_secs = parse_var("TVH_REFRESH_INTERVAL", &v)?;
        }
        Ok(())
    }

    /// Loads the file, then applies overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or an environment value is invalid.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let mut config = Self::load(path)?;
        config
            .apply_env(|name| std::env::var(name).ok())
            .context("invalid environment override")?;
        Ok(config)
    }

    /// Builds the backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend URL is invalid.
    pub fn backend_client(&self) -> Result<TvheadendClient> {
        let url = Url::parse(&self.backend.url)
            .with_context(|| format!("invalid backend url '{}'", self.backend.url))?;
        let mut builder = TvheadendClient::builder()
            .base_url(url)
            .auth_scheme(self.backend.auth)
            .timeout(Duration::from_secs(self.backend.timeout_secs));
        if let Some(username) = &self.backend.username {
            builder = builder.credentials(Credentials::new(
                username.clone(),
                self.backend.password.clone().unwrap_or_default(),
            ));
        }
        builder.build().context("failed to build backend client")
    }

    /// Stream URL parameters for the lineup.
    #[must_use]
    pub fn lineup_settings(&self) -> LineupSettings {
        LineupSettings {
            stream_base_url: self
                .stream
                .base_url
                .clone()
                .unwrap_or_else(|| self.backend.url.clone()),
            profile: self.stream.profile.clone(),
            weight: self.stream.weight,
        }
    }

    /// Refresh mode with its period.
    ///
    /// # Errors
    ///
    /// Returns an error if interval mode is configured with a zero period.
    pub fn refresh_mode(&self) -> Result<RefreshMode> {
        match self.refresh.mode {
            RefreshModeSetting::OnDemand => Ok(RefreshMode::OnDemand),
            RefreshModeSetting::Interval => {
                if self.refresh.interval_secs == 0 {
                    bail!("refresh interval must be at least 1 second");
                }
                Ok(RefreshMode::Interval(Duration::from_secs(
                    self.refresh.interval_secs,
                )))
            }
        }
    }

    /// Socket address to listen on.
    ///
    /// # Errors
    ///
    /// Returns an error if `bind_addr` is not an IP address.
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let ip = match self.server.bind_addr.trim() {
            "" => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            addr => addr
                .parse()
                .with_context(|| format!("invalid bind address '{addr}'"))?,
        };
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// Externally visible base URL: the proxy URL when set, otherwise
    /// `http://{advertise_host or hostname}:{port}`.
    #[must_use]
    pub fn advertised_base_url(&self, hostname: &str) -> String {
        self.server.proxy_url.clone().unwrap_or_else(|| {
            let host = self.server.advertise_host.as_deref().unwrap_or(hostname);
            format!("http://{host}:{}", self.server.port)
        })
    }

    /// Device descriptor served on `discover.json` and `device.xml`.
    #[must_use]
    pub fn device_descriptor(&self, hostname: &str) -> DeviceDescriptor {
        DeviceDescriptor::new(
            self.device.id.clone(),
            self.device.tuner_count,
            &self.advertised_base_url(hostname),
        )
    }
}
