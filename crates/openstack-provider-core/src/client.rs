//! Client construction
//!
//! [`ClientFactory`] is the seam between configuration and the API client.
//! The factory receives the finished [`ProviderConfig`] and either returns a
//! client handle or fails; its error is carried unchanged to the caller.
//!
//! [`HttpClientFactory`] checks that the endpoint and API versions are well
//! formed and prepares a `reqwest` client. It does not talk to the network;
//! token authentication is left to the session layer built on top of it.

use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

use crate::config::{ApiVersions, ProviderConfig};
use crate::resolver::redact_endpoint;

/// Errors raised while constructing a client
#[derive(Error, Debug)]
pub enum ClientError {
    /// The identity endpoint is not a usable URL
    #[error("Invalid identity endpoint: {0}")]
    InvalidEndpoint(String),

    /// An API version is not a positive version number
    #[error("Invalid {service} API version '{value}'")]
    InvalidApiVersion {
        service: &'static str,
        value: String,
    },

    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(String),
}

/// Builds a client handle from a finished configuration
#[cfg_attr(test, mockall::automock(type Client = String;))]
pub trait ClientFactory {
    type Client;

    fn build(&self, config: &ProviderConfig) -> Result<Self::Client, ClientError>;
}

/// Parsed API version (`major` or `major.minor`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ApiVersion {
    pub major: u32,
    pub minor: Option<u32>,
}

impl ApiVersion {
    /// Parse a version such as `2` or `2.1`
    pub fn parse(service: &'static str, value: &str) -> Result<Self, ClientError> {
        let invalid = || ClientError::InvalidApiVersion {
            service,
            value: value.to_string(),
        };

        let unprefixed = value.strip_prefix(['v', 'V']).unwrap_or(value);
        let (major, minor) = match unprefixed.split_once('.') {
            Some((major, minor)) => (major, Some(minor)),
            None => (unprefixed, None),
        };

        let major: u32 = major.parse().map_err(|_| invalid())?;
        if major == 0 {
            return Err(invalid());
        }
        let minor = minor
            .map(|m| m.parse::<u32>().map_err(|_| invalid()))
            .transpose()?;

        Ok(Self { major, minor })
    }
}

impl std::fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.minor {
            Some(minor) => write!(f, "{}.{}", self.major, minor),
            None => write!(f, "{}", self.major),
        }
    }
}

/// API versions parsed for each service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceVersions {
    pub compute: ApiVersion,
    pub block_storage: ApiVersion,
    pub networking: ApiVersion,
    pub object_storage: ApiVersion,
}

impl ServiceVersions {
    pub fn parse(versions: &ApiVersions) -> Result<Self, ClientError> {
        Ok(Self {
            compute: ApiVersion::parse("compute", &versions.compute)?,
            block_storage: ApiVersion::parse("block storage", &versions.block_storage)?,
            networking: ApiVersion::parse("networking", &versions.networking)?,
            object_storage: ApiVersion::parse("object storage", &versions.object_storage)?,
        })
    }
}

/// Client handle produced by [`HttpClientFactory`]
#[derive(Debug, Clone)]
pub struct OpenStackClient {
    http: reqwest::Client,
    identity_endpoint: Url,
    versions: ServiceVersions,
}

impl OpenStackClient {
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn identity_endpoint(&self) -> &Url {
        &self.identity_endpoint
    }

    /// Identity endpoint with any embedded credentials masked
    pub fn display_endpoint(&self) -> String {
        redact_endpoint(self.identity_endpoint.as_str())
    }

    pub fn versions(&self) -> &ServiceVersions {
        &self.versions
    }
}

/// Default factory backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpClientFactory {
    timeout: Duration,
    user_agent: String,
}

impl HttpClientFactory {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("openstack-provider/{}", crate::VERSION),
        }
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn parse_endpoint(raw: &str) -> Result<Url, ClientError> {
        let shown = redact_endpoint(raw);
        let url = Url::parse(raw).map_err(|e| ClientError::InvalidEndpoint(format!("{}: {}", shown, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidEndpoint(format!(
                "{}: unsupported scheme '{}'",
                shown,
                url.scheme()
            )));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(ClientError::InvalidEndpoint(format!("{}: missing host", shown)));
        }

        Ok(url)
    }
}

impl Default for HttpClientFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientFactory for HttpClientFactory {
    type Client = OpenStackClient;

    fn build(&self, config: &ProviderConfig) -> Result<OpenStackClient, ClientError> {
        let identity_endpoint = Self::parse_endpoint(&config.identity_endpoint)?;
        let versions = ServiceVersions::parse(&config.api_versions)?;

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone())
            .build()
            .map_err(|e| ClientError::Http(e.to_string()))?;

        tracing::debug!(
            endpoint = %redact_endpoint(identity_endpoint.as_str()),
            compute = %versions.compute,
            networking = %versions.networking,
            "Prepared OpenStack client"
        );

        Ok(OpenStackClient {
            http,
            identity_endpoint,
            versions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: &str) -> ProviderConfig {
        ProviderConfig {
            identity_endpoint: endpoint.to_string(),
            ..ProviderConfig::default()
        }
    }

    #[test]
    fn test_api_version_parse() {
        assert_eq!(
            ApiVersion::parse("compute", "2").unwrap(),
            ApiVersion { major: 2, minor: None }
        );
        assert_eq!(
            ApiVersion::parse("compute", "v2.1").unwrap(),
            ApiVersion { major: 2, minor: Some(1) }
        );
        assert_eq!(ApiVersion::parse("compute", "2.1").unwrap().to_string(), "2.1");
        assert!(ApiVersion::parse("compute", "").is_err());
        assert!(ApiVersion::parse("compute", "0").is_err());
        assert!(ApiVersion::parse("compute", "two").is_err());
        assert!(ApiVersion::parse("compute", "2.").is_err());
    }

    #[test]
    fn test_api_version_is_exact() {
        assert!(ApiVersion::parse("compute", "vv2").is_err());
        assert!(ApiVersion::parse("compute", " 2 ").is_err());
        assert!(ApiVersion::parse("compute", "2 ").is_err());
        assert_eq!(ApiVersion::parse("compute", "V3").unwrap().major, 3);
    }

    #[test]
    fn test_builds_client() {
        let factory = HttpClientFactory::new().with_timeout(Duration::from_secs(5));
        let client = factory.build(&config("https://identity.example.com:5000/v2.0")).unwrap();

        assert_eq!(client.identity_endpoint().host_str(), Some("identity.example.com"));
        assert_eq!(client.versions().compute.major, 2);
        assert_eq!(client.versions().block_storage.major, 1);
    }

    #[test]
    fn test_rejects_malformed_endpoint() {
        let factory = HttpClientFactory::new();

        for endpoint in ["", "identity.example.com", "ftp://identity.example.com", "https://"] {
            let err = factory.build(&config(endpoint)).unwrap_err();
            assert!(matches!(err, ClientError::InvalidEndpoint(_)), "{endpoint}");
        }
    }

    #[test]
    fn test_rejects_bad_api_version() {
        let mut cfg = config("https://identity.example.com");
        cfg.api_versions.networking = "latest".to_string();

        let err = HttpClientFactory::new().build(&cfg).unwrap_err();
        match err {
            ClientError::InvalidApiVersion { service, value } => {
                assert_eq!(service, "networking");
                assert_eq!(value, "latest");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_endpoint_credentials_never_displayed() {
        let factory = HttpClientFactory::new();

        let client = factory.build(&config("https://admin:pw@identity.example.com/v3")).unwrap();
        assert_eq!(client.display_endpoint(), "https://<redacted>@identity.example.com/v3");

        let err = factory.build(&config("ftp://admin:pw@identity.example.com")).unwrap_err();
        assert!(!err.to_string().contains("pw"), "{err}");

        let err = factory.build(&config("admin:pw@identity.example.com")).unwrap_err();
        assert!(!err.to_string().contains(":pw"), "{err}");
    }
}
