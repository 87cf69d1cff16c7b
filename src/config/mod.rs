use std::{
    fmt,
    fs,
    io::{self, Write},
    net::{Ipv4Addr, Ipv6Addr},
    path::{Path, PathBuf},
    str::FromStr,
};
use confique::Config as _;
use hyper::Uri;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::prelude::*;


/// The locations where we look for a configuration file. The first existing
/// file in this list is used.
const DEFAULT_PATHS: &[&str] = &["config.toml", "/etc/country-browser/config.toml"];

const CONFIG_PATH_ENV: &str = "COUNTRY_BROWSER_CONFIG_PATH";

/// Configuration for the country browser.
///
/// All relative paths are relative to the location of this configuration file.
#[derive(Debug, confique::Config)]
pub(crate) struct Config {
    #[config(nested)]
    pub(crate) http: crate::http::HttpConfig,

    #[config(nested)]
    pub(crate) upstream: crate::upstream::UpstreamConfig,

    #[config(nested)]
    pub(crate) frontend: crate::frontend::FrontendConfig,

    #[config(nested)]
    pub(crate) log: crate::logger::LogConfig,
}

impl Config {
    /// Tries to find a config file by checking `COUNTRY_BROWSER_CONFIG_PATH`
    /// and a list of default locations. The first config file found is loaded
    /// via [`Self::load_from`]. If there is none, the built-in defaults are
    /// used. Returns the config and the path it was loaded from.
    pub(crate) fn from_env_or_default_locations() -> Result<(Self, Option<PathBuf>)> {
        let path = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Some(PathBuf::from(path)),
            None => DEFAULT_PATHS.iter().map(PathBuf::from).find(|p| p.exists()),
        };

        match path {
            Some(path) => {
                let config = Self::load_from(&path)
                    .context(format!("failed to load configuration from '{}'", path.display()))?;
                Ok((config, Some(path)))
            }
            None => {
                let config = Self::builder().load()
                    .context("failed to load default configuration")?;
                Ok((config, None))
            }
        }
    }

    /// Loads the configuration from a specific TOML file.
    pub(crate) fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Config::from_file(path)
            .context(format!("failed to read config file '{}'", path.display()))?;

        config.fix_paths(path)?;

        Ok(config)
    }

    /// Goes through all paths in the configuration and changes relative paths
    /// to be absolute based on the path of the configuration file itself.
    fn fix_paths(&mut self, config_path: &Path) -> Result<()> {
        let absolute_config_path = config_path.canonicalize()
            .context("failed to canonicalize config path")?;
        let base = absolute_config_path.parent()
            .ok_or(anyhow!("config file path has no parent"))?;

        if let Some(p) = &mut self.log.file {
            if p.is_relative() {
                *p = base.join(&p);
            }
        }

        Ok(())
    }
}

/// Writes the generated TOML config template file to the given destination or
/// stdout.
pub(crate) fn write_template(path: Option<&PathBuf>) -> Result<()> {
    use confique::toml::FormatOptions;

    info!(
        "Writing configuration template to '{}'",
        path.map(|p| p.display().to_string()).unwrap_or("<stdout>".into()),
    );

    let mut options = FormatOptions::default();
    options.general.nested_field_gap = 2;
    let template = confique::toml::template::<Config>(options);
    match path {
        Some(path) => fs::write(path, template)?,
        None => io::stdout().write_all(template.as_bytes())?,
    }

    Ok(())
}

/// Parses a URI with some default checks. Is required to have an HTTP(S)
/// scheme, an authority, no userinfo, no query part. A path is allowed. Is
/// checked for HTTPS security.
pub(crate) fn parse_normal_http_uri(src: &str) -> Result<Uri> {
    const SAFE_WORD: &str = "allow-insecure";

    let url: Url = src.parse().map_err(|e| anyhow!("invalid URL: {e}"))?;

    anyhow::ensure!(url.query().is_none(), "URL must not contain a query part");
    anyhow::ensure!(!url.fragment().is_some_and(|f| f != SAFE_WORD),
        "URL must not have a fragment part, except for optionally '{SAFE_WORD}'");
    anyhow::ensure!(url.username().is_empty(), "URL must not contain username part");
    anyhow::ensure!(url.password().is_none(), "URL must not contain password part");
    anyhow::ensure!(["http", "https"].contains(&url.scheme()),
        "URL scheme must be 'http' or 'https'");

    let host = url.host_str().ok_or(anyhow!("URL must have a host"))?;
    let is_local = {
        let bracketed_ipv6 =
            (|| host.strip_prefix('[')?.strip_suffix(']')?.parse::<Ipv6Addr>().ok())();

        if let Some(ipv6) = bracketed_ipv6 {
            ipv6.is_loopback()
        } else if let Ok(ipv4) = host.parse::<Ipv4Addr>() {
            ipv4.is_loopback()
        } else {
            // This only catches configuration mistakes, "localhost" could
            // resolve to anything.
            host == "localhost"
        }
    };

    if url.scheme() != "https" && !(is_local || url.fragment() == Some(SAFE_WORD)) {
        bail!("Potentially dangerous URL with non-local host and 'http' scheme. \
            If you really want to use unencrypted HTTP for non-local hosts, \
            confirm by specifing the URL as '{url}#{SAFE_WORD}'");
    }

    Uri::builder()
        .scheme(url.scheme())
        .authority(url.authority())
        .path_and_query(url.path())
        .build()
        .context("failed to build URI")
}


/// An HTTP(S) base URL that request paths are appended to, e.g.
/// `https://restcountries.com/v3.1`. Never has a trailing slash.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub(crate) struct BaseUrl(Uri);

impl BaseUrl {
    /// Returns a full URI by appending the given path+query to `self`. `pq`
    /// has to start with `/`.
    pub(crate) fn join(&self, pq: &str) -> Result<Uri> {
        let parts = self.0.clone().into_parts();
        let base_path = parts.path_and_query.as_ref().map_or("", |pq| pq.path());

        let mut builder = Uri::builder();
        if let Some(scheme) = parts.scheme {
            builder = builder.scheme(scheme);
        }
        if let Some(authority) = parts.authority {
            builder = builder.authority(authority);
        }
        builder.path_and_query(format!("{}{pq}", base_path.trim_end_matches('/')))
            .build()
            .with_context(|| format!("invalid path '{pq}' for base URL '{self}'"))
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = self.0.to_string();
        f.write_str(s.trim_end_matches('/'))
    }
}

impl fmt::Debug for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<BaseUrl> for String {
    fn from(value: BaseUrl) -> Self {
        value.to_string()
    }
}

impl FromStr for BaseUrl {
    type Err = anyhow::Error;
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        parse_normal_http_uri(src).map(Self)
    }
}

impl TryFrom<String> for BaseUrl {
    type Error = <Self as FromStr>::Err;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
