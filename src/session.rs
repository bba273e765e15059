//! Session state.
//!
//! A [`Session`] is the configuration a shell accumulates between commands:
//! the open connection (if any), the composed crawl options, output options
//! and auxiliary settings. Every change produces a new `Session` value; the
//! dispatcher commits it only when the whole command succeeded.

use crate::catalog::CatalogCrawler;
use crate::config::{Config, ConnectionConfig};
use crate::error::Result;
use crate::options::{
    CrawlOptions, OptionArgs, OptionsFragment, OptionsOverlay, OutputFragment, OutputOptions,
    ReportOptions,
};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Whether a session holds a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connected,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connected => write!(f, "connected"),
        }
    }
}

/// An open connection: the settings used and the crawler they produced.
#[derive(Clone)]
pub struct Connection {
    config: ConnectionConfig,
    crawler: Arc<dyn CatalogCrawler>,
}

impl Connection {
    pub fn new(config: ConnectionConfig, crawler: Arc<dyn CatalogCrawler>) -> Self {
        Self { config, crawler }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn crawler(&self) -> &Arc<dyn CatalogCrawler> {
        &self.crawler
    }

    pub fn describe(&self) -> String {
        self.crawler.describe()
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("config", &self.config.display_string())
            .field("crawler", &self.crawler.describe())
            .finish()
    }
}

/// Accumulated shell configuration.
#[derive(Debug, Clone)]
pub struct Session {
    connection: Option<Connection>,
    /// Built-in defaults overlaid with config file defaults.
    base_options: CrawlOptions,
    /// Fragments from `limit`/`grep`/`filter`/`load` commands.
    overlay: OptionsOverlay,
    /// Always `overlay` applied to `base_options`.
    options: CrawlOptions,
    /// Built-in output defaults overlaid with config file defaults.
    base_output: OutputOptions,
    /// Output settings from `execute` commands.
    output_overlay: OutputFragment,
    /// Always `output_overlay` composed onto `base_output`.
    output: OutputOptions,
    /// Formatter switches and other non-crawl settings.
    aux: OptionArgs,
    connections: BTreeMap<String, ConnectionConfig>,
    config_path: Option<PathBuf>,
    log_level: String,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            connection: None,
            base_options: CrawlOptions::default(),
            overlay: OptionsOverlay::default(),
            options: CrawlOptions::default(),
            base_output: OutputOptions::default(),
            output_overlay: OutputFragment::default(),
            output: OutputOptions::default(),
            aux: OptionArgs::new(),
            connections: BTreeMap::new(),
            config_path: None,
            log_level: "warn".to_string(),
        }
    }
}

impl Session {
    /// Creates a session with built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session whose base options come from `config`.
    pub fn from_config(config: &Config, path: Option<&Path>) -> Result<Self> {
        let session = Self {
            log_level: config.log.level.clone(),
            ..Self::default()
        };
        session.with_config(config, path)
    }

    pub fn state(&self) -> SessionState {
        if self.connection.is_some() {
            SessionState::Connected
        } else {
            SessionState::Disconnected
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// The options the next crawl will use.
    pub fn current_options(&self) -> &CrawlOptions {
        &self.options
    }

    pub fn current_connection(&self) -> Option<&Connection> {
        self.connection.as_ref()
    }

    pub fn output_options(&self) -> &OutputOptions {
        &self.output
    }

    /// The options a `sweep` returns to.
    pub fn base_options(&self) -> &CrawlOptions {
        &self.base_options
    }

    /// Formatter switches from the auxiliary settings, overridden by `args`.
    pub fn report_options(&self, args: &OptionArgs) -> Result<ReportOptions> {
        ReportOptions::default().with_args(&self.aux)?.with_args(args)
    }

    pub fn named_connection(&self, name: &str) -> Option<&ConnectionConfig> {
        self.connections.get(name)
    }

    pub fn connection_names(&self) -> impl Iterator<Item = &str> {
        self.connections.keys().map(String::as_str)
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Returns a session with `fragment` composed into the current options.
    pub fn with_fragment(&self, fragment: &OptionsFragment) -> Self {
        let overlay = self.overlay.push(fragment);
        Self {
            options: overlay.apply_to(&self.base_options),
            overlay,
            ..self.clone()
        }
    }

    /// Returns a session with every explicit fragment discarded.
    ///
    /// The connection, output options and auxiliary settings are kept.
    pub fn swept(&self) -> Self {
        Self {
            overlay: OptionsOverlay::default(),
            options: self.base_options.clone(),
            ..self.clone()
        }
    }

    pub fn with_connection(&self, connection: Option<Connection>) -> Self {
        Self {
            connection,
            ..self.clone()
        }
    }

    /// Returns a session with `fragment` composed into the output options.
    pub fn with_output(&self, fragment: &OutputFragment) -> Self {
        let output_overlay = self.output_overlay.overlay(fragment);
        Self {
            output: self.base_output.compose(&output_overlay),
            output_overlay,
            ..self.clone()
        }
    }

    pub fn with_log_level(&self, level: impl Into<String>) -> Self {
        Self {
            log_level: level.into(),
            ..self.clone()
        }
    }

    /// Returns a session using `config`'s defaults as the new base.
    ///
    /// Explicit fragments already issued stay on top of the new base, for
    /// crawl and output options alike. Every other recognised key is kept as
    /// an auxiliary setting.
    pub fn with_config(&self, config: &Config, path: Option<&Path>) -> Result<Self> {
        let defaults = config.default_args();

        let crawl_keys: Vec<&str> = OptionsOverlay::keys().collect();
        let known: Vec<&str> = crawl_keys
            .iter()
            .chain(OutputFragment::KEYS)
            .chain(ReportOptions::KEYS)
            .copied()
            .collect();
        defaults.ensure_known(&known)?;

        let base_options = OptionsOverlay::from_args(&defaults.subset(&crawl_keys))?
            .apply_to(&CrawlOptions::default());
        let aux = defaults.without(&crawl_keys).without(OutputFragment::KEYS);
        // Validate switches now rather than at the next execute.
        ReportOptions::default().with_args(&aux)?;

        let mut connections = self.connections.clone();
        connections.extend(config.connections.clone());

        let base_output = OutputOptions::default()
            .compose(&OutputFragment::from_args(&defaults.subset(OutputFragment::KEYS)));

        Ok(Self {
            options: self.overlay.apply_to(&base_options),
            base_options,
            output: base_output.compose(&self.output_overlay),
            base_output,
            aux,
            connections,
            config_path: path.map(Path::to_path_buf),
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MockCrawler;
    use crate::options::{GrepFragment, InfoLevel, LimitFragment, LoadFragment};

    fn args(pairs: &[(&str, &str)]) -> OptionArgs {
        OptionArgs::from_pairs(pairs.iter().copied())
    }

    fn config(toml: &str) -> Config {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn test_new_session_is_disconnected_with_defaults() {
        let session = Session::new();
        assert_eq!(session.state(), SessionState::Disconnected);
        assert_eq!(session.current_options(), &CrawlOptions::default());
        assert_eq!(session.output_options(), &OutputOptions::default());
    }

    #[test]
    fn test_fragment_does_not_touch_original() {
        let session = Session::new();
        let fragment = OptionsFragment::Limit(
            LimitFragment::from_args(&args(&[("include-tables", ".*BOOKS")])).unwrap(),
        );
        let next = session.with_fragment(&fragment);

        assert_eq!(session.current_options(), &CrawlOptions::default());
        assert!(!next.current_options().limit().tables().test("PUBLIC.AUTHORS"));
    }

    #[test]
    fn test_sweep_keeps_connection_and_output() {
        let connection = Connection::new(
            ConnectionConfig::default(),
            Arc::new(MockCrawler::new()),
        );
        let session = Session::new()
            .with_connection(Some(connection))
            .with_output(&OutputFragment {
                format: Some("json".to_string()),
                ..Default::default()
            })
            .with_fragment(&OptionsFragment::Limit(
                LimitFragment::from_args(&args(&[("include-tables", ".*BOOKS")])).unwrap(),
            ))
            .with_fragment(&OptionsFragment::Grep(
                GrepFragment::from_args(&args(&[("include-grepped-columns", ".*ID")])).unwrap(),
            ))
            .with_fragment(&OptionsFragment::Load(
                LoadFragment::from_args(&args(&[("info-level", "maximum")])).unwrap(),
            ));

        let swept = session.swept();
        assert_eq!(swept.current_options(), &CrawlOptions::default());
        assert!(swept.is_connected());
        assert_eq!(swept.output_options().format(), "json");
    }

    #[test]
    fn test_config_defaults_become_base() {
        let config = config(
            r#"
[defaults]
info-level = "minimum"
no-info = true
format = "json"
"#,
        );
        let session = Session::from_config(&config, None).unwrap();

        assert_eq!(session.base_options().load().info_level(), InfoLevel::Minimum);
        assert_eq!(session.current_options(), session.base_options());
        assert_eq!(session.output_options().format(), "json");
        assert!(session.report_options(&OptionArgs::new()).unwrap().no_info);
    }

    #[test]
    fn test_config_defaults_do_not_override_explicit_fragments() {
        let session = Session::new().with_fragment(&OptionsFragment::Load(
            LoadFragment::from_args(&args(&[("info-level", "maximum")])).unwrap(),
        ));
        let config = config("[defaults]\ninfo-level = \"minimum\"\nload-row-counts = true\n");

        let loaded = session.with_config(&config, None).unwrap();
        assert_eq!(loaded.current_options().load().info_level(), InfoLevel::Maximum);
        assert!(loaded.current_options().load().load_row_counts());

        let swept = loaded.swept();
        assert_eq!(swept.current_options().load().info_level(), InfoLevel::Minimum);
    }

    #[test]
    fn test_config_defaults_do_not_override_explicit_output() {
        let session = Session::new().with_output(&OutputFragment {
            format: Some("json".to_string()),
            ..Default::default()
        });
        let config = config("[defaults]\nformat = \"text\"\ntitle = \"Books\"\n");

        let loaded = session.with_config(&config, None).unwrap();
        assert_eq!(loaded.output_options().format(), "json");
        assert_eq!(loaded.output_options().title(), Some("Books"));
    }

    #[test]
    fn test_config_with_unknown_key_is_rejected() {
        let config = config("[defaults]\ninclude-everything = true\n");
        assert!(Session::new().with_config(&config, None).is_err());
    }

    #[test]
    fn test_config_connections_are_named() {
        let config = config("[connections.books]\nserver = \"offline\"\ndatabase = \"b.json\"\n");
        let session = Session::from_config(&config, None).unwrap();
        assert_eq!(
            session.named_connection("books").unwrap().database.as_deref(),
            Some("b.json")
        );
        assert_eq!(session.connection_names().collect::<Vec<_>>(), vec!["books"]);
    }
}
