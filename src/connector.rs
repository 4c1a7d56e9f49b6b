use std::sync::Arc;

use crate::{
    call_log::CallLogger, config::Config, errors::Error, fetcher::Fetcher, rate_limit,
    transport::Transport, types::Fetched,
};

#[derive(Clone)]
pub struct AsyncConnector {
    config: Config,
    fetcher: Arc<Fetcher>,
}

impl AsyncConnector {
    /// Create a new AsyncConnector
    /// # Arguments
    /// * `config` - Explicit configuration (`Config`), built in code or via `Config::from_file`.
    ///
    /// The log file is opened (or recreated when `overwrite_log` is set) here, once.
    pub async fn new(config: Config) -> Result<Self, Error> {
        let policy = config.retry_policy()?;
        let logger = CallLogger::open(&config.logfile, config.overwrite_log).await?;
        Ok(Self {
            fetcher: Arc::new(Fetcher::new(policy, Arc::new(logger))),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    pub fn logger(&self) -> &Arc<CallLogger> {
        self.fetcher.logger()
    }

    /// A pooled HTTP client suitable for passing to [`AsyncConnector::get`].
    pub fn http_client() -> Result<reqwest::Client, Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("async-connector/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(client)
    }

    /// GET `url` through `transport`, retrying and logging one row for the call.
    /// `project_name` is written to the log as-is.
    pub async fn get<T>(
        &self,
        transport: &T,
        url: &str,
        project_name: &str,
    ) -> Result<Fetched, Error>
    where
        T: Transport + Sync,
    {
        self.fetcher.get(transport, url, project_name).await
    }

    pub async fn rate_limit(delay: f64) {
        rate_limit::delay(delay).await;
    }
}
