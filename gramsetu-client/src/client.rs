/// Client facade
///
/// Bundles the transport, token store, and session into a single entry
/// point. Construct once, clone freely; all clones share the session and
/// its refresh state.
///
/// # Example
///
/// ```no_run
/// use gramsetu_client::{Client, Config};
/// use gramsetu_client::api::LoginCredentials;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::from_env()?;
/// let client = Client::new(&config)?;
///
/// let outcome = client
///     .auth()
///     .official_login(&LoginCredentials::new("clerk", "secret"))
///     .await?;
/// println!("signed in as {}", outcome.user.id);
///
/// let page = client.issues().fetch(&Default::default()).await?;
/// println!("{} issues", page.total);
/// # Ok(())
/// # }
/// ```
use std::sync::Arc;

use crate::api::{AuthApi, GramSabhaApi, IssuesApi, SummariesApi};
use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::session::Session;
use crate::token::{FileTokenStore, MemoryTokenStore, TokenStore};
use crate::transport::{HttpClient, HttpTransport};

/// GramSetu API client
#[derive(Clone)]
pub struct Client {
    session: Arc<Session>,
}

impl Client {
    /// Creates a client with the reqwest transport
    ///
    /// Tokens persist to `config.token_file` when set, otherwise they live
    /// only in memory for the process lifetime.
    ///
    /// # Errors
    ///
    /// Returns an error when the transport cannot be built or the token
    /// file cannot be opened.
    pub fn new(config: &Config) -> ClientResult<Self> {
        let transport = Arc::new(HttpClient::new(config).map_err(ClientError::Network)?);

        let tokens: Arc<dyn TokenStore> = match &config.token_file {
            Some(path) => Arc::new(FileTokenStore::open(path)?),
            None => Arc::new(MemoryTokenStore::new()),
        };

        Ok(Client::with_parts(transport, tokens))
    }

    /// Creates a client over an arbitrary transport and store
    ///
    /// Intended for tests and tools that scripted a
    /// [`MockTransport`](crate::transport::MockTransport) or use a custom
    /// persistence layer.
    pub fn with_parts(transport: Arc<dyn HttpTransport>, tokens: Arc<dyn TokenStore>) -> Self {
        Client {
            session: Arc::new(Session::new(transport, tokens)),
        }
    }

    /// Authentication endpoints
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(Arc::clone(&self.session))
    }

    /// Issue endpoints
    pub fn issues(&self) -> IssuesApi {
        IssuesApi::new(Arc::clone(&self.session))
    }

    /// Issue summary endpoints
    pub fn summaries(&self) -> SummariesApi {
        SummariesApi::new(Arc::clone(&self.session))
    }

    /// Gram Sabha meeting endpoints
    pub fn gram_sabha(&self) -> GramSabhaApi {
        GramSabhaApi::new(Arc::clone(&self.session))
    }

    /// The underlying session, for advanced callers issuing raw requests
    pub fn session(&self) -> Arc<Session> {
        Arc::clone(&self.session)
    }
}
