//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, a scripted
//! metadata provider, and the full [`AppContext`]. The [`with_server`]
//! constructor starts Axum on a random port for HTTP-level testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use cinelog::collection::CollectionManager;
use cinelog::config::Config;
use cinelog::metadata::{FetchError, MovieMetadata, MovieMetadataProvider};
use cinelog::server::{create_router, AppContext};
use cinelog_core::UserId;
use cinelog_db::pool::{get_conn, init_memory_pool, DbPool, PooledConnection};

/// Scripted replacement for the OMDb client.
///
/// [`found`] answers every title with fixed metadata derived from the title;
/// [`unknown`] refuses every title. Lookups are counted either way.
///
/// [`found`]: StubProvider::found
/// [`unknown`]: StubProvider::unknown
pub struct StubProvider {
    calls: AtomicUsize,
    found: bool,
}

impl StubProvider {
    pub fn found() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            found: true,
        }
    }

    pub fn unknown() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            found: false,
        }
    }

    /// Number of lookups the provider has served.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MovieMetadataProvider for StubProvider {
    async fn fetch(&self, title: &str) -> Result<MovieMetadata, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.found {
            return Err(FetchError::Unknown(title.to_string()));
        }
        Ok(MovieMetadata {
            name: title.to_string(),
            director: Some("Stub Director".to_string()),
            year: Some(2010),
            rating: Some(8.8),
            poster_url: Some("https://example.com/poster.jpg".to_string()),
            imdb_link: Some("https://www.imdb.com/title/tt0000001/".to_string()),
        })
    }
}

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    pub provider: Arc<StubProvider>,
}

impl TestHarness {
    /// Create a new harness with a scripted provider.
    pub fn with_provider(provider: StubProvider) -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let provider = Arc::new(provider);
        let manager = Arc::new(CollectionManager::new(db.clone(), provider.clone()));

        let ctx = AppContext {
            manager,
            config: Arc::new(Config::default()),
        };

        Self { ctx, db, provider }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::with_server_provider(StubProvider::found()).await
    }

    /// Start an Axum server backed by a scripted provider.
    pub async fn with_server_provider(provider: StubProvider) -> (Self, SocketAddr) {
        let harness = Self::with_provider(provider);
        let app = create_router(harness.ctx.clone(), None);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// Get a database connection from the pool.
    pub fn conn(&self) -> PooledConnection {
        get_conn(&self.db).expect("failed to get db connection")
    }

    /// Create a user directly through the manager.
    pub fn create_user(&self, name: &str) -> UserId {
        self.ctx
            .manager
            .add_user(name)
            .expect("failed to create user")
            .id
    }
}
