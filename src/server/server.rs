use crate::api::v1::CookiePolicy;
use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::infra_redis::*;
use crate::logger::*;
use crate::server::run_session_sweeper;
use crate::settings::Settings;
use nanoid::nanoid;
use sqlx::{MySql, Pool};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const DEV_CSRF_KEY: &str = "loginwarden-dev-csrf-key";
const REDIS_SESSION_PREFIX: &str = "loginwarden:session";

pub struct Server {
    pub auth_service: Arc<dyn AuthService>,
    pub cookie_policy: Arc<CookiePolicy>,
    sweeper_handle: Mutex<Option<JoinHandle<()>>>,
    cancel: CancellationToken,
    pool: Option<Pool<MySql>>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let alphabet: [char; 16] = [
            '1', '2', '3', '4', '5', '6', '7', '8', '9', '0', 'a', 'b', 'c', 'd', 'e', 'f',
        ];
        let run_id = nanoid!(10, &alphabet);
        let session_ttl = settings.auth.session_ttl()?;

        let credential_hasher: Arc<dyn CredentialHasher> =
            match (settings.auth.argon2_memory_kib, settings.auth.argon2_iterations) {
                (None, None) => Arc::new(Argon2PasswordHasher::new()),
                (memory_kib, iterations) => Arc::new(Argon2PasswordHasher::with_cost(
                    memory_kib.unwrap_or(argon2::Params::DEFAULT_M_COST),
                    iterations.unwrap_or(argon2::Params::DEFAULT_T_COST),
                )?),
            };

        let mut pool = None;
        let auth_repo: Arc<dyn AuthRepo> = match settings.auth.user_backend.as_str() {
            "memory" => {
                let repo = MemoryAuthRepo::new();
                let seeded = repo
                    .seed(credential_hasher.as_ref(), &settings.users)
                    .await?;
                info!(seeded, "in-memory user store ready");
                Arc::new(repo)
            }
            "mysql" => {
                let dsn = &settings
                    .mysql
                    .as_ref()
                    .ok_or_else(|| anyhow::anyhow!("user backend mysql needs a [mysql] section"))?
                    .dsn;
                if !settings.users.is_empty() {
                    warn!("[[users]] seeds are ignored by the mysql user backend");
                }
                let mysql = Pool::<MySql>::connect(dsn).await?;
                pool = Some(mysql.clone());
                Arc::new(MySqlAuthRepo::new(mysql))
            }
            other => return Err(anyhow::anyhow!("Unknown user backend: {}", other)),
        };

        let cancel = CancellationToken::new();
        let mut sweeper_handle = None;
        let session_store: Arc<dyn AuthSessionStore> =
            match settings.auth.session_backend.as_str() {
                "memory" => {
                    let store: Arc<dyn AuthSessionStore> = Arc::new(MemoryAuthSessionStore::new());
                    let every = Duration::from_secs(settings.auth.sweep_interval_secs.max(1));
                    sweeper_handle = Some(tokio::spawn(run_session_sweeper(
                        store.clone(),
                        every,
                        cancel.clone(),
                    )));
                    store
                }
                "redis" => {
                    let dsn = &settings
                        .redis
                        .as_ref()
                        .ok_or_else(|| {
                            anyhow::anyhow!("session backend redis needs a [redis] section")
                        })?
                        .dsn;
                    let redis_client = redis::Client::open(dsn.as_str())?;
                    let redis_manager = redis_client.get_connection_manager().await?;
                    Arc::new(RedisAuthSessionStore::new(
                        redis_manager,
                        REDIS_SESSION_PREFIX,
                    ))
                }
                other => return Err(anyhow::anyhow!("Unknown session backend: {}", other)),
            };

        let csrf_key = std::env::var("CSRF_SIGNING_KEY").unwrap_or_else(|_| {
            warn!("CSRF_SIGNING_KEY not set, using the development key");
            DEV_CSRF_KEY.to_string()
        });

        let auth_service: Arc<dyn AuthService> = Arc::new(RealAuthService::new(
            auth_repo,
            credential_hasher,
            session_store,
            HmacCsrfBinder::new(csrf_key.into_bytes()),
            session_ttl,
        ));

        let cookie_policy = Arc::new(CookiePolicy {
            secure: settings.http.tls_enabled(),
            max_age: session_ttl,
        });

        info!(%run_id, "server started");

        Ok(Self {
            auth_service,
            cookie_policy,
            sweeper_handle: Mutex::new(sweeper_handle),
            cancel,
            pool,
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        self.cancel.cancel();

        let handle = match self.sweeper_handle.lock() {
            Ok(mut lock) => lock.take(),
            Err(_) => None,
        };
        if let Some(handle) = handle {
            let r = handle.await;
            info!("sweeper handle dropped: {:?}", r);
        }

        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
