//! addcache demo
//!
//! Walks through the cache API: key composition, persistent and expiring
//! entries, hooks and stopping the sweeper.

use std::time::Duration;

use addcache::{Cache, Operation};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug)]
struct User {
    id: i64,
    name: String,
    lastname: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "debug" for this crate, can be overridden with RUST_LOG
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "addcache=debug,addcache_demo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cache: Cache<User> = Cache::with_interval(Duration::from_secs(1));

    cache
        .on(Operation::Create, |key, user| info!("created {} -> {:?}", key, user))
        .await;
    cache
        .on(Operation::Delete, |key, user| info!("deleted {} ({})", key, user.name))
        .await;

    let user_key = cache.create_key(["user", "12"]);
    cache
        .set(
            &user_key,
            User {
                id: 2,
                name: "Test".to_string(),
                lastname: "Test".to_string(),
            },
        )
        .await;

    let user = cache.get(&user_key).await?;
    info!("read back user {} {} (id {})", user.name, user.lastname, user.id);

    cache.delete(&user_key).await;
    if let Err(err) = cache.get(&user_key).await {
        info!("after delete: {}", err);
    }

    cache
        .set_with_expiry(
            &user_key,
            User {
                id: 3,
                name: "Short".to_string(),
                lastname: "Lived".to_string(),
            },
            Duration::from_millis(500),
        )
        .await;
    tokio::time::sleep(Duration::from_millis(1500)).await;
    info!("entries after sweep: {}", cache.len().await);

    cache.stop_cleanup().await;
    Ok(())
}
