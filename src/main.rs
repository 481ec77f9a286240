use std::sync::Arc;

use iam_backend::config::ApiConfig;
use iam_backend::event::{EventPublisher, RedisEventPublisher};
use iam_backend::group::{
    repository::{GroupRepository, InMemoryGroupRepository, PostgresGroupRepository},
    GroupService,
};
use iam_backend::routes::api_router;
use iam_backend::shared::AppState;
use iam_backend::task::{repository::JsonFileTaskRepository, TaskService};
use iam_backend::user::{
    repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository},
    UserService,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Repositories = (
    Arc<dyn GroupRepository + Send + Sync>,
    Arc<dyn UserRepository + Send + Sync>,
);

async fn build_repositories(
    config: &ApiConfig,
) -> Result<Repositories, Box<dyn std::error::Error>> {
    match &config.database_url {
        Some(database_url) => {
            let pool = sqlx::PgPool::connect(database_url).await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Connected to PostgreSQL");
            Ok((
                Arc::new(PostgresGroupRepository::new(pool.clone())),
                Arc::new(PostgresUserRepository::new(pool)),
            ))
        }
        None => {
            warn!("DATABASE_URL not set, groups and users are kept in memory");
            Ok((
                Arc::new(InMemoryGroupRepository::new()),
                Arc::new(InMemoryUserRepository::new()),
            ))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "iam_backend=debug,iam_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env();
    info!(addr = %config.bind_addr, "Starting IAM API");

    // Broker failures leave the publisher disabled; the API still starts
    let publisher: Arc<dyn EventPublisher> =
        Arc::new(RedisEventPublisher::connect(&config.broker).await);

    let (group_repository, user_repository) = build_repositories(&config).await?;
    let task_repository = Arc::new(JsonFileTaskRepository::open(config.tasks_file.clone()).await?);

    let app_state = AppState::new(
        Arc::new(GroupService::new(
            group_repository,
            publisher,
            config.broker.channel.clone(),
        )),
        Arc::new(UserService::new(user_repository)),
        Arc::new(TaskService::new(task_repository)),
    );

    let app = api_router(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
