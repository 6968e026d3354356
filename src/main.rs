use anyhow::{Context, anyhow};
use rusty_library_lending::{
    adapters::{
        InMemoryStore, TokioJobQueue,
        mail::{NoopMailTransport, SmtpMailTransport},
        postgres::{
            PostgresAuthorRepository, PostgresBookRepository, PostgresLoanRepository,
            PostgresMemberRepository,
        },
    },
    api::{AppState, create_router},
    application::{
        loan::ServiceDependencies,
        notification::{NotificationDependencies, NotificationWorker},
    },
    config::{AppConfig, DatabaseConfig, EmailConfig, StorageKind},
    ports::{AuthorRepository, BookRepository, LoanRepository, MailTransport, MemberRepository},
    scheduler::{DailySchedule, spawn_overdue_check},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct Repositories {
    authors: Arc<dyn AuthorRepository>,
    books: Arc<dyn BookRepository>,
    members: Arc<dyn MemberRepository>,
    loans: Arc<dyn LoanRepository>,
}

async fn connect_repositories(config: &DatabaseConfig) -> anyhow::Result<Repositories> {
    match config.storage {
        StorageKind::Memory => {
            tracing::warn!("using in-memory storage, data is lost on shutdown");
            let store = Arc::new(InMemoryStore::new());
            Ok(Repositories {
                authors: store.clone(),
                books: store.clone(),
                members: store.clone(),
                loans: store,
            })
        }
        StorageKind::Postgres => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.url)
                .await
                .context("Failed to connect to database")?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;

            Ok(Repositories {
                authors: Arc::new(PostgresAuthorRepository::new(pool.clone())),
                books: Arc::new(PostgresBookRepository::new(pool.clone())),
                members: Arc::new(PostgresMemberRepository::new(pool.clone())),
                loans: Arc::new(PostgresLoanRepository::new(pool)),
            })
        }
    }
}

fn mail_transport(config: &EmailConfig) -> anyhow::Result<Arc<dyn MailTransport>> {
    if !config.enabled {
        return Ok(Arc::new(NoopMailTransport));
    }

    let smtp = SmtpMailTransport::new(&config.smtp_host, config.smtp_port, &config.from_address)
        .map_err(|e| anyhow!(e))
        .context("Invalid email configuration")?;
    tracing::info!(host = %config.smtp_host, port = config.smtp_port, "SMTP delivery enabled");
    Ok(Arc::new(smtp))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "rusty_library_lending={},tower_http=debug",
                    config.logging.level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Initialize adapters
    let repositories = connect_repositories(&config.database).await?;
    let mail = mail_transport(&config.email)?;

    // Background notification jobs
    let worker = NotificationWorker::new(NotificationDependencies {
        loans: repositories.loans.clone(),
        mail,
    });
    let job_queue = Arc::new(TokioJobQueue::new(Arc::new(worker)));

    // Create service dependencies
    let service_deps = ServiceDependencies {
        authors: repositories.authors,
        books: repositories.books,
        members: repositories.members,
        loans: repositories.loans,
        job_queue,
    };

    // Daily overdue check
    let schedule: DailySchedule = config
        .scheduler
        .overdue_check_at
        .parse()
        .context("Invalid scheduler.overdue_check_at")?;
    spawn_overdue_check(service_deps.clone(), schedule);

    // Create application state and router
    let app_state = Arc::new(AppState::new(service_deps, config.pagination));
    let app = create_router(app_state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}
