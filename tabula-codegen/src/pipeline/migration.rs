//! Pre-render hook recording the latest applied migration

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::hooks::PreRenderHook;
use crate::codegen::{escape_string, Declaration, FileKind, GenericDeclaration, Output};

/// Opens connections to the migration store
#[async_trait]
pub trait MigrationConnector: Send + Sync {
    async fn connect(&self) -> anyhow::Result<Box<dyn MigrationConnection>>;
}

/// An open connection to the migration store
#[async_trait]
pub trait MigrationConnection: Send {
    /// Name of the most recently applied migration, if any
    async fn latest_migration(&mut self) -> anyhow::Result<Option<String>>;

    async fn close(&mut self) -> anyhow::Result<()>;
}

/// Adds `export const latestMigration` to the file at `path`.
///
/// The connection is closed whether or not the query succeeds.
pub struct MigrationMarker {
    connector: Arc<dyn MigrationConnector>,
    path: String,
}

impl MigrationMarker {
    pub fn new(connector: Arc<dyn MigrationConnector>) -> Self {
        Self {
            connector,
            path: "migration".to_string(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

#[async_trait]
impl PreRenderHook for MigrationMarker {
    fn name(&self) -> &str {
        "migration-marker"
    }

    async fn apply(&self, mut output: Output) -> anyhow::Result<Output> {
        let mut connection = self.connector.connect().await?;
        let latest = connection.latest_migration().await;
        let closed = connection.close().await;

        if let Err(e) = &closed {
            warn!("Failed to close migration connection: {}", e);
        }
        let latest = latest?;
        closed?;

        debug!("Latest migration: {:?}", latest);
        let value = latest
            .as_deref()
            .map(escape_string)
            .unwrap_or_else(|| "null".to_string());

        output.merge(
            self.path.clone(),
            FileKind::TypeScript,
            vec![Declaration::Generic(GenericDeclaration {
                comment: vec!["Latest migration applied when these types were generated".into()],
                lines: vec![format!(
                    "export const latestMigration: string | null = {};",
                    value
                )],
                imports: vec![],
            })],
        )?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    struct Counters {
        opened: AtomicUsize,
        closed: AtomicUsize,
    }

    struct FakeConnector {
        counters: Arc<Counters>,
        latest: Option<&'static str>,
        fail_query: bool,
        fail_close: bool,
    }

    struct FakeConnection {
        counters: Arc<Counters>,
        latest: Option<&'static str>,
        fail_query: bool,
        fail_close: bool,
    }

    #[async_trait]
    impl MigrationConnector for FakeConnector {
        async fn connect(&self) -> anyhow::Result<Box<dyn MigrationConnection>> {
            self.counters.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeConnection {
                counters: self.counters.clone(),
                latest: self.latest,
                fail_query: self.fail_query,
                fail_close: self.fail_close,
            }))
        }
    }

    #[async_trait]
    impl MigrationConnection for FakeConnection {
        async fn latest_migration(&mut self) -> anyhow::Result<Option<String>> {
            if self.fail_query {
                anyhow::bail!("relation \"knex_migrations\" does not exist");
            }
            Ok(self.latest.map(str::to_string))
        }

        async fn close(&mut self) -> anyhow::Result<()> {
            self.counters.closed.fetch_add(1, Ordering::SeqCst);
            if self.fail_close {
                anyhow::bail!("connection reset by peer");
            }
            Ok(())
        }
    }

    fn marker(latest: Option<&'static str>, fail_query: bool) -> (MigrationMarker, Arc<Counters>) {
        failing_marker(latest, fail_query, false)
    }

    fn failing_marker(
        latest: Option<&'static str>,
        fail_query: bool,
        fail_close: bool,
    ) -> (MigrationMarker, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let connector = FakeConnector {
            counters: counters.clone(),
            latest,
            fail_query,
            fail_close,
        };
        (MigrationMarker::new(Arc::new(connector)), counters)
    }

    fn first_line(output: &Output) -> String {
        match &output.get("migration").unwrap().declarations[0] {
            Declaration::Generic(generic) => generic.lines[0].clone(),
            other => panic!("unexpected declaration: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_latest_migration_recorded() {
        let (hook, counters) = marker(Some("20240101_add_film's_rating"), false);
        let output = hook.apply(Output::new()).await.unwrap();

        assert_eq!(
            first_line(&output),
            "export const latestMigration: string | null = '20240101_add_film\\'s_rating';"
        );
        assert_eq!(counters.opened.load(Ordering::SeqCst), 1);
        assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_migrations() {
        let (hook, _) = marker(None, false);
        let output = hook.apply(Output::new()).await.unwrap();
        assert_eq!(
            first_line(&output),
            "export const latestMigration: string | null = null;"
        );
    }

    #[tokio::test]
    async fn test_connection_closed_on_error() {
        let (hook, counters) = marker(None, true);
        let err = hook.apply(Output::new()).await.unwrap_err();

        assert!(err.to_string().contains("knex_migrations"));
        assert_eq!(counters.opened.load(Ordering::SeqCst), 1);
        assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_close_failure_reported() {
        let (hook, counters) = failing_marker(Some("20240101_init"), false, true);
        let err = hook.apply(Output::new()).await.unwrap_err();

        assert!(err.to_string().contains("connection reset"));
        assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_query_error_wins_when_close_also_fails() {
        let (hook, counters) = failing_marker(None, true, true);
        let err = hook.apply(Output::new()).await.unwrap_err();

        assert!(err.to_string().contains("knex_migrations"));
        assert_eq!(counters.opened.load(Ordering::SeqCst), 1);
        assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
    }
}
