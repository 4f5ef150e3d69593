use anyhow::Context;
use std::sync::Arc;

use bookshelf_db::{Database, SchemaStep};

use crate::module::{InitCtx, Migration, Module};

/// Module registry for managing module lifecycle
///
/// Modules are initialized and started in registration order and stopped in
/// reverse order.
pub struct ModuleRegistry {
    modules: Vec<Arc<dyn Module>>,
}

impl ModuleRegistry {
    /// Create a new module registry
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// Register a module with the registry
    pub fn register(&mut self, module: Arc<dyn Module>) {
        tracing::debug!(module = module.name(), "module registered");
        self.modules.push(module);
    }

    /// Get all registered modules in registration order
    pub fn modules(&self) -> impl Iterator<Item = &Arc<dyn Module>> {
        self.modules.iter()
    }

    /// Get a module by name
    pub fn get_module(&self, name: &str) -> Option<&Arc<dyn Module>> {
        self.modules.iter().find(|module| module.name() == name)
    }

    /// Get the number of registered modules
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Initialize all modules
    pub async fn init_modules(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!("initializing {} modules", self.modules.len());

        for module in &self.modules {
            tracing::info!(module = module.name(), "initializing module");

            module
                .init(ctx)
                .await
                .with_context(|| format!("failed to initialize module '{}'", module.name()))?;
        }

        Ok(())
    }

    /// Apply every module's schema steps that the database has not seen yet
    pub async fn apply_migrations(&self, db: &Database) -> anyhow::Result<usize> {
        let migrations = self.collect_migrations();
        let steps: Vec<SchemaStep<'_>> = migrations
            .iter()
            .map(|(module, migration)| SchemaStep {
                module: module.as_str(),
                id: migration.id,
                sql: migration.up,
            })
            .collect();

        let applied = db
            .apply_schema(&steps)
            .await
            .context("failed to apply module migrations")?;

        tracing::info!(applied, total = steps.len(), "module migrations applied");
        Ok(applied)
    }

    /// Start all modules
    pub async fn start_modules(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!("starting {} modules", self.modules.len());

        for module in &self.modules {
            tracing::info!(module = module.name(), "starting module");

            module
                .start(ctx)
                .await
                .with_context(|| format!("failed to start module '{}'", module.name()))?;
        }

        Ok(())
    }

    /// Stop modules in reverse registration order
    pub async fn stop_modules(&self) -> anyhow::Result<()> {
        tracing::info!("stopping {} modules", self.modules.len());

        for module in self.modules.iter().rev() {
            tracing::info!(module = module.name(), "stopping module");

            module
                .stop()
                .await
                .with_context(|| format!("failed to stop module '{}'", module.name()))?;
        }

        Ok(())
    }

    /// Collect all migrations from all modules
    pub fn collect_migrations(&self) -> Vec<(String, Migration)> {
        let mut migrations = Vec::new();

        for module in &self.modules {
            for migration in module.migrations() {
                migrations.push((module.name().to_string(), migration));
            }
        }

        // Sort by module name and migration ID for deterministic ordering
        migrations.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.id.cmp(b.1.id)));

        migrations
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TestModule {
        name: &'static str,
        started: AtomicUsize,
    }

    impl TestModule {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                started: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl Module for TestModule {
        fn name(&self) -> &'static str {
            self.name
        }

        fn migrations(&self) -> Vec<Migration> {
            vec![
                Migration {
                    id: "002_seed",
                    up: "INSERT INTO widgets (label) VALUES ('first');",
                },
                Migration {
                    id: "001_init",
                    up: "CREATE TABLE widgets (id INTEGER PRIMARY KEY, label TEXT NOT NULL);",
                },
            ]
        }

        async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
            self.started.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_module_registry_creation() {
        let registry = ModuleRegistry::new();
        assert_eq!(registry.module_count(), 0);
        assert!(registry.collect_migrations().is_empty());
    }

    #[test]
    fn test_migrations_are_sorted_by_module_then_id() {
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(TestModule::new("widgets")));

        let ids: Vec<_> = registry
            .collect_migrations()
            .into_iter()
            .map(|(module, migration)| format!("{module}/{}", migration.id))
            .collect();
        assert_eq!(ids, vec!["widgets/001_init", "widgets/002_seed"]);
    }

    #[tokio::test]
    async fn test_module_lifecycle() {
        let db = Database::in_memory().await.unwrap();
        let settings = Settings::default();
        let ctx = InitCtx {
            settings: &settings,
            db: &db,
        };

        let module = Arc::new(TestModule::new("widgets"));
        let mut registry = ModuleRegistry::new();
        registry.register(module.clone());
        assert!(registry.get_module("widgets").is_some());

        registry.init_modules(&ctx).await.unwrap();
        assert_eq!(registry.apply_migrations(&db).await.unwrap(), 2);
        // A second pass must not re-run anything.
        assert_eq!(registry.apply_migrations(&db).await.unwrap(), 0);
        registry.start_modules(&ctx).await.unwrap();
        registry.stop_modules().await.unwrap();

        assert_eq!(module.started.load(Ordering::SeqCst), 1);
    }
}
