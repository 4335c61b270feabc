//! Configuration loading from YAML files

#[cfg(test)]
mod tests {
    use bulkops::Config;
    use bulkops::config::{PauseWait, StrategyKind};
    use std::io::Write;

    #[tokio::test]
    async fn test_shipped_example_config_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/bulkops.yaml.example");
        let config = Config::from_file(path).await.unwrap();

        assert_eq!(config.orchestrator.default_strategy, StrategyKind::Batch);
        assert_eq!(config.orchestrator.pause_wait, PauseWait::Poll);
        assert_eq!(config.orchestrator.verification_grace_ms, 3000);
        assert_eq!(config.remote.timeout_secs, 30);
    }

    #[tokio::test]
    async fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "orchestrator:\n  default_strategy: worker_pool\n  pause_wait: notify\n  max_concurrency: 8"
        )
        .unwrap();

        let config = Config::from_file(file.path()).await.unwrap();
        let defaults = Config::default();

        assert_eq!(config.orchestrator.default_strategy, StrategyKind::WorkerPool);
        assert_eq!(config.orchestrator.pause_wait, PauseWait::Notify);
        assert_eq!(config.orchestrator.max_concurrency, 8);
        assert_eq!(
            config.orchestrator.max_rows,
            defaults.orchestrator.max_rows
        );
        assert_eq!(config.logging, defaults.logging);
    }

    #[tokio::test]
    async fn test_invalid_files_are_config_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "orchestrator:\n  max_rows: 0").unwrap();
        let err = Config::from_file(file.path()).await.unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
        assert!(err.to_string().contains("max_rows"));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server: [not, a, map]").unwrap();
        assert!(Config::from_file(file.path()).await.is_err());

        assert!(Config::from_file("/nonexistent/bulkops.yaml").await.is_err());
    }
}
