//! Wires configuration, persistence and platform collaborators into a
//! ready-to-run [`HubRuntime`].

use crate::config::HubConfig;
use crate::links::{LinkOpener, LoggingOpener};
use crate::logging::Logger;
use crate::page::{LinkHubPage, PageLayout};
use crate::runtime::diagnostics::LifecycleLoggerPlugin;
use crate::runtime::{HubRuntime, RuntimeConfig};
use crate::store::{FlagStore, JsonFileStore};
use crate::widgets::{InstallCapability, UnsupportedInstall};
use crate::{AnsiRenderer, Result, Size};

pub struct HubBuilder {
    config: HubConfig,
    store: Option<Box<dyn FlagStore>>,
    install: Option<Box<dyn InstallCapability>>,
    opener: Option<Box<dyn LinkOpener>>,
    logger: Option<Logger>,
    size: Size,
    metrics: bool,
}

impl HubBuilder {
    pub fn new(config: HubConfig) -> Self {
        Self {
            config,
            store: None,
            install: None,
            opener: None,
            logger: None,
            size: Size::new(80, 32),
            metrics: true,
        }
    }

    /// Defaults to a [`JsonFileStore`] at the configured `store_path`.
    pub fn with_store(mut self, store: impl FlagStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn with_install_capability(mut self, capability: impl InstallCapability + 'static) -> Self {
        self.install = Some(Box::new(capability));
        self
    }

    pub fn with_opener(mut self, opener: impl LinkOpener + 'static) -> Self {
        self.opener = Some(Box::new(opener));
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Initial terminal size; the CLI driver resizes to the real one.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.metrics = enabled;
        self
    }

    pub fn build(self) -> Result<HubRuntime> {
        self.config.validate()?;

        let store = self
            .store
            .unwrap_or_else(|| Box::new(JsonFileStore::new(&self.config.store_path)));
        let install = self
            .install
            .unwrap_or_else(|| Box::new(UnsupportedInstall));
        let opener = self
            .opener
            .unwrap_or_else(|| Box::new(LoggingOpener::new(self.logger.clone())));

        let mut page = LinkHubPage::new(&self.config, store, install, opener);
        if let Some(logger) = &self.logger {
            page = page.with_logger(logger.clone());
        }

        let mut runtime_config = RuntimeConfig {
            tick_interval: self.config.frame_interval(),
            logger: self.logger.clone(),
            ..RuntimeConfig::default()
        };
        if self.metrics {
            runtime_config.enable_metrics();
        }

        let layout = PageLayout::new(page.links().len(), self.config.toasts.max_visible);
        let mut runtime = HubRuntime::with_config(
            Box::new(layout),
            AnsiRenderer::with_default(),
            self.size,
            runtime_config,
        )?;
        runtime.register_plugin(page);
        if let Some(logger) = self.logger {
            runtime.register_plugin(LifecycleLoggerPlugin::new(logger));
        }
        Ok(runtime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::logging::MemorySink;
    use crate::runtime::RuntimeEvent;
    use crate::store::MemoryStore;
    use crate::HubError;
    use std::time::Duration;

    #[test]
    fn invalid_config_is_rejected_before_building() {
        let mut config = HubConfig::default();
        config.tour.step_period_ms = 0;
        let err = HubBuilder::new(config)
            .with_store(MemoryStore::new())
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, HubError::Config(ConfigError::Invalid { .. })));
    }

    #[test]
    fn builder_registers_page_and_lifecycle_logging() {
        let sink = MemorySink::new();
        let mut runtime = HubBuilder::new(HubConfig::default())
            .with_store(MemoryStore::new())
            .with_logger(Logger::new(sink.clone()))
            .build()
            .unwrap();

        let mut output = Vec::new();
        runtime
            .run_scripted(
                &mut output,
                vec![RuntimeEvent::Tick {
                    elapsed: Duration::from_millis(100),
                }],
            )
            .unwrap();

        let messages = sink.messages();
        assert!(messages.iter().any(|message| message == "page_mounted"));
        assert!(messages.iter().any(|message| message == "tour_armed"));
        assert!(messages.iter().any(|message| message == "page_unmounted"));
    }
}
