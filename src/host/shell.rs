//! The map host.
//!
//! Turns a [`HostConfig`] into live plugins: waits for directory access if
//! requested, imports modules one after another, creates and places every
//! plugin in configuration order, then fires the first-loaded hooks.
//! Afterwards it mediates shared state, data queries, loading status and
//! the large view.

use crate::config::{HostConfig, HostOptions};
use crate::core::{DefinitionKey, Error, InstanceId, Properties, Result, SharedStates};
use crate::data::ProviderDirectory;
use crate::host::environment::{
    DirectoryAccess, LogNotifier, Notifier, PageMetadata, DIRECTORY_RETRY_MESSAGE,
};
use crate::layout::map::{HeadlessMap, MapBackend};
use crate::layout::placement;
use crate::layout::stage::{ContainerId, ShellId, Stage};
use crate::plugin::context::{ContextParts, PluginContext};
use crate::plugin::importer::ModuleImporter;
use crate::plugin::registry::{ComponentRegistry, PluginRecord, PluginRegistry};
use crate::presenter::{effect_for, LargePresenter, Presentation, PresenterState, TransitionHandle, VisualEffect};
use crate::state::{LoadingAggregator, SharedStateBus};
use parking_lot::Mutex;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Plugin host for one configuration.
pub struct MapHost {
    config: HostConfig,
    options: HostOptions,
    components: ComponentRegistry,
    importer: Arc<dyn ModuleImporter>,
    registry: PluginRegistry,
    loading: Arc<LoadingAggregator>,
    bus: Arc<SharedStateBus>,
    directory: Arc<ProviderDirectory>,
    presenter: Arc<LargePresenter>,
    stage: Arc<Mutex<Stage>>,
    map: Arc<dyn MapBackend>,
    notifier: Arc<dyn Notifier>,
    directory_access: Option<Arc<dyn DirectoryAccess>>,
    page: Option<Arc<dyn PageMetadata>>,
    root_directory: Option<PathBuf>,
    loaded: bool,
}

impl MapHost {
    /// Create a host. Nothing is loaded until [`MapHost::load`].
    pub fn new(config: HostConfig, options: HostOptions, importer: Arc<dyn ModuleImporter>) -> Self {
        let presenter = Arc::new(LargePresenter::new(effect_for(&options.transition)));
        Self {
            config,
            options,
            components: ComponentRegistry::new(),
            importer,
            registry: PluginRegistry::new(),
            loading: Arc::new(LoadingAggregator::new()),
            bus: Arc::new(SharedStateBus::new()),
            directory: Arc::new(ProviderDirectory::new()),
            presenter,
            stage: Arc::new(Mutex::new(Stage::new())),
            map: Arc::new(HeadlessMap::new()),
            notifier: Arc::new(LogNotifier),
            directory_access: None,
            page: None,
            root_directory: None,
            loaded: false,
        }
    }

    /// Use a map backend.
    pub fn with_map(mut self, map: Arc<dyn MapBackend>) -> Self {
        self.map = map;
        self
    }

    /// Use a notifier for user-visible failures.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Use a directory permission prompt.
    pub fn with_directory_access(mut self, access: Arc<dyn DirectoryAccess>) -> Self {
        self.directory_access = Some(access);
        self
    }

    /// Use a page metadata sink.
    pub fn with_page_metadata(mut self, page: Arc<dyn PageMetadata>) -> Self {
        self.page = Some(page);
        self
    }

    /// Replace the presenter transition strategy.
    pub fn with_visual_effect(mut self, effect: Arc<dyn VisualEffect>) -> Self {
        self.presenter = Arc::new(LargePresenter::new(effect));
        self
    }

    /// Load every plugin of the configuration.
    ///
    /// Failures are shown through the notifier and returned; plugins after
    /// the failing one are not loaded.
    pub async fn load(&mut self) -> Result<()> {
        if self.loaded {
            return Err(Error::AlreadyLoaded);
        }
        self.loaded = true;

        self.apply_page_info();
        self.map.configure(&self.config.view, self.config.prefer_canvas);

        if self.config.access_local_files {
            match self.await_directory_access().await {
                Ok(root) => self.root_directory = Some(root),
                Err(err) => return Err(self.report(err)),
            }
        }

        if let Err(err) = self.load_plugins().await {
            return Err(self.report(err));
        }

        let notified = self.registry.notify_first_loaded();
        info!(
            plugins = self.registry.plugin_count(),
            notified, "All plugins loaded"
        );
        Ok(())
    }

    async fn await_directory_access(&self) -> Result<PathBuf> {
        let access = self.directory_access.as_ref().ok_or_else(|| {
            Error::DirectoryAccess("local file access requested but no directory prompt is available".to_string())
        })?;

        loop {
            match access.request_root_directory().await {
                Ok(root) => {
                    info!(root = %root.display(), "Root directory granted");
                    return Ok(root);
                }
                Err(err) => {
                    warn!(error = %err, "Directory access not granted, asking again");
                    self.notifier.alert(DIRECTORY_RETRY_MESSAGE);
                }
            }
        }
    }

    async fn load_plugins(&mut self) -> Result<()> {
        let imports: Vec<(String, String)> = self
            .config
            .import_entries()
            .into_iter()
            .map(|(name, url)| (name.to_string(), url.to_string()))
            .collect();

        for (name, url) in imports {
            let url = self.options.resolve_import(&name, &url)?;
            debug!(name = %name, url = %url, "Importing plugin module");
            self.importer.import(&name, &url, &self.components).await?;
        }

        for (index, definition) in self.config.plugins.iter().enumerate() {
            let parts = self.context_parts();
            let created = self.registry.instantiate(
                &self.components,
                DefinitionKey(index),
                definition,
                |instance_id| PluginContext::new(instance_id, parts, &definition.props),
            )?;
            let Some((instance_id, plugin)) = created else {
                continue;
            };

            self.directory.register(instance_id, Arc::clone(&plugin))?;
            self.bus.subscribe(instance_id, Arc::clone(&plugin));
            placement::place(
                &mut self.stage.lock(),
                self.map.as_ref(),
                definition,
                instance_id,
                plugin.as_ref(),
            );
        }
        Ok(())
    }

    fn context_parts(&self) -> ContextParts {
        ContextParts {
            loading: Arc::clone(&self.loading),
            presenter: Arc::clone(&self.presenter),
            bus: Arc::downgrade(&self.bus),
            directory: Arc::downgrade(&self.directory),
            map: Arc::clone(&self.map),
            root_directory: self.root_directory.clone(),
            config_base_url: self.options.import_base().clone(),
        }
    }

    fn apply_page_info(&self) {
        if !self.options.allow_modifying_page_info {
            return;
        }
        let Some(page) = &self.page else {
            return;
        };
        if let Some(title) = &self.config.page_title {
            page.set_title(title);
        }
        if let Some(favicon) = &self.config.favicon {
            page.set_favicon(favicon);
        }
    }

    fn report(&self, err: Error) -> Error {
        error!(error = %err, "Plugin loading failed");
        self.notifier.alert(&err.to_string());
        err
    }

    /// Replace the shared states and push them to every plugin.
    pub fn publish_shared_states(&self, states: Properties) {
        self.bus.publish(states);
    }

    /// Current shared states.
    pub fn shared_states(&self) -> SharedStates {
        self.bus.current()
    }

    /// Route a data query.
    pub async fn query(&self, data_source: &str, payload: &Value) -> Option<Value> {
        self.directory.query(data_source, payload).await
    }

    /// Whether a data provider answers for `identifier`.
    pub fn has_provider(&self, identifier: &str) -> bool {
        self.directory.has_provider(identifier)
    }

    /// Data provider directory.
    pub fn directory(&self) -> &ProviderDirectory {
        &self.directory
    }

    /// Whether any plugin is busy.
    pub fn is_loading(&self) -> bool {
        self.loading.is_busy()
    }

    /// Watch the global loading indicator.
    pub fn loading_status(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Enlarge an instance. No-op while another instance is enlarged.
    pub fn present(&self, instance_id: InstanceId) -> Option<TransitionHandle> {
        let header = self.registry.get(instance_id)?.plugin.header_text();
        self.presenter.present(&self.stage, instance_id, header)
    }

    /// Enlarge the plugin wrapped by a shell.
    pub fn request_large_view(&self, shell: ShellId) -> Option<TransitionHandle> {
        let instance_id = {
            let stage = self.stage.lock();
            stage.children(ContainerId::Shell(shell)).first().copied()
        }?;
        self.present(instance_id)
    }

    /// Close the large view.
    pub fn dismiss(&self) -> Option<TransitionHandle> {
        self.presenter.dismiss(&self.stage)
    }

    /// Presenter state.
    pub fn presenter_state(&self) -> PresenterState {
        self.presenter.state()
    }

    /// Current presentation.
    pub fn presentation(&self) -> Option<Presentation> {
        self.presenter.current()
    }

    /// Pointer entered or left a shell.
    pub fn hover_shell(&self, shell: ShellId, entered: bool) {
        debug!(%shell, entered, "Shell hover");
        placement::hover(self.map.as_ref(), entered);
    }

    /// Inspect the layout.
    pub fn with_stage<R>(&self, f: impl FnOnce(&Stage) -> R) -> R {
        f(&self.stage.lock())
    }

    /// Record for a definition position.
    pub fn instance_for(&self, key: DefinitionKey) -> Option<&PluginRecord> {
        self.registry.instance_for(key)
    }

    /// Loaded plugins.
    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Component registry, for defining components without a module import.
    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    /// Map backend.
    pub fn map(&self) -> &Arc<dyn MapBackend> {
        &self.map
    }

    /// Granted root directory.
    pub fn root_directory(&self) -> Option<&Path> {
        self.root_directory.as_deref()
    }

    /// Configuration.
    pub fn config(&self) -> &HostConfig {
        &self.config
    }
}
