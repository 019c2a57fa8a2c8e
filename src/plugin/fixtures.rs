//! Test plugins.

use crate::core::{InstanceId, Properties, SharedStates};
use crate::layout::map::HeadlessMap;
use crate::plugin::context::{ContextParts, PluginContext};
use crate::plugin::interface::{
    DataProvider, FirstLoaded, HeaderProvider, Plugin, PluginFactory, PluginResult, QueryHandler,
    SharedStateConsumer,
};
use crate::presenter::{Immediate, LargePresenter};
use crate::state::LoadingAggregator;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use url::Url;

/// A context whose host has gone away.
pub fn detached_context() -> PluginContext {
    let parts = ContextParts {
        loading: Arc::new(LoadingAggregator::new()),
        presenter: Arc::new(LargePresenter::new(Arc::new(Immediate))),
        bus: Weak::new(),
        directory: Weak::new(),
        map: Arc::new(HeadlessMap::new()),
        root_directory: None,
        config_base_url: Url::parse("http://localhost/").unwrap(),
    };
    PluginContext::new(InstanceId::new(), parts, &Properties::new())
}

/// Plugin with no capabilities.
pub struct Silent;

impl Plugin for Silent {}

/// Plugin with a fixed header.
pub struct Titled {
    title: String,
}

impl Titled {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
        }
    }
}

impl HeaderProvider for Titled {
    fn header(&self) -> Option<String> {
        Some(self.title.clone())
    }
}

impl Plugin for Titled {
    fn as_header_provider(&self) -> Option<&dyn HeaderProvider> {
        Some(self)
    }
}

/// Records every shared-state delivery.
#[derive(Default)]
pub struct Recorder {
    states: Mutex<Vec<SharedStates>>,
}

impl Recorder {
    pub fn last_state(&self) -> Option<SharedStates> {
        self.states.lock().last().cloned()
    }

    pub fn deliveries(&self) -> usize {
        self.states.lock().len()
    }
}

impl SharedStateConsumer for Recorder {
    fn receive_shared_states(&self, states: SharedStates) {
        self.states.lock().push(states);
    }
}

impl Plugin for Recorder {
    fn as_shared_state_consumer(&self) -> Option<&dyn SharedStateConsumer> {
        Some(self)
    }
}

/// Data provider echoing its routed arguments.
pub struct Provider {
    identifiers: Vec<String>,
    handles_queries: bool,
    queries: Mutex<Vec<(String, String)>>,
}

impl Provider {
    pub fn new(identifiers: &[&str]) -> Self {
        Self {
            identifiers: identifiers.iter().map(|s| s.to_string()).collect(),
            handles_queries: true,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn without_handler(mut self) -> Self {
        self.handles_queries = false;
        self
    }

    pub fn queries(&self) -> Vec<(String, String)> {
        self.queries.lock().clone()
    }
}

impl DataProvider for Provider {
    fn provider_identifiers(&self) -> Vec<String> {
        self.identifiers.clone()
    }
}

#[async_trait]
impl QueryHandler for Provider {
    async fn query_data(&self, identifier: &str, rest: &str, payload: &Value) -> Option<Value> {
        self.queries
            .lock()
            .push((identifier.to_string(), rest.to_string()));
        Some(json!({ "identifier": identifier, "rest": rest, "payload": payload }))
    }
}

impl Plugin for Provider {
    fn as_data_provider(&self) -> Option<&dyn DataProvider> {
        Some(self)
    }

    fn as_query_handler(&self) -> Option<&dyn QueryHandler> {
        if self.handles_queries {
            Some(self)
        } else {
            None
        }
    }
}

/// Keeps its context and counts lifecycle calls.
pub struct Probe {
    pub context: PluginContext,
    title: Option<String>,
    identifiers: Vec<String>,
    first_loaded: AtomicUsize,
    states: Mutex<Vec<SharedStates>>,
    /// Shared log of first-loaded hooks across probes
    order: Option<Arc<Mutex<Vec<String>>>>,
}

impl Probe {
    pub fn new(context: PluginContext) -> Self {
        Self {
            context,
            title: None,
            identifiers: Vec::new(),
            first_loaded: AtomicUsize::new(0),
            states: Mutex::new(Vec::new()),
            order: None,
        }
    }

    pub fn first_loaded_calls(&self) -> usize {
        self.first_loaded.load(Ordering::SeqCst)
    }

    pub fn last_state(&self) -> Option<SharedStates> {
        self.states.lock().last().cloned()
    }
}

impl HeaderProvider for Probe {
    fn header(&self) -> Option<String> {
        self.title.clone()
    }
}

impl FirstLoaded for Probe {
    fn on_first_loaded(&self) {
        self.first_loaded.fetch_add(1, Ordering::SeqCst);
        if let Some(order) = &self.order {
            let name = self.title.clone().unwrap_or_default();
            order.lock().push(name);
        }
    }
}

impl DataProvider for Probe {
    fn provider_identifiers(&self) -> Vec<String> {
        self.identifiers.clone()
    }
}

impl SharedStateConsumer for Probe {
    fn receive_shared_states(&self, states: SharedStates) {
        self.states.lock().push(states);
    }
}

impl Plugin for Probe {
    fn as_header_provider(&self) -> Option<&dyn HeaderProvider> {
        Some(self)
    }

    fn as_first_loaded(&self) -> Option<&dyn FirstLoaded> {
        Some(self)
    }

    fn as_data_provider(&self) -> Option<&dyn DataProvider> {
        if self.identifiers.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    fn as_shared_state_consumer(&self) -> Option<&dyn SharedStateConsumer> {
        Some(self)
    }
}

/// Factory producing [`Probe`]s and keeping every one it created.
#[derive(Clone, Default)]
pub struct ProbeFactory {
    title: Option<String>,
    identifiers: Vec<String>,
    order: Option<Arc<Mutex<Vec<String>>>>,
    fail: bool,
    created: Arc<Mutex<Vec<Arc<Probe>>>>,
}

impl ProbeFactory {
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    pub fn providing(mut self, identifiers: &[&str]) -> Self {
        self.identifiers = identifiers.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn logging_to(mut self, order: Arc<Mutex<Vec<String>>>) -> Self {
        self.order = Some(order);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn created(&self) -> Vec<Arc<Probe>> {
        self.created.lock().clone()
    }
}

impl PluginFactory for ProbeFactory {
    fn create(&self, context: PluginContext) -> PluginResult<Arc<dyn Plugin>> {
        if self.fail {
            return Err(crate::plugin::interface::PluginError::new("constructor failed"));
        }
        let mut probe = Probe::new(context);
        probe.title = self.title.clone();
        probe.identifiers = self.identifiers.clone();
        probe.order = self.order.clone();
        let probe = Arc::new(probe);
        self.created.lock().push(Arc::clone(&probe));
        Ok(probe)
    }
}
