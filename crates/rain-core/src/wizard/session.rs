//! A wizard run bound to a server store.
//!
//! Navigation goes through [`WizardSession::apply`]. Form submissions borrow
//! the session immutably, so the state cannot change while one is in flight,
//! and only one submission may be outstanding at a time. A clipboard
//! submission takes the session mutably to drop the servers it managed to save
//! before a failure.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::import::{ClipboardSource, ImportError, parse_from_clipboard};
use crate::registry::SchemaOption;
use crate::store::ServerStore;
use crate::types::{ServerOrigin, UserServer};

use super::state::{Step, WizardState};

pub struct WizardSession<S> {
    state: WizardState,
    store: S,
    submitting: AtomicBool,
}

/// Clears the single-flight flag when the submission finishes, however it ends
struct SubmitGuard<'a>(&'a AtomicBool);

impl<'a> SubmitGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitGuard(flag))
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S: ServerStore> WizardSession<S> {
    pub fn new(store: S) -> Self {
        Self {
            state: WizardState::new(),
            store,
            submitting: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    /// Form buffers are edited in place
    pub fn state_mut(&mut self) -> &mut WizardState {
        &mut self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run a transition, e.g. `session.apply(|s| s.choose_type(ServerType::Custom))`.
    pub fn apply(&mut self, transition: impl FnOnce(WizardState) -> WizardState) {
        let state = std::mem::take(&mut self.state);
        self.state = transition(state);
    }

    pub fn reset(&mut self) {
        self.apply(WizardState::reset);
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Read the clipboard and keep the recognized servers for review.
    pub fn import_clipboard<C: ClipboardSource + ?Sized>(
        &mut self,
        clipboard: &C,
    ) -> Result<usize, ImportError> {
        let servers = parse_from_clipboard(clipboard)?;
        self.apply(|state| state.with_clipboard_servers(servers));
        Ok(self.state.clipboard_servers.len())
    }

    /// Save the configured registry package or remote.
    pub async fn submit_registry(&self) -> bool {
        let state = &self.state;
        if state.step() != Step::Configure {
            tracing::warn!("Registry submission from step {:?}", state.step());
            return false;
        }
        let name = state.server_name.trim();
        let (Some(schema), Some(option), Some(config)) =
            (state.schema(), state.active_option(), state.draft_entry())
        else {
            tracing::warn!("Registry submission without a selected option");
            return false;
        };
        if name.is_empty() {
            return false;
        }

        let package_id = match option {
            SchemaOption::Package(package) => Some(package.package_id()),
            SchemaOption::Remote(_) => None,
        };
        let origin = ServerOrigin::registry(schema.name.clone(), package_id);
        self.persist(vec![UserServer::new(name, config, origin)])
            .await
            == 1
    }

    pub async fn submit_custom(&self) -> bool {
        self.submit_form(Step::CustomForm).await
    }

    pub async fn submit_remote(&self) -> bool {
        self.submit_form(Step::RemoteForm).await
    }

    /// Save every imported clipboard server under its current name.
    ///
    /// Servers are created in order. On a store failure the ones already
    /// saved leave the review list, so a retry submits only the rest.
    pub async fn submit_clipboard(&mut self) -> bool {
        let state = &self.state;
        if state.step() != Step::ClipboardImport || state.clipboard_servers.is_empty() {
            return false;
        }
        let servers = state
            .clipboard_servers
            .iter()
            .map(|parsed| {
                UserServer::new(
                    parsed.name.clone(),
                    parsed.config.clone(),
                    ServerOrigin::custom(),
                )
            })
            .collect::<Vec<_>>();
        let total = servers.len();

        let saved = self.persist(servers).await;
        if saved < total {
            self.state.clipboard_servers.drain(..saved);
            return false;
        }
        true
    }

    async fn submit_form(&self, step: Step) -> bool {
        let state = &self.state;
        if state.step() != step {
            tracing::warn!("{:?} submission from step {:?}", step, state.step());
            return false;
        }
        let name = state.server_name.trim();
        let Some(config) = state.draft_entry() else {
            return false;
        };
        if name.is_empty() {
            return false;
        }
        self.persist(vec![UserServer::new(name, config, ServerOrigin::custom())])
            .await
            == 1
    }

    /// Create `servers` in order, stopping at the first failure. Returns how
    /// many were saved.
    async fn persist(&self, servers: Vec<UserServer>) -> usize {
        let Some(_guard) = SubmitGuard::acquire(&self.submitting) else {
            tracing::warn!("Submission already in progress; ignoring");
            return 0;
        };

        let mut saved = 0;
        for server in servers {
            let name = server.name.clone();
            match self.store.create(server).await {
                Ok(created) => {
                    tracing::info!("Added server '{}' ({})", created.name, created.id);
                    saved += 1;
                }
                Err(e) => {
                    tracing::error!("Failed to add server '{}': {}", name, e);
                    break;
                }
            }
        }
        saved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use tokio::sync::Notify;

    use crate::mcp::{AgentServerEntry, EnvMap};
    use crate::registry::{LocalTransport, Package, ServerSchema};
    use crate::store::StoreError;
    use crate::types::OriginType;
    use crate::wizard::ServerType;

    #[derive(Default)]
    struct MemoryStore {
        servers: Mutex<Vec<UserServer>>,
        fail: bool,
        /// Name whose creation fails
        reject: Option<&'static str>,
        gate: Option<Arc<Notify>>,
        entered: Arc<AtomicBool>,
    }

    impl MemoryStore {
        fn created(&self) -> Vec<UserServer> {
            self.servers.lock().unwrap().clone()
        }
    }

    impl ServerStore for MemoryStore {
        async fn list(&self) -> Result<Vec<UserServer>, StoreError> {
            Ok(self.created())
        }

        async fn create(&self, server: UserServer) -> Result<UserServer, StoreError> {
            self.entered.store(true, Ordering::Relaxed);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail || self.reject == Some(server.name.as_str()) {
                return Err(StoreError::Backend("disk full".to_string()));
            }
            self.servers.lock().unwrap().push(server.clone());
            Ok(server)
        }

        async fn update(&self, server: UserServer) -> Result<UserServer, StoreError> {
            Ok(server)
        }

        async fn delete(&self, _id: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn custom_session(store: MemoryStore) -> WizardSession<MemoryStore> {
        let mut session = WizardSession::new(store);
        session.apply(|s| s.choose_type(ServerType::Custom));
        let state = session.state_mut();
        state.server_name = "github".to_string();
        state.custom_command = "npx".to_string();
        state.custom_args = "-y @modelcontextprotocol/server-github".to_string();
        session
    }

    #[tokio::test]
    async fn test_submit_custom() {
        let session = custom_session(MemoryStore::default());
        assert!(session.submit_custom().await);

        let created = session.store().created();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].name, "github");
        assert_eq!(
            created[0].origin.as_ref().map(|o| o.origin_type),
            Some(OriginType::Custom)
        );
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn test_submit_requires_name_and_command() {
        let mut session = custom_session(MemoryStore::default());
        session.state_mut().server_name = "  ".to_string();
        assert!(!session.submit_custom().await);

        session.state_mut().server_name = "ok".to_string();
        session.state_mut().custom_command.clear();
        assert!(!session.submit_custom().await);
        assert!(session.store().created().is_empty());
    }

    #[tokio::test]
    async fn test_submit_from_wrong_step_is_rejected() {
        let mut session = custom_session(MemoryStore::default());
        assert!(!session.submit_remote().await);
        assert!(!session.submit_registry().await);
        assert!(!session.submit_clipboard().await);
    }

    #[tokio::test]
    async fn test_store_failure_keeps_state() {
        let session = custom_session(MemoryStore {
            fail: true,
            ..Default::default()
        });
        let before = session.state().clone();

        assert!(!session.submit_custom().await);
        assert_eq!(session.state(), &before);
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn test_second_submission_rejected_while_first_pending() {
        let gate = Arc::new(Notify::new());
        let entered = Arc::new(AtomicBool::new(false));
        let session = custom_session(MemoryStore {
            gate: Some(gate.clone()),
            entered: entered.clone(),
            ..Default::default()
        });

        let first = session.submit_custom();
        let second = async {
            while !entered.load(Ordering::Relaxed) {
                tokio::task::yield_now().await;
            }
            assert!(session.is_submitting());
            let accepted = session.submit_custom().await;
            gate.notify_one();
            accepted
        };

        let (first, second) = tokio::join!(first, second);
        assert!(first);
        assert!(!second);
        assert_eq!(session.store().created().len(), 1);
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn test_submit_registry_records_origin() {
        let schema = ServerSchema {
            name: "io.github.acme/weather".to_string(),
            title: None,
            description: None,
            version: "1.0.0".to_string(),
            repository: None,
            website_url: None,
            packages: vec![Package {
                registry_type: "pypi".to_string(),
                identifier: "weather-mcp".to_string(),
                version: Some("0.3.1".to_string()),
                runtime_hint: None,
                transport: LocalTransport::Stdio,
                package_arguments: Vec::new(),
                environment_variables: Vec::new(),
            }],
            remotes: Vec::new(),
        };

        let mut session = WizardSession::new(MemoryStore::default());
        session.apply(|s| s.choose_type(ServerType::Registry).choose_schema(schema));
        session
            .state_mut()
            .env_values
            .insert("API_KEY".to_string(), "k".to_string());
        assert!(session.submit_registry().await);

        let created = session.store().created();
        assert_eq!(created[0].name, "weather");
        assert_eq!(
            created[0].origin,
            Some(ServerOrigin::registry(
                "io.github.acme/weather",
                Some("pypi:weather-mcp".to_string())
            ))
        );
        let mut env = EnvMap::new();
        env.insert("API_KEY".to_string(), "k".to_string());
        assert_eq!(
            created[0].config,
            AgentServerEntry::local(
                "uvx".to_string(),
                vec!["weather-mcp@0.3.1".to_string()],
                env
            )
        );
    }

    #[tokio::test]
    async fn test_clipboard_import_and_submit() {
        let mut session = WizardSession::new(MemoryStore::default());
        session.apply(|s| s.choose_type(ServerType::Clipboard));

        let pasted = r#"{"mcpServers":{"a":{"command":"npx"},"b":{"url":"https://x.dev/mcp"}}}"#;
        assert_eq!(session.import_clipboard(&pasted.to_string()), Ok(2));
        assert!(session.submit_clipboard().await);

        let names: Vec<_> = session
            .store()
            .created()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_clipboard_retry_skips_already_saved() {
        let mut session = WizardSession::new(MemoryStore {
            reject: Some("b"),
            ..Default::default()
        });
        session.apply(|s| s.choose_type(ServerType::Clipboard));

        let pasted = r#"{"a":{"command":"npx"},"b":{"command":"uvx"},"c":{"url":"https://c.dev/mcp"}}"#;
        assert_eq!(session.import_clipboard(&pasted.to_string()), Ok(3));
        assert!(!session.submit_clipboard().await);

        let pending: Vec<_> = session
            .state()
            .clipboard_servers
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(pending, vec!["b", "c"]);
        assert_eq!(session.state().step(), Step::ClipboardImport);
        assert!(!session.is_submitting());

        session.state_mut().clipboard_servers[0].name = "b2".to_string();
        assert!(session.submit_clipboard().await);

        let names: Vec<_> = session
            .store()
            .created()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["a", "b2", "c"]);
    }

    #[tokio::test]
    async fn test_clipboard_import_error_leaves_state() {
        let mut session = WizardSession::new(MemoryStore::default());
        session.apply(|s| s.choose_type(ServerType::Clipboard));

        assert_eq!(
            session.import_clipboard(&"not json".to_string()),
            Err(ImportError::NotJson)
        );
        assert!(session.state().clipboard_servers.is_empty());
        assert!(!session.submit_clipboard().await);
    }
}
