//! Wizard steps and the transitions between them.
//!
//! Transitions consume the state and return the next one. A transition that
//! does not apply to the current step returns the state unchanged.

use crate::mcp::{AgentServerEntry, EnvMap, ParsedServer, option_to_entry};
use crate::naming::{schema_display_name, suggest_server_name};
use crate::registry::{EnvironmentVariable, SchemaOption, ServerSchema};

use super::form::{parse_env_lines, parse_header_lines, split_args};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    SelectType,
    SelectSchema,
    SelectPackage,
    Configure,
    CustomForm,
    RemoteForm,
    ClipboardImport,
    AiChat,
}

impl Step {
    /// Steps that only submission leaves going forward
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Step::Configure
                | Step::CustomForm
                | Step::RemoteForm
                | Step::ClipboardImport
                | Step::AiChat
        )
    }
}

/// How the user wants to add a server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerType {
    Registry,
    Custom,
    Remote,
    Clipboard,
    Ai,
}

impl ServerType {
    pub const ALL: [ServerType; 5] = [
        ServerType::Registry,
        ServerType::Custom,
        ServerType::Remote,
        ServerType::Clipboard,
        ServerType::Ai,
    ];

    fn entry_step(self) -> Step {
        match self {
            ServerType::Registry => Step::SelectSchema,
            ServerType::Custom => Step::CustomForm,
            ServerType::Remote => Step::RemoteForm,
            ServerType::Clipboard => Step::ClipboardImport,
            ServerType::Ai => Step::AiChat,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ServerType::Registry => "Browse the MCP registry",
            ServerType::Custom => "Custom local command",
            ServerType::Remote => "Remote server URL",
            ServerType::Clipboard => "Import from clipboard",
            ServerType::Ai => "Describe it to the assistant",
        }
    }
}

/// Everything one wizard run has selected or typed so far
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardState {
    step: Step,
    history: Vec<Step>,
    selected_type: Option<ServerType>,
    schema: Option<ServerSchema>,
    package_index: usize,

    pub server_name: String,
    pub custom_command: String,
    pub custom_args: String,
    pub custom_env: String,
    pub remote_url: String,
    pub remote_headers: String,

    /// Values for the active option's variables, keyed by variable name
    pub env_values: EnvMap,

    pub clipboard_servers: Vec<ParsedServer>,
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn history(&self) -> &[Step] {
        &self.history
    }

    pub fn selected_type(&self) -> Option<ServerType> {
        self.selected_type
    }

    pub fn schema(&self) -> Option<&ServerSchema> {
        self.schema.as_ref()
    }

    pub fn package_index(&self) -> usize {
        self.package_index
    }

    pub fn choose_type(mut self, server_type: ServerType) -> Self {
        if self.step != Step::SelectType {
            tracing::warn!("Ignoring type selection on step {:?}", self.step);
            return self;
        }
        self.selected_type = Some(server_type);
        self.advance(server_type.entry_step())
    }

    /// Pick a registry schema. Schemas offering a single option skip the
    /// package step.
    pub fn choose_schema(mut self, schema: ServerSchema) -> Self {
        if self.step != Step::SelectSchema {
            tracing::warn!("Ignoring schema selection on step {:?}", self.step);
            return self;
        }
        self.server_name = schema_display_name(&schema);
        self.package_index = 0;
        let option_count = schema.option_count();
        self.schema = Some(schema);

        if option_count > 1 {
            self.advance(Step::SelectPackage)
        } else {
            self.reset_env_values();
            self.advance(Step::Configure)
        }
    }

    /// Pick a package or remote by combined index (packages first).
    pub fn choose_package(mut self, index: usize) -> Self {
        if self.step != Step::SelectPackage {
            tracing::warn!("Ignoring package selection on step {:?}", self.step);
            return self;
        }
        let count = self.schema.as_ref().map_or(0, ServerSchema::option_count);
        if index >= count {
            tracing::warn!("Package index {} out of range ({} options)", index, count);
            return self;
        }
        self.package_index = index;
        self.reset_env_values();
        self.advance(Step::Configure)
    }

    /// Return to the previous step. Form data is kept; landing on the type
    /// step clears the type.
    pub fn go_back(mut self) -> Self {
        self.step = self.history.pop().unwrap_or(Step::SelectType);
        if self.step == Step::SelectType {
            self.selected_type = None;
        }
        self
    }

    pub fn reset(self) -> Self {
        Self::default()
    }

    /// Store servers recognized on the clipboard.
    pub fn with_clipboard_servers(mut self, servers: Vec<ParsedServer>) -> Self {
        if self.step != Step::ClipboardImport {
            tracing::warn!("Ignoring clipboard servers on step {:?}", self.step);
            return self;
        }
        self.clipboard_servers = servers;
        self
    }

    fn advance(mut self, to: Step) -> Self {
        self.history.push(self.step);
        self.step = to;
        self
    }

    fn reset_env_values(&mut self) {
        let defaults = self
            .active_variables()
            .iter()
            .filter_map(|var| Some((var.name.clone(), var.default.clone()?)))
            .collect();
        self.env_values = defaults;
    }

    /// The package or remote currently selected in the schema
    pub fn active_option(&self) -> Option<SchemaOption<'_>> {
        self.schema.as_ref()?.option(self.package_index)
    }

    pub fn active_variables(&self) -> &[EnvironmentVariable] {
        self.active_option()
            .map(|option| option.variables())
            .unwrap_or_default()
    }

    pub fn required_variables(&self) -> impl Iterator<Item = &EnvironmentVariable> {
        self.active_variables().iter().filter(|var| var.is_required)
    }

    /// Required variables with no value entered yet
    pub fn missing_required(&self) -> Vec<&str> {
        self.required_variables()
            .filter(|var| {
                self.env_values
                    .get(&var.name)
                    .is_none_or(|value| value.trim().is_empty())
            })
            .map(|var| var.name.as_str())
            .collect()
    }

    /// The entry the current step would submit, if its inputs are sufficient
    pub fn draft_entry(&self) -> Option<AgentServerEntry> {
        match self.step {
            Step::Configure => Some(option_to_entry(self.active_option()?, &self.env_values)),
            Step::CustomForm => {
                let command = self.custom_command.trim();
                if command.is_empty() {
                    return None;
                }
                Some(AgentServerEntry::local(
                    command.to_string(),
                    split_args(&self.custom_args),
                    parse_env_lines(&self.custom_env),
                ))
            }
            Step::RemoteForm => {
                let url = self.remote_url.trim();
                if url.is_empty() {
                    return None;
                }
                Some(AgentServerEntry::remote(
                    url.to_string(),
                    parse_header_lines(&self.remote_headers),
                ))
            }
            _ => None,
        }
    }

    /// Default name for the custom and remote forms
    pub fn suggested_name(&self) -> Option<String> {
        match self.step {
            Step::CustomForm | Step::RemoteForm => {
                self.draft_entry().map(|entry| suggest_server_name(&entry))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{LocalTransport, Package, RemoteTransport};

    fn var(name: &str, default: Option<&str>, required: bool) -> EnvironmentVariable {
        EnvironmentVariable {
            name: name.to_string(),
            description: None,
            is_required: required,
            is_secret: false,
            default: default.map(str::to_string),
            placeholder: None,
            value: None,
            format: None,
            choices: Vec::new(),
        }
    }

    fn package(identifier: &str, env: Vec<EnvironmentVariable>) -> Package {
        Package {
            registry_type: "npm".to_string(),
            identifier: identifier.to_string(),
            version: None,
            runtime_hint: None,
            transport: LocalTransport::Stdio,
            package_arguments: Vec::new(),
            environment_variables: env,
        }
    }

    fn schema(packages: Vec<Package>, remotes: Vec<RemoteTransport>) -> ServerSchema {
        ServerSchema {
            name: "io.github.acme/weather".to_string(),
            title: Some("Weather Tools".to_string()),
            description: None,
            version: "1.0.0".to_string(),
            repository: None,
            website_url: None,
            packages,
            remotes,
        }
    }

    fn two_option_schema() -> ServerSchema {
        schema(
            vec![
                package("@acme/weather", vec![var("REGION", Some("eu"), false)]),
                package("@acme/weather-lite", vec![var("API_KEY", None, true)]),
            ],
            Vec::new(),
        )
    }

    #[test]
    fn test_choose_type_routes_to_entry_step() {
        for (server_type, step) in [
            (ServerType::Registry, Step::SelectSchema),
            (ServerType::Custom, Step::CustomForm),
            (ServerType::Remote, Step::RemoteForm),
            (ServerType::Clipboard, Step::ClipboardImport),
            (ServerType::Ai, Step::AiChat),
        ] {
            let state = WizardState::new().choose_type(server_type);
            assert_eq!(state.step(), step);
            assert_eq!(state.history(), &[Step::SelectType]);
            assert_eq!(state.selected_type(), Some(server_type));
        }
    }

    #[test]
    fn test_custom_then_back_clears_type() {
        let state = WizardState::new().choose_type(ServerType::Custom).go_back();
        assert_eq!(state.step(), Step::SelectType);
        assert_eq!(state.selected_type(), None);
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_back_with_empty_history_lands_on_type_step() {
        let state = WizardState::new().go_back();
        assert_eq!(state, WizardState::new());
    }

    #[test]
    fn test_pops_restore_steps_in_reverse() {
        let state = WizardState::new()
            .choose_type(ServerType::Registry)
            .choose_schema(two_option_schema())
            .choose_package(1);
        assert_eq!(state.step(), Step::Configure);
        assert_eq!(
            state.history(),
            &[Step::SelectType, Step::SelectSchema, Step::SelectPackage]
        );

        let state = state.go_back();
        assert_eq!(state.step(), Step::SelectPackage);
        let state = state.go_back();
        assert_eq!(state.step(), Step::SelectSchema);
        assert_eq!(state.selected_type(), Some(ServerType::Registry));

        let state = state.go_back();
        assert_eq!(state.step(), Step::SelectType);
        assert_eq!(state.selected_type(), None);
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_back_keeps_form_data() {
        let mut state = WizardState::new().choose_type(ServerType::Custom);
        state.custom_command = "uvx".to_string();
        state.server_name = "mine".to_string();

        let state = state.go_back().choose_type(ServerType::Custom);
        assert_eq!(state.custom_command, "uvx");
        assert_eq!(state.server_name, "mine");
    }

    #[test]
    fn test_single_option_schema_skips_package_step() {
        let state = WizardState::new()
            .choose_type(ServerType::Registry)
            .choose_schema(schema(
                vec![package("@acme/weather", vec![var("REGION", Some("eu"), false)])],
                Vec::new(),
            ));

        assert_eq!(state.step(), Step::Configure);
        assert_eq!(state.history(), &[Step::SelectType, Step::SelectSchema]);
        assert_eq!(state.server_name, "weather-tools");
        assert_eq!(state.env_values.get("REGION").map(String::as_str), Some("eu"));
    }

    #[test]
    fn test_switching_package_replaces_env_values() {
        let mut state = WizardState::new()
            .choose_type(ServerType::Registry)
            .choose_schema(two_option_schema())
            .choose_package(0);
        state.env_values.insert("EXTRA".to_string(), "typed".to_string());

        let state = state.go_back().choose_package(1);
        assert_eq!(state.package_index(), 1);
        assert!(state.env_values.is_empty());
        assert_eq!(state.missing_required(), vec!["API_KEY"]);
    }

    #[test]
    fn test_remote_option_uses_header_defaults() {
        let remote = RemoteTransport::StreamableHttp {
            url: "https://weather.acme.dev/mcp".to_string(),
            headers: vec![var("X-Region", Some("us"), false)],
        };
        let state = WizardState::new()
            .choose_type(ServerType::Registry)
            .choose_schema(schema(vec![package("@acme/weather", Vec::new())], vec![remote]))
            .choose_package(1);

        assert!(matches!(state.active_option(), Some(SchemaOption::Remote(_))));
        assert_eq!(state.env_values.get("X-Region").map(String::as_str), Some("us"));
        let entry = state.draft_entry().unwrap();
        assert!(entry.is_remote());
    }

    #[test]
    fn test_out_of_place_transitions_are_ignored() {
        let start = WizardState::new();
        assert_eq!(start.clone().choose_package(0), start);
        assert_eq!(start.clone().choose_schema(two_option_schema()), start);

        let on_form = WizardState::new().choose_type(ServerType::Remote);
        assert_eq!(on_form.clone().choose_type(ServerType::Custom), on_form);

        let picking = WizardState::new()
            .choose_type(ServerType::Registry)
            .choose_schema(two_option_schema());
        assert_eq!(picking.clone().choose_package(2), picking);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut state = WizardState::new()
            .choose_type(ServerType::Registry)
            .choose_schema(two_option_schema());
        state.custom_env = "A=1".to_string();

        assert_eq!(state.reset(), WizardState::default());
    }

    #[test]
    fn test_custom_form_draft_and_name() {
        let mut state = WizardState::new().choose_type(ServerType::Custom);
        assert!(state.draft_entry().is_none());

        state.custom_command = " npx ".to_string();
        state.custom_args = "-y @modelcontextprotocol/server-github".to_string();
        state.custom_env = "GITHUB_TOKEN=abc".to_string();

        let entry = state.draft_entry().unwrap();
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            serde_json::json!({
                "type": "local",
                "command": "npx",
                "args": ["-y", "@modelcontextprotocol/server-github"],
                "env": {"GITHUB_TOKEN": "abc"}
            })
        );
        assert_eq!(state.suggested_name().as_deref(), Some("server-github"));
    }

    #[test]
    fn test_clipboard_servers_only_on_import_step() {
        let servers = vec![ParsedServer {
            name: "x".to_string(),
            config: AgentServerEntry::local("x".to_string(), Vec::new(), EnvMap::new()),
            description: None,
        }];

        let idle = WizardState::new().with_clipboard_servers(servers.clone());
        assert!(idle.clipboard_servers.is_empty());

        let importing = WizardState::new()
            .choose_type(ServerType::Clipboard)
            .with_clipboard_servers(servers);
        assert_eq!(importing.clipboard_servers.len(), 1);
    }
}
