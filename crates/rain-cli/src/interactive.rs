//! Interactive add-server wizard.
//!
//! Drives a [`WizardSession`] with dialoguer prompts. Every step offers a way
//! back, which maps onto the session's go-back transition, so typed input
//! survives moving back and forth.

use std::io::{self, Write};

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input, Password, Select, theme::ColorfulTheme};
use tokio::runtime::Runtime;

use rain_core::import::ClipboardSource;
use rain_core::mcp::AgentServerEntry;
use rain_core::registry::{EnvironmentVariable, ServerSchema};
use rain_core::search::SchemaIndex;
use rain_core::store::ServerStore;
use rain_core::wizard::{ServerType, Step, WizardSession, WizardState};

const BACK: &str = "← Back";
const CANCEL: &str = "Cancel";

/// What the wizard loop does after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Saved,
    Cancelled,
}

/// Choice offered under a filled-in form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormAction {
    Save,
    Edit,
    Back,
    Cancel,
}

impl FormAction {
    const ALL: [FormAction; 4] = [
        FormAction::Save,
        FormAction::Edit,
        FormAction::Back,
        FormAction::Cancel,
    ];

    fn label(self) -> &'static str {
        match self {
            FormAction::Save => "Save",
            FormAction::Edit => "Edit again",
            FormAction::Back => BACK,
            FormAction::Cancel => CANCEL,
        }
    }
}

pub struct AddWizard<'rt, S, C, W: Write = io::Stdout> {
    session: WizardSession<S>,
    index: SchemaIndex,
    clipboard: C,
    runtime: &'rt Runtime,
    /// Output writer (for testing)
    writer: W,
    theme: ColorfulTheme,
}

impl<'rt, S: ServerStore, C: ClipboardSource> AddWizard<'rt, S, C, io::Stdout> {
    pub fn new(
        session: WizardSession<S>,
        index: SchemaIndex,
        clipboard: C,
        runtime: &'rt Runtime,
    ) -> Self {
        Self {
            session,
            index,
            clipboard,
            runtime,
            writer: io::stdout(),
            theme: ColorfulTheme::default(),
        }
    }
}

impl<'rt, S: ServerStore, C: ClipboardSource, W: Write> AddWizard<'rt, S, C, W> {
    #[cfg(test)]
    pub fn with_writer(
        session: WizardSession<S>,
        index: SchemaIndex,
        clipboard: C,
        runtime: &'rt Runtime,
        writer: W,
    ) -> Self {
        Self {
            session,
            index,
            clipboard,
            runtime,
            writer,
            theme: ColorfulTheme::default(),
        }
    }

    /// Run until a server is saved (`true`) or the user cancels (`false`).
    pub fn run(&mut self) -> Result<bool> {
        self.print_header()?;

        loop {
            let flow = match self.session.state().step() {
                Step::SelectType => self.select_type()?,
                Step::SelectSchema => self.select_schema()?,
                Step::SelectPackage => self.select_package()?,
                Step::Configure => self.configure()?,
                Step::CustomForm => self.custom_form()?,
                Step::RemoteForm => self.remote_form()?,
                Step::ClipboardImport => self.clipboard_import()?,
                Step::AiChat => self.ai_chat()?,
            };

            match flow {
                Flow::Continue => {}
                Flow::Saved => {
                    self.session.reset();
                    return Ok(true);
                }
                Flow::Cancelled => return Ok(false),
            }
        }
    }

    fn print_header(&mut self) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", style("  Add MCP Server").bold().cyan())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn back(&mut self) -> Flow {
        self.session.apply(WizardState::go_back);
        Flow::Continue
    }

    fn select_type(&mut self) -> Result<Flow> {
        let mut items: Vec<&str> = ServerType::ALL.iter().map(|t| t.label()).collect();
        items.push(CANCEL);

        let selection = Select::with_theme(&self.theme)
            .with_prompt("How do you want to add a server?")
            .items(&items)
            .default(0)
            .interact()?;

        Ok(match ServerType::ALL.get(selection) {
            Some(&server_type) => {
                self.session.apply(|s| s.choose_type(server_type));
                Flow::Continue
            }
            None => Flow::Cancelled,
        })
    }

    fn select_schema(&mut self) -> Result<Flow> {
        if self.index.catalog().is_empty() {
            writeln!(
                self.writer,
                "  {}",
                style("The registry catalog is empty.").yellow()
            )?;
            return Ok(self.back());
        }

        let query: String = Input::with_theme(&self.theme)
            .with_prompt("Search the registry (empty lists everything)")
            .with_initial_text(self.index.query())
            .allow_empty(true)
            .interact_text()?;
        self.index.set_query(query.trim());

        loop {
            let results = self.index.results();
            let shown = results.len();
            let has_more = self.index.has_more();
            if shown == 0 {
                writeln!(self.writer, "  No servers match '{}'.", query.trim())?;
            }

            let mut items: Vec<String> = results.iter().map(|s| schema_line(s)).collect();
            if has_more {
                items.push(format!(
                    "Load more ({} of {})",
                    shown,
                    self.index.total_matches()
                ));
            }
            items.push("Search again".to_string());
            items.push(BACK.to_string());

            let selection = Select::with_theme(&self.theme)
                .with_prompt("Select a server")
                .items(&items)
                .default(0)
                .max_length(15)
                .interact()?;

            if let Some(schema) = self.index.results().get(selection).map(|s| (*s).clone()) {
                self.session.apply(|s| s.choose_schema(schema));
                return Ok(Flow::Continue);
            }

            match (has_more, selection - shown) {
                (true, 0) => self.index.load_more(),
                (true, 1) | (false, 0) => return Ok(Flow::Continue),
                _ => return Ok(self.back()),
            }
        }
    }

    fn select_package(&mut self) -> Result<Flow> {
        let Some(schema) = self.session.state().schema() else {
            return Ok(self.back());
        };
        let mut items: Vec<String> = (0..schema.option_count())
            .filter_map(|i| schema.option(i).map(|option| option.label()))
            .collect();
        let count = items.len();
        items.push(BACK.to_string());

        let selection = Select::with_theme(&self.theme)
            .with_prompt("Choose how to run it")
            .items(&items)
            .default(self.session.state().package_index().min(count))
            .interact()?;

        if selection < count {
            self.session.apply(|s| s.choose_package(selection));
            Ok(Flow::Continue)
        } else {
            Ok(self.back())
        }
    }

    fn configure(&mut self) -> Result<Flow> {
        if let (Some(schema), Some(option)) = (
            self.session.state().schema(),
            self.session.state().active_option(),
        ) {
            writeln!(
                self.writer,
                "  {} {}",
                style(&schema.name).bold(),
                style(option.label()).dim()
            )?;
        }

        let variables = self.session.state().active_variables().to_vec();
        for variable in &variables {
            self.prompt_variable(variable)?;
        }
        self.prompt_name()?;

        let missing = self.session.state().missing_required().join(", ");
        if !missing.is_empty() {
            writeln!(
                self.writer,
                "  {} {}",
                style("Missing required values:").yellow(),
                missing
            )?;
        }

        self.finish_form()
    }

    fn prompt_variable(&mut self, variable: &EnvironmentVariable) -> Result<()> {
        let state = self.session.state_mut();

        if let Some(fixed) = &variable.value {
            state.env_values.insert(variable.name.clone(), fixed.clone());
            return Ok(());
        }

        let current = state.env_values.get(&variable.name).cloned().unwrap_or_default();
        let prompt = variable_prompt(variable);

        let value = if !variable.choices.is_empty() {
            let selection = Select::with_theme(&self.theme)
                .with_prompt(prompt)
                .items(&variable.choices)
                .default(
                    variable
                        .choices
                        .iter()
                        .position(|c| *c == current)
                        .unwrap_or(0),
                )
                .interact()?;
            variable.choices[selection].clone()
        } else if variable.is_secret {
            let entered = Password::with_theme(&self.theme)
                .with_prompt(prompt)
                .allow_empty_password(true)
                .interact()?;
            if entered.is_empty() { current } else { entered }
        } else {
            Input::<String>::with_theme(&self.theme)
                .with_prompt(prompt)
                .with_initial_text(current)
                .allow_empty(!variable.is_required)
                .interact_text()?
        };

        let state = self.session.state_mut();
        if value.trim().is_empty() {
            state.env_values.shift_remove(&variable.name);
        } else {
            state.env_values.insert(variable.name.clone(), value);
        }
        Ok(())
    }

    fn prompt_name(&mut self) -> Result<()> {
        let state = self.session.state();
        let initial = if state.server_name.trim().is_empty() {
            state.suggested_name().unwrap_or_default()
        } else {
            state.server_name.clone()
        };

        let name: String = Input::with_theme(&self.theme)
            .with_prompt("Server name")
            .with_initial_text(initial)
            .interact_text()?;
        self.session.state_mut().server_name = name.trim().to_string();
        Ok(())
    }

    fn custom_form(&mut self) -> Result<Flow> {
        let state = self.session.state();
        let (command, args) = (state.custom_command.clone(), state.custom_args.clone());

        let command: String = Input::with_theme(&self.theme)
            .with_prompt("Command")
            .with_initial_text(command)
            .interact_text()?;
        let args: String = Input::with_theme(&self.theme)
            .with_prompt("Arguments")
            .with_initial_text(args)
            .allow_empty(true)
            .interact_text()?;
        let env = self.prompt_lines(
            &self.session.state().custom_env.clone(),
            "Environment variable (KEY=VALUE, empty to finish)",
        )?;

        let state = self.session.state_mut();
        state.custom_command = command;
        state.custom_args = args;
        state.custom_env = env;
        self.prompt_name()?;

        self.finish_form()
    }

    fn remote_form(&mut self) -> Result<Flow> {
        let url: String = Input::with_theme(&self.theme)
            .with_prompt("Server URL")
            .with_initial_text(self.session.state().remote_url.clone())
            .interact_text()?;
        let headers = self.prompt_lines(
            &self.session.state().remote_headers.clone(),
            "Header (Name: value, empty to finish)",
        )?;

        let state = self.session.state_mut();
        state.remote_url = url;
        state.remote_headers = headers;
        self.prompt_name()?;

        self.finish_form()
    }

    /// Collect one line per prompt until an empty answer.
    fn prompt_lines(&self, existing: &str, prompt: &str) -> Result<String> {
        let mut lines: Vec<String> = existing
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect();

        if !lines.is_empty()
            && !Confirm::with_theme(&self.theme)
                .with_prompt(format!("Keep {} existing entries?", lines.len()))
                .default(true)
                .interact()?
        {
            lines.clear();
        }

        loop {
            let line: String = Input::with_theme(&self.theme)
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()?;
            if line.trim().is_empty() {
                break;
            }
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }

    /// Summary plus save/edit/back/cancel; saving submits for the current step.
    fn finish_form(&mut self) -> Result<Flow> {
        print_summary(&mut self.writer, self.session.state())?;

        let items: Vec<&str> = FormAction::ALL.iter().map(|a| a.label()).collect();
        let selection = Select::with_theme(&self.theme)
            .with_prompt("What next?")
            .items(&items)
            .default(0)
            .interact()?;

        match FormAction::ALL[selection] {
            FormAction::Save => self.submit(),
            FormAction::Edit => Ok(Flow::Continue),
            FormAction::Back => Ok(self.back()),
            FormAction::Cancel => Ok(Flow::Cancelled),
        }
    }

    fn submit(&mut self) -> Result<Flow> {
        let runtime = self.runtime;
        let session = &mut self.session;
        let saved = match session.state().step() {
            Step::Configure => runtime.block_on(session.submit_registry()),
            Step::CustomForm => runtime.block_on(session.submit_custom()),
            Step::RemoteForm => runtime.block_on(session.submit_remote()),
            Step::ClipboardImport => runtime.block_on(session.submit_clipboard()),
            _ => false,
        };

        if saved {
            writeln!(self.writer, "{} Saved", style("✓").green())?;
            Ok(Flow::Saved)
        } else {
            writeln!(
                self.writer,
                "{} Could not save. Check the name and required fields, then try again.",
                style("✗").red()
            )?;
            Ok(Flow::Continue)
        }
    }

    fn clipboard_import(&mut self) -> Result<Flow> {
        if self.session.state().clipboard_servers.is_empty() {
            writeln!(self.writer, "  Reading clipboard...")?;
            if let Err(e) = self.session.import_clipboard(&self.clipboard) {
                writeln!(self.writer, "  {} {}", style("✗").red(), e)?;
                if let Some(hint) = e.hint() {
                    writeln!(self.writer, "  {}", style(hint).dim())?;
                }

                let items = ["Read clipboard again", BACK, CANCEL];
                let selection = Select::with_theme(&self.theme)
                    .with_prompt("Copy a configuration, then")
                    .items(&items)
                    .default(0)
                    .interact()?;
                return Ok(match selection {
                    0 => Flow::Continue,
                    1 => self.back(),
                    _ => Flow::Cancelled,
                });
            }
        }

        print_summary(&mut self.writer, self.session.state())?;

        let items = ["Save all", "Rename a server", "Read clipboard again", BACK, CANCEL];
        let selection = Select::with_theme(&self.theme)
            .with_prompt("What next?")
            .items(&items)
            .default(0)
            .interact()?;

        match selection {
            0 => self.submit(),
            1 => {
                self.rename_clipboard_server()?;
                Ok(Flow::Continue)
            }
            2 => {
                self.session.state_mut().clipboard_servers.clear();
                Ok(Flow::Continue)
            }
            3 => Ok(self.back()),
            _ => Ok(Flow::Cancelled),
        }
    }

    fn rename_clipboard_server(&mut self) -> Result<()> {
        let names: Vec<String> = self
            .session
            .state()
            .clipboard_servers
            .iter()
            .map(|s| s.name.clone())
            .collect();

        let selection = Select::with_theme(&self.theme)
            .with_prompt("Rename which server?")
            .items(&names)
            .default(0)
            .interact()?;
        let name: String = Input::with_theme(&self.theme)
            .with_prompt("New name")
            .with_initial_text(names[selection].clone())
            .interact_text()?;

        if let Some(server) = self
            .session
            .state_mut()
            .clipboard_servers
            .get_mut(selection)
        {
            server.name = name.trim().to_string();
        }
        Ok(())
    }

    fn ai_chat(&mut self) -> Result<Flow> {
        writeln!(
            self.writer,
            "  {}",
            style("Assistant-guided setup is not available in the terminal.").yellow()
        )?;
        Ok(self.back())
    }
}

fn schema_line(schema: &ServerSchema) -> String {
    let title = schema.title.as_deref().unwrap_or(&schema.name);
    match schema.description.as_deref() {
        Some(description) => format!("{} - {}", title, description),
        None => title.to_string(),
    }
}

fn variable_prompt(variable: &EnvironmentVariable) -> String {
    let mut prompt = variable.name.clone();
    if let Some(description) = &variable.description {
        prompt.push_str(&format!(" ({})", description));
    }
    if variable.is_required {
        prompt.push_str(" *");
    }
    prompt
}

/// Print what would be saved from the current step
fn print_summary<W: Write>(writer: &mut W, state: &WizardState) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", style("  Summary").bold())?;
    writeln!(writer, "  ───────────────────────────")?;

    if state.step() == Step::ClipboardImport {
        for server in &state.clipboard_servers {
            writeln!(
                writer,
                "  {:<20} {}",
                style(&server.name).green(),
                server.config.summary()
            )?;
        }
        writeln!(writer)?;
        return Ok(());
    }

    writeln!(writer, "  Name:     {}", style(&state.server_name).green())?;
    match state.draft_entry() {
        Some(AgentServerEntry::Local(local)) => {
            writeln!(writer, "  Command:  {}", style(&local.command).green())?;
            if let Some(args) = &local.args {
                writeln!(writer, "  Args:     {}", style(args.join(" ")).green())?;
            }
            if let Some(env) = &local.env {
                let keys: Vec<&str> = env.keys().map(String::as_str).collect();
                writeln!(writer, "  Env:      {}", style(keys.join(", ")).green())?;
            }
        }
        Some(AgentServerEntry::Remote(remote)) => {
            writeln!(writer, "  URL:      {}", style(&remote.url).green())?;
            if let Some(headers) = &remote.headers {
                let keys: Vec<&str> = headers.keys().map(String::as_str).collect();
                writeln!(writer, "  Headers:  {}", style(keys.join(", ")).green())?;
            }
        }
        None => writeln!(writer, "  {}", style("Incomplete").yellow())?,
    }
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rain_core::mcp::{EnvMap, ParsedServer};
    use rain_core::search::SearchOptions;
    use rain_core::store::{JsonServerStore, StoreError};

    fn variable(name: &str) -> EnvironmentVariable {
        EnvironmentVariable {
            name: name.to_string(),
            description: None,
            is_required: false,
            is_secret: false,
            default: None,
            placeholder: None,
            value: None,
            format: None,
            choices: Vec::new(),
        }
    }

    fn summary(state: &WizardState) -> String {
        let mut output = Vec::new();
        print_summary(&mut output, state).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_variable_prompt_marks_required() {
        let mut var = variable("API_KEY");
        assert_eq!(variable_prompt(&var), "API_KEY");

        var.description = Some("Personal access token".to_string());
        var.is_required = true;
        assert_eq!(variable_prompt(&var), "API_KEY (Personal access token) *");
    }

    #[test]
    fn test_schema_line_prefers_title() {
        let schema: ServerSchema = serde_json::from_str(
            r#"{"name": "io.github.acme/weather", "title": "Weather", "description": "Forecasts"}"#,
        )
        .unwrap();
        assert_eq!(schema_line(&schema), "Weather - Forecasts");
    }

    #[test]
    fn test_summary_for_custom_form() {
        let mut state = WizardState::new().choose_type(ServerType::Custom);
        state.server_name = "github".to_string();
        state.custom_command = "npx".to_string();
        state.custom_args = "-y @modelcontextprotocol/server-github".to_string();
        state.custom_env = "GITHUB_TOKEN=abc".to_string();

        let output = summary(&state);
        assert!(output.contains("Summary"));
        assert!(output.contains("github"));
        assert!(output.contains("-y @modelcontextprotocol/server-github"));
        assert!(output.contains("GITHUB_TOKEN"));
        // Values stay out of the summary
        assert!(!output.contains("abc"));
    }

    #[test]
    fn test_summary_for_incomplete_remote() {
        let state = WizardState::new().choose_type(ServerType::Remote);
        assert!(summary(&state).contains("Incomplete"));
    }

    #[test]
    fn test_summary_lists_clipboard_servers() {
        let state = WizardState::new()
            .choose_type(ServerType::Clipboard)
            .with_clipboard_servers(vec![ParsedServer {
                name: "weather".to_string(),
                config: AgentServerEntry::remote(
                    "https://w.example.dev/mcp".to_string(),
                    EnvMap::new(),
                ),
                description: None,
            }]);

        let output = summary(&state);
        assert!(output.contains("weather"));
        assert!(output.contains("https://w.example.dev/mcp"));
    }

    #[test]
    fn test_submit_saves_and_reports() {
        let temp = tempfile::TempDir::new().unwrap();
        let runtime = Runtime::new().unwrap();
        let mut session = WizardSession::new(JsonServerStore::new(temp.path().join("servers.json")));
        session.apply(|s| s.choose_type(ServerType::Remote));
        session.state_mut().remote_url = "https://mcp.example.dev/sse".to_string();
        session.state_mut().server_name = "example".to_string();

        let mut output = Vec::new();
        let mut wizard = AddWizard::with_writer(
            session,
            SchemaIndex::new(Vec::new(), SearchOptions::default()),
            String::new(),
            &runtime,
            &mut output,
        );

        assert_eq!(wizard.submit().unwrap(), Flow::Saved);
        let saved: Result<_, StoreError> = runtime.block_on(wizard.session.store().list());
        assert_eq!(saved.unwrap().len(), 1);
        drop(wizard);
        assert!(String::from_utf8(output).unwrap().contains("Saved"));
    }

    #[test]
    fn test_submit_failure_keeps_step() {
        let temp = tempfile::TempDir::new().unwrap();
        let runtime = Runtime::new().unwrap();
        let mut session = WizardSession::new(JsonServerStore::new(temp.path().join("servers.json")));
        session.apply(|s| s.choose_type(ServerType::Custom));

        let mut output = Vec::new();
        let mut wizard = AddWizard::with_writer(
            session,
            SchemaIndex::new(Vec::new(), SearchOptions::default()),
            String::new(),
            &runtime,
            &mut output,
        );

        assert_eq!(wizard.submit().unwrap(), Flow::Continue);
        assert_eq!(wizard.session.state().step(), Step::CustomForm);
    }
}
