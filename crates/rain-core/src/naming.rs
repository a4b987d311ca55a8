//! Default display names for servers that arrive without one.
//!
//! Suggestions are hints only; two imports may well suggest the same name and
//! it is up to the caller to resolve collisions.

use url::{Host, Url};

use crate::mcp::{AgentServerEntry, LocalServerEntry, RemoteServerEntry};
use crate::registry::ServerSchema;

/// Suggest a name for an entry. Never fails.
pub fn suggest_server_name(entry: &AgentServerEntry) -> String {
    match entry {
        AgentServerEntry::Remote(remote) => suggest_remote_name(remote),
        AgentServerEntry::Local(local) => suggest_local_name(local),
    }
}

fn suggest_remote_name(remote: &RemoteServerEntry) -> String {
    let Ok(url) = Url::parse(&remote.url) else {
        return "remote-server".to_string();
    };
    let Some(host) = url.host() else {
        return "remote-server".to_string();
    };

    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    if is_loopback(&host) {
        return match segments.last() {
            Some(last) => last.to_string(),
            None => match url.port_or_known_default() {
                Some(port) => format!("local-{port}"),
                None => "local-server".to_string(),
            },
        };
    }

    let host = host.to_string();
    let trimmed = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("api."))
        .unwrap_or(&host);
    let label = trimmed.split('.').next().unwrap_or(trimmed);

    match segments.first() {
        Some(first) => format!("{label}-{first}"),
        None => format!("{label}-mcp"),
    }
}

fn is_loopback(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(domain) => domain.eq_ignore_ascii_case("localhost"),
        Host::Ipv4(addr) => addr.is_loopback(),
        Host::Ipv6(addr) => addr.is_loopback(),
    }
}

fn suggest_local_name(local: &LocalServerEntry) -> String {
    for arg in local.args.iter().flatten() {
        if let Some(name) = scoped_package_name(arg) {
            return name.to_string();
        }
        if is_bare_word(arg) {
            return arg.clone();
        }
    }

    let file_name = local
        .command
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(&local.command);
    let stem = strip_extension(file_name);
    if stem.is_empty() {
        "local-server".to_string()
    } else {
        stem.to_string()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn is_bare_word(token: &str) -> bool {
    !token.is_empty() && !token.starts_with('-') && token.chars().all(is_word_char)
}

/// `@scope/name` anywhere in the token; returns `name`.
fn scoped_package_name(token: &str) -> Option<&str> {
    for (at, _) in token.match_indices('@') {
        let rest = &token[at + 1..];
        let scope_len = rest.find(|c: char| !is_word_char(c)).unwrap_or(rest.len());
        if scope_len == 0 || !rest[scope_len..].starts_with('/') {
            continue;
        }
        let name_part = &rest[scope_len + 1..];
        let name_len = name_part
            .find(|c: char| !is_word_char(c))
            .unwrap_or(name_part.len());
        if name_len > 0 {
            return Some(&name_part[..name_len]);
        }
    }
    None
}

/// Drop a trailing `.ext` made of word characters.
fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(dot)
            if dot + 1 < file_name.len()
                && file_name[dot + 1..]
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_') =>
        {
            &file_name[..dot]
        }
        _ => file_name,
    }
}

/// Name prefilled when a registry schema is picked.
///
/// The title in kebab-case, or the last segment of the reverse-DNS name.
pub fn schema_display_name(schema: &ServerSchema) -> String {
    if let Some(title) = schema.title.as_deref().filter(|t| !t.trim().is_empty()) {
        return kebab_case(title);
    }
    match schema.name.rfind('/') {
        Some(slash) => schema.name[slash + 1..].to_string(),
        None => schema.name.clone(),
    }
}

fn kebab_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }
    out
}
