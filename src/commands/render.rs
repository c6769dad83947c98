//! Help page rendering.

use super::types::AppInfo;

/// Render the usage page for the given metadata and `(key, help)` listing.
///
/// Keys are expected in display order; `Registry::list` already sorts them.
pub fn render_help(info: &AppInfo, commands: &[(&str, &str)]) -> String {
    let mut lines: Vec<String> = Vec::new();

    match (&info.name, &info.version) {
        (Some(name), Some(version)) => lines.push(format!("{name} {version}")),
        (Some(name), None) => lines.push(name.clone()),
        (None, Some(version)) => lines.push(format!("version {version}")),
        (None, None) => {}
    }
    if let Some(banner) = &info.banner {
        lines.push(banner.clone());
    }
    if commands.is_empty() {
        return lines.join("\n");
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }

    lines.push("  Usage:".to_string());
    lines.push("    [command] [arguments]".to_string());
    lines.push(String::new());
    lines.push("  Available commands:".to_string());

    let width = commands
        .iter()
        .map(|(key, _)| key.chars().count())
        .max()
        .unwrap_or(0);
    for (key, help) in commands {
        let pad = width + 1 - key.chars().count();
        lines.push(format!("    {key}{}{help}", " ".repeat(pad)));
    }

    lines.join("\n")
}
