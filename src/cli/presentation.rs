//! Presentation: text rendering for CLI results.

use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;

/// One row of the built-in rule listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleListEntry {
    pub kind: &'static str,
    pub name: String,
    pub parameters: usize,
}

pub fn format_rule_list_text(entries: &[RuleListEntry]) -> String {
    if entries.is_empty() {
        return "No built-in rules.\n".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Kind", "Rule", "Parameters"]);
    for row in entries {
        table.add_row(vec![
            row.kind.to_string(),
            row.name.clone(),
            row.parameters.to_string(),
        ]);
    }
    format!("{}\n\nTotal: {} rule(s)", table, entries.len())
}

pub fn format_json(value: &serde_json::Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}
