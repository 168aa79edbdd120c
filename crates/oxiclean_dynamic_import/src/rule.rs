//! Metadata of the `no-top-level-external-import` rule.

pub const RULE_NAME: &str = "no-top-level-external-import";
pub const RULE_TYPE: &str = "problem";
pub const DESCRIPTION: &str = "Enforce usage of dynamic imports for external modules";

pub const MESSAGE_ID: &str = "ENFORCE_DYNAMIC_IMPORT";
pub const MESSAGE_TEMPLATE: &str = "External dependency should be dynamic: {{dependency}}";

/// Substitutes `{{key}}` placeholders in `template`. Unknown placeholders are kept as-is.
pub fn render_message(template: &str, data: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };
        let key = after[..close].trim();
        match data.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    out
}

pub fn enforce_dynamic_import_message(dependency: &str) -> String {
    render_message(MESSAGE_TEMPLATE, &[("dependency", dependency)])
}
