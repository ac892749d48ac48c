//! # Status Formatting
//!
//! Builds the short status name and the human-readable description shown
//! next to a commit on the provider.

use crate::event::Event;

/// Short name and description for a commit status
///
/// The name is `<kind>/<name>` of the involved object, lowercased, so that
/// statuses for the same object replace each other. The description is the
/// event reason split into words, followed by the object reference and the
/// event message when one is present.
#[must_use]
pub fn format_name_and_description(event: &Event) -> (String, String) {
    let object = &event.involved_object;
    let name = format!("{}/{}", object.kind, object.name).to_lowercase();

    let reference = match object.namespace.as_deref() {
        Some(namespace) if !namespace.is_empty() => format!("{namespace}/{name}"),
        _ => name.clone(),
    };

    let mut description = format!(
        "{} ({reference})",
        split_camel_case(&event.reason).join(" ").to_lowercase()
    );
    let message = event.message.trim();
    if !message.is_empty() {
        description.push_str(": ");
        description.push_str(message);
    }

    (name, description)
}

/// Split `HealthCheckFailed` into `["Health", "Check", "Failed"]`
///
/// Runs of capitals stay together (`HTTPError` gives `["HTTP", "Error"]`).
fn split_camel_case(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if !prev.is_uppercase() || next_is_lower {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ObjectReference, Severity};
    use std::collections::BTreeMap;

    fn event(reason: &str, message: &str, namespace: Option<&str>) -> Event {
        Event {
            involved_object: ObjectReference {
                kind: "Kustomization".to_string(),
                name: "webapp".to_string(),
                namespace: namespace.map(str::to_string),
            },
            severity: Severity::Info,
            timestamp: None,
            message: message.to_string(),
            reason: reason.to_string(),
            metadata: BTreeMap::new(),
            reporting_controller: None,
            reporting_instance: None,
        }
    }

    #[test]
    fn test_split_camel_case() {
        assert_eq!(split_camel_case("HealthCheckFailed"), ["Health", "Check", "Failed"]);
        assert_eq!(split_camel_case("HTTPError"), ["HTTP", "Error"]);
        assert_eq!(split_camel_case("Succeeded"), ["Succeeded"]);
        assert!(split_camel_case("").is_empty());
    }

    #[test]
    fn test_name_and_description_with_message() {
        let (name, description) =
            format_name_and_description(&event("ReconciliationSucceeded", "Applied revision main/abc", Some("apps")));
        assert_eq!(name, "kustomization/webapp");
        assert_eq!(
            description,
            "reconciliation succeeded (apps/kustomization/webapp): Applied revision main/abc"
        );
    }

    #[test]
    fn test_description_without_message_or_namespace() {
        let (_, description) = format_name_and_description(&event("HealthCheckFailed", "  ", None));
        assert_eq!(description, "health check failed (kustomization/webapp)");
    }
}
