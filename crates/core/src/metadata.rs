//! Routing metadata extraction from webhook payloads.
//!
//! Payloads are treated as loosely-structured JSON trees. Every lookup is
//! defensive: a missing or wrongly-typed field yields `None`, never an error.

use serde::Serialize;
use serde_json::Value;

/// Owner `type` value that marks a repository owner as an organization.
const ORGANIZATION_OWNER_TYPE: &str = "Organization";

/// Routing attributes derived from a payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventMetadata {
    pub org_name: Option<String>,
    pub repo_name: Option<String>,
}

/// Derive the organization and repository names from a payload.
///
/// - `repository.full_name` (or `repository.name` when absent) becomes the
///   repository name.
/// - `repository.owner.login` becomes the organization when the owner's
///   `type` is `"Organization"`.
/// - A top-level `organization.login` overrides the organization.
pub fn extract(payload: &Value) -> EventMetadata {
    let mut org_name = None;
    let mut repo_name = None;

    if let Some(repository) = payload.get("repository").filter(|r| r.is_object()) {
        repo_name = non_empty_str(repository.get("full_name"))
            .or_else(|| non_empty_str(repository.get("name")));

        if let Some(owner) = repository.get("owner") {
            if owner.get("type").and_then(Value::as_str) == Some(ORGANIZATION_OWNER_TYPE) {
                org_name = non_empty_str(owner.get("login"));
            }
        }
    }

    if let Some(login) = payload
        .get("organization")
        .and_then(|org| non_empty_str(org.get("login")))
    {
        org_name = Some(login);
    }

    EventMetadata {
        org_name,
        repo_name,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn organization_owned_repository() {
        let payload = json!({
            "repository": {
                "name": "widgets",
                "full_name": "acme/widgets",
                "owner": { "login": "acme", "type": "Organization" }
            }
        });
        let meta = extract(&payload);
        assert_eq!(meta.org_name.as_deref(), Some("acme"));
        assert_eq!(meta.repo_name.as_deref(), Some("acme/widgets"));
    }

    #[test]
    fn user_owned_repository_has_no_org() {
        let payload = json!({
            "repository": {
                "full_name": "octocat/hello",
                "owner": { "login": "octocat", "type": "User" }
            }
        });
        let meta = extract(&payload);
        assert_eq!(meta.org_name, None);
        assert_eq!(meta.repo_name.as_deref(), Some("octocat/hello"));
    }

    #[test]
    fn short_name_used_without_full_name() {
        let payload = json!({ "repository": { "name": "widgets" } });
        assert_eq!(extract(&payload).repo_name.as_deref(), Some("widgets"));
    }

    #[test]
    fn top_level_organization_overrides_owner() {
        let payload = json!({
            "repository": {
                "full_name": "acme/widgets",
                "owner": { "login": "acme-old", "type": "Organization" }
            },
            "organization": { "login": "acme" }
        });
        assert_eq!(extract(&payload).org_name.as_deref(), Some("acme"));
    }

    #[test]
    fn organization_event_without_repository() {
        let payload = json!({ "action": "member_added", "organization": { "login": "acme" } });
        let meta = extract(&payload);
        assert_eq!(meta.org_name.as_deref(), Some("acme"));
        assert_eq!(meta.repo_name, None);
    }

    #[test]
    fn absent_fields_yield_none() {
        assert_eq!(extract(&json!({ "zen": "Keep it simple." })), EventMetadata::default());
    }

    #[test]
    fn malformed_substructures_never_fail() {
        let payloads = [
            json!(null),
            json!([1, 2, 3]),
            json!("just a string"),
            json!({ "repository": "not-an-object" }),
            json!({ "repository": { "full_name": 42, "owner": "nobody" } }),
            json!({ "repository": { "owner": { "type": "Organization", "login": null } } }),
            json!({ "organization": ["acme"] }),
            json!({ "organization": { "login": 7 } }),
        ];
        for payload in &payloads {
            assert_eq!(extract(payload), EventMetadata::default(), "payload: {payload}");
        }
    }
}
