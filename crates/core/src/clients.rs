//! Client registration rules.

use crate::error::CoreError;

/// Maximum length of a client name.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of a single organization or repository entry.
const MAX_FILTER_ENTRY_LEN: usize = 200;

/// Maximum number of entries in one interest list.
const MAX_FILTER_ENTRIES: usize = 256;

/// Validate a client name.
///
/// Rules:
/// - Must not be empty or whitespace-only.
/// - Must not exceed [`MAX_NAME_LEN`] characters.
pub fn validate_client_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Client name must not be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Client name must not exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Normalize an interest list: trims entries, rejects empty or oversized
/// ones, and drops duplicates while keeping first-seen order.
///
/// `field` names the list in error messages (`interested_orgs`, ...).
pub fn normalize_interest_list(field: &str, entries: &[String]) -> Result<Vec<String>, CoreError> {
    if entries.len() > MAX_FILTER_ENTRIES {
        return Err(CoreError::Validation(format!(
            "{field} may contain at most {MAX_FILTER_ENTRIES} entries"
        )));
    }

    let mut out: Vec<String> = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let entry = entry.trim();
        if entry.is_empty() {
            return Err(CoreError::Validation(format!(
                "{field}[{i}] must not be empty"
            )));
        }
        if entry.len() > MAX_FILTER_ENTRY_LEN {
            return Err(CoreError::Validation(format!(
                "{field}[{i}] exceeds {MAX_FILTER_ENTRY_LEN} characters"
            )));
        }
        if !out.iter().any(|seen| seen == entry) {
            out.push(entry.to_string());
        }
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn valid_names() {
        assert!(validate_client_name("ci-bot").is_ok());
        assert!(validate_client_name("release notifier").is_ok());
        assert!(validate_client_name(&"a".repeat(MAX_NAME_LEN)).is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        assert_matches!(validate_client_name(""), Err(CoreError::Validation(_)));
        assert_matches!(validate_client_name("   "), Err(CoreError::Validation(_)));
    }

    #[test]
    fn long_name_is_rejected() {
        let name = "a".repeat(MAX_NAME_LEN + 1);
        assert_matches!(validate_client_name(&name), Err(CoreError::Validation(_)));
    }

    #[test]
    fn interest_list_is_trimmed_and_deduplicated() {
        let raw = vec![
            " acme ".to_string(),
            "globex".to_string(),
            "acme".to_string(),
        ];
        let list = normalize_interest_list("interested_orgs", &raw).unwrap();
        assert_eq!(list, vec!["acme".to_string(), "globex".to_string()]);
    }

    #[test]
    fn empty_entry_is_rejected_with_its_index() {
        let raw = vec!["acme".to_string(), " ".to_string()];
        let err = normalize_interest_list("interested_repos", &raw).unwrap_err();
        assert!(err.to_string().contains("interested_repos[1]"));
    }

    #[test]
    fn too_many_entries_are_rejected() {
        let raw: Vec<String> = (0..=MAX_FILTER_ENTRIES).map(|i| format!("org{i}")).collect();
        assert_matches!(
            normalize_interest_list("interested_orgs", &raw),
            Err(CoreError::Validation(_))
        );
    }
}
