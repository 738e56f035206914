//! Object name resolution.
//!
//! Users refer to objects by name, backend calls need ids. Resolution
//! prefers the session's default domain, then falls back to every other
//! accessible domain. Multiple equally good matches are an ambiguity
//! error, never a silent guess.

use tracing::debug;
use uuid::Uuid;

use crate::client::IsmsClient;
use crate::error::{IsmsError, Result};
use crate::types::ObjectRecord;

/// Resolve a user-supplied name or id to exactly one object.
///
/// Order: backend id (UUID) direct lookup, exact name match in the
/// default domain, substring match in the default domain, then the same
/// two passes across all remaining domains.
pub async fn resolve_object(
    client: &dyn IsmsClient,
    object_type: &str,
    name_or_id: &str,
    default_domain_id: &str,
) -> Result<ObjectRecord> {
    let needle = name_or_id.trim();

    if Uuid::parse_str(needle).is_ok() {
        debug!(object_type, id = needle, "resolving by backend id");
        return client.get_object(object_type, needle).await;
    }

    let objects = client.list_objects(object_type, default_domain_id).await?;
    if let Some(found) = pick_match(&objects, needle)? {
        return Ok(found);
    }

    debug!(
        object_type,
        name = needle,
        "not in default domain, searching all domains"
    );
    let mut candidates = Vec::new();
    for domain in client.list_domains().await? {
        if domain.id == default_domain_id {
            continue;
        }
        let objects = client.list_objects(object_type, &domain.id).await?;
        candidates.extend(exact_matches(&objects, needle));
    }
    match candidates.len() {
        1 => return Ok(candidates.remove(0)),
        n if n > 1 => {
            return Err(IsmsError::Ambiguous {
                name: needle.to_string(),
                count: n,
            })
        }
        _ => {}
    }

    // No exact match anywhere; retry across domains on substrings.
    let mut candidates = Vec::new();
    for domain in client.list_domains().await? {
        if domain.id == default_domain_id {
            continue;
        }
        let objects = client.list_objects(object_type, &domain.id).await?;
        candidates.extend(substring_matches(&objects, needle));
    }
    match candidates.len() {
        1 => Ok(candidates.remove(0)),
        0 => Err(IsmsError::NotFound {
            object_type: object_type.to_string(),
            name: needle.to_string(),
        }),
        n => Err(IsmsError::Ambiguous {
            name: needle.to_string(),
            count: n,
        }),
    }
}

/// Pick a single match within one domain, exact before substring.
fn pick_match(objects: &[ObjectRecord], needle: &str) -> Result<Option<ObjectRecord>> {
    let exact = exact_matches(objects, needle);
    match exact.len() {
        1 => return Ok(Some(exact.into_iter().next().unwrap())),
        n if n > 1 => {
            return Err(IsmsError::Ambiguous {
                name: needle.to_string(),
                count: n,
            })
        }
        _ => {}
    }

    let partial = substring_matches(objects, needle);
    match partial.len() {
        0 => Ok(None),
        1 => Ok(Some(partial.into_iter().next().unwrap())),
        n => Err(IsmsError::Ambiguous {
            name: needle.to_string(),
            count: n,
        }),
    }
}

fn exact_matches(objects: &[ObjectRecord], needle: &str) -> Vec<ObjectRecord> {
    objects
        .iter()
        .filter(|o| o.name.eq_ignore_ascii_case(needle))
        .cloned()
        .collect()
}

fn substring_matches(objects: &[ObjectRecord], needle: &str) -> Vec<ObjectRecord> {
    let lower = needle.to_lowercase();
    objects
        .iter()
        .filter(|o| o.name.to_lowercase().contains(&lower))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryIsms;
    use crate::types::ObjectFields;

    async fn backend_with_two_domains() -> InMemoryIsms {
        let isms = InMemoryIsms::new();
        isms.add_domain("dom-a", "Headquarters");
        isms.add_domain("dom-b", "Subsidiary");
        isms.create_object("asset", ObjectFields::named("Mail Server"), "dom-a")
            .await
            .unwrap();
        isms.create_object("asset", ObjectFields::named("Backup Robot"), "dom-b")
            .await
            .unwrap();
        isms
    }

    #[tokio::test]
    async fn test_resolve_exact_in_default_domain() {
        let isms = backend_with_two_domains().await;
        let found = resolve_object(&isms, "asset", "mail server", "dom-a")
            .await
            .unwrap();
        assert_eq!(found.name, "Mail Server");
        assert_eq!(found.domain_id, "dom-a");
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_other_domains() {
        let isms = backend_with_two_domains().await;
        // Session default is dom-a; the object only exists in dom-b.
        let found = resolve_object(&isms, "asset", "Backup Robot", "dom-a")
            .await
            .unwrap();
        assert_eq!(found.domain_id, "dom-b");
    }

    #[tokio::test]
    async fn test_resolve_substring_match() {
        let isms = backend_with_two_domains().await;
        let found = resolve_object(&isms, "asset", "mail", "dom-a")
            .await
            .unwrap();
        assert_eq!(found.name, "Mail Server");
    }

    #[tokio::test]
    async fn test_resolve_by_uuid_skips_name_search() {
        let isms = backend_with_two_domains().await;
        let created = isms
            .create_object("asset", ObjectFields::named("Router"), "dom-b")
            .await
            .unwrap();
        let found = resolve_object(&isms, "asset", &created.id, "dom-a")
            .await
            .unwrap();
        assert_eq!(found.name, "Router");
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let isms = backend_with_two_domains().await;
        let err = resolve_object(&isms, "asset", "Nonexistent", "dom-a")
            .await
            .unwrap_err();
        assert!(matches!(err, IsmsError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_ambiguous_across_domains() {
        let isms = InMemoryIsms::new();
        isms.add_domain("dom-a", "Headquarters");
        isms.add_domain("dom-b", "Subsidiary");
        isms.add_domain("dom-c", "Branch");
        isms.create_object("asset", ObjectFields::named("Firewall"), "dom-b")
            .await
            .unwrap();
        isms.create_object("asset", ObjectFields::named("Firewall"), "dom-c")
            .await
            .unwrap();

        let err = resolve_object(&isms, "asset", "Firewall", "dom-a")
            .await
            .unwrap_err();
        assert!(matches!(err, IsmsError::Ambiguous { count: 2, .. }));
    }

    #[tokio::test]
    async fn test_resolve_ambiguous_within_default_domain() {
        let isms = InMemoryIsms::new();
        isms.add_domain("dom-a", "Headquarters");
        isms.create_object("asset", ObjectFields::named("Server North"), "dom-a")
            .await
            .unwrap();
        isms.create_object("asset", ObjectFields::named("Server South"), "dom-a")
            .await
            .unwrap();

        let err = resolve_object(&isms, "asset", "server", "dom-a")
            .await
            .unwrap_err();
        assert!(matches!(err, IsmsError::Ambiguous { count: 2, .. }));
    }

    #[tokio::test]
    async fn test_exact_match_beats_substring() {
        let isms = InMemoryIsms::new();
        isms.add_domain("dom-a", "Headquarters");
        isms.create_object("asset", ObjectFields::named("Mail"), "dom-a")
            .await
            .unwrap();
        isms.create_object("asset", ObjectFields::named("Mail Server"), "dom-a")
            .await
            .unwrap();

        let found = resolve_object(&isms, "asset", "Mail", "dom-a")
            .await
            .unwrap();
        assert_eq!(found.name, "Mail");
    }
}
