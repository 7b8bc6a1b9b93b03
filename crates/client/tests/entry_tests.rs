//! Entry parsing, composition, create and update.

mod common;

use chrono::{TimeZone, Utc};
use common::*;
use yaru_client::{
    AccessLevel, AttributeValue, Attributes, Entry, EntryType, Error, FetchResponse, Method,
    ResourceKind, ResourceObject,
};

fn parsed(xml: &str) -> Entry {
    let mut entry = Entry::new();
    entry.parse_body(xml.as_bytes()).unwrap();
    entry
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_typed_fields_from_document() {
    let entry = parsed(ENTRY);

    assert_eq!(entry.id(), Some("urn:ya.ru:post/1/100"));
    assert_eq!(entry.entry_type(), EntryType::Photo);
    assert_eq!(entry.access(), AccessLevel::Friends);
    assert!(entry.comments_disabled());
    assert_eq!(entry.categories(), ["travel".to_string(), "summer".to_string()]);
    assert_eq!(
        entry.updated(),
        Some(Utc.with_ymd_and_hms(2009, 5, 23, 8, 30, 0).unwrap())
    );

    let attributes = entry.resource().attributes();
    for moved in ["access", "comments-disabled", "category", "updated", "id"] {
        assert!(!attributes.contains_key(moved), "{} kept as attribute", moved);
    }
    assert_eq!(attributes["title"].as_str(), Some("Weekend"));
}

#[test]
fn test_content_is_unescaped() {
    let entry = parsed(ENTRY);
    assert_eq!(entry.content(), "<b>Sea</b> & sun");
}

#[test]
fn test_defaults_for_bare_document() {
    let entry = parsed(BARE_ENTRY);

    assert_eq!(entry.access(), AccessLevel::Public);
    assert_eq!(entry.entry_type(), EntryType::Text);
    assert!(!entry.comments_disabled());
    assert!(entry.categories().is_empty());
    assert!(entry.updated().is_none());
    assert_eq!(entry.content(), "");
    assert_eq!(
        entry.resource().attribute("content"),
        Some(&AttributeValue::from(""))
    );
}

#[test]
fn test_nested_author_keeps_links() {
    let entry = parsed(ENTRY);
    let author = entry.resource().attribute("author").unwrap();
    assert_eq!(author.get("name").and_then(|v| v.as_str()), Some("Ivan Petrov"));
    assert_eq!(author.get("login").and_then(|v| v.as_str()), Some("ivan"));
    assert_eq!(
        author
            .get("links")
            .and_then(|l| l.get("self"))
            .and_then(|v| v.as_str()),
        Some("https://api-yaru.test/person/1/")
    );
    assert_eq!(entry.link("edit"), Some("https://api-yaru.test/person/1/post/100/"));
}

#[test]
fn test_unknown_vocabulary_in_document() {
    let mut entry = Entry::new();
    let err = entry
        .parse_body(
            br#"<entry xmlns="http://www.w3.org/2005/Atom" xmlns:y="http://api.yandex.ru/yaru/">
                 <y:access>everyone</y:access>
               </entry>"#,
        )
        .unwrap_err();
    assert!(matches!(err, Error::UnknownAccessLevel(level) if level == "everyone"));
    assert!(!entry.is_materialized());

    let err = entry
        .parse_body(
            br#"<entry xmlns="http://www.w3.org/2005/Atom">
                 <category term="diary" scheme="urn:ya.ru:posttypes"/>
               </entry>"#,
        )
        .unwrap_err();
    assert!(matches!(err, Error::UnknownEntryType(_)));
}

#[test]
fn test_unparseable_updated_stays_attribute() {
    let entry = parsed(
        r#"<entry xmlns="http://www.w3.org/2005/Atom"><updated>yesterday</updated></entry>"#,
    );
    assert!(entry.updated().is_none());
    assert_eq!(
        entry.resource().attribute("updated").and_then(|v| v.as_str()),
        Some("yesterday")
    );
}

// ============================================================================
// Composition
// ============================================================================

#[test]
fn test_compose_then_parse_preserves_fields() {
    let mut entry = Entry::new();
    entry.set_type("status").unwrap();
    entry.set_access("friends").unwrap();
    entry.set_comments_disabled(true);
    entry.set_attribute("title", "Mood").unwrap();
    entry.set_content("<i>fine</i> & calm");

    let xml = entry.compose().unwrap();
    let reparsed = parsed(std::str::from_utf8(&xml).unwrap());

    assert_eq!(reparsed.entry_type(), EntryType::Status);
    assert_eq!(reparsed.access(), AccessLevel::Friends);
    assert!(reparsed.comments_disabled());
    assert_eq!(reparsed.content(), "<i>fine</i> & calm");
    assert_eq!(
        reparsed.resource().attribute("title").and_then(|v| v.as_str()),
        Some("Mood")
    );
}

#[test]
fn test_compose_then_parse_public_text_entry() {
    let mut entry = Entry::new();
    entry.set_entry_type(EntryType::Text);
    entry.set_access_level(AccessLevel::Public);
    entry.set_comments_disabled(false);
    entry.set_content("<b>hi</b>");

    let xml = entry.compose().unwrap();
    let composed = std::str::from_utf8(&xml).unwrap();
    assert!(!composed.contains("comments-disabled"));

    let reparsed = parsed(composed);
    assert_eq!(reparsed.entry_type(), EntryType::Text);
    assert_eq!(reparsed.access(), AccessLevel::Public);
    assert!(!reparsed.comments_disabled());
    assert_eq!(reparsed.content(), "<b>hi</b>");
}

#[test]
fn test_compose_writes_id_of_existing_entry() {
    let entry = parsed(ENTRY);
    let xml = String::from_utf8(entry.compose().unwrap()).unwrap();

    assert!(xml.contains("<id>urn:ya.ru:post/1/100</id>"));
    assert!(xml.contains(r#"<category term="photo" scheme="urn:ya.ru:posttypes"/>"#));
    assert!(xml.contains("<y:comments-disabled/>"));
    assert!(!xml.contains("travel"));
    assert!(!xml.contains("author"));
}

#[test]
fn test_seed_attributes_are_validated() {
    let mut seed = Attributes::new();
    seed.insert("type".to_string(), "status".into());
    seed.insert("access".to_string(), "public".into());
    seed.insert("comments_disabled".to_string(), "true".into());
    seed.insert("content".to_string(), "Happy".into());

    let entry = Entry::from_attributes(seed).unwrap();
    assert_eq!(entry.entry_type(), EntryType::Status);
    assert_eq!(entry.access(), AccessLevel::Public);
    assert!(entry.comments_disabled());
    assert_eq!(entry.content(), "Happy");
    assert!(entry.resource().attribute("type").is_none());

    let mut seed = Attributes::new();
    seed.insert("type".to_string(), "diary".into());
    assert!(matches!(
        Entry::from_attributes(seed),
        Err(Error::UnknownEntryType(_))
    ));
}

// ============================================================================
// Create and update
// ============================================================================

#[test]
fn test_create_posts_to_target_and_adopts_response() {
    let target = url("/person/1/post/");
    let mock = MockFetcher::new();
    mock.respond(
        Method::Post,
        &target,
        FetchResponse::ok(Some("entry"), ENTRY),
    );
    let client = mock.client();

    let mut entry = Entry::new();
    entry.set_attribute("title", "Weekend").unwrap();
    entry.save(&client, Some(&target)).unwrap();

    assert_eq!(entry.id(), Some("urn:ya.ru:post/1/100"));
    assert_eq!(entry.link("edit"), Some("https://api-yaru.test/person/1/post/100/"));

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Post);
    assert_eq!(requests[0].url, target);
    assert_eq!(
        requests[0].content_type.as_deref(),
        Some(ResourceKind::Entry.content_type())
    );
    let body = requests[0].body.as_deref().unwrap();
    assert!(body.contains("<title>Weekend</title>"));
    assert!(body.contains("<y:access>private</y:access>"));
    assert!(!body.contains("<id>"));
}

#[test]
fn test_create_without_target_fails() {
    let mock = MockFetcher::new();
    let client = mock.client();

    let mut entry = Entry::new();
    assert!(matches!(
        entry.save(&client, None),
        Err(Error::OperationFailed { target: None, .. })
    ));
    assert_eq!(mock.request_count(), 0);
}

#[test]
fn test_create_failure_names_target() {
    let target = url("/person/1/post/");
    let mock = MockFetcher::new();
    mock.status(Method::Post, &target, 409);
    let client = mock.client();

    let mut entry = Entry::new();
    let err = entry.save(&client, Some(&target)).unwrap_err();
    assert!(err.to_string().contains(&target));
    assert!(matches!(err, Error::OperationFailed { target: Some(t), .. } if t == target));
    assert!(entry.id().is_none());
}

#[test]
fn test_update_puts_to_edit_link() {
    let edit = "https://api-yaru.test/person/1/post/100/";
    let mock = MockFetcher::new();
    mock.on_get(&url("/person/1/post/100/"), Some("entry"), ENTRY)
        .status(Method::Put, edit, 200);
    let client = mock.client();

    let mut entry = Entry::with_id("/person/1/post/100/");
    entry.set_attribute("title", "Renamed").unwrap();
    entry.save(&client, None).unwrap();

    let requests = mock.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, Method::Get);
    assert_eq!(requests[1].method, Method::Put);
    assert_eq!(requests[1].url, edit);
    // Composed before materializing, from the caller's attributes.
    let body = requests[1].body.as_deref().unwrap();
    assert!(body.contains("<title>Renamed</title>"));
    // Empty response keeps the materialized state.
    assert_eq!(entry.id(), Some("urn:ya.ru:post/1/100"));
}

#[test]
fn test_update_reparses_non_empty_response() {
    let edit = "https://api-yaru.test/person/1/post/100/";
    let mock = MockFetcher::new();
    mock.respond(
        Method::Put,
        edit,
        FetchResponse::ok(Some("entry"), BARE_ENTRY),
    );
    let client = mock.client();

    let mut entry = parsed(ENTRY);
    entry.save(&client, None).unwrap();
    assert_eq!(entry.id(), Some("urn:ya.ru:post/1/101"));
    assert_eq!(entry.access(), AccessLevel::Public);
    assert!(entry.link("edit").is_none());
}

#[test]
fn test_update_without_edit_link_fails() {
    let mock = MockFetcher::new();
    let client = mock.client();

    let mut entry = parsed(BARE_ENTRY);
    let err = entry.save(&client, None).unwrap_err();
    assert!(matches!(err, Error::OperationFailed { target: None, .. }));
    assert_eq!(mock.request_count(), 0);
}
