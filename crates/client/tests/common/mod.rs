//! Shared fixtures for client integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use yaru_client::fetch::classify_status;
use yaru_client::{
    Client, FetchRequest, FetchResponse, Fetcher, Method, ResourceLocator, TransportError,
};

pub const API: &str = "https://api-yaru.test";

/// One request seen by the [`MockFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone)]
enum Reply {
    Response(FetchResponse),
    Status(u16),
}

#[derive(Default)]
struct MockState {
    replies: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Scripted fetcher recording every request.
///
/// Replies are queued per method and URL; the last queued reply repeats.
/// Unscripted requests fail with a not-found transport error.
#[derive(Clone, Default)]
pub struct MockFetcher {
    state: Arc<MockState>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a client over this fetcher, resolving against [`API`].
    pub fn client(&self) -> Client {
        Client::with_fetcher(ResourceLocator::new(API), self.clone())
    }

    pub fn respond(&self, method: Method, url: &str, response: FetchResponse) -> &Self {
        self.push(method, url, Reply::Response(response))
    }

    /// Scripts a successful GET.
    pub fn on_get(&self, url: &str, declared_type: Option<&str>, body: &str) -> &Self {
        self.respond(Method::Get, url, FetchResponse::ok(declared_type, body))
    }

    /// Scripts a reply with a final HTTP status and no body.
    pub fn status(&self, method: Method, url: &str, status: u16) -> &Self {
        self.push(method, url, Reply::Status(status))
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().len()
    }

    fn push(&self, method: Method, url: &str, reply: Reply) -> &Self {
        self.state
            .replies
            .lock()
            .entry((method, url.to_string()))
            .or_default()
            .push_back(reply);
        self
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&self, request: &FetchRequest<'_>) -> Result<FetchResponse, TransportError> {
        self.state.requests.lock().push(RecordedRequest {
            method: request.method,
            url: request.url.to_string(),
            body: request.body.map(|b| String::from_utf8_lossy(b).into_owned()),
            content_type: request.content_type.map(str::to_string),
        });

        let reply = {
            let mut replies = self.state.replies.lock();
            let queue = replies.get_mut(&(request.method, request.url.to_string()));
            match queue {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Status(status)) => {
                let success = classify_status(status, request.url, request.body)?;
                Ok(FetchResponse {
                    declared_type: None,
                    body: Vec::new(),
                    success,
                })
            }
            None => Err(TransportError::NotFound {
                url: request.url.to_string(),
            }),
        }
    }
}

pub fn url(path: &str) -> String {
    format!("{}{}", API, path)
}

// ============================================================================
// Documents
// ============================================================================

pub const PERSON: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<person xmlns="http://api.yandex.ru/yaru/">
  <id>urn:ya.ru:person/1</id>
  <name>Ivan Petrov</name>
  <login>ivan</login>
  <link rel="self" href="https://api-yaru.test/person/1/"/>
  <link rel="edit" href="https://api-yaru.test/person/1/"/>
  <link rel="friends" href="https://api-yaru.test/person/1/friend/"/>
  <link rel="posts" href="https://api-yaru.test/person/1/post/"/>
  <link rel="friends_posts" href="https://api-yaru.test/person/1/friend/post/"/>
  <link rel="member_of_clubs" href="https://api-yaru.test/person/1/club/member/"/>
  <link rel="owner_of_clubs" href="https://api-yaru.test/person/1/club/owner/"/>
</person>"#;

pub const PERSON_RENAMED: &str = r#"<person xmlns="http://api.yandex.ru/yaru/">
  <id>urn:ya.ru:person/1</id>
  <name>Ivan Sidorov</name>
  <link rel="self" href="https://api-yaru.test/person/1/"/>
</person>"#;

pub const CLUB: &str = r#"<club xmlns="http://api.yandex.ru/yaru/">
  <id>urn:ya.ru:club/7</id>
  <name>Rustaceans</name>
  <link rel="posts" href="https://api-yaru.test/club/7/post/"/>
  <link rel="club_members" href="https://api-yaru.test/club/7/member/"/>
</club>"#;

/// Persons page 1: two members and a `next` link.
pub const FRIENDS_PAGE_1: &str = r#"<persons xmlns="http://api.yandex.ru/yaru/">
  <person><id>urn:ya.ru:person/2</id><name>Anna</name></person>
  <person><id>urn:ya.ru:person/3</id><name>Boris</name></person>
  <link rel="next" href="https://api-yaru.test/person/1/friend/?p=2"/>
</persons>"#;

/// Persons page 2: three members, last page.
pub const FRIENDS_PAGE_2: &str = r#"<persons xmlns="http://api.yandex.ru/yaru/">
  <person><id>urn:ya.ru:person/4</id><name>Vera</name></person>
  <person><id>urn:ya.ru:person/5</id><name>Gleb</name></person>
  <person><id>urn:ya.ru:person/6</id><name>Dina</name></person>
</persons>"#;

pub const EMPTY_PERSONS: &str = r#"<persons xmlns="http://api.yandex.ru/yaru/">
  <link rel="next" href="https://api-yaru.test/person/1/friend/?p=3"/>
</persons>"#;

pub const ENTRY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<entry xmlns="http://www.w3.org/2005/Atom" xmlns:y="http://api.yandex.ru/yaru/">
  <id>urn:ya.ru:post/1/100</id>
  <title>Weekend</title>
  <updated>2009-05-23T12:30:00+04:00</updated>
  <category term="photo" scheme="urn:ya.ru:posttypes"/>
  <category term="travel" scheme="urn:ya.ru:tags"/>
  <category term="summer"/>
  <y:access>friends</y:access>
  <y:comments-disabled/>
  <content>&amp;lt;b>Sea&amp;lt;/b> &amp;amp; sun</content>
  <author>
    <name>Ivan Petrov</name>
    <y:login>ivan</y:login>
    <link rel="self" href="https://api-yaru.test/person/1/"/>
  </author>
  <link rel="edit" href="https://api-yaru.test/person/1/post/100/"/>
  <link rel="self" href="https://api-yaru.test/person/1/post/100/"/>
</entry>"#;

/// Entry preceding composition tests: no access, no content.
pub const BARE_ENTRY: &str = r#"<entry xmlns="http://www.w3.org/2005/Atom">
  <id>urn:ya.ru:post/1/101</id>
  <title>Untitled</title>
</entry>"#;

pub const FEED: &str = r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:y="http://api.yandex.ru/yaru/">
  <title>Posts</title>
  <entry>
    <id>urn:ya.ru:post/1/100</id>
    <title>First</title>
    <category term="status" scheme="urn:ya.ru:posttypes"/>
    <y:access>public</y:access>
    <content>one</content>
  </entry>
  <entry>
    <id>urn:ya.ru:post/1/99</id>
    <title>Second</title>
    <category term="link" scheme="urn:ya.ru:posttypes"/>
    <content>two</content>
  </entry>
  <link rel="self" href="https://api-yaru.test/person/1/post/"/>
</feed>"#;
