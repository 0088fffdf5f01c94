//! One checked operation per verb: issue the request, assert on the
//! response, then cross-check the store directly.

use std::collections::BTreeSet;

use rand::Rng;
use reqwest::StatusCode;
use serde_json::Value;

use super::client::{ApiResponse, PostUpdate};
use super::context::TestContext;
use super::Result;
use crate::models::{BlogPost, NewBlogPost};

/// Exact key set of a post on the wire.
pub const POST_KEYS: [&str; 4] = ["author", "content", "id", "title"];

/// Panics unless `value` is an object with exactly [`POST_KEYS`], a
/// non-empty string id, and an author object carrying both name fields.
pub fn assert_post_shape(value: &Value) {
    let obj = value
        .as_object()
        .unwrap_or_else(|| panic!("expected a post object, got {value}"));
    let keys: BTreeSet<&str> = obj.keys().map(String::as_str).collect();
    assert_eq!(keys, BTreeSet::from(POST_KEYS), "unexpected keys in post {value}");
    assert!(
        obj["id"].as_str().is_some_and(|id| !id.is_empty()),
        "post id must be a non-empty string: {value}"
    );
    let author = obj["author"]
        .as_object()
        .unwrap_or_else(|| panic!("author must be an object: {value}"));
    for field in ["firstName", "lastName"] {
        assert!(
            author.get(field).and_then(Value::as_str).is_some(),
            "author.{field} missing in {value}"
        );
    }
}

fn expect_body<'a>(resp: &'a ApiResponse, request: &str) -> &'a Value {
    resp.body
        .as_ref()
        .unwrap_or_else(|| panic!("{request} returned an empty body ({})", resp.status))
}

/// `GET /posts`: 200, a non-empty array as long as the collection, every
/// element post-shaped, and one random element matching the store.
pub async fn assert_list_posts(ctx: &TestContext) -> Result<Vec<BlogPost>> {
    let resp = ctx.api().list_posts().await?;
    assert_eq!(resp.status, StatusCode::OK, "GET /posts status");
    let body = expect_body(&resp, "GET /posts");
    let items = body
        .as_array()
        .unwrap_or_else(|| panic!("GET /posts must return an array, got {body}"));
    assert!(!items.is_empty(), "GET /posts returned no posts");
    assert_eq!(items.len() as u64, ctx.post_count()?, "GET /posts length vs store count");
    items.iter().for_each(assert_post_shape);

    let posts: Vec<BlogPost> = serde_json::from_value(body.clone())?;
    let listed = &posts[rand::thread_rng().gen_range(0..posts.len())];
    let stored = ctx
        .find_post(&listed.id)?
        .unwrap_or_else(|| panic!("post {} listed but missing from store", listed.id));
    assert_eq!(listed.title, stored.title, "title of post {}", listed.id);
    assert_eq!(listed.content, stored.content, "content of post {}", listed.id);
    assert_eq!(listed.author, stored.author, "author of post {}", listed.id);
    Ok(posts)
}

/// `POST /posts`: 201, the submitted fields echoed back under a new id, and
/// the same document retrievable from the store.
pub async fn assert_create_post(ctx: &TestContext, post: &NewBlogPost) -> Result<BlogPost> {
    let resp = ctx.api().create_post(post).await?;
    assert_eq!(resp.status, StatusCode::CREATED, "POST /posts status");
    let body = expect_body(&resp, "POST /posts");
    assert_post_shape(body);

    let created: BlogPost = serde_json::from_value(body.clone())?;
    assert_eq!(created.title, post.title, "POST /posts title");
    assert_eq!(created.content, post.content, "POST /posts content");
    assert_eq!(created.author, post.author, "POST /posts author");

    let stored = ctx
        .find_post(&created.id)?
        .unwrap_or_else(|| panic!("created post {} missing from store", created.id));
    assert_eq!(stored, created, "stored post {}", created.id);
    Ok(created)
}

/// `PUT /posts/{id}`: 201, and the store reflects the new title and content
/// with id and author untouched. Returns the stored post.
pub async fn assert_update_post(ctx: &TestContext, before: &BlogPost, title: &str, content: &str) -> Result<BlogPost> {
    let update = PostUpdate {
        id: before.id.clone(),
        title: title.to_string(),
        content: content.to_string(),
    };
    let resp = ctx.api().update_post(&update).await?;
    assert_eq!(resp.status, StatusCode::CREATED, "PUT /posts/{} status", before.id);

    let stored = ctx
        .find_post(&before.id)?
        .unwrap_or_else(|| panic!("updated post {} missing from store", before.id));
    let expected = BlogPost {
        title: title.to_string(),
        content: content.to_string(),
        ..before.clone()
    };
    assert_eq!(stored, expected, "stored post {} after update", before.id);
    Ok(stored)
}

/// `DELETE /posts/{id}`: 204 with no body, and the store no longer has it.
pub async fn assert_delete_post(ctx: &TestContext, id: &str) -> Result<()> {
    let resp = ctx.api().delete_post(id).await?;
    assert_eq!(resp.status, StatusCode::NO_CONTENT, "DELETE /posts/{id} status");
    assert!(resp.body.is_none(), "DELETE /posts/{id} returned a body: {:?}", resp.body);
    assert!(ctx.find_post(id)?.is_none(), "post {id} still in store after delete");
    Ok(())
}
