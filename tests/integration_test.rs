use rocket::http::{ContentType, Status};
use rocket::local::blocking::Client;
use blog_posts::{create_rocket, db};

fn test_client() -> Client {
    let conn = db::open(":memory:").unwrap();
    let rocket = create_rocket(conn);
    Client::tracked(rocket).unwrap()
}

fn create_post_helper(client: &Client, title: &str) -> String {
    let resp = client.post("/posts")
        .header(ContentType::JSON)
        .body(format!(r#"{{"title": "{}", "content": "lorem ipsum", "author": {{"firstName": "Jane", "lastName": "Doe"}}}}"#, title))
        .dispatch();
    assert_eq!(resp.status(), Status::Created);
    let body: serde_json::Value = resp.into_json().unwrap();
    body["id"].as_str().unwrap().to_string()
}

#[test]
fn test_health() {
    let client = test_client();
    let resp = client.get("/health").dispatch();
    assert_eq!(resp.status(), Status::Ok);
    let body: serde_json::Value = resp.into_json().unwrap();
    assert_eq!(body["status"], "ok");
}

#[test]
fn test_list_posts_empty() {
    let client = test_client();
    let resp = client.get("/posts").dispatch();
    assert_eq!(resp.status(), Status::Ok);
    let body: serde_json::Value = resp.into_json().unwrap();
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[test]
fn test_create_post() {
    let client = test_client();
    let resp = client.post("/posts")
        .header(ContentType::JSON)
        .body(r#"{"title": "Mad Hatter", "content": "lorem ipsum", "author": {"firstName": "Jane", "lastName": "Doe"}}"#)
        .dispatch();
    assert_eq!(resp.status(), Status::Created);
    let body: serde_json::Value = resp.into_json().unwrap();
    assert!(!body["id"].as_str().unwrap().is_empty());
    assert_eq!(body["title"], "Mad Hatter");
    assert_eq!(body["content"], "lorem ipsum");
    assert_eq!(body["author"]["firstName"], "Jane");
    assert_eq!(body["author"]["lastName"], "Doe");
    assert_eq!(body.as_object().unwrap().len(), 4);
}

#[test]
fn test_create_post_string_author() {
    let client = test_client();
    let resp = client.post("/posts")
        .header(ContentType::JSON)
        .body(r#"{"title": "Mad Hatter", "content": "lorem ipsum", "author": "Jane Doe"}"#)
        .dispatch();
    assert_eq!(resp.status(), Status::UnprocessableEntity);
    let body: serde_json::Value = resp.into_json().unwrap();
    assert_eq!(body["code"], "UNPROCESSABLE");
}

#[test]
fn test_list_posts_in_insertion_order() {
    let client = test_client();
    let first = create_post_helper(&client, "Cheshire Cat");
    let second = create_post_helper(&client, "White Rabbit");

    let resp = client.get("/posts").dispatch();
    let body: serde_json::Value = resp.into_json().unwrap();
    let posts = body.as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["id"], first.as_str());
    assert_eq!(posts[1]["id"], second.as_str());
    assert_eq!(posts[1]["title"], "White Rabbit");
}

#[test]
fn test_get_post() {
    let client = test_client();
    let id = create_post_helper(&client, "March Hare");
    let resp = client.get(format!("/posts/{}", id)).dispatch();
    assert_eq!(resp.status(), Status::Ok);
    let body: serde_json::Value = resp.into_json().unwrap();
    assert_eq!(body["title"], "March Hare");
}

#[test]
fn test_get_post_not_found() {
    let client = test_client();
    let resp = client.get("/posts/does-not-exist").dispatch();
    assert_eq!(resp.status(), Status::NotFound);
    let body: serde_json::Value = resp.into_json().unwrap();
    assert_eq!(body["code"], "NOT_FOUND");
}

#[test]
fn test_update_post() {
    let client = test_client();
    let id = create_post_helper(&client, "Original");

    let resp = client.put(format!("/posts/{}", id))
        .header(ContentType::JSON)
        .body(format!(r#"{{"id": "{}", "title": "Updated", "content": "new words"}}"#, id))
        .dispatch();
    assert_eq!(resp.status(), Status::Created);
    let body: serde_json::Value = resp.into_json().unwrap();
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["title"], "Updated");
    assert_eq!(body["content"], "new words");
    assert_eq!(body["author"]["firstName"], "Jane");
}

#[test]
fn test_update_ignores_author_and_id() {
    let client = test_client();
    let id = create_post_helper(&client, "Original");

    let resp = client.put(format!("/posts/{}", id))
        .header(ContentType::JSON)
        .body(r#"{"id": "other", "title": "Updated", "author": {"firstName": "Eve", "lastName": "X"}}"#)
        .dispatch();
    assert_eq!(resp.status(), Status::Created);

    let resp = client.get(format!("/posts/{}", id)).dispatch();
    let body: serde_json::Value = resp.into_json().unwrap();
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["title"], "Updated");
    assert_eq!(body["content"], "lorem ipsum");
    assert_eq!(body["author"]["firstName"], "Jane");
}

#[test]
fn test_update_post_not_found() {
    let client = test_client();
    let resp = client.put("/posts/missing")
        .header(ContentType::JSON)
        .body(r#"{"title": "Nope"}"#)
        .dispatch();
    assert_eq!(resp.status(), Status::NotFound);
}

#[test]
fn test_delete_post() {
    let client = test_client();
    let id = create_post_helper(&client, "Delete Me");

    let resp = client.delete(format!("/posts/{}", id)).dispatch();
    assert_eq!(resp.status(), Status::NoContent);
    assert!(resp.into_string().unwrap_or_default().is_empty());

    let resp = client.get(format!("/posts/{}", id)).dispatch();
    assert_eq!(resp.status(), Status::NotFound);
}

#[test]
fn test_delete_post_not_found() {
    let client = test_client();
    let resp = client.delete("/posts/missing").dispatch();
    assert_eq!(resp.status(), Status::NotFound);
}

#[test]
fn test_malformed_json_gets_json_error() {
    let client = test_client();
    let resp = client.post("/posts")
        .header(ContentType::JSON)
        .body(r#"{"title": "Mad Hatter","#)
        .dispatch();
    assert_eq!(resp.status(), Status::BadRequest);
    let body: serde_json::Value = resp.into_json().unwrap();
    assert_eq!(body["code"], "400");
}
