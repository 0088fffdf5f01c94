use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::db;
use crate::error::StoreError;
use crate::models::{BlogPost, NewBlogPost, POSTS};
use crate::{DbPool, DbPoolExt};

type ApiResult<T> = Result<T, (Status, Json<ApiError>)>;

// ─── Models ───

#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

fn err(status: Status, msg: &str, code: &str) -> (Status, Json<ApiError>) {
    (status, Json(ApiError { error: msg.to_string(), code: code.to_string() }))
}

fn db_err(e: StoreError) -> (Status, Json<ApiError>) {
    tracing::error!(error = %e, "Store operation failed");
    err(Status::InternalServerError, &e.to_string(), "DB_ERROR")
}

fn post_not_found() -> (Status, Json<ApiError>) {
    err(Status::NotFound, "Post not found", "NOT_FOUND")
}

// ─── Request bodies ───

/// Only `title` and `content` are mutable; anything else in the body
/// (including `id`) is ignored.
#[derive(Deserialize)]
pub struct UpdatePostReq {
    pub title: Option<String>,
    pub content: Option<String>,
}

// ─── Routes ───

#[get("/health")]
pub fn health() -> Json<Value> {
    Json(serde_json::json!({"status": "ok", "version": env!("CARGO_PKG_VERSION")}))
}

#[get("/posts")]
pub fn list_posts(db: &State<DbPool>) -> ApiResult<Json<Vec<BlogPost>>> {
    let conn = db.conn();
    db::find_all(&conn, POSTS).map(Json).map_err(db_err)
}

#[get("/posts/<id>")]
pub fn get_post(id: &str, db: &State<DbPool>) -> ApiResult<Json<BlogPost>> {
    let conn = db.conn();
    db::find_by_id(&conn, POSTS, id)
        .map_err(db_err)?
        .map(Json)
        .ok_or_else(post_not_found)
}

#[post("/posts", format = "json", data = "<req>")]
pub fn create_post(req: Json<NewBlogPost>, db: &State<DbPool>) -> ApiResult<(Status, Json<BlogPost>)> {
    let new_post = req.into_inner();
    let conn = db.conn();
    let id = db::insert_one(&conn, POSTS, &new_post).map_err(db_err)?;
    tracing::info!(id = %id, title = %new_post.title, "Created post");

    Ok((Status::Created, Json(BlogPost {
        id,
        title: new_post.title,
        content: new_post.content,
        author: new_post.author,
    })))
}

// Answers 201 rather than 200; existing clients assert on it.
#[put("/posts/<id>", format = "json", data = "<req>")]
pub fn update_post(id: &str, req: Json<UpdatePostReq>, db: &State<DbPool>) -> ApiResult<(Status, Json<BlogPost>)> {
    let mut changes = Map::new();
    if let Some(title) = &req.title {
        changes.insert("title".to_string(), Value::String(title.clone()));
    }
    if let Some(content) = &req.content {
        changes.insert("content".to_string(), Value::String(content.clone()));
    }

    let conn = db.conn();
    if !db::update_by_id(&conn, POSTS, id, &changes).map_err(db_err)? {
        return Err(post_not_found());
    }
    tracing::info!(id, fields = changes.len(), "Updated post");

    let post = db::find_by_id(&conn, POSTS, id)
        .map_err(db_err)?
        .ok_or_else(post_not_found)?;
    Ok((Status::Created, Json(post)))
}

#[delete("/posts/<id>")]
pub fn delete_post(id: &str, db: &State<DbPool>) -> ApiResult<Status> {
    let conn = db.conn();
    if !db::delete_by_id(&conn, POSTS, id).map_err(db_err)? {
        return Err(post_not_found());
    }
    tracing::info!(id, "Deleted post");
    Ok(Status::NoContent)
}

// ─── Catchers ───

#[catch(404)]
pub fn not_found() -> Json<ApiError> {
    Json(ApiError { error: "Not found".to_string(), code: "NOT_FOUND".to_string() })
}

#[catch(422)]
pub fn unprocessable() -> Json<ApiError> {
    Json(ApiError { error: "Malformed post body".to_string(), code: "UNPROCESSABLE".to_string() })
}

#[catch(default)]
pub fn default_catcher(status: Status, _req: &rocket::Request<'_>) -> (Status, Json<ApiError>) {
    let reason = status.reason().unwrap_or("Request failed");
    err(status, reason, &status.code.to_string())
}

#[catch(500)]
pub fn internal_error() -> Json<ApiError> {
    Json(ApiError { error: "Internal server error".to_string(), code: "INTERNAL_ERROR".to_string() })
}
