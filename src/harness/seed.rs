use rusqlite::Connection;

use super::fixtures::generate_blog_post_data;
use super::Result;
use crate::db;
use crate::models::{NewBlogPost, POSTS};

/// Posts inserted before every test case.
pub const SEED_COUNT: usize = 10;

/// Bulk-inserts [`SEED_COUNT`] random posts in one transaction and returns
/// their ids.
pub fn seed_blog_post_data(conn: &Connection) -> Result<Vec<String>> {
    let posts: Vec<NewBlogPost> = (0..SEED_COUNT).map(|_| generate_blog_post_data()).collect();
    let ids = db::insert_many(conn, POSTS, &posts)?;
    tracing::debug!(count = ids.len(), "Seeded blog posts");
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seeds_ten_distinct_posts() {
        let conn = db::open(":memory:").unwrap();
        let ids = seed_blog_post_data(&conn).unwrap();
        assert_eq!(ids.len(), SEED_COUNT);
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), SEED_COUNT);
        assert_eq!(db::count(&conn, POSTS).unwrap(), SEED_COUNT as u64);
    }

    #[test]
    fn seeding_twice_accumulates() {
        let conn = db::open(":memory:").unwrap();
        seed_blog_post_data(&conn).unwrap();
        seed_blog_post_data(&conn).unwrap();
        assert_eq!(db::count(&conn, POSTS).unwrap(), 2 * SEED_COUNT as u64);
    }

    #[test]
    fn unreachable_store_is_an_error() {
        let conn = db::open(":memory:").unwrap();
        conn.execute_batch("DROP TABLE documents;").unwrap();
        assert!(seed_blog_post_data(&conn).is_err());
    }
}
