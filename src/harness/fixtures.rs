//! Randomized blog-post fixtures.

use rand::Rng;

use crate::models::{Author, NewBlogPost};

pub const TITLES: [&str; 5] = ["Mad Hatter", "Cheshire Cat", "White Rabbit", "Queen of Hearts", "March Hare"];

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bruno", "Chloe", "Dmitri", "Elena", "Farah", "Gustavo", "Hana", "Ivan", "Jane",
    "Kofi", "Lena", "Mateo", "Nadia", "Omar", "Priya", "Quinn", "Rosa", "Sven", "Tomas",
];

const LAST_NAMES: &[&str] = &[
    "Abbott", "Bauer", "Castillo", "Doe", "Eriksen", "Fischer", "Garcia", "Haddad", "Ito", "Jensen",
    "Kowalski", "Larsen", "Moreau", "Nakamura", "Okafor", "Petrov", "Quist", "Rossi", "Silva", "Tanaka",
];

const LOREM_WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure", "in", "reprehenderit",
    "voluptate", "velit", "esse", "cillum", "fugiat", "nulla", "pariatur", "excepteur", "sint",
    "occaecat", "cupidatat", "non", "proident", "sunt", "culpa", "qui", "officia", "deserunt",
    "mollit", "anim", "id", "est", "laborum",
];

/// A fresh random post from the thread-local rng.
pub fn generate_blog_post_data() -> NewBlogPost {
    generate_blog_post_data_with(&mut rand::thread_rng())
}

pub fn generate_blog_post_data_with<R: Rng + ?Sized>(rng: &mut R) -> NewBlogPost {
    NewBlogPost {
        title: pick(rng, &TITLES).to_string(),
        content: lorem_paragraph(rng),
        author: Author {
            first_name: pick(rng, FIRST_NAMES).to_string(),
            last_name: pick(rng, LAST_NAMES).to_string(),
        },
    }
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, pool: &[&'a str]) -> &'a str {
    pool[rng.gen_range(0..pool.len())]
}

fn lorem_sentence<R: Rng + ?Sized>(rng: &mut R) -> String {
    let words: Vec<&str> = (0..rng.gen_range(5..=12)).map(|_| pick(rng, LOREM_WORDS)).collect();
    let sentence = words.join(" ");
    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

fn lorem_paragraph<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..rng.gen_range(3..=6))
        .map(|_| lorem_sentence(rng))
        .collect::<Vec<_>>()
        .join(" ")
}
