use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: i64,
    pub book_id: i64,
    pub name: String,
    pub number: i64,
    pub content: String,
}

/// Body accepted by `POST /api/books` and `PUT /api/books/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookInput {
    pub name: String,
}

impl BookInput {
    pub fn with_id(self, id: i64) -> Book {
        Book { id, name: self.name }
    }
}

/// Body accepted by `POST /api/pages` and `PUT /api/pages/:id`.
///
/// Only `bookId` is required; omitted fields are stored as `""` / `0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInput {
    pub book_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub number: i64,
    #[serde(default)]
    pub content: String,
}

impl PageInput {
    pub fn with_id(self, id: i64) -> Page {
        Page {
            id,
            book_id: self.book_id,
            name: self.name,
            number: self.number,
            content: self.content,
        }
    }
}
