use sea_orm::*;
use std::collections::HashMap;

use crate::models::books::{self, BookDetail, BookInput, BookTitle, BookWithRelations};
use crate::models::{Summary, authors, publishers};

/// The reference a set of books is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Author,
    Publisher,
}

impl Owner {
    fn column(self) -> books::Column {
        match self {
            Owner::Author => books::Column::AuthorId,
            Owner::Publisher => books::Column::PublisherId,
        }
    }

    fn id_of(self, book: &books::Model) -> i32 {
        match self {
            Owner::Author => book.author_id,
            Owner::Publisher => book.publisher_id,
        }
    }
}

/// Insert a new book.
pub async fn insert_book(db: &DatabaseConnection, input: BookInput) -> Result<books::Model, DbErr> {
    let now = chrono::Utc::now();
    let new_book = books::ActiveModel {
        title: Set(input.title),
        description: Set(input.description),
        published_year: Set(input.published_year),
        author_id: Set(input.author_id),
        publisher_id: Set(input.publisher_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_book.insert(db).await
}

/// Fetch a single book by ID.
pub async fn get_book_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<books::Model>, DbErr> {
    books::Entity::find_by_id(id).one(db).await
}

/// Replace the editable fields of an existing book.
pub async fn update_book(
    db: &DatabaseConnection,
    id: i32,
    input: BookInput,
) -> Result<books::Model, DbErr> {
    let book = books::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Book not found".to_string()))?;

    let mut active: books::ActiveModel = book.into();
    active.title = Set(input.title);
    active.description = Set(input.description);
    active.published_year = Set(input.published_year);
    active.author_id = Set(input.author_id);
    active.publisher_id = Set(input.publisher_id);
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

/// Delete a book by ID.
pub async fn delete_book(db: &DatabaseConnection, id: i32) -> Result<DeleteResult, DbErr> {
    books::Entity::delete_by_id(id).exec(db).await
}

/// Fetch all books by one author or publisher, newest first.
pub async fn get_books_by(
    db: &DatabaseConnection,
    owner: Owner,
    id: i32,
) -> Result<Vec<books::Model>, DbErr> {
    books::Entity::find()
        .filter(owner.column().eq(id))
        .order_by_desc(books::Column::PublishedYear)
        .order_by_asc(books::Column::Id)
        .all(db)
        .await
}

/// Count books per owner ID in one query.
pub async fn count_books_by(
    db: &DatabaseConnection,
    owner: Owner,
    ids: Vec<i32>,
) -> Result<HashMap<i32, u64>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let column = owner.column();
    let rows: Vec<(i32, i64)> = books::Entity::find()
        .select_only()
        .column(column)
        .column_as(books::Column::Id.count(), "book_count")
        .filter(column.is_in(ids))
        .group_by(column)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, count)| (id, u64::try_from(count).unwrap_or(0)))
        .collect())
}

/// Book titles per owner ID, one query for a whole page of owners.
pub async fn titles_by(
    db: &DatabaseConnection,
    owner: Owner,
    ids: Vec<i32>,
) -> Result<HashMap<i32, Vec<BookTitle>>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = books::Entity::find()
        .filter(owner.column().is_in(ids))
        .order_by_asc(books::Column::Id)
        .all(db)
        .await?;

    let mut grouped: HashMap<i32, Vec<BookTitle>> = HashMap::new();
    for book in rows {
        grouped
            .entry(owner.id_of(&book))
            .or_default()
            .push(BookTitle::from(book));
    }
    Ok(grouped)
}

/// Embed the full author and publisher of a single book.
pub async fn with_details(
    db: &DatabaseConnection,
    book: books::Model,
) -> Result<BookDetail, DbErr> {
    let (author, publisher) = futures_util::future::try_join(
        authors::Entity::find_by_id(book.author_id).one(db),
        publishers::Entity::find_by_id(book.publisher_id).one(db),
    )
    .await?;

    Ok(BookDetail {
        author: author.map(Into::into),
        publisher: publisher.map(Into::into),
        book,
    })
}

/// Embed author and publisher summaries, two lookups for the whole page.
pub async fn with_relations(
    db: &DatabaseConnection,
    books: Vec<books::Model>,
) -> Result<Vec<BookWithRelations>, DbErr> {
    if books.is_empty() {
        return Ok(Vec::new());
    }

    let author_ids: Vec<i32> = books.iter().map(|b| b.author_id).collect();
    let publisher_ids: Vec<i32> = books.iter().map(|b| b.publisher_id).collect();

    let (author_rows, publisher_rows) = futures_util::future::try_join(
        authors::Entity::find()
            .filter(authors::Column::Id.is_in(author_ids))
            .all(db),
        publishers::Entity::find()
            .filter(publishers::Column::Id.is_in(publisher_ids))
            .all(db),
    )
    .await?;

    let authors: HashMap<i32, Summary> =
        author_rows.iter().map(|a| (a.id, Summary::from(a))).collect();
    let publishers: HashMap<i32, Summary> =
        publisher_rows.iter().map(|p| (p.id, Summary::from(p))).collect();

    Ok(books
        .into_iter()
        .map(|book| BookWithRelations {
            author: authors.get(&book.author_id).cloned(),
            publisher: publishers.get(&book.publisher_id).cloned(),
            book,
        })
        .collect())
}
