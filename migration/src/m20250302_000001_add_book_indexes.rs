use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Books {
    Table,
    AuthorId,
    PublisherId,
    PublishedYear,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Index on books.author_id for filtering and per-author counts
        manager
            .create_index(
                Index::create()
                    .name("idx_books_author_id")
                    .table(Books::Table)
                    .col(Books::AuthorId)
                    .to_owned(),
            )
            .await?;

        // Index on books.publisher_id for filtering and per-publisher counts
        manager
            .create_index(
                Index::create()
                    .name("idx_books_publisher_id")
                    .table(Books::Table)
                    .col(Books::PublisherId)
                    .to_owned(),
            )
            .await?;

        // Index on books.published_year for range filters and sorting
        manager
            .create_index(
                Index::create()
                    .name("idx_books_published_year")
                    .table(Books::Table)
                    .col(Books::PublishedYear)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_books_author_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_books_publisher_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_books_published_year").to_owned())
            .await?;

        Ok(())
    }
}
