pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users_table;
mod m20250301_000002_create_authors_table;
mod m20250301_000003_create_publishers_table;
mod m20250301_000004_create_books_table;
mod m20250302_000001_add_book_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users_table::Migration),
            Box::new(m20250301_000002_create_authors_table::Migration),
            Box::new(m20250301_000003_create_publishers_table::Migration),
            Box::new(m20250301_000004_create_books_table::Migration),
            Box::new(m20250302_000001_add_book_indexes::Migration),
        ]
    }
}
