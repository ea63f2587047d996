pub mod authors;
pub mod books;
pub mod publishers;
pub mod users;

use futures_util::future::try_join;
use sea_orm::sea_query::LikeExpr;
use sea_orm::*;

use crate::models::CatalogEntity;
use crate::query::{QueryDescriptor, SortDirection, Where};

/// Connect to PostgreSQL. The returned handle is shared by every request.
pub async fn create_pool(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Run one list query: the page of records and the total count matching the
/// same condition, fetched concurrently.
pub async fn find_page<E>(
    db: &DatabaseConnection,
    query: &QueryDescriptor,
) -> Result<(Vec<E::Model>, u64), DbErr>
where
    E: CatalogEntity,
    E::Model: Send + Sync + 'static,
{
    let filtered = filtered_select::<E>(query)?;
    let page = ordered_page::<E>(filtered.clone(), query)?;

    try_join(page.all(db), filtered.count(db)).await
}

/// `SELECT ... WHERE <condition>` without ordering or paging.
pub fn filtered_select<E: CatalogEntity>(query: &QueryDescriptor) -> Result<Select<E>, DbErr> {
    let select = E::find();
    match &query.condition {
        Some(clause) => Ok(select.filter(to_condition::<E>(clause)?)),
        None => Ok(select),
    }
}

/// Apply the descriptor's ordering, offset and limit.
pub fn ordered_page<E: CatalogEntity>(
    select: Select<E>,
    query: &QueryDescriptor,
) -> Result<Select<E>, DbErr> {
    let order = match query.order_by.direction {
        SortDirection::Asc => Order::Asc,
        SortDirection::Desc => Order::Desc,
    };

    Ok(select
        .order_by(column::<E>(query.order_by.field)?, order)
        .offset(query.skip)
        .limit(query.take))
}

/// Translate a storage-independent predicate into a SeaORM condition.
pub fn to_condition<E: CatalogEntity>(clause: &Where) -> Result<Condition, DbErr> {
    let condition = match clause {
        Where::Equals { field, value } => Condition::all().add(column::<E>(field)?.eq(*value)),
        Where::Contains { field, value } => {
            Condition::all().add(column::<E>(field)?.like(contains_pattern(value)))
        }
        Where::Range { field, gte, lte } => {
            let col = column::<E>(field)?;
            let mut range = Condition::all();
            if let Some(min) = gte {
                range = range.add(col.gte(*min));
            }
            if let Some(max) = lte {
                range = range.add(col.lte(*max));
            }
            range
        }
        Where::And(parts) => parts
            .iter()
            .try_fold(Condition::all(), |acc, part| to_condition::<E>(part).map(|c| acc.add(c)))?,
        Where::Or(parts) => parts
            .iter()
            .try_fold(Condition::any(), |acc, part| to_condition::<E>(part).map(|c| acc.add(c)))?,
    };
    Ok(condition)
}

/// `%term%` with LIKE wildcards in `term` escaped, so the term only ever matches literally.
pub fn contains_pattern(term: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", escape_like(term))).escape('\\')
}

pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// Every configured field must map to a column; a miss is a configuration bug.
fn column<E: CatalogEntity>(field: &str) -> Result<E::Column, DbErr> {
    E::column(field)
        .ok_or_else(|| DbErr::Custom(format!("{} has no column for field `{field}`", E::NAME)))
}
