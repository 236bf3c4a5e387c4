// src/db/categories.rs
use crate::db::connection::Database;
use crate::domain::order::{Category, CategoryDirectory};
use crate::errors::ServerError;
use rusqlite::{params, Connection};
use serde::Deserialize;

/// Snapshot of the store's product taxonomy, sent by `PUT /hooks/catalog`.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogSync {
    #[serde(default)]
    pub categories: Vec<CategoryRow>,
    #[serde(default)]
    pub products: Vec<ProductCategories>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ProductCategories {
    pub product_id: i64,
    #[serde(default)]
    pub category_ids: Vec<i64>,
}

/// Sorted by name, as the settings page lists them.
pub fn list_categories(conn: &Connection) -> Result<Vec<Category>, ServerError> {
    let mut stmt = conn
        .prepare("select id, name from categories order by name asc, id asc")
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(out)
}

/// `None` when the product has never been synced.
pub fn categories_for_product(
    conn: &Connection,
    product_id: i64,
) -> Result<Option<Vec<Category>>, ServerError> {
    let known: i64 = conn
        .query_row(
            "select count(*) from product_categories where product_id = ?",
            params![product_id],
            |row| row.get(0),
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;
    if known == 0 {
        return Ok(None);
    }

    let mut stmt = conn
        .prepare(
            r#"
            select c.id, c.name
            from product_categories pc
            join categories c on c.id = pc.category_id
            where pc.product_id = ?
            order by c.name asc, c.id asc
            "#,
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![product_id], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(Some(out))
}

/// Replace the whole taxonomy in one transaction.
pub fn replace_catalog(conn: &mut Connection, sync: &CatalogSync) -> Result<(), ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    tx.execute("delete from product_categories", [])
        .map_err(|e| ServerError::DbError(e.to_string()))?;
    tx.execute("delete from categories", [])
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    for cat in &sync.categories {
        tx.execute(
            "insert or replace into categories (id, name) values (?, ?)",
            params![cat.id, cat.name.trim()],
        )
        .map_err(|e| ServerError::DbError(format!("insert category {} failed: {e}", cat.id)))?;
    }

    for product in &sync.products {
        for category_id in &product.category_ids {
            tx.execute(
                "insert or ignore into product_categories (product_id, category_id) values (?, ?)",
                params![product.product_id, category_id],
            )
            .map_err(|e| {
                ServerError::BadRequest(format!(
                    "product {} references unknown category {category_id}: {e}",
                    product.product_id
                ))
            })?;
        }
    }

    tx.commit().map_err(|e| ServerError::DbError(e.to_string()))
}

/// [`CategoryDirectory`] backed by the mirrored tables.
pub struct DbCategoryDirectory<'a> {
    db: &'a Database,
}

impl<'a> DbCategoryDirectory<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }
}

impl CategoryDirectory for DbCategoryDirectory<'_> {
    fn categories_for(&self, product_id: i64) -> Option<Vec<Category>> {
        match self.db.with_conn(|conn| categories_for_product(conn, product_id)) {
            Ok(found) => found,
            Err(e) => {
                log::warn!("category lookup for product {product_id} failed: {e}");
                None
            }
        }
    }
}
