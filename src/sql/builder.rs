//! Builds the parameterized catalog statements for a schema.

/// Quote identifier for PostgreSQL (safe: only from config).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

pub const CATEGORIES_TABLE: &str = "categories";
pub const GOODS_TABLE: &str = "goods";

/// Every statement the store issues. Built once; values are always bound as `$n`.
#[derive(Clone, Debug)]
pub struct Statements {
    pub list_categories: String,
    pub insert_category: String,
    pub rename_category: String,
    pub delete_category: String,
    pub list_goods: String,
    pub insert_good: String,
    pub rename_good: String,
    pub delete_good: String,
}

impl Statements {
    pub fn for_schema(schema: &str) -> Self {
        let categories = qualified_table(schema, CATEGORIES_TABLE);
        let goods = qualified_table(schema, GOODS_TABLE);
        Statements {
            list_categories: format!(
                "SELECT category_id, category_name FROM {} ORDER BY category_id",
                categories
            ),
            insert_category: format!(
                "INSERT INTO {} (category_name) VALUES ($1) RETURNING category_id, category_name",
                categories
            ),
            rename_category: format!(
                "UPDATE {} SET category_name = $1 WHERE category_id = $2 RETURNING category_id, category_name",
                categories
            ),
            delete_category: format!("DELETE FROM {} WHERE category_id = $1", categories),
            list_goods: format!(
                "SELECT g.product_id, g.product_name, c.category_name, g.price \
                 FROM {} g INNER JOIN {} c ON g.category_id = c.category_id \
                 ORDER BY g.product_id",
                goods, categories
            ),
            insert_good: format!(
                "INSERT INTO {} (category_id, product_name, price) VALUES ($1, $2, $3) \
                 RETURNING product_id, product_name, category_id, price",
                goods
            ),
            rename_good: format!(
                "UPDATE {} SET product_name = $1 WHERE product_id = $2 RETURNING product_id, product_name",
                goods
            ),
            delete_good: format!("DELETE FROM {} WHERE product_id = $1", goods),
        }
    }
}

/// DDL for the two catalog tables. Idempotent; never alters existing tables.
pub fn ensure_tables_ddl(schema: &str) -> Vec<String> {
    let categories = qualified_table(schema, CATEGORIES_TABLE);
    let goods = qualified_table(schema, GOODS_TABLE);
    vec![
        format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(schema)),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                category_id SERIAL PRIMARY KEY,
                category_name VARCHAR(128) NOT NULL
            )
            "#,
            categories
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                product_id SERIAL PRIMARY KEY,
                product_name VARCHAR(128) NOT NULL,
                category_id INTEGER NOT NULL REFERENCES {} (category_id) ON DELETE RESTRICT,
                price INTEGER CHECK (price >= 0)
            )
            "#,
            goods, categories
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statements_are_schema_qualified() {
        let s = Statements::for_schema("shop");
        assert_eq!(
            s.list_categories,
            r#"SELECT category_id, category_name FROM "shop"."categories" ORDER BY category_id"#
        );
        assert!(s.delete_good.starts_with(r#"DELETE FROM "shop"."goods""#));
    }

    #[test]
    fn goods_listing_is_an_inner_join() {
        let s = Statements::for_schema("public");
        assert!(s.list_goods.contains(r#"INNER JOIN "public"."categories" c ON g.category_id = c.category_id"#));
        assert!(s.list_goods.contains("c.category_name"));
    }

    #[test]
    fn values_are_placeholders() {
        let s = Statements::for_schema("public");
        assert!(s.insert_good.contains("VALUES ($1, $2, $3)"));
        assert!(s.rename_category.contains("WHERE category_id = $2"));
        assert!(s.insert_category.ends_with("RETURNING category_id, category_name"));
    }

    #[test]
    fn identifiers_escape_quotes() {
        assert_eq!(quoted(r#"we"ird"#), r#""we""ird""#);
    }

    #[test]
    fn ddl_restricts_category_delete() {
        let ddl = ensure_tables_ddl("public");
        assert_eq!(ddl.len(), 3);
        assert!(ddl[2].contains("ON DELETE RESTRICT"));
        assert!(ddl[2].contains("CHECK (price >= 0)"));
    }
}
