//! Product repository.

use sqlx::PgPool;

use dora_patisserie_core::ProductId;

use super::RepositoryError;
use crate::models::{NewProduct, Product, ProductUpdate};

/// Repository for catalog products.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products ordered by category, then name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products ORDER BY category, name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Count all products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Get one product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the id does not exist.
    pub async fn get(&self, id: ProductId) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` for a negative price, or
    /// `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: NewProduct) -> Result<Product, RepositoryError> {
        if new.price.is_sign_negative() {
            return Err(RepositoryError::Validation(
                "product price must not be negative".to_owned(),
            ));
        }

        let product = sqlx::query_as::<_, Product>(
            "INSERT INTO products (name, description, price, category, image_url, available)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(&new.category)
        .bind(&new.image_url)
        .bind(new.available)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Apply a sparse update; only supplied fields are written.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the id does not exist, or
    /// `RepositoryError::Validation` for a negative price.
    pub async fn update(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, RepositoryError> {
        if update.price.is_some_and(|p| p.is_sign_negative()) {
            return Err(RepositoryError::Validation(
                "product price must not be negative".to_owned(),
            ));
        }

        let mut builder = sqlx::QueryBuilder::new("UPDATE products SET updated_at = NOW()");
        if let Some(name) = &update.name {
            builder.push(", name = ").push_bind(name);
        }
        if let Some(description) = &update.description {
            builder.push(", description = ").push_bind(description);
        }
        if let Some(price) = update.price {
            builder.push(", price = ").push_bind(price);
        }
        if let Some(category) = &update.category {
            builder.push(", category = ").push_bind(category);
        }
        if let Some(image_url) = &update.image_url {
            builder.push(", image_url = ").push_bind(image_url);
        }
        if let Some(available) = update.available {
            builder.push(", available = ").push_bind(available);
        }
        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" RETURNING *");

        builder
            .build_query_as::<Product>()
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete a product. Order items keep their name/price snapshots.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the id does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
