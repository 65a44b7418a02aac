use uuid::Uuid;

use crate::domain::catalog::{ProductDraft, ProductView};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;

pub struct CatalogService<R> {
    repo: R,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn search(&self, query: Option<&str>) -> Result<Vec<ProductView>, DomainError> {
        self.repo.search(query.unwrap_or("").trim())
    }

    pub fn get(&self, id: Uuid) -> Result<ProductView, DomainError> {
        self.repo.find_by_id(id)?.ok_or(DomainError::NotFound)
    }

    pub fn create_product(&self, draft: ProductDraft) -> Result<ProductView, DomainError> {
        draft.validate()?;
        let product = self.repo.create(ProductDraft {
            name: draft.name.trim().to_string(),
            ..draft
        })?;
        log::info!("product {} created with stock {}", product.id, product.stock);
        Ok(product)
    }
}
