//! Seller verification document entity.

use sea_orm::entity::prelude::*;

use domain::{DocumentType, SellerDocument};

use super::parse_or;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "seller_documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub seller_id: Uuid,
    pub doc_type: String,
    pub file_url: String,
    pub file_name: String,
    pub file_size: i64,
    pub mime_type: String,
    pub uploaded_at: DateTimeUtc,
    pub verified_at: Option<DateTimeUtc>,
    pub verified_by: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SellerDocument {
    fn from(model: Model) -> Self {
        SellerDocument {
            id: model.id,
            seller_id: model.seller_id,
            doc_type: parse_or(&model.doc_type, DocumentType::Other),
            file_url: model.file_url,
            file_name: model.file_name,
            file_size: model.file_size,
            mime_type: model.mime_type,
            uploaded_at: model.uploaded_at,
            verified_at: model.verified_at,
            verified_by: model.verified_by,
        }
    }
}
