//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod documents;
mod http_notice_drafter;
mod in_memory_school_store;
mod jwt_identity_codec;
mod postgres_document_store;
mod template_notice_drafter;

pub use http_notice_drafter::HttpNoticeDrafter;
pub use in_memory_school_store::InMemorySchoolStore;
pub use jwt_identity_codec::{JwtIdentityCodec, MIN_SECRET_LENGTH};
pub use postgres_document_store::PostgresDocumentStore;
pub use template_notice_drafter::TemplateNoticeDrafter;
