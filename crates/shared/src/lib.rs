// Public modules
pub mod config;
pub mod digest;
pub mod mailer;
pub mod models;
pub mod qiita;

// Re-export commonly used types
pub use config::{Config, MailConfig};
pub use digest::DigestFormatter;
pub use mailer::Mailer;
pub use models::{Article, Digest, ItemsQuery};
pub use qiita::{QiitaClient, RequestError};
