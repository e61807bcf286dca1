//! Error types for incon-tools

use thiserror::Error;

use crate::infrastructure::kmz_loader::KmzError;
use crate::infrastructure::sheet_loader::SheetError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Sheet error: {0}")]
    Sheet(#[from] SheetError),

    #[error("KMZ error: {0}")]
    Kmz(#[from] KmzError),

    #[error("Email build error: {0}")]
    Email(#[from] lettre::error::Error),

    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("No usable rows in {0}")]
    EmptySheet(String),
}

pub type Result<T> = std::result::Result<T, Error>;
