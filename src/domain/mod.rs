//! Core domain types: the entity shapes served by the API and the error
//! taxonomy shared by every handler.

pub mod entities;
pub mod error;

pub use entities::{
    Address, Company, CompanyDepartment, DatasetRecord, Product, ProductRef, ProductVariant,
    TimeSeriesPoint, Transaction, TransactionStatus, User, UserRef,
};
pub use error::ApiError;
