#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod json;
#[allow(clippy::module_name_repetitions)]
pub mod local_storage;
pub mod log;
pub mod memory;
pub mod rest;
pub mod sample;

pub use local_storage::{LocalStorage, LocalStorageError};
pub use memory::MemoryStorage;
pub use rest::{REST, ReqwestSendRequest, SendRequest};
