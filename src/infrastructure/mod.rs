//! Infrastructure layer - Repository implementations, storage and logging

pub mod author;
pub mod logging;
pub mod storage;
