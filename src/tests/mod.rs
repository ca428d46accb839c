mod export_tests;
mod storage_tests;
pub mod utils;
