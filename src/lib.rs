pub mod config;
pub mod error;
pub mod logger;
pub mod post;
pub mod publish;
pub mod server;
pub mod site_metadata;
pub mod storage;
pub mod text_utils;
pub mod util;
pub mod view;
mod test_data;
