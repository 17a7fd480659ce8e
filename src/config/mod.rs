//! 配置管理
//!
//! 按 `config.toml` → `config.{APP_ENV}.toml` → 环境变量 的顺序分层加载。

mod r#impl;
mod structs;

pub use r#impl::MAX_IMPORT_ROWS;
pub use structs::*;
