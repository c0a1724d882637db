//! # products-api
//!
//! `Products` 表的 HTTP 服务：按 id 读取、列出全部、新增。
//!
//! - `app`：路由与 Products 的处理器、服务、存储
//! - `core`：错误类型、响应结构、请求日志中间件
//! - `infrastructure`：配置、连接池、日志初始化

pub mod app;
pub mod core;
pub mod infrastructure;

pub use app::create_router;
pub use crate::core::error::{CoreError, CoreResult};
