//! SchoolHub - 学校学习管理平台后端服务
//!
//! 负责作业 / 测验的创建、作答、批改，以及学生与教师仪表盘、成绩报表。
//!
//! # 架构
//! - `analytics`: 状态分类、完成率、分数统计等纯函数
//! - `cache`: 缓存层（Moka/Redis）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证授权中间件
//! - `models`: 请求 / 响应模型（同时导出 TypeScript 类型）
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod analytics;
pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
