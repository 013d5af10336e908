//! agentide - 模拟 AI 编程工作台的无界面内核
//!
//! 模块结构：
//! - models: 数据模型（DocTree 持久化文档树、统计、示例项目）
//! - kernel: 状态/动作/副作用（Store、模拟终端、服务器列表、services）
//! - app: 应用层（Workbench）

pub mod app;
pub mod kernel;
pub mod models;
