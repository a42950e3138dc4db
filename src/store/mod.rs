//! 会话存储 - 基础设施层
//!
//! 只提供 create / get / update，不保证事务隔离：同一个会话键同时只能有一个运行。
//! "每个字段每次运行只写一次"由流程层保证，存储层不做限制。

mod memory;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{Session, SessionKey};

pub use memory::InMemorySessionStore;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// 创建会话；键已存在时覆盖
    async fn create(&self, key: SessionKey, initial: Session) -> Result<SessionKey, StoreError>;

    async fn get(&self, key: &SessionKey) -> Result<Session, StoreError>;

    async fn update(&self, key: &SessionKey, session: Session) -> Result<(), StoreError>;
}
