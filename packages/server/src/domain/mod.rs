//! ドメイン層
//!
//! オフィス・参加者・チャット履歴のドメインモデルと、
//! ドメイン層が必要とするインターフェース（OfficeRegistry）を定義します。

pub mod broadcast;
pub mod entity;
pub mod error;
pub mod registry;
pub mod value_object;

pub use broadcast::{OUTBOUND_QUEUE_CAPACITY, OutboundSender, fan_out};
pub use entity::{
    CHAT_HISTORY_CAPACITY, ChatHistory, ChatMessage, Member, Office, Vec3, default_customization,
};
pub use error::DomainError;
pub use registry::{JoinSnapshot, OfficeDetail, OfficeRegistry, OfficeSummary};
pub use value_object::{ChatText, ConnectionId, MessageId, OfficeId, Timestamp, UserId};

#[cfg(test)]
pub use registry::MockOfficeRegistry;
