//! UseCase 層
//!
//! 1 操作 = 1 ユースケース。ドメイン層のインターフェース
//! (`OfficeRegistry`) にのみ依存し、wire 形式（直列化済み JSON）は
//! UI 層から受け取ります。

pub mod error;
pub mod get_office_detail;
pub mod get_offices;
pub mod join_office;
pub mod leave_office;
pub mod send_chat;
pub mod update_presence;

pub use error::{GetOfficeDetailError, PresenceUpdateError, SendChatError};
pub use get_office_detail::GetOfficeDetailUseCase;
pub use get_offices::GetOfficesUseCase;
pub use join_office::JoinOfficeUseCase;
pub use leave_office::LeaveOfficeUseCase;
pub use send_chat::SendChatUseCase;
pub use update_presence::UpdatePresenceUseCase;
