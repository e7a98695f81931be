//! Infrastructure 層
//!
//! ドメイン層のインターフェース（`OfficeRegistry`）の具体的な実装と、
//! プロトコル境界の DTO を提供します。

pub mod dto;
pub mod registry;
