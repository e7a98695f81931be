//! WebSocket frame DTOs
//!
//! ブラウザクライアントと取り交わす JSON フレームの定義。フィールド名は
//! クライアント実装に合わせて camelCase、`type` タグは kebab-case です。
//! 未知の `type` や必須フィールド欠落はデシリアライズエラーになり、
//! ハンドラ側で読み捨てられます。
//!
//! CLI クライアント (nakaniwa-client) も同じ型を使ってフレームを
//! 送受信するため、どちらの方向も Serialize / Deserialize 両対応です。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::Vec3;

/// クライアント → サーバのフレーム
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientFrame {
    /// オフィスへの参加要求
    ///
    /// `office_id` の欠落はプロトコル違反として `error` フレームを返すため、
    /// ここでは Option で受けてハンドラで検査します。
    Join {
        user_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        office_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        image: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        position: Option<Vec3>,
        #[serde(skip_serializing_if = "Option::is_none")]
        rotation: Option<Vec3>,
        #[serde(skip_serializing_if = "Option::is_none")]
        customization: Option<Value>,
    },
    /// 自分の位置・向きの更新
    Position { position: Vec3, rotation: Vec3 },
    /// 自分のアバター設定の更新
    AvatarUpdate { customization: Value },
    /// チャット送信
    Chat { message: String },
}

/// サーバ → クライアントのフレーム
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerFrame {
    /// join 応答: 参加時点の他メンバー一覧
    Users { users: Vec<UserDto> },
    /// join 応答: 保持中のチャット履歴（空なら送られない）
    ChatHistory { messages: Vec<ChatMessageDto> },
    /// 参加通知
    UserJoined { user: UserDto },
    /// 退出通知
    UserLeft { user_id: String },
    /// 位置更新の中継
    Position {
        user_id: String,
        position: Vec3,
        rotation: Vec3,
    },
    /// アバター設定更新の中継
    AvatarUpdate { user_id: String, customization: Value },
    /// チャットの中継（送信者本人にも届く）
    Chat { message: ChatMessageDto },
    /// プロトコル違反の通知
    Error { message: String },
}

/// メンバー 1 人分のプレゼンス表現
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub name: String,
    /// 未設定ならフィールドごと省略（ブラウザ実装が undefined を送らないのと同じ）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub position: Vec3,
    pub rotation: Vec3,
    pub customization: Value,
}

/// チャットメッセージの wire 表現
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageDto {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub message: String,
    /// Unix epoch ミリ秒 (UTC)
    pub timestamp: i64,
}
