//! Value Object 定義
//!
//! 識別子やタイムスタンプなど、同値性が値そのもので決まる型を定義します。
//! 生成時にバリデーションを行い、以降は不変です。

use std::fmt;

use uuid::Uuid;

use super::error::DomainError;

/// User ID の最大長（文字数）
const USER_ID_MAX_CHARS: usize = 128;

/// Office ID の最大長（文字数）
const OFFICE_ID_MAX_CHARS: usize = 128;

/// チャット本文の最大長（文字数）
const CHAT_TEXT_MAX_CHARS: usize = 1000;

/// 常設のパブリックオフィスを表す Office ID
pub const GLOBAL_OFFICE_ID: &str = "global";

/// 参加者を一意に識別する ID（クライアントが join 時に申告する）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// 新しい UserId を作成（空文字・長すぎる文字列は拒否）
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::EmptyUserId);
        }
        let chars = value.chars().count();
        if chars > USER_ID_MAX_CHARS {
            return Err(DomainError::UserIdTooLong {
                max: USER_ID_MAX_CHARS,
                actual: chars,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// オフィス（ルーム）を識別する ID
///
/// `"global"` は常設のパブリックオフィスを表す番兵値で、
/// それ以外は呼び出し側が自由に決める不透明な文字列です。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OfficeId(String);

impl OfficeId {
    /// 新しい OfficeId を作成（空文字・長すぎる文字列は拒否）
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::EmptyOfficeId);
        }
        let chars = value.chars().count();
        if chars > OFFICE_ID_MAX_CHARS {
            return Err(DomainError::OfficeIdTooLong {
                max: OFFICE_ID_MAX_CHARS,
                actual: chars,
            });
        }
        Ok(Self(value))
    }

    /// パブリックオフィスの OfficeId を返す
    pub fn global() -> Self {
        Self(GLOBAL_OFFICE_ID.to_string())
    }

    /// パブリックオフィスかどうか
    pub fn is_global(&self) -> bool {
        self.0 == GLOBAL_OFFICE_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for OfficeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// WebSocket 接続 1 本を識別する ID
///
/// 同じ userId での再接続（last join wins）後に、敗れた側の接続からの
/// フレームが勝った側のレコードを書き換えないようにするための識別子。
/// クライアントには公開されない内部 ID です。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// 新しい ConnectionId を採番する
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unix タイムスタンプ（UTC、ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// チャットメッセージの本文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatText(String);

impl ChatText {
    /// 新しい ChatText を作成（空文字・長すぎる文字列は拒否）
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::EmptyChatText);
        }
        let chars = value.chars().count();
        if chars > CHAT_TEXT_MAX_CHARS {
            return Err(DomainError::ChatTextTooLong {
                max: CHAT_TEXT_MAX_CHARS,
                actual: chars,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// チャットメッセージの ID
///
/// 作成時刻と送信者 ID から導出します。同一ミリ秒内の同一送信者では
/// 衝突し得ますが、UI のリストキー用途のみで重複排除には使いません。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageId(String);

impl MessageId {
    /// タイムスタンプと送信者 ID からメッセージ ID を導出する
    pub fn derive(timestamp: Timestamp, user_id: &UserId) -> Self {
        Self(format!("{}-{}", timestamp.value(), user_id.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}
