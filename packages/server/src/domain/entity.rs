//! エンティティ定義
//!
//! オフィス（ルーム）と、その中の参加者・チャット履歴のドメインモデル。
//! オフィスはメンバーマップとチャット履歴を排他的に所有します。

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{
    broadcast::OutboundSender,
    value_object::{ChatText, ConnectionId, MessageId, OfficeId, Timestamp, UserId},
};

/// チャット履歴の保持件数（これを超えると古いものから破棄）
pub const CHAT_HISTORY_CAPACITY: usize = 50;

/// 3 次元座標・回転
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// join 時に座標が省略された場合のスポーン位置
    pub fn spawn_default() -> Self {
        Self {
            x: 0.0,
            y: 1.6,
            z: 5.0,
        }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }
}

/// join 時にアバター設定が省略された場合の既定値
///
/// リレーはアバター設定を不透明な JSON として扱うため、
/// 中身のスキーマはクライアント側の既定値をそのまま写したものです。
pub fn default_customization() -> Value {
    json!({
        "bodyColor": "#3498db",
        "skinColor": "#ffdbac",
        "style": "default",
        "accessories": [],
    })
}

/// オフィスに参加中のメンバー 1 人分の状態
///
/// プレゼンス（位置・向き・アバター設定）と、その接続への
/// 送信チャンネルをまとめて保持します。
#[derive(Debug, Clone)]
pub struct Member {
    /// 参加者 ID（クライアント申告）
    pub user_id: UserId,
    /// 表示名
    pub name: String,
    /// アバター画像の URL（未ログインなら None）
    pub image: Option<String>,
    /// 現在位置
    pub position: Vec3,
    /// 現在の向き
    pub rotation: Vec3,
    /// アバター設定（不透明な JSON）
    pub customization: Value,
    /// このレコードを書き込める接続の ID
    pub connection_id: ConnectionId,
    /// この接続への送信チャンネル
    pub sender: OutboundSender,
    /// 参加時刻
    pub joined_at: Timestamp,
}

/// チャットメッセージ（作成後は不変）
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub user_id: UserId,
    pub user_name: String,
    pub text: ChatText,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    /// 新しいチャットメッセージを作成（ID はタイムスタンプと送信者 ID から導出）
    pub fn new(user_id: UserId, user_name: String, text: ChatText, timestamp: Timestamp) -> Self {
        let id = MessageId::derive(timestamp, &user_id);
        Self {
            id,
            user_id,
            user_name,
            text,
            timestamp,
        }
    }
}

/// オフィスごとのチャット履歴（容量固定の FIFO）
#[derive(Debug, Clone, Default)]
pub struct ChatHistory {
    messages: VecDeque<ChatMessage>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self {
            messages: VecDeque::with_capacity(CHAT_HISTORY_CAPACITY),
        }
    }

    /// 末尾に追加し、容量を超えたら先頭（最古）から破棄する
    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push_back(message);
        while self.messages.len() > CHAT_HISTORY_CAPACITY {
            self.messages.pop_front();
        }
    }

    /// 保持中のメッセージを古い順に返す
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// オフィス（ルーム）エンティティ
///
/// 最初の join で遅延生成され、メンバーが 0 人になった時点で破棄されます。
/// メンバーは参加順に保持します（重複 join は順序を保ったまま置換）。
#[derive(Debug)]
pub struct Office {
    pub id: OfficeId,
    pub members: Vec<Member>,
    pub chat_history: ChatHistory,
    pub created_at: Timestamp,
}

impl Office {
    pub fn new(id: OfficeId, created_at: Timestamp) -> Self {
        Self {
            id,
            members: Vec::new(),
            chat_history: ChatHistory::new(),
            created_at,
        }
    }

    /// メンバーを追加、または同じ userId の既存レコードを置換する
    ///
    /// 置換時は挿入位置を保ったまま上書きし（last join wins）、
    /// 置き換えられた古いレコードを返します。
    pub fn upsert_member(&mut self, member: Member) -> Option<Member> {
        match self
            .members
            .iter_mut()
            .find(|m| m.user_id == member.user_id)
        {
            Some(existing) => Some(std::mem::replace(existing, member)),
            None => {
                self.members.push(member);
                None
            }
        }
    }

    /// 位置・向きを更新する
    ///
    /// userId がメンバーでない場合、または別の接続が所有するレコードの
    /// 場合は何もしません（leave と競合した遅延フレームの no-op 規則）。
    pub fn update_position(
        &mut self,
        user_id: &UserId,
        connection_id: &ConnectionId,
        position: Vec3,
        rotation: Vec3,
    ) -> bool {
        match self.member_mut(user_id, connection_id) {
            Some(member) => {
                member.position = position;
                member.rotation = rotation;
                true
            }
            None => false,
        }
    }

    /// アバター設定を更新する（no-op 規則は update_position と同じ）
    pub fn update_customization(
        &mut self,
        user_id: &UserId,
        connection_id: &ConnectionId,
        customization: Value,
    ) -> bool {
        match self.member_mut(user_id, connection_id) {
            Some(member) => {
                member.customization = customization;
                true
            }
            None => false,
        }
    }

    /// メンバーを削除して返す
    ///
    /// 削除できるのはレコードを所有する接続だけです。再接続に敗れた
    /// 古い接続の切断が、勝った接続のレコードを消すことはありません。
    pub fn remove_member(
        &mut self,
        user_id: &UserId,
        connection_id: &ConnectionId,
    ) -> Option<Member> {
        let index = self
            .members
            .iter()
            .position(|m| m.user_id == *user_id && m.connection_id == *connection_id)?;
        Some(self.members.remove(index))
    }

    /// 指定した userId を除いた現在のメンバー一覧（参加順）
    pub fn presence_snapshot(&self, exclude: &UserId) -> Vec<Member> {
        self.members
            .iter()
            .filter(|m| m.user_id != *exclude)
            .cloned()
            .collect()
    }

    /// チャットメッセージを履歴に追加する
    pub fn append_chat(&mut self, message: ChatMessage) {
        self.chat_history.append(message);
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, user_id: &UserId) -> bool {
        self.members.iter().any(|m| m.user_id == *user_id)
    }

    /// 指定した接続がその userId のレコードを所有しているか
    pub fn owns_member_record(&self, user_id: &UserId, connection_id: &ConnectionId) -> bool {
        self.members
            .iter()
            .any(|m| m.user_id == *user_id && m.connection_id == *connection_id)
    }

    fn member_mut(&mut self, user_id: &UserId, connection_id: &ConnectionId) -> Option<&mut Member> {
        self.members
            .iter_mut()
            .find(|m| m.user_id == *user_id && m.connection_id == *connection_id)
    }
}
