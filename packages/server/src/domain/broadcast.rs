//! ブロードキャスト（ファンアウト）
//!
//! オフィス内の各メンバーが持つ送信チャンネルへ、直列化済みフレームを
//! ベストエフォートで配る処理。配送は per-connection の有界キュー経由で、
//! 詰まった接続へのフレームは落とします（他のメンバーは巻き込まない）。

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::warn;

use super::{entity::Member, value_object::UserId};

/// 接続ごとの送信キューの容量
///
/// キューが満杯の受信者はフレームを取りこぼします。位置更新は後続の
/// フレームで自然に回復するため、容量は「一時的な詰まり」を吸収できる
/// 程度で十分です。
pub const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// 接続への送信チャンネル
///
/// フレームは直列化を 1 回で済ませるため `Arc<String>` で共有します。
pub type OutboundSender = mpsc::Sender<Arc<String>>;

/// メンバー集合へフレームを配送し、キューに積めた件数を返す
///
/// `exclude` に一致するメンバーはスキップします（送信元の除外用）。
/// キューが満杯・切断済みの接続は警告ログを出して飛ばします。
pub fn fan_out(members: &[Member], frame: &Arc<String>, exclude: Option<&UserId>) -> usize {
    let mut delivered = 0;
    for member in members {
        if exclude.is_some_and(|user_id| member.user_id == *user_id) {
            continue;
        }
        match member.sender.try_send(Arc::clone(frame)) {
            Ok(()) => delivered += 1,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(
                    "outbound queue full, dropping frame: user_id = {}",
                    member.user_id
                );
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                // 切断直後の取り残し。leave の掃除が追いつくまでの一瞬だけ起こる
                warn!(
                    "outbound channel closed, dropping frame: user_id = {}",
                    member.user_id
                );
            }
        }
    }
    delivered
}
