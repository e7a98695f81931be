//! InMemory Office Registry 実装
//!
//! ドメイン層が定義する OfficeRegistry trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## ロック規律
//!
//! - オフィスの生成・破棄を伴う操作（join / leave）は、マップロックを
//!   保持したままオフィスロックを取ります。これにより「空になった
//!   オフィスの破棄」と「同じオフィスへの join」が競合しません。
//! - 定常操作（position / avatar-update / chat）はマップロックを
//!   Arc の取り出しにだけ使い、すぐ手放します。
//! - 状態遷移と通知ファンアウトは同じオフィスロックの下で行います。
//!   あるオフィスの全メンバーのキューには、状態変化が同じ順序で
//!   積まれます。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use nakaniwa_shared::time::Clock;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::{
    ChatMessage, ConnectionId, JoinSnapshot, Member, Office, OfficeDetail, OfficeId,
    OfficeRegistry, OfficeSummary, Timestamp, UserId, Vec3, fan_out,
};

/// インメモリ Office Registry 実装
///
/// オフィスごとの実体を `Arc<Mutex<Office>>` で保持し、ドメイン層の
/// OfficeRegistry trait を実装します（依存性の逆転）。
pub struct InMemoryOfficeRegistry {
    /// オフィス ID → オフィス実体
    offices: Mutex<HashMap<OfficeId, Arc<Mutex<Office>>>>,
    /// オフィス生成時刻の取得元
    clock: Arc<dyn Clock>,
}

impl InMemoryOfficeRegistry {
    /// 新しい InMemoryOfficeRegistry を作成
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            offices: Mutex::new(HashMap::new()),
            clock,
        }
    }
}

#[async_trait]
impl OfficeRegistry for InMemoryOfficeRegistry {
    async fn join(
        &self,
        office_id: OfficeId,
        member: Member,
        joined_frame: Arc<String>,
    ) -> JoinSnapshot {
        // 破棄と競合しないよう、マップロックを保持したままオフィスロックを取る
        let mut offices = self.offices.lock().await;
        let office_arc = offices
            .entry(office_id.clone())
            .or_insert_with(|| {
                debug!("office created: office_id = {}", office_id);
                Arc::new(Mutex::new(Office::new(
                    office_id.clone(),
                    Timestamp::new(self.clock.now_millis()),
                )))
            })
            .clone();
        let mut office = office_arc.lock().await;

        let user_id = member.user_id.clone();
        let presence = office.presence_snapshot(&user_id);
        let chat_history = office.chat_history.snapshot();

        if office.upsert_member(member).is_some() {
            debug!(
                "member record replaced (last join wins): user_id = {}, office_id = {}",
                user_id, office_id
            );
        }

        // 参加通知は既存メンバーだけに配る（本人にはスナップショットが届く）
        fan_out(&presence, &joined_frame, None);

        JoinSnapshot {
            presence,
            chat_history,
        }
    }

    async fn leave(
        &self,
        office_id: &OfficeId,
        user_id: &UserId,
        connection_id: &ConnectionId,
        left_frame: Arc<String>,
    ) -> Option<Member> {
        let mut offices = self.offices.lock().await;
        let office_arc = offices.get(office_id)?.clone();
        let mut office = office_arc.lock().await;

        // レコードを所有しない接続（再接続に敗れた側）の退出は no-op
        let removed = office.remove_member(user_id, connection_id)?;
        fan_out(&office.members, &left_frame, None);

        if office.is_empty() {
            offices.remove(office_id);
            debug!("office destroyed: office_id = {}", office_id);
        }

        Some(removed)
    }

    async fn update_position(
        &self,
        office_id: &OfficeId,
        user_id: &UserId,
        connection_id: &ConnectionId,
        position: Vec3,
        rotation: Vec3,
        frame: Arc<String>,
    ) -> bool {
        let office_arc = {
            let offices = self.offices.lock().await;
            match offices.get(office_id) {
                Some(arc) => arc.clone(),
                None => return false,
            }
        };
        let mut office = office_arc.lock().await;

        if !office.update_position(user_id, connection_id, position, rotation) {
            return false;
        }
        fan_out(&office.members, &frame, Some(user_id));
        true
    }

    async fn update_customization(
        &self,
        office_id: &OfficeId,
        user_id: &UserId,
        connection_id: &ConnectionId,
        customization: Value,
        frame: Arc<String>,
    ) -> bool {
        let office_arc = {
            let offices = self.offices.lock().await;
            match offices.get(office_id) {
                Some(arc) => arc.clone(),
                None => return false,
            }
        };
        let mut office = office_arc.lock().await;

        if !office.update_customization(user_id, connection_id, customization) {
            return false;
        }
        fan_out(&office.members, &frame, Some(user_id));
        true
    }

    async fn append_chat(
        &self,
        office_id: &OfficeId,
        user_id: &UserId,
        connection_id: &ConnectionId,
        message: ChatMessage,
        frame: Arc<String>,
    ) -> bool {
        let office_arc = {
            let offices = self.offices.lock().await;
            match offices.get(office_id) {
                Some(arc) => arc.clone(),
                None => return false,
            }
        };
        let mut office = office_arc.lock().await;

        if !office.owns_member_record(user_id, connection_id) {
            return false;
        }
        office.append_chat(message);
        // チャットは送信者本人にも配る
        fan_out(&office.members, &frame, None);
        true
    }

    async fn list_offices(&self) -> Vec<OfficeSummary> {
        let office_arcs: Vec<Arc<Mutex<Office>>> = {
            let offices = self.offices.lock().await;
            offices.values().cloned().collect()
        };

        let mut summaries = Vec::with_capacity(office_arcs.len());
        for office_arc in office_arcs {
            let office = office_arc.lock().await;
            summaries.push(OfficeSummary {
                id: office.id.clone(),
                user_ids: office.members.iter().map(|m| m.user_id.clone()).collect(),
                created_at: office.created_at,
            });
        }
        summaries.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        summaries
    }

    async fn get_office(&self, office_id: &OfficeId) -> Option<OfficeDetail> {
        let office_arc = {
            let offices = self.offices.lock().await;
            offices.get(office_id)?.clone()
        };
        let office = office_arc.lock().await;

        Some(OfficeDetail {
            id: office.id.clone(),
            members: office.members.clone(),
            chat_message_count: office.chat_history.len(),
            created_at: office.created_at,
        })
    }
}
