//! Integration tests driving the relay over real WebSocket connections.
//!
//! 各テストは実サーバをエフェメラルポートで立ち上げ、tokio-tungstenite の
//! 実クライアントでプロトコルを最初から最後まで喋ります。HTTP の内観
//! エンドポイントは reqwest で叩きます。

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{sleep, timeout};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message,
};

use nakaniwa_server::{
    infrastructure::registry::InMemoryOfficeRegistry,
    ui::Server,
    usecase::{
        GetOfficeDetailUseCase, GetOfficesUseCase, JoinOfficeUseCase, LeaveOfficeUseCase,
        SendChatUseCase, UpdatePresenceUseCase,
    },
};
use nakaniwa_shared::time::SystemClock;

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// 実サーバをエフェメラルポートで起動し、バインド先アドレスを返す
async fn start_server() -> SocketAddr {
    let registry = Arc::new(InMemoryOfficeRegistry::new(Arc::new(SystemClock)));
    let server = Server::new(
        Arc::new(JoinOfficeUseCase::new(registry.clone())),
        Arc::new(LeaveOfficeUseCase::new(registry.clone())),
        Arc::new(UpdatePresenceUseCase::new(registry.clone())),
        Arc::new(SendChatUseCase::new(registry.clone())),
        Arc::new(GetOfficesUseCase::new(registry.clone())),
        Arc::new(GetOfficeDetailUseCase::new(registry.clone())),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server.serve(listener));
    addr
}

async fn connect(addr: SocketAddr) -> WsClient {
    let (ws, _) = connect_async(format!("ws://{addr}/api/ws")).await.unwrap();
    ws
}

async fn send_json(ws: &mut WsClient, frame: Value) {
    ws.send(Message::Text(frame.to_string().into()))
        .await
        .unwrap();
}

/// 次のテキストフレームを最大 5 秒待って JSON として返す
async fn recv_json(ws: &mut WsClient) -> Value {
    loop {
        let msg = timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for frame")
            .expect("connection closed")
            .expect("websocket error");
        match msg {
            Message::Text(text) => return serde_json::from_str(text.as_str()).unwrap(),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected message: {other:?}"),
        }
    }
}

/// しばらく待ってもフレームが届かないことを確認する
async fn expect_no_frame(ws: &mut WsClient) {
    let result = timeout(Duration::from_millis(300), ws.next()).await;
    assert!(result.is_err(), "expected silence but got: {result:?}");
}

/// join を送り、users 応答を受け取って返す
async fn join(ws: &mut WsClient, user_id: &str, office_id: &str) -> Value {
    send_json(
        ws,
        json!({
            "type": "join",
            "userId": user_id,
            "officeId": office_id,
            "name": user_id.to_uppercase(),
        }),
    )
    .await;
    let users = recv_json(ws).await;
    assert_eq!(users["type"], "users");
    users
}

#[tokio::test]
async fn test_health_endpoint() {
    // テスト項目: ヘルスチェックが {"status":"ok"} を返す
    // given (前提条件):
    let addr = start_server().await;

    // when (操作):
    let body: Value = reqwest::get(format!("http://{addr}/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_join_empty_office_returns_empty_users_and_no_history() {
    // テスト項目: 誰もいないオフィスへの join は空の users を返し、
    //             chat-history は送られない
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = connect(addr).await;

    // when (操作):
    let users = join(&mut alice, "alice", "main").await;

    // then (期待する結果):
    assert_eq!(users["users"].as_array().unwrap().len(), 0);
    expect_no_frame(&mut alice).await;
}

#[tokio::test]
async fn test_join_sees_existing_members_and_notifies_them() {
    // テスト項目: 後から join した人は既存メンバー一覧を受け取り、
    //             既存メンバーには user-joined が届く
    // given (前提条件): alice が main に参加済み
    let addr = start_server().await;
    let mut alice = connect(addr).await;
    join(&mut alice, "alice", "main").await;

    // when (操作): bob が同じオフィスに参加する
    let mut bob = connect(addr).await;
    let users = join(&mut bob, "bob", "main").await;

    // then (期待する結果): bob の users に alice がスポーン既定値込みで入り、
    //                      alice には user-joined(bob) が届く
    let entries = users["users"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["id"], "alice");
    assert_eq!(entries[0]["name"], "ALICE");
    assert_eq!(entries[0]["position"], json!({"x": 0.0, "y": 1.6, "z": 5.0}));
    assert_eq!(entries[0]["customization"]["bodyColor"], "#3498db");
    assert!(entries[0].get("image").is_none());

    let joined = recv_json(&mut alice).await;
    assert_eq!(joined["type"], "user-joined");
    assert_eq!(joined["user"]["id"], "bob");
}

#[tokio::test]
async fn test_join_without_office_id_gets_error_frame() {
    // テスト項目: officeId の無い join に error フレームが返り、接続は生き続ける
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = connect(addr).await;

    // when (操作):
    send_json(&mut alice, json!({"type": "join", "userId": "alice"})).await;

    // then (期待する結果):
    let error = recv_json(&mut alice).await;
    assert_eq!(error["type"], "error");
    assert_eq!(error["message"], "officeId is required");

    // 同じ接続でやり直せる
    let users = join(&mut alice, "alice", "main").await;
    assert_eq!(users["users"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_position_relayed_to_roommates_excluding_sender() {
    // テスト項目: 位置更新が同じオフィスの他メンバーにだけ中継される
    //             （送信者本人と別オフィスには届かない）
    // given (前提条件): alice と bob が main、charlie が annex に参加済み
    let addr = start_server().await;
    let mut alice = connect(addr).await;
    join(&mut alice, "alice", "main").await;
    let mut bob = connect(addr).await;
    join(&mut bob, "bob", "main").await;
    let joined = recv_json(&mut alice).await;
    assert_eq!(joined["type"], "user-joined");
    let mut charlie = connect(addr).await;
    join(&mut charlie, "charlie", "annex").await;

    // when (操作): alice が位置を送る
    send_json(
        &mut alice,
        json!({
            "type": "position",
            "position": {"x": 2.0, "y": 1.6, "z": -1.0},
            "rotation": {"x": 0.0, "y": 1.57, "z": 0.0},
        }),
    )
    .await;

    // then (期待する結果): bob にだけ届く
    let relayed = recv_json(&mut bob).await;
    assert_eq!(relayed["type"], "position");
    assert_eq!(relayed["userId"], "alice");
    assert_eq!(relayed["position"]["x"], 2.0);
    assert_eq!(relayed["rotation"]["y"], 1.57);

    expect_no_frame(&mut alice).await;
    expect_no_frame(&mut charlie).await;
}

#[tokio::test]
async fn test_avatar_update_relayed_excluding_sender() {
    // テスト項目: アバター更新が送信者以外に中継される
    // given (前提条件): alice と bob が main に参加済み
    let addr = start_server().await;
    let mut alice = connect(addr).await;
    join(&mut alice, "alice", "main").await;
    let mut bob = connect(addr).await;
    join(&mut bob, "bob", "main").await;
    recv_json(&mut alice).await; // user-joined(bob)

    // when (操作):
    send_json(
        &mut alice,
        json!({
            "type": "avatar-update",
            "customization": {"bodyColor": "#000000", "accessories": ["hat"]},
        }),
    )
    .await;

    // then (期待する結果):
    let relayed = recv_json(&mut bob).await;
    assert_eq!(relayed["type"], "avatar-update");
    assert_eq!(relayed["userId"], "alice");
    assert_eq!(relayed["customization"]["bodyColor"], "#000000");
    assert_eq!(relayed["customization"]["accessories"][0], "hat");

    expect_no_frame(&mut alice).await;
}

#[tokio::test]
async fn test_chat_echoes_to_sender_and_broadcasts() {
    // テスト項目: チャットが送信者本人を含む全員に、サーバ採番の
    //             id / timestamp 付きで届く
    // given (前提条件): alice と bob が main に参加済み
    let addr = start_server().await;
    let mut alice = connect(addr).await;
    join(&mut alice, "alice", "main").await;
    let mut bob = connect(addr).await;
    join(&mut bob, "bob", "main").await;
    recv_json(&mut alice).await; // user-joined(bob)

    // when (操作): alice がチャットを送る
    send_json(&mut alice, json!({"type": "chat", "message": "hello"})).await;

    // then (期待する結果): 本人へのエコーと bob への配送が同じ内容になる
    let echoed = recv_json(&mut alice).await;
    assert_eq!(echoed["type"], "chat");
    assert_eq!(echoed["message"]["userId"], "alice");
    assert_eq!(echoed["message"]["userName"], "ALICE");
    assert_eq!(echoed["message"]["message"], "hello");
    assert!(echoed["message"]["timestamp"].as_i64().unwrap() > 0);
    assert!(!echoed["message"]["id"].as_str().unwrap().is_empty());

    let relayed = recv_json(&mut bob).await;
    assert_eq!(relayed["message"]["id"], echoed["message"]["id"]);
}

#[tokio::test]
async fn test_chat_history_replayed_to_late_joiner() {
    // テスト項目: 後から join した人に chat-history が古い順で届く
    // given (前提条件): alice がチャットを 2 件送信済み
    let addr = start_server().await;
    let mut alice = connect(addr).await;
    join(&mut alice, "alice", "main").await;
    send_json(&mut alice, json!({"type": "chat", "message": "first"})).await;
    recv_json(&mut alice).await;
    send_json(&mut alice, json!({"type": "chat", "message": "second"})).await;
    recv_json(&mut alice).await;

    // when (操作): bob が参加する
    let mut bob = connect(addr).await;
    join(&mut bob, "bob", "main").await;

    // then (期待する結果): users の直後に chat-history が届く
    let history = recv_json(&mut bob).await;
    assert_eq!(history["type"], "chat-history");
    let messages = history["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["message"], "first");
    assert_eq!(messages[1]["message"], "second");
}

#[tokio::test]
async fn test_chat_is_isolated_between_offices() {
    // テスト項目: チャットが別のオフィスに漏れない
    // given (前提条件): alice は main、charlie は annex に参加済み
    let addr = start_server().await;
    let mut alice = connect(addr).await;
    join(&mut alice, "alice", "main").await;
    let mut charlie = connect(addr).await;
    join(&mut charlie, "charlie", "annex").await;

    // when (操作):
    send_json(&mut alice, json!({"type": "chat", "message": "secret"})).await;

    // then (期待する結果): alice にはエコーが届き、charlie には何も届かない
    let echoed = recv_json(&mut alice).await;
    assert_eq!(echoed["type"], "chat");
    expect_no_frame(&mut charlie).await;
}

#[tokio::test]
async fn test_user_left_broadcast_on_disconnect() {
    // テスト項目: 切断で残りのメンバーに user-left が届く
    // given (前提条件): alice と bob が main に参加済み
    let addr = start_server().await;
    let mut alice = connect(addr).await;
    join(&mut alice, "alice", "main").await;
    let mut bob = connect(addr).await;
    join(&mut bob, "bob", "main").await;
    recv_json(&mut alice).await; // user-joined(bob)

    // when (操作): bob が切断する
    bob.close(None).await.unwrap();

    // then (期待する結果):
    let left = recv_json(&mut alice).await;
    assert_eq!(left["type"], "user-left");
    assert_eq!(left["userId"], "bob");
}

#[tokio::test]
async fn test_duplicate_join_last_wins() {
    // テスト項目: 同じ userId の再接続が勝ち、古い接続の切断が
    //             勝った接続のレコードを消さない
    // given (前提条件): alice (接続 1) と bob が main に参加済み
    let addr = start_server().await;
    let mut alice1 = connect(addr).await;
    join(&mut alice1, "alice", "main").await;
    let mut bob = connect(addr).await;
    join(&mut bob, "bob", "main").await;
    recv_json(&mut alice1).await; // user-joined(bob)

    // when (操作): alice が接続 2 で再 join し、その後で接続 1 を閉じる
    let mut alice2 = connect(addr).await;
    let users = join(&mut alice2, "alice", "main").await;
    // 再 join のスナップショットに自分の古いレコードは含まれない
    let entries = users["users"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["id"], "bob");
    let rejoined = recv_json(&mut bob).await;
    assert_eq!(rejoined["type"], "user-joined");
    assert_eq!(rejoined["user"]["id"], "alice");

    alice1.close(None).await.unwrap();

    // then (期待する結果): 古い接続の切断では user-left が流れず、
    //                      勝った接続からの更新は通る
    expect_no_frame(&mut bob).await;

    send_json(
        &mut alice2,
        json!({
            "type": "position",
            "position": {"x": 9.0, "y": 1.6, "z": 0.0},
            "rotation": {"x": 0.0, "y": 0.0, "z": 0.0},
        }),
    )
    .await;
    let relayed = recv_json(&mut bob).await;
    assert_eq!(relayed["type"], "position");
    assert_eq!(relayed["userId"], "alice");
    assert_eq!(relayed["position"]["x"], 9.0);
}

#[tokio::test]
async fn test_second_join_switches_office() {
    // テスト項目: 同一接続からの 2 回目の join が「前のオフィスから退出して
    //             新しいオフィスに参加」として扱われる
    // given (前提条件): alice と bob は main、charlie は annex に参加済み
    let addr = start_server().await;
    let mut alice = connect(addr).await;
    join(&mut alice, "alice", "main").await;
    let mut bob = connect(addr).await;
    join(&mut bob, "bob", "main").await;
    recv_json(&mut alice).await; // user-joined(bob)
    let mut charlie = connect(addr).await;
    join(&mut charlie, "charlie", "annex").await;

    // when (操作): alice が annex へ join し直す
    let users = join(&mut alice, "alice", "annex").await;

    // then (期待する結果): main には user-left、annex には user-joined が流れる
    let entries = users["users"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["id"], "charlie");

    let left = recv_json(&mut bob).await;
    assert_eq!(left["type"], "user-left");
    assert_eq!(left["userId"], "alice");

    let joined = recv_json(&mut charlie).await;
    assert_eq!(joined["type"], "user-joined");
    assert_eq!(joined["user"]["id"], "alice");
}

#[tokio::test]
async fn test_unknown_frame_type_is_ignored() {
    // テスト項目: 未知の type のフレームが接続を壊さない
    // given (前提条件): alice が main に参加済み
    let addr = start_server().await;
    let mut alice = connect(addr).await;
    join(&mut alice, "alice", "main").await;

    // when (操作): 未知のフレームを送ってからチャットを送る
    send_json(&mut alice, json!({"type": "dance", "style": "robot"})).await;
    send_json(&mut alice, json!({"type": "chat", "message": "still here"})).await;

    // then (期待する結果): チャットのエコーが届く（接続は生きている）
    let echoed = recv_json(&mut alice).await;
    assert_eq!(echoed["type"], "chat");
    assert_eq!(echoed["message"]["message"], "still here");
}

#[tokio::test]
async fn test_offices_endpoints_reflect_live_state() {
    // テスト項目: /api/offices と /api/offices/{id} が現在の状態を返す
    // given (前提条件): alice は alpha、bob は beta に参加済み
    let addr = start_server().await;
    let mut alice = connect(addr).await;
    join(&mut alice, "alice", "alpha").await;
    let mut bob = connect(addr).await;
    join(&mut bob, "bob", "beta").await;

    // when (操作):
    let summaries: Value = reqwest::get(format!("http://{addr}/api/offices"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果): ID 順のサマリが返る
    let list = summaries.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], "alpha");
    assert_eq!(list[0]["userCount"], 1);
    assert_eq!(list[0]["userIds"][0], "alice");
    assert_eq!(list[1]["id"], "beta");

    let detail: Value = reqwest::get(format!("http://{addr}/api/offices/alpha"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["id"], "alpha");
    assert_eq!(detail["users"][0]["id"], "alice");
    assert_eq!(detail["chatMessageCount"], 0);
    assert!(!detail["createdAt"].as_str().unwrap().is_empty());

    let missing = reqwest::get(format!("http://{addr}/api/offices/nowhere"))
        .await
        .unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_office_destroyed_after_last_leave() {
    // テスト項目: 最後の 1 人が切断するとオフィスが一覧から消える
    // given (前提条件): alice だけが temp に参加済み
    let addr = start_server().await;
    let mut alice = connect(addr).await;
    join(&mut alice, "alice", "temp").await;

    // when (操作): alice が切断する
    alice.close(None).await.unwrap();

    // then (期待する結果): 退出処理が走り次第、一覧が空になる
    for _ in 0..50 {
        let summaries: Value = reqwest::get(format!("http://{addr}/api/offices"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        if summaries.as_array().unwrap().is_empty() {
            return;
        }
        sleep(Duration::from_millis(50)).await;
    }
    panic!("office was not destroyed after last leave");
}
