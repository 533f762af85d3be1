// ==========================================
// 车间电视看板 - 推送通道连接管理
// ==========================================
// 职责: 维护到推送服务的 WebSocket 连接
// - 每次连接/重连成功后重新发送订阅帧
// - 连接状态与更新载荷通过 mpsc 投递给看板会话
// - 断开后按固定间隔重连
// - ConnectionManager 被丢弃时后台任务立即终止
// ==========================================

use crate::api::error::{BoardError, BoardResult};
use crate::domain::types::BoardIdentity;
use crate::realtime::messages::{ChannelEvent, PushFrame};
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};
use url::Url;

/// 连接结束原因
enum SessionEnd {
    /// 远端关闭或读错误，需要重连
    Lost,
    /// 会话侧已不再接收事件
    ReceiverGone,
}

// ==========================================
// ConnectionManager
// ==========================================
pub struct ConnectionManager {
    identity: BoardIdentity,
    handle: JoinHandle<()>,
}

impl ConnectionManager {
    /// 启动后台连接任务
    ///
    /// # 参数
    /// - push_url: ws:// 或 wss:// 地址
    /// - identity: 订阅的看板身份
    /// - reconnect_delay: 断线重连间隔
    /// - events: 会话事件发送端
    pub fn spawn(
        push_url: &str,
        identity: BoardIdentity,
        reconnect_delay: Duration,
        events: mpsc::UnboundedSender<ChannelEvent>,
    ) -> BoardResult<Self> {
        let url = Url::parse(push_url)
            .map_err(|e| BoardError::Config(format!("推送地址无效 {}: {}", push_url, e)))?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(BoardError::Config(format!(
                "推送地址必须使用 ws/wss 协议: {}",
                push_url
            )));
        }

        let handle = tokio::spawn(run(url, identity, reconnect_delay, events));
        info!(identity = %identity, "推送通道任务已启动");

        Ok(Self { identity, handle })
    }

    pub fn identity(&self) -> BoardIdentity {
        self.identity
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// 主动关闭（等价于丢弃）
    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.handle.abort();
        debug!(identity = %self.identity, "推送通道任务已终止");
    }
}

// ==========================================
// 后台任务
// ==========================================

async fn run(
    url: Url,
    identity: BoardIdentity,
    reconnect_delay: Duration,
    events: mpsc::UnboundedSender<ChannelEvent>,
) {
    let kind = identity.kind();

    loop {
        match connect_async(url.as_str()).await {
            Ok((stream, _)) => {
                info!(identity = %identity, url = %url, "推送通道已连接");
                if events.send(ChannelEvent::Connected).is_err() {
                    return;
                }

                let (mut write, mut read) = stream.split();

                // 每次（重）连接都重新订阅
                match PushFrame::subscribe(&identity).encode() {
                    Ok(text) => {
                        if let Err(e) = write.send(Message::Text(text)).await {
                            warn!(identity = %identity, error = %e, "订阅帧发送失败");
                        }
                    }
                    Err(e) => warn!(identity = %identity, error = %e, "订阅帧编码失败"),
                }

                let end = loop {
                    let Some(message) = read.next().await else {
                        break SessionEnd::Lost;
                    };
                    match message {
                        Ok(Message::Text(text)) => {
                            let frame = match PushFrame::decode(&text) {
                                Ok(frame) => frame,
                                Err(e) => {
                                    warn!(identity = %identity, error = %e, "推送帧无法解析，已丢弃");
                                    continue;
                                }
                            };
                            let Some(event) = ChannelEvent::from_frame(frame, kind) else {
                                continue;
                            };
                            if events.send(event).is_err() {
                                break SessionEnd::ReceiverGone;
                            }
                        }
                        Ok(Message::Close(_)) => break SessionEnd::Lost,
                        Ok(_) => {}
                        Err(e) => {
                            warn!(identity = %identity, error = %e, "推送通道读取失败");
                            break SessionEnd::Lost;
                        }
                    }
                };

                if matches!(end, SessionEnd::ReceiverGone)
                    || events.send(ChannelEvent::Disconnected).is_err()
                {
                    return;
                }
                info!(identity = %identity, "推送通道已断开");
            }
            Err(e) => {
                let err = BoardError::from(e);
                warn!(identity = %identity, error = %err, "推送通道连接失败");
            }
        }

        if events.is_closed() {
            return;
        }
        debug!(
            identity = %identity,
            delay_ms = reconnect_delay.as_millis() as u64,
            "等待重连"
        );
        tokio::time::sleep(reconnect_delay).await;
    }
}
