// ==========================================
// 车间电视看板 - 推送通道消息
// ==========================================
// 帧格式: { "event": <事件名>, "data": <载荷> }（WebSocket 文本帧）
// 事件名（按看板种类前缀）:
//   subscribe-<prefix>              客户端 → 服务端，订阅看板身份
//   <prefix>-subscription-confirmed 服务端 → 客户端，订阅确认
//   <prefix>-update                 服务端 → 客户端，整体替换载荷
// ==========================================

use crate::api::error::{BoardError, BoardResult};
use crate::domain::types::{BoardIdentity, BoardKind, UpdateType};
use serde::{Deserialize, Serialize};

// ==========================================
// PushFrame - 通道帧
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushFrame {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl PushFrame {
    pub fn encode(&self) -> BoardResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(raw: &str) -> BoardResult<Self> {
        serde_json::from_str(raw).map_err(|e| BoardError::MalformedPayload(e.to_string()))
    }

    /// 订阅帧（每次连接/重连后发送）
    pub fn subscribe(identity: &BoardIdentity) -> Self {
        Self {
            event: EventNames::for_kind(identity.kind()).subscribe,
            data: identity.subscribe_payload(),
        }
    }
}

// ==========================================
// EventNames - 事件名
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventNames {
    pub subscribe: String,
    pub confirmed: String,
    pub update: String,
}

impl EventNames {
    pub fn for_kind(kind: BoardKind) -> Self {
        let prefix = kind.event_prefix();
        Self {
            subscribe: format!("subscribe-{}", prefix),
            confirmed: format!("{}-subscription-confirmed", prefix),
            update: format!("{}-update", prefix),
        }
    }
}

// ==========================================
// PushUpdate - 更新载荷
// ==========================================
// timestamp 或 data 缺失 → 畸形载荷，丢弃
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PushUpdate<S> {
    #[serde(rename = "type", default)]
    pub update_type: Option<UpdateType>,
    pub data: Option<S>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// 校验通过的更新
#[derive(Debug, Clone, PartialEq)]
pub struct ValidUpdate<S> {
    pub update_type: UpdateType,
    pub snapshot: S,
    pub timestamp: String,
}

impl<S: serde::de::DeserializeOwned> PushUpdate<S> {
    /// 解析并校验更新载荷
    pub fn parse(value: serde_json::Value) -> BoardResult<ValidUpdate<S>> {
        let update: PushUpdate<S> = serde_json::from_value(value)
            .map_err(|e| BoardError::MalformedPayload(e.to_string()))?;
        update.validate()
    }
}

impl<S> PushUpdate<S> {
    pub fn validate(self) -> BoardResult<ValidUpdate<S>> {
        let timestamp = self
            .timestamp
            .filter(|ts| !ts.trim().is_empty())
            .ok_or_else(|| BoardError::MalformedPayload("缺少 timestamp".to_string()))?;
        let snapshot = self
            .data
            .ok_or_else(|| BoardError::MalformedPayload("缺少 data".to_string()))?;

        Ok(ValidUpdate {
            update_type: self.update_type.unwrap_or(UpdateType::Updated),
            snapshot,
            timestamp,
        })
    }
}

// ==========================================
// ChannelEvent - 推送层向会话投递的事件
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    Connected,
    Disconnected,
    SubscriptionConfirmed,
    /// 未校验的更新载荷
    Update(serde_json::Value),
}

impl ChannelEvent {
    /// 将通道帧归类为会话事件；无关事件返回 None
    pub fn from_frame(frame: PushFrame, kind: BoardKind) -> Option<Self> {
        let names = EventNames::for_kind(kind);
        if frame.event == names.confirmed {
            Some(ChannelEvent::SubscriptionConfirmed)
        } else if frame.event == names.update {
            Some(ChannelEvent::Update(frame.data))
        } else {
            None
        }
    }
}
