// ==========================================
// 车间电视看板 - 领域类型定义
// ==========================================
// 看板种类 / 看板身份 / 推送更新类型 / 连接状态
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 看板种类 (Board Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoardKind {
    ProductDetail, // 在制品明细看板（按产品族代码）
    GroupOutput,   // 班组产出看板（按产线号）
}

impl BoardKind {
    /// 后端接口路径段: GET /api/display/{segment}
    pub fn api_segment(&self) -> &'static str {
        match self {
            BoardKind::ProductDetail => "cd-product",
            BoardKind::GroupOutput => "qsl",
        }
    }

    /// 身份参数名: ?{param}=<value>
    pub fn identity_param(&self) -> &'static str {
        match self {
            BoardKind::ProductDetail => "code",
            BoardKind::GroupOutput => "line",
        }
    }

    /// 推送通道事件名前缀
    pub fn event_prefix(&self) -> &'static str {
        match self {
            BoardKind::ProductDetail => "cd-product",
            BoardKind::GroupOutput => "qsl",
        }
    }
}

impl fmt::Display for BoardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardKind::ProductDetail => write!(f, "PRODUCT_DETAIL"),
            BoardKind::GroupOutput => write!(f, "GROUP_OUTPUT"),
        }
    }
}

// ==========================================
// 产品族代码 (Product Code)
// ==========================================
// 合法值: cd1 / cd2 / cd3 / cd4（大小写不敏感）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCode {
    Cd1,
    Cd2,
    Cd3,
    Cd4,
}

impl ProductCode {
    pub const ALL: [ProductCode; 4] = [
        ProductCode::Cd1,
        ProductCode::Cd2,
        ProductCode::Cd3,
        ProductCode::Cd4,
    ];

    /// 查询参数形式（小写）
    pub fn as_param(&self) -> &'static str {
        match self {
            ProductCode::Cd1 => "cd1",
            ProductCode::Cd2 => "cd2",
            ProductCode::Cd3 => "cd3",
            ProductCode::Cd4 => "cd4",
        }
    }

    /// 订阅形式（大写，与后端 sheet 名一致）
    pub fn as_wire(&self) -> &'static str {
        match self {
            ProductCode::Cd1 => "CD1",
            ProductCode::Cd2 => "CD2",
            ProductCode::Cd3 => "CD3",
            ProductCode::Cd4 => "CD4",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|code| code.as_param() == normalized)
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_param())
    }
}

// ==========================================
// 产线号 (Line Number)
// ==========================================
// 合法值: 1..=4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineNumber(u8);

impl LineNumber {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for LineNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ==========================================
// 看板身份 (Board Identity)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardIdentity {
    Product(ProductCode),
    Line(LineNumber),
}

impl BoardIdentity {
    pub fn kind(&self) -> BoardKind {
        match self {
            BoardIdentity::Product(_) => BoardKind::ProductDetail,
            BoardIdentity::Line(_) => BoardKind::GroupOutput,
        }
    }

    /// 拉取接口的参数值
    pub fn query_value(&self) -> String {
        match self {
            BoardIdentity::Product(code) => code.as_param().to_string(),
            BoardIdentity::Line(line) => line.to_string(),
        }
    }

    /// 订阅消息体
    pub fn subscribe_payload(&self) -> serde_json::Value {
        match self {
            BoardIdentity::Product(code) => serde_json::json!({ "code": code.as_wire() }),
            BoardIdentity::Line(line) => serde_json::json!({ "line": line.get() }),
        }
    }
}

impl fmt::Display for BoardIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardIdentity::Product(code) => write!(f, "{}", code.as_wire()),
            BoardIdentity::Line(line) => write!(f, "LINE{}", line),
        }
    }
}

// ==========================================
// 推送更新类型 (Update Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateType {
    New,
    Updated,
    Deleted,
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateType::New => write!(f, "new"),
            UpdateType::Updated => write!(f, "updated"),
            UpdateType::Deleted => write!(f, "deleted"),
        }
    }
}

// ==========================================
// 连接状态 (Connectivity)
// ==========================================
// 仅用于状态指示，不阻塞已拉取数据的渲染
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    #[default]
    Disconnected,
    Connected,
}

impl Connectivity {
    pub fn is_connected(&self) -> bool {
        matches!(self, Connectivity::Connected)
    }
}
