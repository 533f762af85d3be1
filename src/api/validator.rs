// ==========================================
// 车间电视看板 - 身份参数校验
// ==========================================
// 规则:
// - 参数缺失 → 使用默认值（cd1 / 产线 1）
// - 参数非法 → InvalidParameter，不发起拉取
// ==========================================

use crate::api::error::{BoardError, BoardResult};
use crate::domain::types::{BoardIdentity, BoardKind, LineNumber, ProductCode};

pub const DEFAULT_PRODUCT_CODE: ProductCode = ProductCode::Cd1;
pub const DEFAULT_LINE: u8 = 1;

/// 解析产品族代码
pub fn parse_product_code(raw: Option<&str>) -> BoardResult<ProductCode> {
    let value = match raw.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v,
        None => return Ok(DEFAULT_PRODUCT_CODE),
    };

    ProductCode::parse(value).ok_or_else(|| BoardError::InvalidParameter {
        param: BoardKind::ProductDetail.identity_param().to_string(),
        value: value.to_string(),
        expected: ProductCode::ALL
            .iter()
            .map(|c| c.as_param())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// 解析产线号
pub fn parse_line(raw: Option<&str>) -> BoardResult<LineNumber> {
    let value = match raw.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v,
        None => {
            return LineNumber::new(DEFAULT_LINE)
                .ok_or_else(|| BoardError::Config("默认产线号越界".to_string()))
        }
    };

    value
        .parse::<u8>()
        .ok()
        .and_then(LineNumber::new)
        .ok_or_else(|| BoardError::InvalidParameter {
            param: BoardKind::GroupOutput.identity_param().to_string(),
            value: value.to_string(),
            expected: format!("{}..{}", LineNumber::MIN, LineNumber::MAX),
        })
}

/// 按看板种类解析身份参数
pub fn parse_identity(kind: BoardKind, raw: Option<&str>) -> BoardResult<BoardIdentity> {
    match kind {
        BoardKind::ProductDetail => parse_product_code(raw).map(BoardIdentity::Product),
        BoardKind::GroupOutput => parse_line(raw).map(BoardIdentity::Line),
    }
}
