// ==========================================
// 车间电视看板 - 在制品明细快照领域模型
// ==========================================
// 数据源: GET /api/display/cd-product?code=cdN
// 字段名与后端 JSON 保持一致 (camelCase)
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ProductDetail - 产品明细行
// ==========================================
// 与主行相同的数值字段集，不含身份字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(default)]
    pub nhu_cau_luy_ke: f64,    // 累计需求
    #[serde(default)]
    pub ten_chi_tiet: String,   // 明细名称
    #[serde(default)]
    pub ke_hoach_giao: f64,     // 计划交付
    #[serde(default)]
    pub luy_ke_giao: f64,       // 累计交付
    #[serde(default)]
    pub con_lai: f64,           // 剩余
    #[serde(default)]
    pub ttdb: f64,              // 库存
    #[serde(default)]
    pub can_xu_ly: f64,         // 待处理
    #[serde(default)]
    pub hidden: String,         // 隐藏标记（非空即隐藏）
}

// ==========================================
// Product - 产品（看板实体）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    // ===== 身份字段 =====
    pub ma: String,             // 款号 (STYLE)
    #[serde(default)]
    pub mau: String,            // 颜色

    // ===== 需求 =====
    #[serde(default)]
    pub slkh: f64,              // 计划数量
    #[serde(default)]
    pub nhu_cau_luy_ke: f64,    // 累计需求

    // ===== 主行明细字段 =====
    #[serde(default)]
    pub ten_chi_tiet: String,
    #[serde(default)]
    pub ke_hoach_giao: f64,
    #[serde(default)]
    pub luy_ke_giao: f64,
    #[serde(default)]
    pub con_lai: f64,
    #[serde(default)]
    pub ttdb: f64,
    #[serde(default)]
    pub can_xu_ly: f64,
    #[serde(default)]
    pub hidden: String,

    /// 明细行（顺序即显示顺序）
    #[serde(default)]
    pub details: Vec<ProductDetail>,
}

impl Product {
    /// 主行 + 全部明细行的数值字段是否全为 0
    pub fn is_numerically_empty(&self) -> bool {
        let main_zero = [
            self.slkh,
            self.nhu_cau_luy_ke,
            self.ke_hoach_giao,
            self.luy_ke_giao,
            self.con_lai,
            self.ttdb,
            self.can_xu_ly,
        ]
        .iter()
        .all(|v| *v == 0.0);

        main_zero
            && self.details.iter().all(|d| {
                [
                    d.nhu_cau_luy_ke,
                    d.ke_hoach_giao,
                    d.luy_ke_giao,
                    d.con_lai,
                    d.ttdb,
                    d.can_xu_ly,
                ]
                .iter()
                .all(|v| *v == 0.0)
            })
    }

    /// 主行（产品自身的明细字段）
    pub fn main_row(&self) -> ProductDetail {
        ProductDetail {
            nhu_cau_luy_ke: self.nhu_cau_luy_ke,
            ten_chi_tiet: self.ten_chi_tiet.clone(),
            ke_hoach_giao: self.ke_hoach_giao,
            luy_ke_giao: self.luy_ke_giao,
            con_lai: self.con_lai,
            ttdb: self.ttdb,
            can_xu_ly: self.can_xu_ly,
            hidden: self.hidden.clone(),
        }
    }

    /// 轮播标签: "款号/颜色"
    pub fn slide_label(&self) -> String {
        format!("{}/{}", self.ma, self.mau)
    }
}

// ==========================================
// ProductSnapshot - 在制品明细快照
// ==========================================
// 到达即不可变；每次更新整体替换
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    // ===== 元数据 =====
    #[serde(default)]
    pub ma_chuyen_line: String, // 产线编码
    #[serde(default)]
    pub factory: String,        // 工厂
    #[serde(default)]
    pub line: String,           // 线别
    #[serde(default)]
    pub to: String,             // 班组
    #[serde(default)]
    pub sheet: String,          // 表名 (CD1..CD4)
    #[serde(default)]
    pub total_products: u32,
    #[serde(default)]
    pub last_update: String,    // ISO 时间戳

    /// 产品列表（数组顺序即显示顺序，不做隐式排序）
    #[serde(default)]
    pub products: Vec<Product>,
}
