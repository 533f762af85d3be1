// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use factory_tv_board::domain::group::{Group, GroupSnapshot, HourSlot, HourlyData, Team};
use factory_tv_board::domain::product::{Product, ProductDetail, ProductSnapshot};
use serde::Serialize;
use serde_json::{json, Value};

// ==========================================
// Group 构建器
// ==========================================

pub struct GroupBuilder {
    nhom: String,
    ld_layout: f64,
    thuc_te: f64,
    ke_hoach: f64,
    hourly: HourlyData,
    luy_ke_thuc_hien: f64,
    luy_ke_ke_hoach: f64,
    percent_ht: f64,
}

impl GroupBuilder {
    /// 默认: 编制 5 / 实际 6 / 计划 20 / 累计 40 of 50 / 80%
    pub fn new(nhom: &str) -> Self {
        Self {
            nhom: nhom.to_string(),
            ld_layout: 5.0,
            thuc_te: 6.0,
            ke_hoach: 20.0,
            hourly: HourlyData::default(),
            luy_ke_thuc_hien: 40.0,
            luy_ke_ke_hoach: 50.0,
            percent_ht: 80.0,
        }
    }

    /// 全部数值为 0
    pub fn zero(nhom: &str) -> Self {
        Self {
            ld_layout: 0.0,
            thuc_te: 0.0,
            ke_hoach: 0.0,
            luy_ke_thuc_hien: 0.0,
            luy_ke_ke_hoach: 0.0,
            percent_ht: 0.0,
            ..Self::new(nhom)
        }
    }

    pub fn staffing(mut self, ld_layout: f64, thuc_te: f64) -> Self {
        self.ld_layout = ld_layout;
        self.thuc_te = thuc_te;
        self
    }

    pub fn plan(mut self, ke_hoach: f64) -> Self {
        self.ke_hoach = ke_hoach;
        self
    }

    pub fn cumulative(mut self, thuc_hien: f64, ke_hoach: f64) -> Self {
        self.luy_ke_thuc_hien = thuc_hien;
        self.luy_ke_ke_hoach = ke_hoach;
        self
    }

    pub fn percent(mut self, percent_ht: f64) -> Self {
        self.percent_ht = percent_ht;
        self
    }

    pub fn hourly(mut self, slot: HourSlot, value: f64) -> Self {
        self.hourly.set(slot, value);
        self
    }

    pub fn build(self) -> Group {
        Group {
            nhom: self.nhom,
            ld_layout: self.ld_layout,
            thuc_te: self.thuc_te,
            ke_hoach: self.ke_hoach,
            hourly: self.hourly,
            luy_ke_thuc_hien: self.luy_ke_thuc_hien,
            luy_ke_ke_hoach: self.luy_ke_ke_hoach,
            percent_ht: self.percent_ht,
        }
    }
}

// ==========================================
// Team 构建器
// ==========================================

pub struct TeamBuilder {
    ten_to: String,
    tglv: f64,
    fixed_groups: Vec<Group>,
    extra_groups: Vec<Group>,
}

impl TeamBuilder {
    pub fn new(ten_to: &str) -> Self {
        Self {
            ten_to: ten_to.to_string(),
            tglv: 8.0,
            fixed_groups: Vec::new(),
            extra_groups: Vec::new(),
        }
    }

    pub fn tglv(mut self, tglv: f64) -> Self {
        self.tglv = tglv;
        self
    }

    pub fn fixed(mut self, group: Group) -> Self {
        self.fixed_groups.push(group);
        self
    }

    /// 追加 n 个默认固定分组（G0..Gn-1）
    pub fn fixed_n(mut self, n: usize) -> Self {
        let start = self.fixed_groups.len();
        self.fixed_groups
            .extend((start..start + n).map(|i| GroupBuilder::new(&format!("G{}", i)).build()));
        self
    }

    pub fn extra(mut self, group: Group) -> Self {
        self.extra_groups.push(group);
        self
    }

    /// 追加 n 个默认附加分组（X0..Xn-1）
    pub fn extra_n(mut self, n: usize) -> Self {
        let start = self.extra_groups.len();
        self.extra_groups
            .extend((start..start + n).map(|i| GroupBuilder::new(&format!("X{}", i)).build()));
        self
    }

    pub fn build(self) -> Team {
        Team {
            ten_to: self.ten_to,
            tglv: self.tglv,
            fixed_groups: self.fixed_groups,
            extra_groups: self.extra_groups,
        }
    }
}

// ==========================================
// GroupSnapshot 构建器
// ==========================================

pub struct GroupSnapshotBuilder {
    line: u32,
    last_update: String,
    teams: Vec<Team>,
}

impl GroupSnapshotBuilder {
    pub fn new(line: u32) -> Self {
        Self {
            line,
            last_update: "2026-10-17T08:00:00Z".to_string(),
            teams: Vec::new(),
        }
    }

    pub fn last_update(mut self, ts: &str) -> Self {
        self.last_update = ts.to_string();
        self
    }

    pub fn team(mut self, team: Team) -> Self {
        self.teams.push(team);
        self
    }

    pub fn build(self) -> GroupSnapshot {
        GroupSnapshot {
            line: self.line,
            sheet_name: format!("LINE {}", self.line),
            total_teams: self.teams.len() as u32,
            last_update: self.last_update,
            teams: self.teams,
        }
    }
}

// ==========================================
// Product 构建器
// ==========================================

pub struct ProductBuilder {
    product: Product,
}

fn detail_row(name: &str, hidden: &str) -> ProductDetail {
    ProductDetail {
        nhu_cau_luy_ke: 300.0,
        ten_chi_tiet: name.to_string(),
        ke_hoach_giao: 100.0,
        luy_ke_giao: 80.0,
        con_lai: 20.0,
        ttdb: 5.0,
        can_xu_ly: 15.0,
        hidden: hidden.to_string(),
    }
}

impl ProductBuilder {
    /// 默认主行 "Thân"，无明细
    pub fn new(ma: &str, mau: &str) -> Self {
        Self {
            product: Product {
                ma: ma.to_string(),
                mau: mau.to_string(),
                slkh: 1200.0,
                nhu_cau_luy_ke: 300.0,
                ten_chi_tiet: "Thân".to_string(),
                ke_hoach_giao: 100.0,
                luy_ke_giao: 80.0,
                con_lai: 20.0,
                ttdb: 5.0,
                can_xu_ly: 15.0,
                hidden: String::new(),
                details: Vec::new(),
            },
        }
    }

    /// 全部数值为 0 的产品
    pub fn zero(ma: &str, mau: &str) -> Self {
        let mut builder = Self::new(ma, mau);
        let p = &mut builder.product;
        p.slkh = 0.0;
        p.nhu_cau_luy_ke = 0.0;
        p.ke_hoach_giao = 0.0;
        p.luy_ke_giao = 0.0;
        p.con_lai = 0.0;
        p.ttdb = 0.0;
        p.can_xu_ly = 0.0;
        builder
    }

    pub fn slkh(mut self, slkh: f64) -> Self {
        self.product.slkh = slkh;
        self
    }

    pub fn detail(mut self, name: &str) -> Self {
        self.product.details.push(detail_row(name, ""));
        self
    }

    /// 追加 n 条明细（D0..Dn-1）
    pub fn details_n(mut self, n: usize) -> Self {
        let start = self.product.details.len();
        self.product
            .details
            .extend((start..start + n).map(|i| detail_row(&format!("D{}", i), "")));
        self
    }

    /// 带隐藏标记的明细
    pub fn hidden_detail(mut self, name: &str) -> Self {
        self.product.details.push(detail_row(name, "x"));
        self
    }

    pub fn detail_luy_ke_giao(mut self, index: usize, value: f64) -> Self {
        if let Some(detail) = self.product.details.get_mut(index) {
            detail.luy_ke_giao = value;
        }
        self
    }

    pub fn build(self) -> Product {
        self.product
    }
}

// ==========================================
// ProductSnapshot 构建器
// ==========================================

pub struct ProductSnapshotBuilder {
    sheet: String,
    last_update: String,
    products: Vec<Product>,
}

impl ProductSnapshotBuilder {
    pub fn new(sheet: &str) -> Self {
        Self {
            sheet: sheet.to_string(),
            last_update: "2026-10-17T08:00:00Z".to_string(),
            products: Vec::new(),
        }
    }

    pub fn last_update(mut self, ts: &str) -> Self {
        self.last_update = ts.to_string();
        self
    }

    pub fn product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }

    pub fn build(self) -> ProductSnapshot {
        ProductSnapshot {
            ma_chuyen_line: "KVHB07CD24".to_string(),
            factory: "TS3".to_string(),
            line: "1+4+5".to_string(),
            to: String::new(),
            sheet: self.sheet,
            total_products: self.products.len() as u32,
            last_update: self.last_update,
            products: self.products,
        }
    }
}

// ==========================================
// 推送载荷
// ==========================================

/// 构造一条 "updated" 推送载荷
pub fn push_update<S: Serialize>(snapshot: &S, timestamp: &str) -> Value {
    json!({
        "type": "updated",
        "timestamp": timestamp,
        "data": serde_json::to_value(snapshot).expect("快照序列化失败"),
    })
}
