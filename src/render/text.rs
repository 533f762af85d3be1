// ==========================================
// 车间电视看板 - 文本渲染
// ==========================================
// 将 BoardView 渲染为纯文本整屏帧（终端 / 日志回放）
// 闪烁单元格以 *值* 标出；全屏状态只输出一条提示
// ==========================================

use crate::app::view::{BoardView, CellView, Metric, ReadyView, TableView};
use std::fmt::Write;

const FLASH_MARK: char = '*';

/// 渲染一帧
pub fn render(view: &BoardView) -> String {
    match view {
        BoardView::Loading { title } => format!("[{}] Đang tải dữ liệu...\n", title),
        BoardView::Error { message } => format!("⚠ Lỗi: {}\n", message),
        BoardView::InvalidParameter { message } => format!("⚠ Tham số không hợp lệ: {}\n", message),
        BoardView::NoData { title } => format!("[{}] Không có dữ liệu\n", title),
        BoardView::Ready(ready) => render_ready(ready),
    }
}

fn render_ready(view: &ReadyView) -> String {
    let mut out = String::new();

    let status = if view.connected { "●" } else { "○" };
    let _ = writeln!(
        out,
        "{} {}  |  {}  |  {}",
        status, view.title, view.slide_label, view.last_update
    );
    let _ = writeln!(out, "{}", metrics_line(&view.header));

    for (i, table) in view.tables.iter().enumerate() {
        if i > 0 || view.layout.split.is_some() {
            out.push('\n');
        }
        render_table(&mut out, table);
    }

    out.push('\n');
    let _ = writeln!(out, "{}", indicator_line(view));

    if let Some(countdown) = &view.countdown {
        let _ = writeln!(
            out,
            "Chuyển sang {} sau {}s",
            countdown.next_label, countdown.seconds
        );
    }
    if view.paused {
        let _ = writeln!(out, "(tạm dừng)");
    }

    out
}

fn cell_text(cell: &CellView) -> String {
    if cell.flash {
        format!("{}{}{}", FLASH_MARK, cell.text, FLASH_MARK)
    } else {
        cell.text.clone()
    }
}

fn metrics_line(metrics: &[Metric]) -> String {
    metrics
        .iter()
        .map(|m| {
            if m.flash {
                format!("{}: {}{}{}", m.label, FLASH_MARK, m.value, FLASH_MARK)
            } else {
                format!("{}: {}", m.label, m.value)
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn render_table(out: &mut String, table: &TableView) {
    if let Some(title) = &table.title {
        let summary = metrics_line(&table.summary);
        if summary.is_empty() {
            let _ = writeln!(out, "== {} ==", title);
        } else {
            let _ = writeln!(out, "== {} ==  {}", title, summary);
        }
    }

    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.cells.iter().map(cell_text).collect())
        .collect();

    // 列宽按字符数计算
    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.chars().count()).collect();
    for row in &rows {
        for (i, text) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(text.chars().count());
            }
        }
    }

    let _ = writeln!(out, "{}", join_padded(&table.columns, &widths));
    for row in &rows {
        let _ = writeln!(out, "{}", join_padded(row, &widths));
    }
}

fn join_padded(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths.iter())
        .map(|(text, width)| {
            let pad = width.saturating_sub(text.chars().count());
            format!("{}{}", text, " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

fn indicator_line(view: &ReadyView) -> String {
    let items: Vec<String> = view
        .indicator
        .items
        .iter()
        .map(|item| {
            if item.active {
                format!("[{}]", item.label)
            } else if item.next {
                format!("{}>", item.label)
            } else {
                item.label.clone()
            }
        })
        .collect();
    format!(
        "{}  ({}/{})",
        items.join("  "),
        view.indicator.active + 1,
        view.indicator.total
    )
}
