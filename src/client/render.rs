//! 终端渲染：商品网格

use std::fmt::Write;

use super::state::{LoadStatus, ViewState};
use crate::app::catalog::model::Product;

const GRID_COLUMNS: usize = 3;
const CARD_WIDTH: usize = 24;
pub const EMPTY_CATALOG: &str = "No items in the store yet.";

/// 渲染整个视图
pub fn render(state: &ViewState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Online Ekart");
    let _ = writeln!(out, "{}", "=".repeat(GRID_COLUMNS * (CARD_WIDTH + 1)));

    match &state.status {
        LoadStatus::Loading => {
            let _ = writeln!(out, "(loading...)");
        }
        LoadStatus::Error(message) => {
            let _ = writeln!(out, "! could not refresh catalog: {}", message);
        }
        LoadStatus::Empty | LoadStatus::Populated => {}
    }

    if state.products.is_empty() {
        let _ = writeln!(out, "{}", EMPTY_CATALOG);
    } else {
        out.push_str(&render_grid(&state.products));
    }

    if let Some(error) = &state.last_error {
        if !matches!(state.status, LoadStatus::Error(_)) {
            let _ = writeln!(out, "! {}", error);
        }
    }

    out
}

/// 每行 `GRID_COLUMNS` 张卡片
pub fn render_grid(products: &[Product]) -> String {
    let mut out = String::new();
    let border = format!("+{}+", "-".repeat(CARD_WIDTH - 2));

    for row in products.chunks(GRID_COLUMNS) {
        let cards: Vec<[String; 3]> = row.iter().map(card_lines).collect();

        let _ = writeln!(out, "{}", vec![border.as_str(); cards.len()].join(" "));
        for line in 0..3 {
            let cells: Vec<String> = cards
                .iter()
                .map(|card| format!("| {:<width$} |", card[line], width = CARD_WIDTH - 4))
                .collect();
            let _ = writeln!(out, "{}", cells.join(" "));
        }
        let _ = writeln!(out, "{}", vec![border.as_str(); cards.len()].join(" "));
    }

    out
}

pub fn format_price(price: f64) -> String {
    format!("₹{:.2}", price)
}

fn card_lines(product: &Product) -> [String; 3] {
    [
        truncate(&product.name, CARD_WIDTH - 4),
        format_price(product.price),
        format!("#{} [buy {}]", product.id, product.id),
    ]
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(width - 1).collect();
    truncated.push('…');
    truncated
}
