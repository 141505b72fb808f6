//! 商品目录数据模型

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 商品记录
///
/// `id` 由存储层在创建时分配，删除后不会被复用。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
}

/// 经过规范化的新商品，既是客户端请求体也是写入存储的参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewProduct {
    #[validate(length(max = 255, message = "name must be at most 255 characters"))]
    pub name: String,

    pub price: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// DECIMAL(10, 2) 能表示的最大绝对值上界
pub const PRICE_LIMIT: f64 = 100_000_000.0;

impl NewProduct {
    pub fn new(name: impl Into<String>, price: f64, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            price,
            description,
        }
    }

    pub fn price_in_range(&self) -> bool {
        self.price.is_finite() && self.rounded_price().abs() < PRICE_LIMIT
    }

    /// 存储精度与 DECIMAL(10, 2) 一致
    pub fn rounded_price(&self) -> f64 {
        round_to_cents(self.price)
    }
}

/// 按十进制写法四舍五入到分（远离零），`1.005` 得到 `1.01`
///
/// 直接对 `price * 100.0` 取整会受二进制误差影响。超出价格上限的值原样返回，
/// 交由 `price_in_range` 拒绝。
pub fn round_to_cents(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= PRICE_LIMIT {
        return value;
    }

    let text = value.abs().to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let Ok(whole) = whole.parse::<i64>() else {
        return value;
    };

    let mut digits = fraction.bytes().map(|b| i64::from(b - b'0'));
    let tenths = digits.next().unwrap_or(0);
    let hundredths = digits.next().unwrap_or(0);
    let carry = i64::from(digits.next().is_some_and(|digit| digit >= 5));

    let cents = whole * 100 + tenths * 10 + hundredths + carry;
    let amount = cents as f64 / 100.0;
    if value.is_sign_negative() && cents != 0 {
        -amount
    } else {
        amount
    }
}

/// 价格输入：浏览器表单提交的是字符串，API 调用方通常提交数字
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl PriceInput {
    pub fn to_amount(&self) -> Option<f64> {
        let amount = match self {
            PriceInput::Number(value) => Some(*value),
            PriceInput::Text(text) => text.trim().parse::<f64>().ok(),
        };
        amount.filter(|value| value.is_finite())
    }
}

/// POST /products 请求体
///
/// 字段全部可选，缺失由服务层统一报告为校验错误。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<PriceInput>,
    #[serde(default)]
    pub description: Option<String>,
}
