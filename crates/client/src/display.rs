use crate::types::Product;

/// Card title width.
pub const CARD_NAME_CHARS: usize = 17;

/// `(shown, struck_through)`: the discounted price with the original struck
/// through when a discount applies, otherwise just the price.
pub fn display_price(product: &Product) -> (f64, Option<f64>) {
    match product.discounted_price {
        Some(d) if product.has_discount() => (d, Some(product.price)),
        _ => (product.price, None),
    }
}

/// Cut `name` to `max` characters and append `...` when longer.
pub fn truncate_name(name: &str, max: usize) -> String {
    if name.chars().count() > max {
        let mut out: String = name.chars().take(max).collect();
        out.push_str("...");
        out
    } else {
        name.to_string()
    }
}

/// `$12.5` style label; whole prices print without decimals.
pub fn format_price(value: f64) -> String {
    format!("${value}")
}
