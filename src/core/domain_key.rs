pub const DEFAULT_DIGITS: usize = 4;

/// First `digits` characters of a product code; shorter codes come back whole.
pub fn extract(product_code: &str, digits: usize) -> String {
    match product_code.char_indices().nth(digits) {
        Some((end, _)) => product_code[..end].to_string(),
        None => product_code.to_string(),
    }
}
