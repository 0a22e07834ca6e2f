use std::sync::LazyLock;

use regex::Regex;

/// Native currency type in its canonical short form.
pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

const FRAMEWORK_LONG_PREFIX: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000002::";
const FRAMEWORK_SHORT_PREFIX: &str = "0x2::";

/// Opening of `<address>::coin::Coin<T>`, found anywhere in the type string.
static COIN_WRAPPER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"0x[0-9a-fA-F]+::coin::Coin<").expect("coin wrapper pattern is valid")
});

/// Rewrite the zero-padded framework address to its short form. Idempotent.
pub fn canonicalize(coin_type: &str) -> String {
    match coin_type.strip_prefix(FRAMEWORK_LONG_PREFIX) {
        Some(rest) => format!("{}{}", FRAMEWORK_SHORT_PREFIX, rest),
        None => coin_type.to_string(),
    }
}

/// Extract `T` from a `Coin<T>` object type, falling back to the raw type
/// string when it does not have that shape. The result is canonicalized.
pub fn coin_type_from_object_type(object_type: &str) -> String {
    let inner = COIN_WRAPPER
        .find(object_type)
        .and_then(|m| type_argument(&object_type[m.end()..]))
        .unwrap_or(object_type);
    canonicalize(inner)
}

/// Text up to the `>` that closes an already opened `<`. Nested generics
/// stay intact; an unbalanced or empty argument yields `None`.
fn type_argument(rest: &str) -> Option<&str> {
    let mut depth = 0usize;
    for (i, c) in rest.char_indices() {
        match c {
            '<' => depth += 1,
            '>' if depth == 0 => return Some(&rest[..i]).filter(|arg| !arg.is_empty()),
            '>' => depth -= 1,
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_SUI: &str =
        "0x0000000000000000000000000000000000000000000000000000000000000002::sui::SUI";

    #[test]
    fn test_canonicalize_long_framework_address() {
        assert_eq!(canonicalize(LONG_SUI), SUI_COIN_TYPE);
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        for input in [LONG_SUI, SUI_COIN_TYPE] {
            let once = canonicalize(input);
            assert_eq!(canonicalize(&once), once);
        }
    }

    #[test]
    fn test_canonicalize_leaves_other_packages_alone() {
        let usdc = "0xdba34672e30cb065b1f93e3ab55318768fd6fef66c15942c9f7cb846e2f900e7::usdc::USDC";
        assert_eq!(canonicalize(usdc), usdc);
    }

    #[test]
    fn test_unwrap_coin_wrapper() {
        assert_eq!(coin_type_from_object_type("0x2::coin::Coin<0x2::sui::SUI>"), SUI_COIN_TYPE);
        assert_eq!(
            coin_type_from_object_type(&format!(
                "0x0000000000000000000000000000000000000000000000000000000000000002::coin::Coin<{}>",
                LONG_SUI
            )),
            SUI_COIN_TYPE
        );
    }

    #[test]
    fn test_unwrap_nested_generic() {
        assert_eq!(
            coin_type_from_object_type("0x2::coin::Coin<0xabc::lp::LP<0x2::sui::SUI, 0xdef::usdc::USDC>>"),
            "0xabc::lp::LP<0x2::sui::SUI, 0xdef::usdc::USDC>"
        );
    }

    #[test]
    fn test_unwrap_wrapped_coin_type() {
        assert_eq!(
            coin_type_from_object_type("0x2::dynamic_field::Field<u64, 0x2::coin::Coin<0x2::sui::SUI>>"),
            SUI_COIN_TYPE
        );
        assert_eq!(
            coin_type_from_object_type(&format!("0x2::coin::Coin<{}> ", LONG_SUI)),
            SUI_COIN_TYPE
        );
    }

    #[test]
    fn test_unwrap_falls_back_to_raw_type() {
        assert_eq!(coin_type_from_object_type("0xabc::vault::Receipt"), "0xabc::vault::Receipt");
        assert_eq!(coin_type_from_object_type("0x2::coin::Coin<>"), "0x2::coin::Coin<>");
        assert_eq!(coin_type_from_object_type("0x2::coin::Coin<0x2::sui::SUI"), "0x2::coin::Coin<0x2::sui::SUI");
    }
}
