// src/discovery/parse.rs

//! Extraction of the `HW_NAME` / `HW_TARGET` string defines from a header.

use std::sync::LazyLock;

use regex::Regex;

static HW_NAME_RE: LazyLock<Regex> = LazyLock::new(|| define_regex("HW_NAME"));
static HW_TARGET_RE: LazyLock<Regex> = LazyLock::new(|| define_regex("HW_TARGET"));

fn define_regex(symbol: &str) -> Regex {
    // The symbol is a fixed identifier, so the pattern is always valid.
    Regex::new(&format!(r#"#define\s+{symbol}\s+"(.*?)""#))
        .unwrap_or_else(|e| panic!("invalid define pattern for {symbol}: {e}"))
}

/// The two declarations a hardware header must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HwDeclarations {
    pub name: String,
    pub target: String,
}

/// Pull `HW_NAME` and `HW_TARGET` out of header text.
///
/// The first occurrence of each define wins. Returns `None` unless both are
/// present and non-empty.
pub fn extract_declarations(contents: &str) -> Option<HwDeclarations> {
    let name = first_capture(&HW_NAME_RE, contents)?;
    let target = first_capture(&HW_TARGET_RE, contents)?;
    Some(HwDeclarations { name, target })
}

fn first_capture(re: &Regex, contents: &str) -> Option<String> {
    re.captures(contents)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_tab_aligned_defines() {
        let src = "#define HW_NAME\t\t\t\t\t\t\"Devkit C6\"\n#define HW_TARGET\t\t\t\t\t\"esp32c6\"\n";
        let decl = extract_declarations(src).unwrap();
        assert_eq!(decl.name, "Devkit C6");
        assert_eq!(decl.target, "esp32c6");
    }

    #[test]
    fn first_occurrence_wins() {
        let src = r#"
#define HW_NAME "First"
#define HW_TARGET "esp32s3"
#define HW_NAME "Second"
"#;
        assert_eq!(extract_declarations(src).unwrap().name, "First");
    }

    #[test]
    fn missing_target_yields_none() {
        assert!(extract_declarations("#define HW_NAME \"Lonely\"\n").is_none());
    }

    #[test]
    fn unquoted_value_is_not_a_declaration() {
        let src = "#define HW_NAME Board\n#define HW_TARGET \"esp32\"\n";
        assert!(extract_declarations(src).is_none());
    }

    #[test]
    fn similarly_named_symbols_do_not_match() {
        let src = "#define HW_NAME_SHORT \"x\"\n#define HW_TARGET \"esp32\"\n";
        assert!(extract_declarations(src).is_none());
    }

    #[test]
    fn empty_name_is_rejected() {
        let src = "#define HW_NAME \"\"\n#define HW_TARGET \"esp32\"\n";
        assert!(extract_declarations(src).is_none());
    }
}
