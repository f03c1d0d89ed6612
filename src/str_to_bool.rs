/// How a string is read as a boolean
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BooleanRule {
    /// True exactly when the string is one of these
    Truthy(Vec<String>),
    /// False exactly when the string is one of these
    Falsy(Vec<String>),
}

impl Default for BooleanRule {
    fn default() -> Self {
        Self::Truthy(vec!["1".into(), "true".into()])
    }
}

/// Read a string as a boolean. This cannot fail. The comparison is exact, any casefolding has
/// already been applied.
pub fn str_to_bool(src: &str, rule: &BooleanRule) -> bool {
    match rule {
        BooleanRule::Truthy(truthy) => truthy.iter().any(|t| t == src),
        BooleanRule::Falsy(falsy) => !falsy.iter().any(|f| f == src),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rule() {
        let rule = BooleanRule::default();
        assert!(str_to_bool("1", &rule));
        assert!(str_to_bool("true", &rule));
        assert!(!str_to_bool("TRUE", &rule));
        assert!(!str_to_bool("yes", &rule));
        assert!(!str_to_bool("", &rule));
    }

    #[test]
    fn test_falsy_rule() {
        let rule = BooleanRule::Falsy(vec!["no".into(), "off".into()]);
        assert!(!str_to_bool("no", &rule));
        assert!(!str_to_bool("off", &rule));
        assert!(str_to_bool("", &rule));
        assert!(str_to_bool("anything", &rule));
    }
}
