use react_lens_core::Diagnostic;

pub fn build_fix_prompt(diagnostic: &Diagnostic, code: &str) -> String {
    [
        "You are fixing React/TypeScript code health issues.".to_string(),
        format!("Rule: {}", diagnostic.rule),
        format!("Category: {}", diagnostic.category.as_str()),
        format!("Severity: {}", diagnostic.severity.as_str()),
        format!("Diagnostic message: {}", diagnostic.message),
        "Return strict JSON with keys: explanation, fixedCode.".to_string(),
        "Code to fix:".to_string(),
        code.to_string(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use react_lens_core::{Category, Severity};

    #[test]
    fn prompt_lists_diagnostic_then_code() {
        let diagnostic = Diagnostic::new(
            Category::Accessibility,
            "no-img-without-alt",
            Severity::Error,
            "App.tsx",
            3,
            "<img> tag is missing alt attribute.",
        );

        let prompt = build_fix_prompt(&diagnostic, "<img src=\"a.png\" />");

        assert_eq!(
            prompt,
            "You are fixing React/TypeScript code health issues.\n\
             Rule: no-img-without-alt\n\
             Category: accessibility\n\
             Severity: error\n\
             Diagnostic message: <img> tag is missing alt attribute.\n\
             Return strict JSON with keys: explanation, fixedCode.\n\
             Code to fix:\n\
             <img src=\"a.png\" />"
        );
    }
}
