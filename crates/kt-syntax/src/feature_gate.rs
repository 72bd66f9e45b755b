use crate::language_version::{FeatureAvailability, LanguageFeature, LanguageVersion};
use crate::{Diagnostic, SyntaxKind, SyntaxNode, SyntaxToken, TextRange};

pub(crate) fn feature_gate_diagnostics(root: &SyntaxNode, version: LanguageVersion) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    gate_type_aliases(root, version, &mut diagnostics);
    gate_modifier_features(root, version, &mut diagnostics);
    gate_definitely_non_null_types(root, version, &mut diagnostics);
    gate_range_until(root, version, &mut diagnostics);

    if !diagnostics.is_empty() {
        tracing::debug!(count = diagnostics.len(), %version, "feature gate diagnostics");
    }
    diagnostics
}

fn gate_type_aliases(root: &SyntaxNode, version: LanguageVersion, out: &mut Vec<Diagnostic>) {
    if version.is_enabled(LanguageFeature::TypeAliases) {
        return;
    }

    for node in root.descendants().filter(|n| n.kind() == SyntaxKind::TypeAlias) {
        let Some(kw) = direct_token(&node, SyntaxKind::TypeAliasKw) else {
            continue;
        };
        out.push(feature_error(version, LanguageFeature::TypeAliases, &kw));
    }
}

/// `fun interface`, `sealed interface`, `value class`, `data object`: all
/// keyed on a modifier keyword of the declaration.
fn gate_modifier_features(root: &SyntaxNode, version: LanguageVersion, out: &mut Vec<Diagnostic>) {
    for tok in root.descendants_with_tokens().filter_map(|e| e.into_token()) {
        let Some(modifiers) = tok.parent().filter(|p| p.kind() == SyntaxKind::ModifierList) else {
            continue;
        };
        let Some(owner) = modifiers.parent() else {
            continue;
        };
        let is_interface = direct_token(&owner, SyntaxKind::InterfaceKw).is_some();

        let feature = match (tok.kind(), owner.kind()) {
            (SyntaxKind::FunKw, SyntaxKind::Class) if is_interface => LanguageFeature::FunInterfaces,
            (SyntaxKind::SealedKw, SyntaxKind::Class) if is_interface => {
                LanguageFeature::SealedInterfaces
            }
            (SyntaxKind::ValueKw, SyntaxKind::Class) => LanguageFeature::ValueClasses,
            (SyntaxKind::DataKw, SyntaxKind::ObjectDeclaration) => LanguageFeature::DataObjects,
            _ => continue,
        };
        if !version.is_enabled(feature) {
            out.push(feature_error(version, feature, &tok));
        }
    }
}

fn gate_definitely_non_null_types(
    root: &SyntaxNode,
    version: LanguageVersion,
    out: &mut Vec<Diagnostic>,
) {
    if version.is_enabled(LanguageFeature::DefinitelyNonNullTypes) {
        return;
    }

    for node in root.descendants().filter(|n| n.kind() == SyntaxKind::IntersectionType) {
        let Some(amp) = direct_token(&node, SyntaxKind::Amp) else {
            continue;
        };
        out.push(feature_error(version, LanguageFeature::DefinitelyNonNullTypes, &amp));
    }
}

fn gate_range_until(root: &SyntaxNode, version: LanguageVersion, out: &mut Vec<Diagnostic>) {
    if version.is_enabled(LanguageFeature::RangeUntil) {
        return;
    }

    for tok in root
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| t.kind() == SyntaxKind::RangeUntil)
    {
        if tok
            .parent()
            .map_or(false, |p| p.kind() == SyntaxKind::OperationReference)
        {
            out.push(feature_error(version, LanguageFeature::RangeUntil, &tok));
        }
    }
}

fn direct_token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

fn feature_error(version: LanguageVersion, feature: LanguageFeature, token: &SyntaxToken) -> Diagnostic {
    Diagnostic::error(
        feature.diagnostic_code(),
        feature_message(version, feature),
        Some(TextRange::from(token.text_range())),
    )
}

fn feature_message(version: LanguageVersion, feature: LanguageFeature) -> String {
    match version.availability(feature) {
        FeatureAvailability::Stable => {
            // Only called for disabled features.
            format!("{} is enabled in this language version", feature.display_name())
        }
        FeatureAvailability::Experimental => format!(
            "{} is experimental in Kotlin {} and requires an explicit opt-in",
            feature.display_name(),
            version
        ),
        FeatureAvailability::Unavailable => {
            let (major, minor) = feature.stable_since();
            format!(
                "{} requires Kotlin {}.{}+",
                feature.display_name(),
                major,
                minor
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{parse_kotlin_with_options, LanguageVersion, ParseOptions};

    fn codes(text: &str, version: LanguageVersion) -> Vec<&'static str> {
        let parse = parse_kotlin_with_options(
            text,
            ParseOptions {
                language_version: version,
                ..ParseOptions::default()
            },
        );
        assert!(parse.result.errors.is_empty(), "{:?}", parse.result.errors);
        parse.diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn gates_modifier_features_below_version() {
        let text = "fun interface F { fun f() }\nsealed interface S\nvalue class V(val x: Int)\ndata object D";
        assert_eq!(
            codes(text, LanguageVersion::KOTLIN_1_3),
            vec![
                "KOTLIN_FEATURE_FUN_INTERFACES",
                "KOTLIN_FEATURE_SEALED_INTERFACES",
                "KOTLIN_FEATURE_VALUE_CLASSES",
                "KOTLIN_FEATURE_DATA_OBJECTS",
            ]
        );
        assert_eq!(codes(text, LanguageVersion::KOTLIN_2_0), Vec::<&str>::new());
    }

    #[test]
    fn range_until_and_non_null_types() {
        let text = "fun <T> f(x: T & Any) = 0..<10";
        assert_eq!(
            codes(text, LanguageVersion::KOTLIN_1_6),
            vec!["KOTLIN_FEATURE_DEFINITELY_NON_NULL_TYPES", "KOTLIN_FEATURE_RANGE_UNTIL"]
        );
        assert_eq!(
            codes(text, LanguageVersion::KOTLIN_1_8.with_experimental(true)),
            Vec::<&str>::new()
        );
    }

    #[test]
    fn experimental_message_mentions_opt_in() {
        let parse = parse_kotlin_with_options(
            "val r = 0..<1",
            ParseOptions {
                language_version: LanguageVersion::KOTLIN_1_8,
                ..ParseOptions::default()
            },
        );
        assert_eq!(parse.diagnostics.len(), 1);
        assert!(parse.diagnostics[0].message.contains("opt-in"));
    }
}
