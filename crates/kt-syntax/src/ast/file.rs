use crate::ast::{
    support, AstNode, BlockExpression, ConstructorCallee, Declaration, DeclarationContainer,
    Expression, NameReferenceExpression, TypeReference, ValueArgument, ValueArgumentList,
};
use crate::fq_name::FqName;
use crate::parser::SyntaxToken;
use crate::syntax_kind::{KindSet, SyntaxKind};

ast_node!(KtFile => KtFile);
ast_node!(Script => Script);
ast_node!(PackageDirective => PackageDirective);
ast_node!(ImportList => ImportList);
ast_node!(ImportDirective => ImportDirective);
ast_node!(ImportAlias => ImportAlias);
ast_node!(FileAnnotationList => FileAnnotationList);
ast_node!(
    /// Root of a tree parsed from an expression or type snippet.
    CodeFragment => ExpressionFragment | TypeFragment
);
ast_node!(ModifierList => ModifierList);
ast_node!(AnnotationEntry => AnnotationEntry);
ast_node!(
    /// The use-site target of an annotation (`@file:`, `@get:`, ...).
    AnnotationTarget => AnnotationTarget
);
ast_node!(TypeConstraintList => TypeConstraintList);
ast_node!(TypeConstraint => TypeConstraint);

impl KtFile {
    /// Always present in parsed files; empty when the file has no `package`
    /// header.
    pub fn package_directive(&self) -> Option<PackageDirective> {
        support::child(&self.syntax)
    }

    /// The package name, or the root name when there is no package header.
    pub fn package_fq_name(&self) -> FqName {
        self.package_directive()
            .map(|package| package.fq_name())
            .unwrap_or_default()
    }

    pub fn import_list(&self) -> Option<ImportList> {
        support::child(&self.syntax)
    }

    pub fn import_directives(&self) -> Vec<ImportDirective> {
        self.import_list()
            .map(|list| list.imports().collect())
            .unwrap_or_default()
    }

    /// The import whose alias is `name`, if any.
    pub fn find_import_by_alias(&self, name: &str) -> Option<ImportDirective> {
        self.import_directives()
            .into_iter()
            .find(|import| import.alias_name().as_deref() == Some(name))
    }

    pub fn file_annotation_list(&self) -> Option<FileAnnotationList> {
        support::child(&self.syntax)
    }

    pub fn annotation_entries(&self) -> Vec<AnnotationEntry> {
        self.file_annotation_list()
            .map(|list| list.annotation_entries().collect())
            .unwrap_or_default()
    }

    pub fn script(&self) -> Option<Script> {
        support::child(&self.syntax)
    }

    pub fn is_script(&self) -> bool {
        self.script().is_some()
    }
}

impl DeclarationContainer for KtFile {
    fn declarations(&self) -> Vec<Declaration> {
        match self.script() {
            Some(script) => script.declarations(),
            None => support::children(&self.syntax).collect(),
        }
    }
}

impl Script {
    pub fn block_expression(&self) -> Option<BlockExpression> {
        support::child(&self.syntax)
    }
}

impl DeclarationContainer for Script {
    fn declarations(&self) -> Vec<Declaration> {
        self.block_expression()
            .map(|block| support::children(block.syntax()).collect())
            .unwrap_or_default()
    }
}

impl PackageDirective {
    /// `a.b.c` as a dot-qualified chain, or `None` for the root package.
    pub fn package_name_expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }

    /// Name segments, outermost first.
    pub fn segments(&self) -> Vec<NameReferenceExpression> {
        self.package_name_expression()
            .map(|expr| qualified_segments(&expr))
            .unwrap_or_default()
    }

    pub fn fq_name(&self) -> FqName {
        FqName::from_segments(self.segments().iter().filter_map(|s| s.referenced_name()))
    }

    pub fn qualified_name(&self) -> String {
        self.fq_name().to_string()
    }

    pub fn is_root(&self) -> bool {
        self.package_name_expression().is_none()
    }
}

impl ImportList {
    pub fn imports(&self) -> impl Iterator<Item = ImportDirective> + '_ {
        support::children(&self.syntax)
    }
}

impl ImportDirective {
    /// The imported reference, without a trailing `.*`.
    pub fn imported_reference(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }

    pub fn imported_fq_name(&self) -> Option<FqName> {
        let reference = self.imported_reference()?;
        let segments = qualified_segments(&reference);
        if segments.is_empty() {
            return None;
        }
        Some(FqName::from_segments(
            segments.iter().filter_map(|s| s.referenced_name()),
        ))
    }

    /// `import a.b.*`
    pub fn is_all_under(&self) -> bool {
        support::token(&self.syntax, SyntaxKind::Mul).is_some()
    }

    pub fn alias(&self) -> Option<ImportAlias> {
        support::child(&self.syntax)
    }

    pub fn alias_name(&self) -> Option<String> {
        self.alias()?.name()
    }

    /// The name the import introduces into the file: the alias, or the last
    /// segment. Star imports introduce no single name.
    pub fn imported_name(&self) -> Option<String> {
        if let Some(alias) = self.alias_name() {
            return Some(alias);
        }
        if self.is_all_under() {
            return None;
        }
        self.imported_fq_name()?.short_name().map(str::to_string)
    }

    pub fn is_valid_import(&self) -> bool {
        self.imported_reference().is_some()
    }
}

impl ImportAlias {
    pub fn name_identifier(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }

    pub fn name(&self) -> Option<String> {
        self.name_identifier()
            .map(|tok| support::unquote(tok.text()).to_string())
    }

    pub fn import_directive(&self) -> Option<ImportDirective> {
        self.syntax.parent().and_then(ImportDirective::cast)
    }
}

impl FileAnnotationList {
    pub fn annotation_entries(&self) -> impl Iterator<Item = AnnotationEntry> + '_ {
        support::children(&self.syntax)
    }
}

impl CodeFragment {
    pub fn expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }

    pub fn type_reference(&self) -> Option<TypeReference> {
        support::child(&self.syntax)
    }
}

impl ModifierList {
    pub fn has_modifier(&self, kind: SyntaxKind) -> bool {
        support::token(&self.syntax, kind).is_some()
    }

    /// Modifier keyword tokens in source order.
    pub fn modifier_tokens(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|tok| {
                KindSet::MODIFIER_KEYWORDS.contains(tok.kind())
                    || matches!(tok.kind(), SyntaxKind::InKw | SyntaxKind::FunKw)
            })
    }

    pub fn annotation_entries(&self) -> impl Iterator<Item = AnnotationEntry> + '_ {
        support::children(&self.syntax)
    }

    /// The visibility modifier, if one is written.
    pub fn visibility(&self) -> Option<SyntaxKind> {
        support::token_in(&self.syntax, KindSet::VISIBILITY_MODIFIERS).map(|tok| tok.kind())
    }
}

impl AnnotationEntry {
    pub fn use_site_target(&self) -> Option<AnnotationTarget> {
        support::child(&self.syntax)
    }

    pub fn callee(&self) -> Option<ConstructorCallee> {
        support::child(&self.syntax)
    }

    pub fn type_reference(&self) -> Option<TypeReference> {
        self.callee()?.type_reference()
    }

    /// The last segment of the annotation's type name.
    pub fn short_name(&self) -> Option<String> {
        self.callee()?.constructor_reference()?.referenced_name()
    }

    pub fn value_argument_list(&self) -> Option<ValueArgumentList> {
        support::child(&self.syntax)
    }

    pub fn value_arguments(&self) -> Vec<ValueArgument> {
        self.value_argument_list()
            .map(|list| list.arguments().collect())
            .unwrap_or_default()
    }
}

impl AnnotationTarget {
    /// `file`, `get`, `param`, ...
    pub fn target_name(&self) -> Option<String> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|tok| tok.kind() == SyntaxKind::FileKw || tok.kind().is_identifier_like())
            .map(|tok| tok.text().to_string())
    }
}

impl TypeConstraintList {
    pub fn constraints(&self) -> impl Iterator<Item = TypeConstraint> + '_ {
        support::children(&self.syntax)
    }
}

impl TypeConstraint {
    pub fn subject_type_parameter_name(&self) -> Option<NameReferenceExpression> {
        support::child(&self.syntax)
    }

    pub fn bound_type_reference(&self) -> Option<TypeReference> {
        support::child(&self.syntax)
    }

    pub fn annotation_entries(&self) -> impl Iterator<Item = AnnotationEntry> + '_ {
        support::children(&self.syntax)
    }
}

/// Segments of a dotted reference, outermost first.
///
/// `a.b.c` parses as `((a).b).c`; the walk follows receivers from the
/// outside in and reverses the collected selectors.
pub(crate) fn qualified_segments(expr: &Expression) -> Vec<NameReferenceExpression> {
    let mut reversed = Vec::new();
    let mut current = Some(expr.syntax().clone());
    while let Some(node) = current.take() {
        match node.kind() {
            SyntaxKind::DotQualifiedExpression => {
                let mut parts = node.children().filter_map(Expression::cast);
                let receiver = parts.next();
                if let Some(name) = parts
                    .next()
                    .and_then(|selector| NameReferenceExpression::cast(selector.syntax().clone()))
                {
                    reversed.push(name);
                }
                current = receiver.map(|r| r.syntax().clone());
            }
            SyntaxKind::NameReferenceExpression => {
                reversed.push(NameReferenceExpression::new_unchecked(node));
            }
            _ => {}
        }
    }
    reversed.reverse();
    reversed
}
