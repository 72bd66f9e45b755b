use rowan::Language;
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Version of the `SyntaxKind` numbering.
///
/// Persisted artifacts (stub files) store kinds by discriminant, so any change
/// that renumbers existing variants must bump this.
pub const SYNTAX_SCHEMA_VERSION: u32 = 1;

/// Unified syntax kind for both tokens and tree nodes.
///
/// Soft keywords and modifier keywords are produced by the lexer as
/// [`SyntaxKind::Identifier`]; the parser remaps them in the positions where
/// they act as keywords.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize_repr, Deserialize_repr,
)]
#[repr(u16)]
pub enum SyntaxKind {
    // --- Trivia ---
    Whitespace,
    LineComment,
    BlockComment,
    DocComment,
    Shebang,

    // --- Identifiers & literals ---
    Identifier,
    IntegerLiteral,
    FloatLiteral,
    CharacterLiteral,

    // --- String templates ---
    OpenQuote,
    ClosingQuote,
    RegularStringPart,
    EscapeSequence,
    ShortTemplateEntryStart,
    LongTemplateEntryStart,
    LongTemplateEntryEnd,

    // --- Hard keywords ---
    AsKw,
    BreakKw,
    ClassKw,
    ContinueKw,
    DoKw,
    ElseKw,
    FalseKw,
    ForKw,
    FunKw,
    IfKw,
    InKw,
    InterfaceKw,
    IsKw,
    NullKw,
    ObjectKw,
    PackageKw,
    ReturnKw,
    SuperKw,
    ThisKw,
    ThrowKw,
    TrueKw,
    TryKw,
    TypeAliasKw,
    TypeOfKw,
    ValKw,
    VarKw,
    WhenKw,
    WhileKw,
    /// `as?`
    AsSafe,
    /// `!in`
    NotIn,
    /// `!is`
    NotIs,

    // --- Soft keywords (remapped by the parser) ---
    ByKw,
    CatchKw,
    ConstructorKw,
    DynamicKw,
    FileKw,
    FinallyKw,
    GetKw,
    ImportKw,
    InitKw,
    SetKw,
    WhereKw,

    // --- Modifier keywords (remapped by the parser) ---
    AbstractKw,
    ActualKw,
    AnnotationKw,
    CompanionKw,
    ConstKw,
    CrossinlineKw,
    DataKw,
    EnumKw,
    ExpectKw,
    ExternalKw,
    FinalKw,
    InfixKw,
    InlineKw,
    InnerKw,
    InternalKw,
    LateinitKw,
    NoinlineKw,
    OpenKw,
    OperatorKw,
    OutKw,
    OverrideKw,
    PrivateKw,
    ProtectedKw,
    PublicKw,
    ReifiedKw,
    SealedKw,
    SuspendKw,
    TailrecKw,
    ValueKw,
    VarargKw,

    // --- Punctuation / operators ---
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    SafeAccess,
    Elvis,
    Quest,
    Colon,
    ColonColon,
    Range,
    RangeUntil,
    Arrow,
    At,
    Amp,
    Eq,
    PlusEq,
    MinusEq,
    MulEq,
    DivEq,
    PercEq,
    EqEq,
    ExclEq,
    EqEqEq,
    ExclEqEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    AndAnd,
    OrOr,
    Plus,
    Minus,
    Mul,
    Div,
    Perc,
    PlusPlus,
    MinusMinus,
    Excl,
    ExclExcl,

    // --- Special ---
    Error,
    Eof,

    // --- Nodes: file level ---
    KtFile,
    Script,
    PackageDirective,
    ImportList,
    ImportDirective,
    ImportAlias,
    FileAnnotationList,
    ExpressionFragment,
    TypeFragment,

    // --- Nodes: declarations ---
    Class,
    ObjectDeclaration,
    EnumEntry,
    Fun,
    Property,
    PropertyAccessor,
    PropertyDelegate,
    TypeAlias,
    PrimaryConstructor,
    SecondaryConstructor,
    ConstructorDelegationCall,
    ConstructorDelegationReference,
    ClassInitializer,
    ClassBody,
    DestructuringDeclaration,
    DestructuringDeclarationEntry,
    FunctionLiteral,

    // --- Nodes: declaration parts ---
    ModifierList,
    AnnotationEntry,
    AnnotationTarget,
    ConstructorCallee,
    ValueParameterList,
    ValueParameter,
    TypeParameterList,
    TypeParameter,
    TypeConstraintList,
    TypeConstraint,
    SuperTypeList,
    SuperTypeEntry,
    SuperTypeCallEntry,
    DelegatedSuperTypeEntry,
    InitializerList,

    // --- Nodes: types ---
    TypeReference,
    UserType,
    NullableType,
    FunctionType,
    FunctionTypeReceiver,
    DynamicType,
    IntersectionType,
    TypeArgumentList,
    TypeProjection,

    // --- Nodes: expressions ---
    NameReferenceExpression,
    OperationReference,
    LabelReference,
    LabelQualifier,
    NullConstant,
    BooleanConstant,
    IntegerConstant,
    FloatConstant,
    CharacterConstant,
    StringTemplate,
    LiteralStringTemplateEntry,
    EscapeStringTemplateEntry,
    ShortStringTemplateEntry,
    LongStringTemplateEntry,
    ParenthesizedExpression,
    ThisExpression,
    SuperExpression,
    IfExpression,
    WhenExpression,
    WhenEntry,
    WhenConditionExpression,
    WhenConditionInRange,
    WhenConditionIsPattern,
    TryExpression,
    CatchClause,
    FinallySection,
    ForExpression,
    WhileExpression,
    DoWhileExpression,
    LambdaExpression,
    AnnotatedExpression,
    LabeledExpression,
    BinaryExpression,
    BinaryWithTypeRhsExpression,
    IsExpression,
    PrefixExpression,
    PostfixExpression,
    CallExpression,
    ArrayAccessExpression,
    DotQualifiedExpression,
    SafeAccessExpression,
    CallableReferenceExpression,
    ClassLiteralExpression,
    ObjectLiteralExpression,
    ReturnExpression,
    ThrowExpression,
    BreakExpression,
    ContinueExpression,
    CollectionLiteralExpression,
    Block,
    ValueArgumentList,
    ValueArgument,
    ValueArgumentName,
    LambdaArgument,

    // --- Nodes: expression containers ---
    Condition,
    Then,
    Else,
    Body,
    LoopRange,
    Indices,

    __Last,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::Whitespace
                | SyntaxKind::LineComment
                | SyntaxKind::BlockComment
                | SyntaxKind::DocComment
                | SyntaxKind::Shebang
        )
    }

    pub fn is_comment(self) -> bool {
        matches!(
            self,
            SyntaxKind::LineComment | SyntaxKind::BlockComment | SyntaxKind::DocComment
        )
    }

    /// Whether this kind labels a token rather than a tree node.
    pub fn is_token(self) -> bool {
        (self as u16) < (SyntaxKind::KtFile as u16)
    }

    /// `Error` labels both stray tokens and recovery nodes.
    pub fn is_node(self) -> bool {
        self == SyntaxKind::Error || (!self.is_token() && self != SyntaxKind::__Last)
    }

    pub fn is_soft_keyword(self) -> bool {
        KindSet::SOFT_KEYWORDS.contains(self) || self.is_modifier_keyword()
    }

    /// Hard keywords, `as?`, `!in` and `!is`.
    pub fn is_keyword(self) -> bool {
        (SyntaxKind::AsKw as u16..=SyntaxKind::NotIs as u16).contains(&(self as u16))
    }

    pub fn is_modifier_keyword(self) -> bool {
        KindSet::MODIFIER_KEYWORDS.contains(self)
    }

    /// Identifiers plus every keyword that the lexer never reserves.
    pub fn is_identifier_like(self) -> bool {
        self == SyntaxKind::Identifier || self.is_soft_keyword()
    }

    /// Hard keywords. These are never valid identifiers.
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        Some(match text {
            "as" => SyntaxKind::AsKw,
            "break" => SyntaxKind::BreakKw,
            "class" => SyntaxKind::ClassKw,
            "continue" => SyntaxKind::ContinueKw,
            "do" => SyntaxKind::DoKw,
            "else" => SyntaxKind::ElseKw,
            "false" => SyntaxKind::FalseKw,
            "for" => SyntaxKind::ForKw,
            "fun" => SyntaxKind::FunKw,
            "if" => SyntaxKind::IfKw,
            "in" => SyntaxKind::InKw,
            "interface" => SyntaxKind::InterfaceKw,
            "is" => SyntaxKind::IsKw,
            "null" => SyntaxKind::NullKw,
            "object" => SyntaxKind::ObjectKw,
            "package" => SyntaxKind::PackageKw,
            "return" => SyntaxKind::ReturnKw,
            "super" => SyntaxKind::SuperKw,
            "this" => SyntaxKind::ThisKw,
            "throw" => SyntaxKind::ThrowKw,
            "true" => SyntaxKind::TrueKw,
            "try" => SyntaxKind::TryKw,
            "typealias" => SyntaxKind::TypeAliasKw,
            "typeof" => SyntaxKind::TypeOfKw,
            "val" => SyntaxKind::ValKw,
            "var" => SyntaxKind::VarKw,
            "when" => SyntaxKind::WhenKw,
            "while" => SyntaxKind::WhileKw,
            _ => return None,
        })
    }

    /// Soft keywords that are not modifiers.
    pub fn from_soft_keyword(text: &str) -> Option<SyntaxKind> {
        Some(match text {
            "by" => SyntaxKind::ByKw,
            "catch" => SyntaxKind::CatchKw,
            "constructor" => SyntaxKind::ConstructorKw,
            "dynamic" => SyntaxKind::DynamicKw,
            "file" => SyntaxKind::FileKw,
            "finally" => SyntaxKind::FinallyKw,
            "get" => SyntaxKind::GetKw,
            "import" => SyntaxKind::ImportKw,
            "init" => SyntaxKind::InitKw,
            "set" => SyntaxKind::SetKw,
            "where" => SyntaxKind::WhereKw,
            _ => return None,
        })
    }

    /// Modifier keywords. `in` and `fun` also act as modifiers but are hard
    /// keywords and therefore never produced here.
    pub fn modifier_from_text(text: &str) -> Option<SyntaxKind> {
        Some(match text {
            "abstract" => SyntaxKind::AbstractKw,
            "actual" => SyntaxKind::ActualKw,
            "annotation" => SyntaxKind::AnnotationKw,
            "companion" => SyntaxKind::CompanionKw,
            "const" => SyntaxKind::ConstKw,
            "crossinline" => SyntaxKind::CrossinlineKw,
            "data" => SyntaxKind::DataKw,
            "enum" => SyntaxKind::EnumKw,
            "expect" => SyntaxKind::ExpectKw,
            "external" => SyntaxKind::ExternalKw,
            "final" => SyntaxKind::FinalKw,
            "infix" => SyntaxKind::InfixKw,
            "inline" => SyntaxKind::InlineKw,
            "inner" => SyntaxKind::InnerKw,
            "internal" => SyntaxKind::InternalKw,
            "lateinit" => SyntaxKind::LateinitKw,
            "noinline" => SyntaxKind::NoinlineKw,
            "open" => SyntaxKind::OpenKw,
            "operator" => SyntaxKind::OperatorKw,
            "out" => SyntaxKind::OutKw,
            "override" => SyntaxKind::OverrideKw,
            "private" => SyntaxKind::PrivateKw,
            "protected" => SyntaxKind::ProtectedKw,
            "public" => SyntaxKind::PublicKw,
            "reified" => SyntaxKind::ReifiedKw,
            "sealed" => SyntaxKind::SealedKw,
            "suspend" => SyntaxKind::SuspendKw,
            "tailrec" => SyntaxKind::TailrecKw,
            "value" => SyntaxKind::ValueKw,
            "vararg" => SyntaxKind::VarargKw,
            _ => return None,
        })
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(value: SyntaxKind) -> Self {
        rowan::SyntaxKind(value as u16)
    }
}

/// Rowan language marker for Kotlin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KotlinLanguage {}

impl Language for KotlinLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        if raw.0 < SyntaxKind::__Last as u16 {
            // SAFETY: We've verified the numeric value is within the enum range.
            unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
        } else {
            SyntaxKind::Error
        }
    }

    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        kind.into()
    }
}

const KIND_WORDS: usize = (SyntaxKind::__Last as usize + 63) / 64;

/// A fixed-size set of [`SyntaxKind`]s.
///
/// All classification tables are `const` values of this type, so membership
/// tests are a shift and a mask.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct KindSet([u64; KIND_WORDS]);

impl KindSet {
    pub const EMPTY: KindSet = KindSet([0; KIND_WORDS]);

    pub const fn new(kinds: &[SyntaxKind]) -> KindSet {
        let mut bits = [0u64; KIND_WORDS];
        let mut i = 0;
        while i < kinds.len() {
            let raw = kinds[i] as usize;
            bits[raw / 64] |= 1u64 << (raw % 64);
            i += 1;
        }
        KindSet(bits)
    }

    pub const fn union(self, other: KindSet) -> KindSet {
        let mut bits = self.0;
        let mut i = 0;
        while i < KIND_WORDS {
            bits[i] |= other.0[i];
            i += 1;
        }
        KindSet(bits)
    }

    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let raw = kind as usize;
        self.0[raw / 64] & (1u64 << (raw % 64)) != 0
    }

    pub fn iter(self) -> impl Iterator<Item = SyntaxKind> {
        (0..SyntaxKind::__Last as u16)
            .map(|raw| KotlinLanguage::kind_from_raw(rowan::SyntaxKind(raw)))
            .filter(move |kind| self.contains(*kind))
    }
}

impl std::fmt::Debug for KindSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl From<SyntaxKind> for KindSet {
    fn from(kind: SyntaxKind) -> Self {
        KindSet::new(&[kind])
    }
}

impl KindSet {
    pub const SOFT_KEYWORDS: KindSet = KindSet::new(&[
        SyntaxKind::ByKw,
        SyntaxKind::CatchKw,
        SyntaxKind::ConstructorKw,
        SyntaxKind::DynamicKw,
        SyntaxKind::FileKw,
        SyntaxKind::FinallyKw,
        SyntaxKind::GetKw,
        SyntaxKind::ImportKw,
        SyntaxKind::InitKw,
        SyntaxKind::SetKw,
        SyntaxKind::WhereKw,
    ]);

    pub const MODIFIER_KEYWORDS: KindSet = KindSet::new(&[
        SyntaxKind::AbstractKw,
        SyntaxKind::ActualKw,
        SyntaxKind::AnnotationKw,
        SyntaxKind::CompanionKw,
        SyntaxKind::ConstKw,
        SyntaxKind::CrossinlineKw,
        SyntaxKind::DataKw,
        SyntaxKind::EnumKw,
        SyntaxKind::ExpectKw,
        SyntaxKind::ExternalKw,
        SyntaxKind::FinalKw,
        SyntaxKind::InfixKw,
        SyntaxKind::InlineKw,
        SyntaxKind::InnerKw,
        SyntaxKind::InternalKw,
        SyntaxKind::LateinitKw,
        SyntaxKind::NoinlineKw,
        SyntaxKind::OpenKw,
        SyntaxKind::OperatorKw,
        SyntaxKind::OutKw,
        SyntaxKind::OverrideKw,
        SyntaxKind::PrivateKw,
        SyntaxKind::ProtectedKw,
        SyntaxKind::PublicKw,
        SyntaxKind::ReifiedKw,
        SyntaxKind::SealedKw,
        SyntaxKind::SuspendKw,
        SyntaxKind::TailrecKw,
        SyntaxKind::ValueKw,
        SyntaxKind::VarargKw,
    ]);

    pub const VISIBILITY_MODIFIERS: KindSet = KindSet::new(&[
        SyntaxKind::PublicKw,
        SyntaxKind::PrivateKw,
        SyntaxKind::ProtectedKw,
        SyntaxKind::InternalKw,
    ]);

    pub const ASSIGNMENT_OPERATORS: KindSet = KindSet::new(&[
        SyntaxKind::Eq,
        SyntaxKind::PlusEq,
        SyntaxKind::MinusEq,
        SyntaxKind::MulEq,
        SyntaxKind::DivEq,
        SyntaxKind::PercEq,
    ]);

    pub const CONSTANTS: KindSet = KindSet::new(&[
        SyntaxKind::NullConstant,
        SyntaxKind::BooleanConstant,
        SyntaxKind::IntegerConstant,
        SyntaxKind::FloatConstant,
        SyntaxKind::CharacterConstant,
    ]);

    /// Every declaration node. Declarations are also expressions.
    pub const DECLARATIONS: KindSet = KindSet::new(&[
        SyntaxKind::Class,
        SyntaxKind::ObjectDeclaration,
        SyntaxKind::EnumEntry,
        SyntaxKind::Fun,
        SyntaxKind::Property,
        SyntaxKind::PropertyAccessor,
        SyntaxKind::TypeAlias,
        SyntaxKind::PrimaryConstructor,
        SyntaxKind::SecondaryConstructor,
        SyntaxKind::ClassInitializer,
        SyntaxKind::DestructuringDeclaration,
        SyntaxKind::DestructuringDeclarationEntry,
        SyntaxKind::ValueParameter,
        SyntaxKind::TypeParameter,
        SyntaxKind::FunctionLiteral,
        SyntaxKind::Script,
    ]);

    /// Declarations that carry a name slot.
    pub const NAMED_DECLARATIONS: KindSet = KindSet::new(&[
        SyntaxKind::Class,
        SyntaxKind::ObjectDeclaration,
        SyntaxKind::EnumEntry,
        SyntaxKind::Fun,
        SyntaxKind::Property,
        SyntaxKind::TypeAlias,
        SyntaxKind::DestructuringDeclarationEntry,
        SyntaxKind::ValueParameter,
        SyntaxKind::TypeParameter,
    ]);

    pub const CLASS_OR_OBJECT: KindSet = KindSet::new(&[
        SyntaxKind::Class,
        SyntaxKind::EnumEntry,
        SyntaxKind::ObjectDeclaration,
    ]);

    pub const EXPRESSIONS: KindSet = KindSet::new(&[
        SyntaxKind::NameReferenceExpression,
        SyntaxKind::OperationReference,
        SyntaxKind::LabelReference,
        SyntaxKind::ConstructorDelegationReference,
        SyntaxKind::StringTemplate,
        SyntaxKind::ParenthesizedExpression,
        SyntaxKind::ThisExpression,
        SyntaxKind::SuperExpression,
        SyntaxKind::IfExpression,
        SyntaxKind::WhenExpression,
        SyntaxKind::TryExpression,
        SyntaxKind::ForExpression,
        SyntaxKind::WhileExpression,
        SyntaxKind::DoWhileExpression,
        SyntaxKind::LambdaExpression,
        SyntaxKind::AnnotatedExpression,
        SyntaxKind::LabeledExpression,
        SyntaxKind::BinaryExpression,
        SyntaxKind::BinaryWithTypeRhsExpression,
        SyntaxKind::IsExpression,
        SyntaxKind::PrefixExpression,
        SyntaxKind::PostfixExpression,
        SyntaxKind::CallExpression,
        SyntaxKind::ArrayAccessExpression,
        SyntaxKind::DotQualifiedExpression,
        SyntaxKind::SafeAccessExpression,
        SyntaxKind::CallableReferenceExpression,
        SyntaxKind::ClassLiteralExpression,
        SyntaxKind::ObjectLiteralExpression,
        SyntaxKind::ReturnExpression,
        SyntaxKind::ThrowExpression,
        SyntaxKind::BreakExpression,
        SyntaxKind::ContinueExpression,
        SyntaxKind::CollectionLiteralExpression,
        SyntaxKind::Block,
    ])
    .union(KindSet::CONSTANTS)
    .union(KindSet::DECLARATIONS);

    pub const REFERENCE_EXPRESSIONS: KindSet = KindSet::new(&[
        SyntaxKind::NameReferenceExpression,
        SyntaxKind::OperationReference,
        SyntaxKind::LabelReference,
        SyntaxKind::ConstructorDelegationReference,
        SyntaxKind::CallExpression,
        SyntaxKind::ArrayAccessExpression,
    ]);

    pub const SIMPLE_NAME_EXPRESSIONS: KindSet = KindSet::new(&[
        SyntaxKind::NameReferenceExpression,
        SyntaxKind::OperationReference,
        SyntaxKind::LabelReference,
    ]);

    pub const EXPRESSIONS_WITH_LABEL: KindSet = KindSet::new(&[
        SyntaxKind::LabeledExpression,
        SyntaxKind::ReturnExpression,
        SyntaxKind::BreakExpression,
        SyntaxKind::ContinueExpression,
        SyntaxKind::ThisExpression,
        SyntaxKind::SuperExpression,
    ]);

    pub const UNARY_EXPRESSIONS: KindSet =
        KindSet::new(&[SyntaxKind::PrefixExpression, SyntaxKind::PostfixExpression]);

    pub const LOOP_EXPRESSIONS: KindSet = KindSet::new(&[
        SyntaxKind::ForExpression,
        SyntaxKind::WhileExpression,
        SyntaxKind::DoWhileExpression,
    ]);

    pub const QUALIFIED_EXPRESSIONS: KindSet = KindSet::new(&[
        SyntaxKind::DotQualifiedExpression,
        SyntaxKind::SafeAccessExpression,
    ]);

    pub const DOUBLE_COLON_EXPRESSIONS: KindSet = KindSet::new(&[
        SyntaxKind::CallableReferenceExpression,
        SyntaxKind::ClassLiteralExpression,
    ]);

    pub const TYPE_ELEMENTS: KindSet = KindSet::new(&[
        SyntaxKind::UserType,
        SyntaxKind::NullableType,
        SyntaxKind::FunctionType,
        SyntaxKind::DynamicType,
        SyntaxKind::IntersectionType,
    ]);

    pub const SUPER_TYPE_LIST_ENTRIES: KindSet = KindSet::new(&[
        SyntaxKind::SuperTypeEntry,
        SyntaxKind::SuperTypeCallEntry,
        SyntaxKind::DelegatedSuperTypeEntry,
    ]);

    pub const STRING_TEMPLATE_ENTRIES: KindSet = KindSet::new(&[
        SyntaxKind::LiteralStringTemplateEntry,
        SyntaxKind::EscapeStringTemplateEntry,
        SyntaxKind::ShortStringTemplateEntry,
        SyntaxKind::LongStringTemplateEntry,
    ]);

    pub const STRING_TEMPLATE_ENTRIES_WITH_EXPRESSION: KindSet = KindSet::new(&[
        SyntaxKind::ShortStringTemplateEntry,
        SyntaxKind::LongStringTemplateEntry,
    ]);

    pub const WHEN_CONDITIONS: KindSet = KindSet::new(&[
        SyntaxKind::WhenConditionExpression,
        SyntaxKind::WhenConditionInRange,
        SyntaxKind::WhenConditionIsPattern,
    ]);

    pub const CONTAINER_NODES: KindSet = KindSet::new(&[
        SyntaxKind::Condition,
        SyntaxKind::Then,
        SyntaxKind::Else,
        SyntaxKind::Body,
        SyntaxKind::LoopRange,
        SyntaxKind::Indices,
    ]);

    pub const VALUE_ARGUMENTS: KindSet =
        KindSet::new(&[SyntaxKind::ValueArgument, SyntaxKind::LambdaArgument]);

    /// Every node kind produced by the parser, except `Error`.
    pub const KT_ELEMENTS: KindSet = KindSet::new(&[
        SyntaxKind::KtFile,
        SyntaxKind::PackageDirective,
        SyntaxKind::ImportList,
        SyntaxKind::ImportDirective,
        SyntaxKind::ImportAlias,
        SyntaxKind::FileAnnotationList,
        SyntaxKind::ExpressionFragment,
        SyntaxKind::TypeFragment,
        SyntaxKind::PropertyDelegate,
        SyntaxKind::ConstructorDelegationCall,
        SyntaxKind::ClassBody,
        SyntaxKind::ModifierList,
        SyntaxKind::AnnotationEntry,
        SyntaxKind::AnnotationTarget,
        SyntaxKind::ConstructorCallee,
        SyntaxKind::ValueParameterList,
        SyntaxKind::TypeParameterList,
        SyntaxKind::TypeConstraintList,
        SyntaxKind::TypeConstraint,
        SyntaxKind::SuperTypeList,
        SyntaxKind::InitializerList,
        SyntaxKind::TypeReference,
        SyntaxKind::FunctionTypeReceiver,
        SyntaxKind::TypeArgumentList,
        SyntaxKind::TypeProjection,
        SyntaxKind::LabelQualifier,
        SyntaxKind::WhenEntry,
        SyntaxKind::CatchClause,
        SyntaxKind::FinallySection,
        SyntaxKind::ValueArgumentList,
        SyntaxKind::ValueArgumentName,
    ])
    .union(KindSet::EXPRESSIONS)
    .union(KindSet::TYPE_ELEMENTS)
    .union(KindSet::SUPER_TYPE_LIST_ENTRIES)
    .union(KindSet::STRING_TEMPLATE_ENTRIES)
    .union(KindSet::WHEN_CONDITIONS)
    .union(KindSet::CONTAINER_NODES)
    .union(KindSet::VALUE_ARGUMENTS);

    pub const ALL_NODES: KindSet = KindSet::KT_ELEMENTS.union(KindSet::new(&[SyntaxKind::Error]));

    /// Nodes mirrored by the stub tree. The stub builder and stub
    /// materialization both enumerate exactly these kinds in preorder.
    pub const STUB_KINDS: KindSet = KindSet::new(&[
        SyntaxKind::KtFile,
        SyntaxKind::PackageDirective,
        SyntaxKind::ImportList,
        SyntaxKind::ImportDirective,
        SyntaxKind::Class,
        SyntaxKind::ObjectDeclaration,
        SyntaxKind::EnumEntry,
        SyntaxKind::Fun,
        SyntaxKind::Property,
        SyntaxKind::PropertyAccessor,
        SyntaxKind::TypeAlias,
        SyntaxKind::PrimaryConstructor,
        SyntaxKind::SecondaryConstructor,
        SyntaxKind::ClassInitializer,
        SyntaxKind::ClassBody,
        SyntaxKind::ModifierList,
        SyntaxKind::AnnotationEntry,
        SyntaxKind::ValueParameterList,
        SyntaxKind::ValueParameter,
        SyntaxKind::TypeParameterList,
        SyntaxKind::TypeParameter,
        SyntaxKind::SuperTypeList,
        SyntaxKind::SuperTypeEntry,
        SyntaxKind::SuperTypeCallEntry,
        SyntaxKind::DelegatedSuperTypeEntry,
        SyntaxKind::Script,
    ]);
}
