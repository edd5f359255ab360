use serde::{Deserialize, Serialize};

/// Token kinds produced by the lexer.
///
/// Contextual keywords (`var`, `yield`, `record`, `module`, `uses`, …) are lexed as
/// [`SyntaxKind::Ident`]; the parser checks their text where the grammar needs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SyntaxKind {
    // Trivia
    Whitespace,
    LineComment,
    BlockComment,
    DocComment,

    // Literals / names
    Ident,
    IntLiteral,
    LongLiteral,
    FloatLiteral,
    DoubleLiteral,
    CharLiteral,
    StringLiteral,
    TextBlock,

    // Keywords
    AbstractKw,
    AssertKw,
    BooleanKw,
    BreakKw,
    ByteKw,
    CaseKw,
    CatchKw,
    CharKw,
    ClassKw,
    ContinueKw,
    DefaultKw,
    DoKw,
    DoubleKw,
    ElseKw,
    EnumKw,
    ExtendsKw,
    FalseKw,
    FinalKw,
    FinallyKw,
    FloatKw,
    ForKw,
    IfKw,
    ImplementsKw,
    ImportKw,
    InstanceofKw,
    IntKw,
    InterfaceKw,
    LongKw,
    NativeKw,
    NewKw,
    NullKw,
    PackageKw,
    PrivateKw,
    ProtectedKw,
    PublicKw,
    ReturnKw,
    ShortKw,
    StaticKw,
    StrictfpKw,
    SuperKw,
    SwitchKw,
    SynchronizedKw,
    ThisKw,
    ThrowKw,
    ThrowsKw,
    TransientKw,
    TrueKw,
    TryKw,
    VoidKw,
    VolatileKw,
    WhileKw,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Ellipsis,
    At,
    ColonColon,
    Colon,
    Question,
    Arrow,

    // Operators. `>` is always lexed alone so nested type arguments close cleanly; shifts
    // are recognised by the parser from adjacent `>` tokens.
    Eq,
    EqEq,
    Bang,
    BangEq,
    Less,
    Greater,
    LessEq,
    GreaterEq,
    AmpAmp,
    PipePipe,
    Amp,
    Pipe,
    Caret,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    Tilde,
    LeftShift,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    LeftShiftEq,

    Error,
    Eof,
}

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::Whitespace
                | SyntaxKind::LineComment
                | SyntaxKind::BlockComment
                | SyntaxKind::DocComment
        )
    }

    #[inline]
    pub fn is_comment(self) -> bool {
        matches!(
            self,
            SyntaxKind::LineComment | SyntaxKind::BlockComment | SyntaxKind::DocComment
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            SyntaxKind::IntLiteral
                | SyntaxKind::LongLiteral
                | SyntaxKind::FloatLiteral
                | SyntaxKind::DoubleLiteral
                | SyntaxKind::CharLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::TextBlock
                | SyntaxKind::TrueKw
                | SyntaxKind::FalseKw
                | SyntaxKind::NullKw
        )
    }

    pub fn is_primitive_type(self) -> bool {
        matches!(
            self,
            SyntaxKind::BooleanKw
                | SyntaxKind::ByteKw
                | SyntaxKind::ShortKw
                | SyntaxKind::IntKw
                | SyntaxKind::LongKw
                | SyntaxKind::CharKw
                | SyntaxKind::FloatKw
                | SyntaxKind::DoubleKw
        )
    }

    pub fn is_modifier_keyword(self) -> bool {
        matches!(
            self,
            SyntaxKind::PublicKw
                | SyntaxKind::ProtectedKw
                | SyntaxKind::PrivateKw
                | SyntaxKind::StaticKw
                | SyntaxKind::AbstractKw
                | SyntaxKind::FinalKw
                | SyntaxKind::NativeKw
                | SyntaxKind::SynchronizedKw
                | SyntaxKind::TransientKw
                | SyntaxKind::VolatileKw
                | SyntaxKind::StrictfpKw
                | SyntaxKind::DefaultKw
        )
    }

    pub fn is_assignment_operator(self) -> bool {
        matches!(
            self,
            SyntaxKind::Eq
                | SyntaxKind::PlusEq
                | SyntaxKind::MinusEq
                | SyntaxKind::StarEq
                | SyntaxKind::SlashEq
                | SyntaxKind::PercentEq
                | SyntaxKind::AmpEq
                | SyntaxKind::PipeEq
                | SyntaxKind::CaretEq
                | SyntaxKind::LeftShiftEq
        )
    }

    pub fn keyword(text: &str) -> Option<SyntaxKind> {
        use SyntaxKind::*;
        Some(match text {
            "abstract" => AbstractKw,
            "assert" => AssertKw,
            "boolean" => BooleanKw,
            "break" => BreakKw,
            "byte" => ByteKw,
            "case" => CaseKw,
            "catch" => CatchKw,
            "char" => CharKw,
            "class" => ClassKw,
            "continue" => ContinueKw,
            "default" => DefaultKw,
            "do" => DoKw,
            "double" => DoubleKw,
            "else" => ElseKw,
            "enum" => EnumKw,
            "extends" => ExtendsKw,
            "false" => FalseKw,
            "final" => FinalKw,
            "finally" => FinallyKw,
            "float" => FloatKw,
            "for" => ForKw,
            "if" => IfKw,
            "implements" => ImplementsKw,
            "import" => ImportKw,
            "instanceof" => InstanceofKw,
            "int" => IntKw,
            "interface" => InterfaceKw,
            "long" => LongKw,
            "native" => NativeKw,
            "new" => NewKw,
            "null" => NullKw,
            "package" => PackageKw,
            "private" => PrivateKw,
            "protected" => ProtectedKw,
            "public" => PublicKw,
            "return" => ReturnKw,
            "short" => ShortKw,
            "static" => StaticKw,
            "strictfp" => StrictfpKw,
            "super" => SuperKw,
            "switch" => SwitchKw,
            "synchronized" => SynchronizedKw,
            "this" => ThisKw,
            "throw" => ThrowKw,
            "throws" => ThrowsKw,
            "transient" => TransientKw,
            "true" => TrueKw,
            "try" => TryKw,
            "void" => VoidKw,
            "volatile" => VolatileKw,
            "while" => WhileKw,
            _ => return None,
        })
    }
}
