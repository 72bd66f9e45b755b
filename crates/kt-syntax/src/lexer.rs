use crate::syntax_kind::SyntaxKind;
use crate::TextRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub range: TextRange,
}

impl Token {
    pub fn text<'a>(&self, input: &'a str) -> &'a str {
        &input[self.range.start as usize..self.range.end as usize]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub range: TextRange,
}

/// Lexer modes. String templates nest code inside strings and strings
/// inside code, so the lexer keeps a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// `braces` counts unmatched `{` inside a `${ ... }` entry.
    Code { in_template: bool, braces: u32 },
    String,
    RawString,
}

/// Lossless Kotlin lexer: the concatenated token texts always reproduce the
/// input, including trivia and malformed fragments.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    modes: Vec<Mode>,
    short_template_pending: bool,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            modes: vec![Mode::Code {
                in_template: false,
                braces: 0,
            }],
            short_template_pending: false,
            errors: Vec::new(),
        }
    }

    pub fn next_token(&mut self) -> Option<Token> {
        if self.pos >= self.input.len() {
            return None;
        }

        let start = self.pos;
        let kind = if self.short_template_pending {
            self.lex_short_template_name()
        } else {
            match self.mode() {
                Mode::String => self.lex_string_part(false),
                Mode::RawString => self.lex_string_part(true),
                Mode::Code { .. } => self.lex_code(),
            }
        };
        debug_assert!(self.pos > start, "lexer must make progress");

        Some(Token {
            kind,
            range: TextRange::new(start, self.pos),
        })
    }

    /// Drain the lexer, reporting unterminated constructs at end of input.
    pub fn finish(mut self) -> (Vec<Token>, Vec<LexError>) {
        let mut tokens = Vec::new();
        while let Some(tok) = self.next_token() {
            tokens.push(tok);
        }

        if self
            .modes
            .iter()
            .any(|mode| matches!(mode, Mode::String | Mode::RawString))
        {
            let end = self.input.len();
            self.error("unterminated string literal", end, end);
        }

        (tokens, self.errors)
    }

    fn mode(&self) -> Mode {
        self.modes.last().copied().unwrap_or(Mode::Code {
            in_template: false,
            braces: 0,
        })
    }

    fn lex_code(&mut self) -> SyntaxKind {
        let c = match self.peek_char() {
            Some(c) => c,
            None => return SyntaxKind::Eof,
        };

        match c {
            c if is_whitespace(c) => {
                self.eat_while(is_whitespace);
                SyntaxKind::Whitespace
            }
            '/' if self.at_str("//") => {
                self.eat_while(|c| c != '\n' && c != '\r');
                SyntaxKind::LineComment
            }
            '/' if self.at_str("/*") => self.lex_block_comment(),
            '#' if self.pos == 0 && self.at_str("#!") => {
                self.eat_while(|c| c != '\n' && c != '\r');
                SyntaxKind::Shebang
            }
            '"' => {
                if self.at_str("\"\"\"") {
                    self.pos += 3;
                    self.modes.push(Mode::RawString);
                } else {
                    self.pos += 1;
                    self.modes.push(Mode::String);
                }
                SyntaxKind::OpenQuote
            }
            '\'' => self.lex_char_literal(),
            '`' => self.lex_backtick_identifier(),
            '0'..='9' => self.lex_number(),
            '.' if self.nth_char(1).map_or(false, |c| c.is_ascii_digit()) => self.lex_number(),
            c if is_ident_start(c) => self.lex_identifier_or_keyword(),
            _ => self.lex_punctuation(),
        }
    }

    fn lex_block_comment(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.pos += 2;
        let mut depth = 1u32;
        while self.pos < self.input.len() && depth > 0 {
            if self.at_str("/*") {
                depth += 1;
                self.pos += 2;
            } else if self.at_str("*/") {
                depth -= 1;
                self.pos += 2;
            } else {
                self.bump_char();
            }
        }
        if depth > 0 {
            self.error("unterminated block comment", start, self.pos);
        }

        let text = &self.input[start..self.pos];
        if text.starts_with("/**") && text != "/**/" {
            SyntaxKind::DocComment
        } else {
            SyntaxKind::BlockComment
        }
    }

    fn lex_char_literal(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        match self.peek_char() {
            Some('\\') => self.eat_escape(),
            Some('\'') | Some('\n') | Some('\r') | None => {}
            Some(_) => {
                self.bump_char();
            }
        }

        if self.peek_char() == Some('\'') {
            self.pos += 1;
            if self.pos - start == 2 {
                self.error("empty character literal", start, self.pos);
            }
        } else {
            // Recover to the closing quote on the same line, if any.
            self.eat_while(|c| c != '\'' && c != '\n' && c != '\r');
            if self.peek_char() == Some('\'') {
                self.pos += 1;
                self.error("too many characters in a character literal", start, self.pos);
            } else {
                self.error("unterminated character literal", start, self.pos);
            }
        }
        SyntaxKind::CharacterLiteral
    }

    fn lex_backtick_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        self.eat_while(|c| c != '`' && c != '\n' && c != '\r');
        if self.peek_char() == Some('`') {
            self.pos += 1;
        } else {
            self.error("unterminated backtick identifier", start, self.pos);
        }
        SyntaxKind::Identifier
    }

    fn lex_number(&mut self) -> SyntaxKind {
        if self.at_str("0x") || self.at_str("0X") {
            self.pos += 2;
            self.eat_while(|c| c.is_ascii_hexdigit() || c == '_');
            self.eat_integer_suffix();
            return SyntaxKind::IntegerLiteral;
        }
        if self.at_str("0b") || self.at_str("0B") {
            self.pos += 2;
            self.eat_while(|c| c == '0' || c == '1' || c == '_');
            self.eat_integer_suffix();
            return SyntaxKind::IntegerLiteral;
        }

        self.eat_while(|c| c.is_ascii_digit() || c == '_');

        let mut is_float = false;
        if self.peek_char() == Some('.') && self.nth_char(1).map_or(false, |c| c.is_ascii_digit()) {
            self.pos += 1;
            self.eat_while(|c| c.is_ascii_digit() || c == '_');
            is_float = true;
        }

        if matches!(self.peek_char(), Some('e') | Some('E')) {
            let has_exponent = match self.nth_char(1) {
                Some(c) if c.is_ascii_digit() => true,
                Some('+') | Some('-') => self.nth_char(2).map_or(false, |c| c.is_ascii_digit()),
                _ => false,
            };
            if has_exponent {
                self.pos += 2;
                self.eat_while(|c| c.is_ascii_digit() || c == '_');
                is_float = true;
            }
        }

        if matches!(self.peek_char(), Some('f') | Some('F')) {
            self.pos += 1;
            return SyntaxKind::FloatLiteral;
        }
        if is_float {
            return SyntaxKind::FloatLiteral;
        }

        self.eat_integer_suffix();
        SyntaxKind::IntegerLiteral
    }

    fn eat_integer_suffix(&mut self) {
        if matches!(self.peek_char(), Some('u') | Some('U')) {
            self.pos += 1;
        }
        if self.peek_char() == Some('L') {
            self.pos += 1;
        }
    }

    fn lex_identifier_or_keyword(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.bump_char();
        self.eat_while(is_ident_continue);
        let text = &self.input[start..self.pos];

        if text == "as" && self.peek_char() == Some('?') {
            self.pos += 1;
            return SyntaxKind::AsSafe;
        }

        SyntaxKind::from_keyword(text).unwrap_or(SyntaxKind::Identifier)
    }

    fn lex_short_template_name(&mut self) -> SyntaxKind {
        self.short_template_pending = false;
        let start = self.pos;
        self.bump_char();
        self.eat_while(is_ident_continue);
        if &self.input[start..self.pos] == "this" {
            SyntaxKind::ThisKw
        } else {
            SyntaxKind::Identifier
        }
    }

    fn lex_punctuation(&mut self) -> SyntaxKind {
        const THREE: &[(&str, SyntaxKind)] = &[
            ("===", SyntaxKind::EqEqEq),
            ("!==", SyntaxKind::ExclEqEq),
            ("..<", SyntaxKind::RangeUntil),
        ];
        const TWO: &[(&str, SyntaxKind)] = &[
            ("==", SyntaxKind::EqEq),
            ("!=", SyntaxKind::ExclEq),
            ("<=", SyntaxKind::LtEq),
            (">=", SyntaxKind::GtEq),
            ("&&", SyntaxKind::AndAnd),
            ("||", SyntaxKind::OrOr),
            ("?.", SyntaxKind::SafeAccess),
            ("?:", SyntaxKind::Elvis),
            ("::", SyntaxKind::ColonColon),
            ("..", SyntaxKind::Range),
            ("->", SyntaxKind::Arrow),
            ("++", SyntaxKind::PlusPlus),
            ("--", SyntaxKind::MinusMinus),
            ("+=", SyntaxKind::PlusEq),
            ("-=", SyntaxKind::MinusEq),
            ("*=", SyntaxKind::MulEq),
            ("/=", SyntaxKind::DivEq),
            ("%=", SyntaxKind::PercEq),
            ("!!", SyntaxKind::ExclExcl),
        ];

        if self.peek_char() == Some('!') {
            for (word, kind) in [("in", SyntaxKind::NotIn), ("is", SyntaxKind::NotIs)] {
                let rest = &self.input[self.pos + 1..];
                if rest.starts_with(word)
                    && !rest[word.len()..]
                        .chars()
                        .next()
                        .map_or(false, is_ident_continue)
                {
                    self.pos += 1 + word.len();
                    return kind;
                }
            }
        }

        for (text, kind) in THREE.iter().chain(TWO.iter()) {
            if self.at_str(text) {
                self.pos += text.len();
                return *kind;
            }
        }

        let start = self.pos;
        let c = self.bump_char();
        match c {
            '(' => SyntaxKind::LParen,
            ')' => SyntaxKind::RParen,
            '{' => {
                if let Some(Mode::Code {
                    in_template: true,
                    braces,
                }) = self.modes.last_mut()
                {
                    *braces += 1;
                }
                SyntaxKind::LBrace
            }
            '}' => {
                let closes_template = matches!(
                    self.modes.last(),
                    Some(Mode::Code {
                        in_template: true,
                        braces: 0
                    })
                );
                if closes_template {
                    self.modes.pop();
                    return SyntaxKind::LongTemplateEntryEnd;
                }
                if let Some(Mode::Code {
                    in_template: true,
                    braces,
                }) = self.modes.last_mut()
                {
                    *braces -= 1;
                }
                SyntaxKind::RBrace
            }
            '[' => SyntaxKind::LBracket,
            ']' => SyntaxKind::RBracket,
            ';' => SyntaxKind::Semicolon,
            ',' => SyntaxKind::Comma,
            '.' => SyntaxKind::Dot,
            '?' => SyntaxKind::Quest,
            ':' => SyntaxKind::Colon,
            '@' => SyntaxKind::At,
            '&' => SyntaxKind::Amp,
            '=' => SyntaxKind::Eq,
            '<' => SyntaxKind::Lt,
            '>' => SyntaxKind::Gt,
            '+' => SyntaxKind::Plus,
            '-' => SyntaxKind::Minus,
            '*' => SyntaxKind::Mul,
            '/' => SyntaxKind::Div,
            '%' => SyntaxKind::Perc,
            '!' => SyntaxKind::Excl,
            _ => {
                self.error(format!("unexpected character `{c}`"), start, self.pos);
                SyntaxKind::Error
            }
        }
    }

    fn lex_string_part(&mut self, raw: bool) -> SyntaxKind {
        let start = self.pos;
        match self.peek_char() {
            Some('"') if raw => {
                let quotes = self.input[self.pos..]
                    .bytes()
                    .take_while(|b| *b == b'"')
                    .count();
                if quotes >= 3 {
                    if quotes > 3 {
                        // Extra quotes before the delimiter belong to the content.
                        self.pos += quotes - 3;
                        return SyntaxKind::RegularStringPart;
                    }
                    self.pos += 3;
                    self.modes.pop();
                    return SyntaxKind::ClosingQuote;
                }
                self.pos += quotes;
                return SyntaxKind::RegularStringPart;
            }
            Some('"') => {
                self.pos += 1;
                self.modes.pop();
                return SyntaxKind::ClosingQuote;
            }
            Some('\\') if !raw => {
                self.eat_escape();
                return SyntaxKind::EscapeSequence;
            }
            Some('$') if self.nth_char(1) == Some('{') => {
                self.pos += 2;
                self.modes.push(Mode::Code {
                    in_template: true,
                    braces: 0,
                });
                return SyntaxKind::LongTemplateEntryStart;
            }
            Some('$') if self.nth_char(1).map_or(false, is_ident_start) => {
                self.pos += 1;
                self.short_template_pending = true;
                return SyntaxKind::ShortTemplateEntryStart;
            }
            Some('\n') | Some('\r') if !raw => {
                // Single-line strings end at the line break; the break itself
                // is lexed as code.
                self.modes.pop();
                self.error("unterminated string literal", start, start);
                return self.lex_code();
            }
            _ => {}
        }

        while let Some(c) = self.peek_char() {
            let stop = match c {
                '"' => true,
                '\\' => !raw,
                '\n' | '\r' => !raw,
                '$' => self
                    .nth_char(1)
                    .map_or(false, |next| next == '{' || is_ident_start(next)),
                _ => false,
            };
            if stop && self.pos > start {
                break;
            }
            self.bump_char();
        }
        SyntaxKind::RegularStringPart
    }

    /// Consume `\x` or `\uXXXX` starting at the backslash.
    fn eat_escape(&mut self) {
        let start = self.pos;
        self.pos += 1;
        match self.peek_char() {
            Some('u') => {
                self.pos += 1;
                let digits = self.input[self.pos..]
                    .chars()
                    .take(4)
                    .take_while(|c| c.is_ascii_hexdigit())
                    .count();
                self.pos += digits;
                if digits != 4 {
                    self.error("illegal unicode escape", start, self.pos);
                }
            }
            Some('t') | Some('b') | Some('n') | Some('r') | Some('\'') | Some('"')
            | Some('\\') | Some('$') => {
                self.pos += 1;
            }
            Some('\n') | Some('\r') | None => {
                self.error("illegal escape", start, self.pos);
            }
            Some(_) => {
                self.bump_char();
                self.error("illegal escape", start, self.pos);
            }
        }
    }

    fn error(&mut self, message: impl Into<String>, start: usize, end: usize) {
        self.errors.push(LexError {
            message: message.into(),
            range: TextRange::new(start, end),
        });
    }

    fn at_str(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn nth_char(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    fn bump_char(&mut self) -> char {
        match self.peek_char() {
            Some(c) => {
                self.pos += c.len_utf8();
                c
            }
            None => '\0',
        }
    }

    fn eat_while(&mut self, mut pred: impl FnMut(char) -> bool) {
        while let Some(c) = self.peek_char() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{000C}')
}

fn is_ident_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c)
}

fn is_ident_continue(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

/// Lex `input` into tokens, discarding diagnostics.
pub fn lex(input: &str) -> Vec<Token> {
    Lexer::new(input).finish().0
}

pub fn lex_with_errors(input: &str) -> (Vec<Token>, Vec<LexError>) {
    Lexer::new(input).finish()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        lex(input)
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| *k != SyntaxKind::Whitespace)
            .collect()
    }

    #[test]
    fn soft_keywords_stay_identifiers() {
        use SyntaxKind::*;
        assert_eq!(
            kinds("data class Foo(val by: Int)"),
            vec![Identifier, ClassKw, Identifier, LParen, ValKw, Identifier, Colon, Identifier, RParen]
        );
    }

    #[test]
    fn negated_operators_need_a_word_boundary() {
        use SyntaxKind::*;
        assert_eq!(kinds("a !in b"), vec![Identifier, NotIn, Identifier]);
        assert_eq!(kinds("a !is B"), vec![Identifier, NotIs, Identifier]);
        assert_eq!(kinds("!isEmpty"), vec![Excl, Identifier]);
        assert_eq!(kinds("x as? T"), vec![Identifier, AsSafe, Identifier]);
    }

    #[test]
    fn numbers_and_ranges() {
        use SyntaxKind::*;
        assert_eq!(kinds("1..2"), vec![IntegerLiteral, Range, IntegerLiteral]);
        assert_eq!(kinds("0..<n"), vec![IntegerLiteral, RangeUntil, Identifier]);
        assert_eq!(kinds("1.5e-3f 2f .5"), vec![FloatLiteral, FloatLiteral, FloatLiteral]);
        assert_eq!(kinds("0xFF_FFu 10L 1uL"), vec![IntegerLiteral, IntegerLiteral, IntegerLiteral]);
        assert_eq!(kinds("1.toString()"), vec![IntegerLiteral, Dot, Identifier, LParen, RParen]);
    }

    #[test]
    fn string_templates_nest() {
        use SyntaxKind::*;
        assert_eq!(
            kinds(r#""a $b ${c + "d"} \n""#),
            vec![
                OpenQuote,
                RegularStringPart,
                ShortTemplateEntryStart,
                Identifier,
                RegularStringPart,
                LongTemplateEntryStart,
                Identifier,
                Plus,
                OpenQuote,
                RegularStringPart,
                ClosingQuote,
                LongTemplateEntryEnd,
                RegularStringPart,
                EscapeSequence,
                ClosingQuote,
            ]
        );
    }

    #[test]
    fn braces_inside_template_entries() {
        use SyntaxKind::*;
        assert_eq!(
            kinds(r#""${ f { it } }""#),
            vec![
                OpenQuote,
                LongTemplateEntryStart,
                Identifier,
                LBrace,
                Identifier,
                RBrace,
                LongTemplateEntryEnd,
                ClosingQuote,
            ]
        );
    }

    #[test]
    fn raw_strings_keep_extra_quotes() {
        use SyntaxKind::*;
        let input = "\"\"\"a\n\\n\"\"\"\"";
        assert_eq!(
            kinds(input),
            vec![OpenQuote, RegularStringPart, RegularStringPart, ClosingQuote]
        );
    }

    #[test]
    fn comments_nest_and_docs_are_distinguished() {
        use SyntaxKind::*;
        assert_eq!(
            kinds("/* a /* b */ c */ /** doc */ /**/ // line"),
            vec![BlockComment, DocComment, BlockComment, LineComment]
        );
    }

    #[test]
    fn unterminated_constructs_report_errors() {
        let (_, errors) = lex_with_errors("\"abc");
        assert_eq!(errors.len(), 1);
        let (_, errors) = lex_with_errors("/* open");
        assert_eq!(errors[0].message, "unterminated block comment");
        let (tokens, errors) = lex_with_errors("'ab'");
        assert_eq!(tokens.len(), 1);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn character_literals() {
        use SyntaxKind::*;
        assert_eq!(kinds(r"'a' '\n' '\u0041' 'é'"), vec![CharacterLiteral; 4]);
        let (tokens, errors) = lex_with_errors("''");
        assert_eq!(tokens.len(), 1);
        assert_eq!(errors[0].message, "empty character literal");
        let (_, errors) = lex_with_errors("'a");
        assert_eq!(errors[0].message, "unterminated character literal");
    }

    #[test]
    fn lexing_is_lossless() {
        let input = "package a.b\n\nfun `weird name`(x: Int) = \"$x ${x + 1}\" // done\n#";
        let tokens = lex(input);
        let joined: String = tokens.iter().map(|t| t.text(input)).collect();
        assert_eq!(joined, input);
    }
}
