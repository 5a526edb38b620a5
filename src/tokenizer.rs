use std::fmt;

use tracing::trace;

use crate::error::LexError;

/// Reserved words of the SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Create,
    Table,
    Insert,
    Into,
    Values,
    Select,
    From,
    Where,
    Update,
    Set,
    Delete,
    And,
    Or,
    Not,
    Inner,
    Join,
    On,
    Int,
    Str,
}

/// Keyword lookup table. Words are ASCII-uppercased before the lookup, so keyword
/// matching is case-insensitive while identifiers keep their casing.
const KEYWORDS: &[(&str, Keyword)] = &[
    ("CREATE", Keyword::Create),
    ("TABLE", Keyword::Table),
    ("INSERT", Keyword::Insert),
    ("INTO", Keyword::Into),
    ("VALUES", Keyword::Values),
    ("SELECT", Keyword::Select),
    ("FROM", Keyword::From),
    ("WHERE", Keyword::Where),
    ("UPDATE", Keyword::Update),
    ("SET", Keyword::Set),
    ("DELETE", Keyword::Delete),
    ("AND", Keyword::And),
    ("OR", Keyword::Or),
    ("NOT", Keyword::Not),
    ("INNER", Keyword::Inner),
    ("JOIN", Keyword::Join),
    ("ON", Keyword::On),
    ("INT", Keyword::Int),
    ("STR", Keyword::Str),
];

impl Keyword {
    /// Looks a word up in the keyword table, ignoring case.
    pub fn lookup(word: &str) -> Option<Self> {
        let upper = word.to_ascii_uppercase();
        KEYWORDS
            .iter()
            .find(|(name, _)| *name == upper)
            .map(|(_, keyword)| *keyword)
    }

    pub fn as_str(self) -> &'static str {
        KEYWORDS
            .iter()
            .find(|(_, keyword)| *keyword == self)
            .map_or("?", |(name, _)| *name)
    }
}

/// Represents the smallest meaningful units (atoms) of the SQL language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A reserved word such as `SELECT` or `INNER`.
    Keyword(Keyword),

    // --- Identifiers & Literals ---
    /// A name representing a table or a column (e.g., `users`, `id`).
    Ident(String),
    /// A 64-bit integer literal (e.g., `42`).
    Integer(i64),
    /// A string literal, between single or double quotes, escapes resolved.
    Str(String),

    // --- Operators ---
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    LtEq,
    /// `>=`
    GtEq,

    // --- Symbols ---
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
    /// `.` separating a table qualifier from a column name.
    Dot,
    /// Wildcard `*`
    Star,

    // --- Special ---
    /// A run of whitespace; only produced by [Tokenizer::tokenize_with_whitespace].
    Whitespace(String),
    /// Represents the End Of File/Input.
    Eof,
}

impl TokenKind {
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Self::Keyword(k) if *k == keyword)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(k) => f.write_str(k.as_str()),
            Self::Ident(name) => write!(f, "identifier '{name}'"),
            Self::Integer(i) => write!(f, "integer {i}"),
            Self::Str(s) => write!(f, "string '{s}'"),
            Self::Eq => f.write_str("'='"),
            Self::NotEq => f.write_str("'!='"),
            Self::Lt => f.write_str("'<'"),
            Self::Gt => f.write_str("'>'"),
            Self::LtEq => f.write_str("'<='"),
            Self::GtEq => f.write_str("'>='"),
            Self::LeftParen => f.write_str("'('"),
            Self::RightParen => f.write_str("')'"),
            Self::Comma => f.write_str("','"),
            Self::Semicolon => f.write_str("';'"),
            Self::Dot => f.write_str("'.'"),
            Self::Star => f.write_str("'*'"),
            Self::Whitespace(_) => f.write_str("whitespace"),
            Self::Eof => f.write_str("end of input"),
        }
    }
}

/// A token together with where it starts in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

/// Start of the token being scanned.
#[derive(Clone, Copy)]
struct Mark {
    offset: usize,
    line: usize,
    column: usize,
}

/// A lexical scanner (lexer) that converts a raw SQL string into a sequence of [Token]s.
pub struct Tokenizer {
    /// The input string stored as a vector of characters for easy iteration.
    input: Vec<char>,
    /// The current position in the character vector.
    position: usize,
    /// Byte offset matching `position`.
    offset: usize,
    line: usize,
    column: usize,
}

impl Tokenizer {
    /// Creates a new Tokenizer for the given input string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Processes the entire input and returns a vector of tokens, whitespace
    /// and comments discarded. The last token is always [TokenKind::Eof].
    ///
    /// # Errors
    /// Returns a [LexError] on an unexpected character, a malformed operator,
    /// an unterminated string or an integer literal out of range.
    ///
    /// # Example
    /// ```
    /// # use rowdb::tokenizer::{Keyword, TokenKind, Tokenizer};
    /// let mut t = Tokenizer::new("SELECT *");
    /// let tokens = t.tokenize().unwrap();
    /// assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Select));
    /// assert_eq!(tokens[1].kind, TokenKind::Star);
    /// ```
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        self.scan(false)
    }

    /// Like [Tokenizer::tokenize], but keeps each whitespace run as a
    /// [TokenKind::Whitespace] token. Comments are still dropped.
    pub fn tokenize_with_whitespace(&mut self) -> Result<Vec<Token>, LexError> {
        self.scan(true)
    }

    fn scan(&mut self, keep_whitespace: bool) -> Result<Vec<Token>, LexError> {
        self.position = 0;
        self.offset = 0;
        self.line = 1;
        self.column = 1;

        let mut tokens = Vec::new();
        while !self.is_at_end() {
            if let Some(token) = self.scan_token(keep_whitespace)? {
                tokens.push(token);
            }
        }

        tokens.push(self.eof());
        trace!(count = tokens.len(), "tokenized input");
        Ok(tokens)
    }

    /// Scans the next statement of a script: its tokens up to and including
    /// the closing `;`, then [TokenKind::Eof]. Positions stay relative to the
    /// whole input. Returns `None` once only whitespace and comments remain.
    ///
    /// After a [LexError] the rest of the failed statement is skipped, so the
    /// next call starts on the following statement.
    ///
    /// # Example
    /// ```
    /// # use rowdb::tokenizer::{TokenKind, Tokenizer};
    /// let mut t = Tokenizer::new("SELECT a FROM t; SELECT @; DELETE FROM t");
    /// assert_eq!(t.next_statement().unwrap().unwrap().len(), 6);
    /// assert!(t.next_statement().unwrap().is_err());
    /// let last = t.next_statement().unwrap().unwrap();
    /// assert_eq!(last.last().unwrap().kind, TokenKind::Eof);
    /// assert!(t.next_statement().is_none());
    /// ```
    pub fn next_statement(&mut self) -> Option<Result<Vec<Token>, LexError>> {
        let mut tokens = Vec::new();
        while !self.is_at_end() {
            match self.scan_token(false) {
                Ok(Some(token)) => {
                    let closed = token.kind == TokenKind::Semicolon;
                    tokens.push(token);
                    if closed {
                        break;
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    self.skip_statement();
                    return Some(Err(err));
                }
            }
        }

        if tokens.is_empty() {
            return None;
        }
        tokens.push(self.eof());
        trace!(count = tokens.len(), "tokenized statement");
        Some(Ok(tokens))
    }

    /// Scans one token at the cursor. Whitespace yields `None` unless kept,
    /// comments always yield `None`.
    fn scan_token(&mut self, keep_whitespace: bool) -> Result<Option<Token>, LexError> {
        let mark = self.mark();
        let ch = self.current_char();

        if is_whitespace(ch) {
            let run = self.read_whitespace();
            return Ok(keep_whitespace.then(|| self.token(TokenKind::Whitespace(run), mark)));
        }

        if ch == '-' {
            self.advance();
            if self.peek() == Some('-') {
                self.skip_line_comment();
                return Ok(None);
            }
            return Err(self.error_at(
                "Unexpected character '-' (did you mean '--' for a comment?)",
                mark,
            ));
        }

        let kind = self.next_token(mark)?;
        Ok(Some(self.token(kind, mark)))
    }

    /// Moves past the next `;` that is outside a string literal or comment.
    /// Returns whether one was found before the end of input.
    fn skip_statement(&mut self) -> bool {
        while let Some(c) = self.peek() {
            self.advance();
            match c {
                ';' => return true,
                '\'' | '"' => {
                    while let Some(s) = self.peek() {
                        self.advance();
                        if s == c {
                            break;
                        }
                        if s == '\\' && self.peek().is_some() {
                            self.advance();
                        }
                    }
                }
                '-' if self.peek() == Some('-') => self.skip_line_comment(),
                _ => {}
            }
        }
        false
    }

    /// Identifies the next token based on the character at the current position.
    fn next_token(&mut self, mark: Mark) -> Result<TokenKind, LexError> {
        let ch = self.current_char();

        match ch {
            '(' => {
                self.advance();
                Ok(TokenKind::LeftParen)
            }
            ')' => {
                self.advance();
                Ok(TokenKind::RightParen)
            }
            ',' => {
                self.advance();
                Ok(TokenKind::Comma)
            }
            ';' => {
                self.advance();
                Ok(TokenKind::Semicolon)
            }
            '.' => {
                self.advance();
                Ok(TokenKind::Dot)
            }
            '*' => {
                self.advance();
                Ok(TokenKind::Star)
            }
            '=' => {
                self.advance();
                Ok(TokenKind::Eq)
            }
            '!' => {
                self.advance();
                if self.match_char('=') {
                    Ok(TokenKind::NotEq)
                } else {
                    Err(self.error_at("Unexpected character '!' (did you mean '!='?)", mark))
                }
            }
            '<' => {
                self.advance();
                if self.match_char('=') {
                    Ok(TokenKind::LtEq)
                } else {
                    Ok(TokenKind::Lt)
                }
            }
            '>' => {
                self.advance();
                if self.match_char('=') {
                    Ok(TokenKind::GtEq)
                } else {
                    Ok(TokenKind::Gt)
                }
            }
            '\'' | '"' => self.read_string(mark),
            c if c.is_ascii_digit() => self.read_number(mark),
            c if c.is_alphabetic() || c == '_' => Ok(self.read_identifier()),
            _ => Err(self.error_at(format!("Unexpected character: '{ch}'"), mark)),
        }
    }

    // --- Navigation Helpers ---

    /// Returns the character at the current position.
    fn current_char(&self) -> char {
        self.input[self.position]
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Moves the cursor forward by one character, keeping line/column in step.
    fn advance(&mut self) {
        let ch = self.input[self.position];
        self.position += 1;
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Checks if the cursor has reached the end of the input.
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn mark(&self) -> Mark {
        Mark {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    fn token(&self, kind: TokenKind, mark: Mark) -> Token {
        Token {
            kind,
            offset: mark.offset,
            line: mark.line,
            column: mark.column,
        }
    }

    fn eof(&self) -> Token {
        self.token(TokenKind::Eof, self.mark())
    }

    fn error_at(&self, message: impl Into<String>, mark: Mark) -> LexError {
        LexError {
            message: message.into(),
            offset: mark.offset,
            line: mark.line,
            column: mark.column,
        }
    }

    // --- Extraction Logic ---

    fn read_whitespace(&mut self) -> String {
        let mut run = String::new();
        while let Some(c) = self.peek().filter(|c| is_whitespace(*c)) {
            run.push(c);
            self.advance();
        }
        run
    }

    /// Skips the rest of a `--` comment; the newline itself is left for the
    /// whitespace scanner.
    fn skip_line_comment(&mut self) {
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
    }

    /// Reads a sequence of alphanumeric characters and determines if it's
    /// a reserved SQL keyword or a user-defined identifier.
    fn read_identifier(&mut self) -> TokenKind {
        let mut ident = String::new();

        while let Some(c) = self.peek().filter(|c| c.is_alphanumeric() || *c == '_') {
            ident.push(c);
            self.advance();
        }

        match Keyword::lookup(&ident) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Ident(ident),
        }
    }

    /// Reads a maximal run of digits as an `i64`.
    fn read_number(&mut self, mark: Mark) -> Result<TokenKind, LexError> {
        let mut number = String::new();

        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            number.push(c);
            self.advance();
        }

        number
            .parse::<i64>()
            .map(TokenKind::Integer)
            .map_err(|_| self.error_at(format!("Invalid number: {number}"), mark))
    }

    /// Reads a string literal. Only the quote character that opened the
    /// literal closes it.
    fn read_string(&mut self, mark: Mark) -> Result<TokenKind, LexError> {
        let quote = self.current_char();
        self.advance(); // Skip the opening quote

        let mut string = String::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(self.error_at("Unterminated string literal", mark));
            };
            self.advance();

            if c == quote {
                return Ok(TokenKind::Str(string));
            }

            if c == '\\' {
                let Some(escaped) = self.peek() else {
                    return Err(self.error_at("Unterminated string literal", mark));
                };
                self.advance();
                string.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    other => other,
                });
            } else {
                string.push(c);
            }
        }
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// True when `input` holds a `;` outside every string literal and comment,
/// i.e. at least one statement in it is complete.
pub fn has_statement_end(input: &str) -> bool {
    Tokenizer::new(input).skip_statement()
}

/// Drops [TokenKind::Whitespace] tokens from a whitespace-preserving stream.
pub fn filter_whitespace(tokens: Vec<Token>) -> Vec<Token> {
    tokens
        .into_iter()
        .filter(|t| !matches!(t.kind, TokenKind::Whitespace(_)))
        .collect()
}

/// Checks that every `)` closes an earlier `(` and none are left open.
pub fn parens_balanced(tokens: &[Token]) -> bool {
    let mut depth: usize = 0;
    for token in tokens {
        match token.kind {
            TokenKind::LeftParen => depth += 1,
            TokenKind::RightParen => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

/// One token per line with its position, for debugging output.
pub fn format_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .enumerate()
        .map(|(i, t)| format!("[{i}] {} @ {}:{} (byte {})\n", t.kind, t.line, t.column, t.offset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kinds(sql: &str) -> Vec<TokenKind> {
        Tokenizer::new(sql)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn kw(k: Keyword) -> TokenKind {
        TokenKind::Keyword(k)
    }

    #[test]
    fn test_tokenize_simple() {
        assert_eq!(
            kinds("CREATE TABLE users"),
            vec![
                kw(Keyword::Create),
                kw(Keyword::Table),
                TokenKind::Ident("users".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_create_table() {
        assert_eq!(
            kinds("CREATE TABLE users (id int, name str);"),
            vec![
                kw(Keyword::Create),
                kw(Keyword::Table),
                TokenKind::Ident("users".into()),
                TokenKind::LeftParen,
                TokenKind::Ident("id".into()),
                kw(Keyword::Int),
                TokenKind::Comma,
                TokenKind::Ident("name".into()),
                kw(Keyword::Str),
                TokenKind::RightParen,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_case_insensitive_identifiers_preserved() {
        assert_eq!(
            kinds("select Name fRoM Users"),
            vec![
                kw(Keyword::Select),
                TokenKind::Ident("Name".into()),
                kw(Keyword::From),
                TokenKind::Ident("Users".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_operators_greedy() {
        assert_eq!(
            kinds("= != < > <= >= <>"),
            vec![
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_qualified_column() {
        assert_eq!(
            kinds("a.x"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Dot,
                TokenKind::Ident("x".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_numbers() {
        assert_eq!(
            kinds("42, 0, 9223372036854775807"),
            vec![
                TokenKind::Integer(42),
                TokenKind::Comma,
                TokenKind::Integer(0),
                TokenKind::Comma,
                TokenKind::Integer(i64::MAX),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_number_out_of_range() {
        let err = Tokenizer::new("9223372036854775808").tokenize().unwrap_err();
        assert!(err.message.starts_with("Invalid number"));
    }

    #[test]
    fn test_tokenize_strings_both_quotes() {
        assert_eq!(
            kinds(r#"'Alice', "Bob Dylan", ''"#),
            vec![
                TokenKind::Str("Alice".into()),
                TokenKind::Comma,
                TokenKind::Str("Bob Dylan".into()),
                TokenKind::Comma,
                TokenKind::Str(String::new()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_content_is_verbatim() {
        assert_eq!(
            kinds(r#""it's; SELECT x""#),
            vec![TokenKind::Str("it's; SELECT x".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#"'a\nb\tc\\d\'e\"f\qg'"#),
            vec![TokenKind::Str("a\nb\tc\\d'e\"fqg".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = Tokenizer::new("SELECT * FROM t WHERE name = \"Alice;")
            .tokenize()
            .unwrap_err();
        assert!(err.message.contains("Unterminated"));
        assert_eq!(err.offset, 29);
        assert_eq!(err.column, 30);
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            kinds("SELECT -- pick everything\n*"),
            vec![kw(Keyword::Select), TokenKind::Star, TokenKind::Eof]
        );
    }

    #[test]
    fn test_bare_minus_and_bang_are_errors() {
        assert!(Tokenizer::new("a - b").tokenize().is_err());
        let err = Tokenizer::new("a ! b").tokenize().unwrap_err();
        assert!(err.message.contains("'!'"));
    }

    #[test]
    fn test_unexpected_character() {
        let err = Tokenizer::new("SELECT @").tokenize().unwrap_err();
        assert_eq!(err.message, "Unexpected character: '@'");
        assert_eq!(err.column, 8);
    }

    #[test]
    fn test_positions() {
        let tokens = Tokenizer::new("SELECT\n  name").tokenize().unwrap();
        assert_eq!((tokens[0].offset, tokens[0].line, tokens[0].column), (0, 1, 1));
        assert_eq!((tokens[1].offset, tokens[1].line, tokens[1].column), (9, 2, 3));
        assert_eq!(tokens[2].kind, TokenKind::Eof);
        assert_eq!(tokens[2].offset, 13);
    }

    #[test]
    fn test_byte_offsets_after_multibyte() {
        let tokens = Tokenizer::new("'é' x").tokenize().unwrap();
        assert_eq!(tokens[1].offset, 5);
        assert_eq!(tokens[1].column, 5);
    }

    #[test]
    fn test_single_eof_on_empty_input() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("  -- only a comment"), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_whitespace_preserving_mode() {
        let tokens = Tokenizer::new("a  b").tokenize_with_whitespace().unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Whitespace("  ".into()));
        assert_eq!(tokens.len(), 4);
    }

    #[test]
    fn test_parens_balanced() {
        let ok = Tokenizer::new("((a) (b))").tokenize().unwrap();
        let bad = Tokenizer::new("(a))(").tokenize().unwrap();
        assert!(parens_balanced(&ok));
        assert!(!parens_balanced(&bad));
    }

    #[test]
    fn test_format_tokens() {
        let tokens = Tokenizer::new("SELECT").tokenize().unwrap();
        assert_eq!(
            format_tokens(&tokens),
            "[0] SELECT @ 1:1 (byte 0)\n[1] end of input @ 1:7 (byte 6)\n"
        );
    }

    #[test]
    fn test_keywords_need_ascii_spelling() {
        assert_eq!(
            kinds("\u{17f}elect \u{131}nt"),
            vec![
                TokenKind::Ident("\u{17f}elect".into()),
                TokenKind::Ident("\u{131}nt".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_next_statement_splits_script() {
        let mut t = Tokenizer::new("CREATE TABLE t (id int);\n-- note\nINSERT INTO t VALUES ('a;b')");
        let first = t.next_statement().unwrap().unwrap();
        assert_eq!(first[first.len() - 2].kind, TokenKind::Semicolon);
        assert_eq!(first[first.len() - 1].kind, TokenKind::Eof);

        let second = t.next_statement().unwrap().unwrap();
        assert_eq!(second[0].kind, kw(Keyword::Insert));
        assert_eq!((second[0].line, second[0].column), (3, 1));
        assert_eq!(second[5].kind, TokenKind::Str("a;b".into()));

        assert!(t.next_statement().is_none());
    }

    #[test]
    fn test_next_statement_recovers_after_lex_error() {
        let mut t = Tokenizer::new("SELECT @ FROM t WHERE s = ';'; DELETE FROM t;  -- done");
        let err = t.next_statement().unwrap().unwrap_err();
        assert_eq!(err.column, 8);

        let next = t.next_statement().unwrap().unwrap();
        assert_eq!(next[0].kind, kw(Keyword::Delete));
        assert!(t.next_statement().is_none());
    }

    #[test]
    fn test_has_statement_end() {
        assert!(has_statement_end("SELECT * FROM t;"));
        assert!(has_statement_end("SELECT * FROM t; -- note"));
        assert!(!has_statement_end("SELECT * FROM t -- later;"));
        assert!(!has_statement_end("SELECT * FROM t WHERE s = 'a;"));
        assert!(!has_statement_end(r"SELECT 'it\'s;"));
        assert!(has_statement_end("SELECT 'a;b' FROM t;"));
    }

    proptest! {
        #[test]
        fn prop_whitespace_round_trip(sql in r"[a-zA-Z_ ,()*=<>;.\t\n0-9']{0,60}") {
            let plain = Tokenizer::new(&sql).tokenize();
            let spaced = Tokenizer::new(&sql).tokenize_with_whitespace();
            match (plain, spaced) {
                (Ok(plain), Ok(spaced)) => prop_assert_eq!(filter_whitespace(spaced), plain),
                (Err(a), Err(b)) => prop_assert_eq!(a, b),
                (a, b) => prop_assert!(false, "modes disagree: {:?} vs {:?}", a, b),
            }
        }

        #[test]
        fn prop_integer_literal(n in 0i64..=i64::MAX) {
            let tokens = Tokenizer::new(&n.to_string()).tokenize().unwrap();
            prop_assert_eq!(&tokens[0].kind, &TokenKind::Integer(n));
        }
    }
}
