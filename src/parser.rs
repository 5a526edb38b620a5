//! Recursive-descent parser turning a token stream into [Statement]s.
//!
//! Condition precedence, loosest first: `OR`, `AND`, then a parenthesized
//! condition or a single comparison. Both logical operators are
//! left-associative, so `a = 1 OR b = 2 OR c = 3` groups as
//! `((a = 1 OR b = 2) OR c = 3)`.

use tracing::warn;

use crate::ast::*;
use crate::condition::{ComparisonOp, Condition, ConditionValue};
use crate::data_type::DataType;
use crate::error::ParseError;
use crate::table::ColumnDef;
use crate::tokenizer::{Keyword, Token, TokenKind};
use crate::value::Value;

/// Parses statements out of a token stream.
///
/// Besides [Parser::parse] and [Parser::parse_all], the parser is an
/// [Iterator] over the statements of a script. After a bad statement the
/// iterator skips to the next `;` or statement keyword and carries on, so a
/// caller can report every error in one pass.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    /// Creates a parser. A missing trailing [TokenKind::Eof] is added.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof) {
            let (offset, line, column) = tokens
                .last()
                .map_or((0, 1, 1), |t| (t.offset, t.line, t.column));
            tokens.push(Token {
                kind: TokenKind::Eof,
                offset,
                line,
                column,
            });
        }
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parses exactly one statement. A trailing `;` is allowed, anything after
    /// it is an error.
    ///
    /// # Example
    /// ```
    /// # use rowdb::parser::Parser;
    /// # use rowdb::tokenizer::Tokenizer;
    /// # use rowdb::ast::Statement;
    /// let tokens = Tokenizer::new("DELETE FROM users;").tokenize().unwrap();
    /// let statement = Parser::new(tokens).parse().unwrap();
    /// assert!(matches!(statement, Statement::Delete(_)));
    /// ```
    pub fn parse(&mut self) -> Result<Statement, ParseError> {
        let statement = self.parse_statement()?;

        // semicolon is optional so skip it
        self.match_kind(&TokenKind::Semicolon);

        if !self.is_at_end() {
            return Err(ParseError::at(
                format!("unexpected token after statement: {}", self.current_token().kind),
                self.current_token(),
            ));
        }

        Ok(statement)
    }

    /// Parses every statement up to end of input, stopping at the first error.
    /// Statements may be separated by a single `;`. Empty input yields an
    /// empty list.
    pub fn parse_all(&mut self) -> Result<Vec<Statement>, ParseError> {
        self.collect()
    }

    //helpers
    fn current_token(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn previous_token(&self) -> Option<&Token> {
        self.position.checked_sub(1).map(|i| &self.tokens[i])
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current_token().kind, TokenKind::Eof)
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current_token().kind.is_keyword(keyword)
    }

    fn match_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_kind(&mut self, kind: &TokenKind) -> bool {
        if self.current_token().kind == *kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.match_keyword(keyword) {
            Ok(())
        } else {
            Err(ParseError::unexpected(keyword.as_str(), self.current_token()))
        }
    }

    fn consume(&mut self, kind: TokenKind, what: &str) -> Result<(), ParseError> {
        if self.match_kind(&kind) {
            Ok(())
        } else {
            Err(ParseError::unexpected(what, self.current_token()))
        }
    }

    fn consume_ident(&mut self, what: &str) -> Result<String, ParseError> {
        match &self.current_token().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(ParseError::unexpected(what, self.current_token())),
        }
    }

    /// `ident` or `ident.ident`
    fn consume_column_name(&mut self, what: &str) -> Result<ColumnName, ParseError> {
        let first = self.consume_ident(what)?;
        if self.match_kind(&TokenKind::Dot) {
            let column = self.consume_ident("column name after '.'")?;
            Ok(ColumnName::qualified(first, column))
        } else {
            Ok(ColumnName::bare(first))
        }
    }

    fn consume_data_type(&mut self) -> Result<DataType, ParseError> {
        let data_type = match self.current_token().kind {
            TokenKind::Keyword(Keyword::Int) => DataType::Int,
            TokenKind::Keyword(Keyword::Str) => DataType::Str,
            _ => {
                return Err(ParseError::unexpected(
                    "data type (int or str)",
                    self.current_token(),
                ));
            }
        };
        self.advance();
        Ok(data_type)
    }

    fn at_statement_start(&self) -> bool {
        matches!(
            self.current_token().kind,
            TokenKind::Keyword(
                Keyword::Create | Keyword::Insert | Keyword::Select | Keyword::Update | Keyword::Delete
            )
        )
    }

    /// Skips past the failed statement that began at `start`: stops after a
    /// `;` or in front of the next statement keyword.
    fn synchronize(&mut self, start: usize) {
        if self.position == start {
            self.advance();
        }
        while !self.is_at_end() {
            if matches!(self.previous_token(), Some(t) if t.kind == TokenKind::Semicolon) {
                return;
            }
            if self.at_statement_start() {
                return;
            }
            self.advance();
        }
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match self.current_token().kind {
            TokenKind::Keyword(Keyword::Create) => self.parse_create_table(),
            TokenKind::Keyword(Keyword::Insert) => self.parse_insert(),
            TokenKind::Keyword(Keyword::Select) => self.parse_select(),
            TokenKind::Keyword(Keyword::Update) => self.parse_update(),
            TokenKind::Keyword(Keyword::Delete) => self.parse_delete(),
            _ => Err(ParseError::unexpected(
                "CREATE, INSERT, SELECT, UPDATE or DELETE",
                self.current_token(),
            )),
        }
    }

    fn parse_column_def(&mut self) -> Result<ColumnDef, ParseError> {
        let name = self.consume_ident("column name")?;
        let data_type = self.consume_data_type()?;
        Ok(ColumnDef::new(name, data_type))
    }

    fn parse_create_table(&mut self) -> Result<Statement, ParseError> {
        self.consume_keyword(Keyword::Create)?;
        self.consume_keyword(Keyword::Table)?;
        let name = self.consume_ident("table name")?;
        self.consume(TokenKind::LeftParen, "'('")?;
        let mut columns = vec![];
        loop {
            columns.push(self.parse_column_def()?);
            match self.current_token().kind {
                TokenKind::RightParen => {
                    self.advance();
                    break;
                }
                TokenKind::Comma => {
                    self.advance();
                    continue;
                }
                _ => return Err(ParseError::unexpected("',' or ')'", self.current_token())),
            }
        }
        Ok(Statement::CreateTable(CreateTable { name, columns }))
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        match &self.current_token().kind {
            TokenKind::Integer(i) => {
                let value = Value::Int(*i);
                self.advance();
                Ok(Expr::Literal(value))
            }
            TokenKind::Str(s) => {
                let value = Value::from(s.as_str());
                self.advance();
                Ok(Expr::Literal(value))
            }
            TokenKind::Ident(_) => Ok(Expr::Column(self.consume_column_name("column name")?)),
            _ => Err(ParseError::unexpected("value", self.current_token())),
        }
    }

    fn parse_insert(&mut self) -> Result<Statement, ParseError> {
        self.consume_keyword(Keyword::Insert)?;
        self.consume_keyword(Keyword::Into)?;
        let table = self.consume_ident("table name")?;

        let columns = if self.match_kind(&TokenKind::LeftParen) {
            let mut names = vec![self.consume_ident("column name")?];
            while self.match_kind(&TokenKind::Comma) {
                names.push(self.consume_ident("column name")?);
            }
            self.consume(TokenKind::RightParen, "',' or ')'")?;
            Some(names)
        } else {
            None
        };

        self.consume_keyword(Keyword::Values)?;
        self.consume(TokenKind::LeftParen, "'('")?;
        let mut values = vec![self.parse_expr()?];
        while self.match_kind(&TokenKind::Comma) {
            values.push(self.parse_expr()?);
        }
        self.consume(TokenKind::RightParen, "',' or ')'")?;

        Ok(Statement::Insert(Insert {
            table,
            columns,
            values,
        }))
    }

    fn parse_where(&mut self) -> Result<Option<Condition>, ParseError> {
        if self.match_keyword(Keyword::Where) {
            Ok(Some(self.parse_condition()?))
        } else {
            Ok(None)
        }
    }

    fn parse_select(&mut self) -> Result<Statement, ParseError> {
        self.consume_keyword(Keyword::Select)?;

        let columns = if self.match_kind(&TokenKind::Star) {
            ColumnsSelect::Star
        } else {
            let mut names = vec![self.consume_column_name("column name or '*'")?];
            while self.match_kind(&TokenKind::Comma) {
                names.push(self.consume_column_name("column name")?);
            }
            ColumnsSelect::Columns(names)
        };

        self.consume_keyword(Keyword::From)?;
        let table = self.consume_ident("table name")?;

        let mut joins = vec![];
        while self.match_keyword(Keyword::Inner) {
            self.consume_keyword(Keyword::Join)?;
            let table = self.consume_ident("table name")?;
            self.consume_keyword(Keyword::On)?;
            let on = self.parse_condition()?;
            joins.push(JoinClause {
                kind: JoinKind::Inner,
                table,
                on,
            });
        }

        let where_clause = self.parse_where()?;

        Ok(Statement::Select(Select {
            columns,
            table,
            joins,
            where_clause,
        }))
    }

    fn parse_update(&mut self) -> Result<Statement, ParseError> {
        self.consume_keyword(Keyword::Update)?;
        let table = self.consume_ident("table name")?;
        self.consume_keyword(Keyword::Set)?;

        let mut assignments = vec![];
        loop {
            let column = self.consume_ident("column name")?;
            self.consume(TokenKind::Eq, "'='")?;
            assignments.push((column, self.parse_expr()?));
            if !self.match_kind(&TokenKind::Comma) {
                break;
            }
        }

        let where_clause = self.parse_where()?;

        Ok(Statement::Update(Update {
            table,
            assignments,
            where_clause,
        }))
    }

    fn parse_delete(&mut self) -> Result<Statement, ParseError> {
        self.consume_keyword(Keyword::Delete)?;
        self.consume_keyword(Keyword::From)?;
        let table = self.consume_ident("table name")?;
        let where_clause = self.parse_where()?;
        Ok(Statement::Delete(Delete {
            table,
            where_clause,
        }))
    }

    fn parse_condition(&mut self) -> Result<Condition, ParseError> {
        let mut left = self.parse_and()?;
        while self.match_keyword(Keyword::Or) {
            let right = self.parse_and()?;
            left = Condition::or(left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Condition, ParseError> {
        let mut left = self.parse_primary_condition()?;
        while self.match_keyword(Keyword::And) {
            let right = self.parse_primary_condition()?;
            left = Condition::and(left, right);
        }
        Ok(left)
    }

    fn parse_primary_condition(&mut self) -> Result<Condition, ParseError> {
        if self.match_kind(&TokenKind::LeftParen) {
            let inner = self.parse_condition()?;
            self.consume(TokenKind::RightParen, "')'")?;
            return Ok(inner);
        }
        if self.check_keyword(Keyword::Not) {
            return Err(ParseError::at(
                "NOT is not supported in conditions",
                self.current_token(),
            ));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Condition, ParseError> {
        let left = ConditionValue::Column(self.consume_column_name("column name in condition")?);

        let op = match self.current_token().kind {
            TokenKind::Eq => ComparisonOp::Eq,
            TokenKind::NotEq => ComparisonOp::Ne,
            TokenKind::Lt => ComparisonOp::Lt,
            TokenKind::Gt => ComparisonOp::Gt,
            TokenKind::LtEq => ComparisonOp::Le,
            TokenKind::GtEq => ComparisonOp::Ge,
            _ => {
                return Err(ParseError::unexpected(
                    "comparison operator (=, !=, <, >, <=, >=)",
                    self.current_token(),
                ));
            }
        };
        self.advance();

        let right = match &self.current_token().kind {
            TokenKind::Integer(i) => {
                let value = ConditionValue::literal(*i);
                self.advance();
                value
            }
            TokenKind::Str(s) => {
                let value = ConditionValue::literal(s.as_str());
                self.advance();
                value
            }
            TokenKind::Ident(_) => ConditionValue::Column(self.consume_column_name("column name")?),
            _ => {
                return Err(ParseError::unexpected(
                    "value or column name",
                    self.current_token(),
                ));
            }
        };

        Ok(Condition::compare(left, op, right))
    }
}

impl Iterator for Parser {
    type Item = Result<Statement, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_at_end() {
            return None;
        }
        let start = self.position;
        match self.parse_statement() {
            Ok(statement) => {
                self.match_kind(&TokenKind::Semicolon);
                Some(Ok(statement))
            }
            Err(err) => {
                warn!(error = %err, "skipping malformed statement");
                self.synchronize(start);
                Some(Err(err))
            }
        }
    }
}
