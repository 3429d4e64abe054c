//! # PostgreSQL `CREATE TABLE` Parser
//!
//! Recursive-descent parser that turns DDL text into [`Table`] models.
//!
//! The input is tokenized up front, split into statements on top-level `;`
//! and each `CREATE TABLE` statement is parsed on its own. Every other
//! statement is skipped. The first error aborts the whole parse.
//!
//! Clauses the model does not interpret (`CHECK`, `REFERENCES`, `COLLATE`, ...)
//! are sliced verbatim out of the source text using the token spans.

use std::ops::Range;
use tracing::debug;

use super::errors::{ParseError, Position};
use super::lexer::{tokenize, SpannedToken, Token};
use super::model::{BaseType, Column, DataType, Table};

/// Keywords that open a new clause inside a column definition.
///
/// `NOT`, `NULL` and `DEFAULT` are handled separately because they also occur
/// inside other clauses (`NOT DEFERRABLE`, `ON DELETE SET NULL`,
/// `GENERATED BY DEFAULT`).
const COLUMN_CLAUSE_KEYWORDS: &[&str] = &[
    "CONSTRAINT",
    "PRIMARY",
    "UNIQUE",
    "CHECK",
    "REFERENCES",
    "GENERATED",
    "COLLATE",
];

/// Reserved words that can only open a table constraint. `EXCLUDE` is not
/// reserved and is checked by [`Parser::is_exclusion_constraint`].
const TABLE_CONSTRAINT_KEYWORDS: &[&str] = &["UNIQUE", "CHECK", "FOREIGN"];

/// Storage options accepted after the element list and otherwise ignored.
const IGNORED_TABLE_OPTIONS: &[&str] = &["WITH", "WITHOUT", "USING", "ON", "TABLESPACE"];

/// Parses every `CREATE TABLE` statement in `text`.
///
/// Statements other than `CREATE TABLE` are skipped, so an input without any
/// table definition yields an empty vector.
pub fn parse_ddl(text: &str) -> Result<Vec<Table>, ParseError> {
    let tokens = tokenize(text)?;
    let mut tables = Vec::new();

    for statement in split_top_level(&tokens, |t| matches!(t, Token::Semicolon)) {
        if statement.is_empty() {
            continue;
        }
        let end_offset = tokens
            .get(statement.end)
            .map(|t| t.span.start)
            .unwrap_or(text.len());
        let mut parser = Parser::new(text, &tokens[statement], end_offset);
        match parser.parse_statement()? {
            Some(table) => {
                debug!(
                    "Parsed table {} with {} columns",
                    table.qualified_name(),
                    table.columns.len()
                );
                tables.push(table);
            }
            None => debug!("Skipping statement that is not CREATE TABLE"),
        }
    }

    Ok(tables)
}

/// Splits `tokens` on separators that are not nested in parentheses or
/// brackets. Returns index ranges; segments may be empty.
fn split_top_level(
    tokens: &[SpannedToken<'_>],
    is_separator: impl Fn(&Token<'_>) -> bool,
) -> Vec<Range<usize>> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, spanned) in tokens.iter().enumerate() {
        match spanned.token {
            Token::LeftParen | Token::LeftBracket => depth += 1,
            Token::RightParen | Token::RightBracket => depth = depth.saturating_sub(1),
            ref token if depth == 0 && is_separator(token) => {
                segments.push(start..i);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(start..tokens.len());
    segments
}

/// Collects the pieces of one table while its elements are parsed and checks
/// the primary key once everything is known.
struct TableBuilder {
    schema: Option<String>,
    name: String,
    if_not_exists: bool,
    columns: Vec<Column>,
    inline_primary_keys: Vec<(String, Position)>,
    table_primary_key: Option<Vec<(String, Position)>>,
    table_constraints: Vec<String>,
}

impl TableBuilder {
    fn add_column(&mut self, column: Column, position: Position) -> Result<(), ParseError> {
        if self.columns.iter().any(|c| c.name == column.name) {
            return Err(ParseError::DuplicateColumn {
                table: self.name.clone(),
                column: column.name,
                position,
            });
        }
        self.columns.push(column);
        Ok(())
    }

    fn add_inline_primary_key(&mut self, column: &str, position: Position) -> Result<(), ParseError> {
        if self.table_primary_key.is_some() {
            return Err(ParseError::ConflictingPrimaryKey {
                table: self.name.clone(),
                position,
            });
        }
        self.inline_primary_keys.push((column.to_string(), position));
        Ok(())
    }

    fn set_table_primary_key(
        &mut self,
        columns: Vec<(String, Position)>,
        position: Position,
    ) -> Result<(), ParseError> {
        if self.table_primary_key.is_some() || !self.inline_primary_keys.is_empty() {
            return Err(ParseError::ConflictingPrimaryKey {
                table: self.name.clone(),
                position,
            });
        }
        self.table_primary_key = Some(columns);
        Ok(())
    }

    /// Exact match first, then a case-insensitive one.
    fn resolve_column(&self, name: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .or_else(|| self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name)))
            .map(|c| c.name.as_str())
    }

    fn finish(mut self) -> Result<Table, ParseError> {
        let entries = self
            .table_primary_key
            .take()
            .unwrap_or_else(|| std::mem::take(&mut self.inline_primary_keys));

        let mut primary_keys: Vec<String> = Vec::with_capacity(entries.len());
        for (name, position) in entries {
            let resolved = self
                .resolve_column(&name)
                .ok_or_else(|| ParseError::UnknownPrimaryKeyColumn {
                    table: self.name.clone(),
                    column: name.clone(),
                    position,
                })?
                .to_string();
            if primary_keys.contains(&resolved) {
                return Err(ParseError::DuplicatePrimaryKeyColumn {
                    table: self.name.clone(),
                    column: resolved,
                    position,
                });
            }
            primary_keys.push(resolved);
        }

        for column in self.columns.iter_mut() {
            if primary_keys.contains(&column.name) {
                column.nullable = false;
            }
        }

        Ok(Table {
            schema: self.schema,
            name: self.name,
            if_not_exists: self.if_not_exists,
            columns: self.columns,
            primary_keys,
            table_constraints: self.table_constraints,
        })
    }
}

/// Parser over the tokens of a single statement or table element.
struct Parser<'a, 's> {
    source: &'s str,
    tokens: &'a [SpannedToken<'s>],
    current_pos: usize,
    /// Offset reported for errors found past the last token
    end_offset: usize,
}

impl<'a, 's> Parser<'a, 's> {
    fn new(source: &'s str, tokens: &'a [SpannedToken<'s>], end_offset: usize) -> Self {
        Self {
            source,
            tokens,
            current_pos: 0,
            end_offset,
        }
    }

    fn current_token(&self) -> Option<&'a Token<'s>> {
        self.tokens.get(self.current_pos).map(|t| &t.token)
    }

    fn peek_is_keyword(&self, ahead: usize, keyword: &str) -> bool {
        self.tokens
            .get(self.current_pos + ahead)
            .is_some_and(|t| t.token.is_keyword(keyword))
    }

    fn is_keyword(&self, keyword: &str) -> bool {
        self.peek_is_keyword(0, keyword)
    }

    fn peek_token(&self, ahead: usize) -> Option<&'a Token<'s>> {
        self.tokens.get(self.current_pos + ahead).map(|t| &t.token)
    }

    fn is_any_keyword(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.is_keyword(k))
    }

    fn is_token(&self, expected: &Token<'_>) -> bool {
        self.current_token()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(expected))
    }

    fn at_end(&self) -> bool {
        self.current_pos >= self.tokens.len()
    }

    fn advance(&mut self) {
        if self.current_pos < self.tokens.len() {
            self.current_pos += 1;
        }
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.current_pos)
            .map(|t| t.span.start)
            .unwrap_or(self.end_offset)
    }

    /// End offset of the last consumed token.
    fn previous_end(&self) -> usize {
        self.current_pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span.end)
            .unwrap_or_else(|| self.offset())
    }

    fn position(&self) -> Position {
        Position::locate(self.source, self.offset())
    }

    fn text(&self, range: Range<usize>) -> &'s str {
        &self.source[range]
    }

    fn token_to_string(token: Option<&Token<'_>>) -> String {
        match token {
            Some(token) => token.to_string(),
            None => "end of statement".to_string(),
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedToken {
            position: self.position(),
            expected: expected.to_string(),
            found: Self::token_to_string(self.current_token()),
        }
    }

    fn unsupported(&self, construct: &str) -> ParseError {
        ParseError::Unsupported {
            position: self.position(),
            construct: construct.to_string(),
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.is_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), ParseError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(keyword))
        }
    }

    fn consume(&mut self, expected: &Token<'_>) -> Result<(), ParseError> {
        if !self.is_token(expected) {
            return Err(self.unexpected(&expected.to_string()));
        }
        self.advance();
        Ok(())
    }

    fn parse_identifier(&mut self) -> Result<String, ParseError> {
        let name = match self.current_token() {
            Some(Token::Ident(name)) => name.to_string(),
            Some(Token::QuotedIdent(name)) => name.clone(),
            _ => return Err(self.unexpected("identifier")),
        };
        self.advance();
        Ok(name)
    }

    fn parse_u32(&mut self, what: &str) -> Result<u32, ParseError> {
        let value = match self.current_token() {
            Some(Token::Number(n)) => n.parse::<u32>().map_err(|_| self.unexpected(what))?,
            _ => return Err(self.unexpected(what)),
        };
        self.advance();
        Ok(value)
    }

    // =========================================================
    // Statements
    // =========================================================

    /// Returns `None` for statements that are not `CREATE TABLE`.
    fn parse_statement(&mut self) -> Result<Option<Table>, ParseError> {
        if !self.eat_keyword("CREATE") {
            return Ok(None);
        }
        if self.is_keyword("GLOBAL") || self.is_keyword("LOCAL") {
            self.advance();
        }
        if self.is_keyword("TEMP") || self.is_keyword("TEMPORARY") {
            let error = self.unsupported("TEMPORARY tables");
            self.advance();
            return if self.is_keyword("TABLE") {
                Err(error)
            } else {
                Ok(None)
            };
        }
        self.eat_keyword("UNLOGGED");
        if !self.eat_keyword("TABLE") {
            return Ok(None);
        }

        let if_not_exists = if self.eat_keyword("IF") {
            self.expect_keyword("NOT")?;
            self.expect_keyword("EXISTS")?;
            true
        } else {
            false
        };

        let name_position = self.position();
        let mut parts = vec![self.parse_identifier()?];
        while self.is_token(&Token::Dot) {
            self.advance();
            parts.push(self.parse_identifier()?);
        }
        if parts.len() > 2 {
            return Err(ParseError::Unsupported {
                position: name_position,
                construct: "catalog-qualified table names".to_string(),
            });
        }
        let name = parts.pop().unwrap_or_default();
        let schema = parts.pop();

        if self.is_keyword("PARTITION") {
            return Err(self.unsupported("PARTITION OF"));
        }
        if self.is_keyword("OF") {
            return Err(self.unsupported("OF type"));
        }
        if self.is_keyword("AS") {
            return Err(self.unsupported("CREATE TABLE AS"));
        }

        let mut builder = TableBuilder {
            schema,
            name,
            if_not_exists,
            columns: Vec::new(),
            inline_primary_keys: Vec::new(),
            table_primary_key: None,
            table_constraints: Vec::new(),
        };

        let open = self.current_pos;
        self.consume(&Token::LeftParen)?;
        let close = self.matching_paren(open).ok_or_else(|| ParseError::UnexpectedToken {
            position: Position::locate(self.source, self.end_offset),
            expected: "')'".to_string(),
            found: "end of statement".to_string(),
        })?;

        self.parse_elements(open + 1..close, &mut builder)?;
        self.current_pos = close + 1;
        self.parse_table_options()?;

        builder.finish().map(Some)
    }

    fn matching_paren(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (i, spanned) in self.tokens.iter().enumerate().skip(open) {
            match spanned.token {
                Token::LeftParen => depth += 1,
                Token::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn parse_elements(
        &self,
        inner: Range<usize>,
        builder: &mut TableBuilder,
    ) -> Result<(), ParseError> {
        if inner.is_empty() {
            return Ok(());
        }
        let base = inner.start;
        for element in split_top_level(&self.tokens[inner], |t| matches!(t, Token::Comma)) {
            let range = base + element.start..base + element.end;
            // `range.end` always indexes the following ',' or the closing ')'
            let end_offset = self.tokens[range.end].span.start;
            if range.is_empty() {
                return Err(ParseError::UnexpectedToken {
                    position: Position::locate(self.source, end_offset),
                    expected: "column definition or table constraint".to_string(),
                    found: self.tokens[range.end].token.to_string(),
                });
            }
            Parser::new(self.source, &self.tokens[range], end_offset).parse_element(builder)?;
        }
        Ok(())
    }

    fn parse_table_options(&mut self) -> Result<(), ParseError> {
        if self.at_end() {
            return Ok(());
        }
        if self.is_keyword("INHERITS") {
            return Err(self.unsupported("INHERITS"));
        }
        if self.is_keyword("PARTITION") {
            return Err(self.unsupported("PARTITION BY"));
        }
        if self.is_any_keyword(IGNORED_TABLE_OPTIONS) {
            debug!(
                "Ignoring table options: {}",
                self.text(self.offset()..self.end_offset).trim()
            );
            self.current_pos = self.tokens.len();
            return Ok(());
        }
        Err(self.unexpected("end of statement"))
    }

    // =========================================================
    // Table elements
    // =========================================================

    fn parse_element(&mut self, builder: &mut TableBuilder) -> Result<(), ParseError> {
        let start = self.offset();
        let named = self.eat_keyword("CONSTRAINT");
        if named {
            self.parse_identifier()?;
        }

        if self.is_keyword("PRIMARY") {
            let position = self.position();
            self.advance();
            self.expect_keyword("KEY")?;
            let columns = self.parse_column_list()?;
            if !self.at_end() {
                debug!(
                    "Ignoring primary key options: {}",
                    self.text(self.offset()..self.end_offset).trim()
                );
            }
            return builder.set_table_primary_key(columns, position);
        }
        if self.is_any_keyword(TABLE_CONSTRAINT_KEYWORDS) || self.is_exclusion_constraint() {
            builder
                .table_constraints
                .push(self.text(start..self.end_offset).trim_end().to_string());
            self.current_pos = self.tokens.len();
            return Ok(());
        }
        if named {
            return Err(self.unexpected("constraint definition"));
        }
        if self.is_keyword("LIKE") {
            return Err(self.unsupported("LIKE"));
        }
        self.parse_column(builder)
    }

    /// `EXCLUDE USING gist (...)` or `EXCLUDE (...)`; otherwise `exclude` is
    /// an ordinary column name.
    fn is_exclusion_constraint(&self) -> bool {
        self.is_keyword("EXCLUDE")
            && (self.peek_is_keyword(1, "USING")
                || matches!(self.peek_token(1), Some(Token::LeftParen)))
    }

    fn parse_column_list(&mut self) -> Result<Vec<(String, Position)>, ParseError> {
        self.consume(&Token::LeftParen)?;
        let mut columns = Vec::new();
        loop {
            let position = self.position();
            columns.push((self.parse_identifier()?, position));
            if self.is_token(&Token::Comma) {
                self.advance();
                continue;
            }
            self.consume(&Token::RightParen)?;
            return Ok(columns);
        }
    }

    fn parse_column(&mut self, builder: &mut TableBuilder) -> Result<(), ParseError> {
        let name_position = self.position();
        let name = self.parse_identifier()?;
        let data_type = self.parse_data_type()?;
        let is_serial = data_type.base.is_serial() && !data_type.is_array();

        let mut column = Column {
            name,
            data_type,
            nullable: !is_serial,
            default: None,
            is_serial,
            inline_constraints: Vec::new(),
        };
        let mut constraint_start: Option<usize> = None;

        while !self.at_end() {
            if self.is_keyword("CONSTRAINT") {
                constraint_start = Some(self.offset());
                self.advance();
                self.parse_identifier()?;
                continue;
            }

            if self.is_keyword("NOT") && self.peek_is_keyword(1, "NULL") {
                self.advance();
                self.advance();
                column.nullable = false;
            } else if self.eat_keyword("NULL") {
                // explicit NULL keeps the column nullable
            } else if self.is_keyword("PRIMARY") {
                let position = self.position();
                self.advance();
                self.expect_keyword("KEY")?;
                builder.add_inline_primary_key(&column.name, position)?;
                column.nullable = false;
            } else if self.eat_keyword("DEFAULT") {
                let range = self
                    .take_clause()
                    .ok_or_else(|| self.unexpected("default expression"))?;
                column.default = Some(self.text(range).to_string());
            } else if let Some(range) = self.take_clause() {
                let start = constraint_start.take().unwrap_or(range.start);
                column
                    .inline_constraints
                    .push(self.text(start..range.end).to_string());
            }
            constraint_start = None;
        }

        builder.add_column(column, name_position)
    }

    /// Consumes tokens up to the next column clause and returns their byte
    /// range. The first token is always taken.
    fn take_clause(&mut self) -> Option<Range<usize>> {
        let start = self.current_pos;
        let mut depth = 0usize;
        while let Some(spanned) = self.tokens.get(self.current_pos) {
            if depth == 0 && self.current_pos > start && self.is_clause_start(self.current_pos) {
                break;
            }
            match spanned.token {
                Token::LeftParen | Token::LeftBracket => depth += 1,
                Token::RightParen | Token::RightBracket => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.current_pos += 1;
        }
        (self.current_pos > start)
            .then(|| self.tokens[start].span.start..self.tokens[self.current_pos - 1].span.end)
    }

    fn is_clause_start(&self, index: usize) -> bool {
        let Some(token) = self.tokens.get(index).map(|t| &t.token) else {
            return false;
        };
        if token.is_keyword("NOT") {
            return self
                .tokens
                .get(index + 1)
                .is_some_and(|t| t.token.is_keyword("NULL"));
        }
        if token.is_keyword("NULL") || token.is_keyword("DEFAULT") {
            let continues_clause = index
                .checked_sub(1)
                .and_then(|i| self.tokens.get(i))
                .is_some_and(|t| t.token.is_keyword("SET") || t.token.is_keyword("BY"));
            return !continues_clause;
        }
        COLUMN_CLAUSE_KEYWORDS.iter().any(|k| token.is_keyword(k))
    }

    // =========================================================
    // Types
    // =========================================================

    fn parse_data_type(&mut self) -> Result<DataType, ParseError> {
        let start = self.offset();
        let keyword = match self.current_token() {
            Some(Token::Ident(word)) => word.to_ascii_uppercase(),
            // a quoted type name is always user-defined
            Some(Token::QuotedIdent(_)) => String::new(),
            _ => return Err(self.unexpected("data type")),
        };
        self.advance();

        let base = match keyword.as_str() {
            "SMALLINT" | "INT2" => BaseType::SmallInt,
            "INTEGER" | "INT" | "INT4" => BaseType::Integer,
            "BIGINT" | "INT8" => BaseType::BigInt,
            "SMALLSERIAL" | "SERIAL2" => BaseType::SmallSerial,
            "SERIAL" | "SERIAL4" => BaseType::Serial,
            "BIGSERIAL" | "SERIAL8" => BaseType::BigSerial,
            "DECIMAL" | "DEC" => {
                let (precision, scale) = self.parse_precision_scale()?;
                BaseType::Decimal { precision, scale }
            }
            "NUMERIC" => {
                let (precision, scale) = self.parse_precision_scale()?;
                BaseType::Numeric { precision, scale }
            }
            "REAL" | "FLOAT4" => BaseType::Real,
            "FLOAT8" => BaseType::DoublePrecision,
            "FLOAT" => match self.parse_length()? {
                Some(bits) if bits <= 24 => BaseType::Real,
                _ => BaseType::DoublePrecision,
            },
            "DOUBLE" => {
                self.expect_keyword("PRECISION")?;
                BaseType::DoublePrecision
            }
            "VARCHAR" => BaseType::Varchar {
                length: self.parse_length()?,
            },
            "CHARACTER" | "CHAR" => {
                if self.eat_keyword("VARYING") {
                    BaseType::Varchar {
                        length: self.parse_length()?,
                    }
                } else {
                    BaseType::Char {
                        length: self.parse_length()?,
                    }
                }
            }
            "BPCHAR" => BaseType::Char {
                length: self.parse_length()?,
            },
            "TEXT" => BaseType::Text,
            "BOOLEAN" | "BOOL" => BaseType::Boolean,
            "DATE" => BaseType::Date,
            "TIMESTAMP" => {
                let precision = self.parse_length()?;
                BaseType::Timestamp {
                    precision,
                    with_time_zone: self.parse_time_zone(false)?,
                }
            }
            "TIMESTAMPTZ" => BaseType::Timestamp {
                precision: self.parse_length()?,
                with_time_zone: true,
            },
            "TIME" => {
                let precision = self.parse_length()?;
                BaseType::Time {
                    precision,
                    with_time_zone: self.parse_time_zone(false)?,
                }
            }
            "TIMETZ" => BaseType::Time {
                precision: self.parse_length()?,
                with_time_zone: true,
            },
            "JSON" => BaseType::Json,
            "JSONB" => BaseType::Jsonb,
            "UUID" => BaseType::Uuid,
            "BYTEA" => BaseType::Bytea,
            _ => self.parse_custom_type(start)?,
        };

        let dimensions = self.parse_array_suffix()?;
        Ok(DataType::array_of(base, dimensions))
    }

    /// Unknown types keep their source text, including any schema prefix and
    /// type modifiers.
    fn parse_custom_type(&mut self, start: usize) -> Result<BaseType, ParseError> {
        while self.is_token(&Token::Dot) {
            self.advance();
            self.parse_identifier()?;
        }
        if self.is_token(&Token::LeftParen) {
            let close = self
                .matching_paren(self.current_pos)
                .ok_or_else(|| self.unexpected("')'"))?;
            self.current_pos = close + 1;
        }
        Ok(BaseType::Custom(self.text(start..self.previous_end()).to_string()))
    }

    fn parse_precision_scale(&mut self) -> Result<(Option<u32>, Option<u32>), ParseError> {
        if !self.is_token(&Token::LeftParen) {
            return Ok((None, None));
        }
        self.advance();
        let precision = self.parse_u32("numeric precision")?;
        let scale = if self.is_token(&Token::Comma) {
            self.advance();
            Some(self.parse_u32("numeric scale")?)
        } else {
            None
        };
        self.consume(&Token::RightParen)?;
        Ok((Some(precision), scale))
    }

    fn parse_length(&mut self) -> Result<Option<u32>, ParseError> {
        if !self.is_token(&Token::LeftParen) {
            return Ok(None);
        }
        self.advance();
        let length = self.parse_u32("type modifier")?;
        self.consume(&Token::RightParen)?;
        Ok(Some(length))
    }

    fn parse_time_zone(&mut self, default: bool) -> Result<bool, ParseError> {
        let with = self.is_keyword("WITH");
        if (with || self.is_keyword("WITHOUT")) && self.peek_is_keyword(1, "TIME") {
            self.advance();
            self.advance();
            self.expect_keyword("ZONE")?;
            return Ok(with);
        }
        Ok(default)
    }

    /// `[]`, `[n]` and `ARRAY[n]`, any number of times.
    fn parse_array_suffix(&mut self) -> Result<usize, ParseError> {
        let mut dimensions = 0;
        loop {
            if self.is_token(&Token::LeftBracket) {
                self.advance();
            } else if self.eat_keyword("ARRAY") {
                if !self.is_token(&Token::LeftBracket) {
                    dimensions += 1;
                    continue;
                }
                self.advance();
            } else {
                return Ok(dimensions);
            }
            if matches!(self.current_token(), Some(Token::Number(_))) {
                self.advance();
            }
            self.consume(&Token::RightBracket)?;
            dimensions += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(ddl: &str) -> Table {
        let mut tables = parse_ddl(ddl).unwrap();
        assert_eq!(tables.len(), 1, "expected exactly one table");
        tables.remove(0)
    }

    #[test]
    fn test_parse_users_table() {
        let table = parse_one(
            "CREATE TABLE users (
                id SERIAL PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                email VARCHAR(255) UNIQUE,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );",
        );

        assert_eq!(table.name, "users");
        assert_eq!(table.schema, None);
        assert!(!table.if_not_exists);
        assert_eq!(table.primary_keys, vec!["id"]);

        let names: Vec<_> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "email", "created_at"]);

        let id = table.column("id").unwrap();
        assert_eq!(id.data_type, DataType::new(BaseType::Serial));
        assert!(id.is_serial);
        assert!(!id.nullable);

        let name = table.column("name").unwrap();
        assert_eq!(
            name.data_type,
            DataType::new(BaseType::Varchar { length: Some(255) })
        );
        assert!(!name.nullable);

        let email = table.column("email").unwrap();
        assert!(email.nullable);
        assert_eq!(email.inline_constraints, vec!["UNIQUE"]);

        let created_at = table.column("created_at").unwrap();
        assert_eq!(created_at.default.as_deref(), Some("CURRENT_TIMESTAMP"));
        assert!(created_at.nullable);
    }

    #[test]
    fn test_parse_schema_and_if_not_exists() {
        let table = parse_one(
            "CREATE TABLE IF NOT EXISTS public.transactions (
                transaction_id BIGSERIAL PRIMARY KEY,
                amount DECIMAL(15,2) NOT NULL,
                currency CHAR(3) DEFAULT 'USD',
                status VARCHAR(20) DEFAULT 'pending' CHECK (status IN ('pending', 'completed', 'failed')),
                created_at TIMESTAMP WITH TIME ZONE DEFAULT CURRENT_TIMESTAMP
            );",
        );

        assert_eq!(table.schema.as_deref(), Some("public"));
        assert_eq!(table.name, "transactions");
        assert!(table.if_not_exists);
        assert_eq!(table.qualified_name(), "public.transactions");

        let amount = table.column("amount").unwrap();
        assert_eq!(
            amount.data_type,
            DataType::new(BaseType::Decimal {
                precision: Some(15),
                scale: Some(2)
            })
        );

        let status = table.column("status").unwrap();
        assert_eq!(status.default.as_deref(), Some("'pending'"));
        assert_eq!(
            status.inline_constraints,
            vec!["CHECK (status IN ('pending', 'completed', 'failed'))"]
        );

        let created_at = table.column("created_at").unwrap();
        assert_eq!(
            created_at.data_type,
            DataType::new(BaseType::Timestamp {
                precision: None,
                with_time_zone: true
            })
        );
    }

    #[test]
    fn test_parse_type_aliases() {
        let table = parse_one(
            "CREATE TABLE t (
                a INT2, b INT4, c INT8, d FLOAT4, e FLOAT8, f DOUBLE PRECISION,
                g CHARACTER VARYING(10), h CHARACTER(2), i BOOL, j TIMESTAMPTZ,
                k TIMESTAMP(3), l TIME WITHOUT TIME ZONE, m SERIAL8, n NUMERIC(12),
                o FLOAT(10), p DEC(5,1)
            )",
        );
        let types: Vec<_> = table.columns.iter().map(|c| c.data_type.base.clone()).collect();
        assert_eq!(
            types,
            vec![
                BaseType::SmallInt,
                BaseType::Integer,
                BaseType::BigInt,
                BaseType::Real,
                BaseType::DoublePrecision,
                BaseType::DoublePrecision,
                BaseType::Varchar { length: Some(10) },
                BaseType::Char { length: Some(2) },
                BaseType::Boolean,
                BaseType::Timestamp {
                    precision: None,
                    with_time_zone: true
                },
                BaseType::Timestamp {
                    precision: Some(3),
                    with_time_zone: false
                },
                BaseType::Time {
                    precision: None,
                    with_time_zone: false
                },
                BaseType::BigSerial,
                BaseType::Numeric {
                    precision: Some(12),
                    scale: None
                },
                BaseType::Real,
                BaseType::Decimal {
                    precision: Some(5),
                    scale: Some(1)
                },
            ]
        );
    }

    #[test]
    fn test_parse_array_types() {
        let table = parse_one(
            "CREATE TABLE t (tags TEXT[], matrix INTEGER[][], fixed INT[3], legacy TEXT ARRAY, sized INT ARRAY[4])",
        );
        let dims: Vec<_> = table
            .columns
            .iter()
            .map(|c| c.data_type.array_dimensions)
            .collect();
        assert_eq!(dims, vec![1, 2, 1, 1, 1]);
        assert_eq!(table.column("tags").unwrap().data_type.to_string(), "TEXT[]");
    }

    #[test]
    fn test_unknown_types_are_custom() {
        let table = parse_one(
            "CREATE TABLE t (m mood, g public.geometry(Point, 4326), q \"Quoted\")",
        );
        assert_eq!(
            table.column("m").unwrap().data_type.base,
            BaseType::Custom("mood".to_string())
        );
        assert_eq!(
            table.column("g").unwrap().data_type.base,
            BaseType::Custom("public.geometry(Point, 4326)".to_string())
        );
        assert_eq!(
            table.column("q").unwrap().data_type.base,
            BaseType::Custom("\"Quoted\"".to_string())
        );
    }

    #[test]
    fn test_keywords_are_case_insensitive_and_identifiers_keep_case() {
        let table = parse_one("create table Events (EventId bigint primary key not null)");
        assert_eq!(table.name, "Events");
        assert_eq!(table.primary_keys, vec!["EventId"]);
        assert_eq!(
            table.columns[0].data_type,
            DataType::new(BaseType::BigInt)
        );
    }

    #[test]
    fn test_comments_are_ignored() {
        let table = parse_one(
            "-- user accounts
            CREATE TABLE users ( /* surrogate */ id INT, -- the id
            name TEXT)",
        );
        assert_eq!(table.columns.len(), 2);
    }

    #[test]
    fn test_quoted_identifiers() {
        let table = parse_one(r#"CREATE TABLE "My Table" ("Order" INT, "we""ird" TEXT)"#);
        assert_eq!(table.name, "My Table");
        assert_eq!(table.columns[0].name, "Order");
        assert_eq!(table.columns[1].name, "we\"ird");
    }

    #[test]
    fn test_table_level_composite_primary_key() {
        let table = parse_one(
            "CREATE TABLE order_items (
                order_id INT,
                line_no INT,
                sku TEXT,
                CONSTRAINT order_items_pk PRIMARY KEY (order_id, line_no)
            )",
        );
        assert_eq!(table.primary_keys, vec!["order_id", "line_no"]);
        assert!(!table.column("order_id").unwrap().nullable);
        assert!(!table.column("line_no").unwrap().nullable);
        assert!(table.column("sku").unwrap().nullable);
        assert!(table.table_constraints.is_empty());
    }

    #[test]
    fn test_inline_primary_keys_accumulate() {
        let table = parse_one("CREATE TABLE t (a INT PRIMARY KEY, b INT PRIMARY KEY)");
        assert_eq!(table.primary_keys, vec!["a", "b"]);
    }

    #[test]
    fn test_primary_key_names_resolve_case_insensitively() {
        let table = parse_one("CREATE TABLE t (\"Id\" INT, PRIMARY KEY (id))");
        assert_eq!(table.primary_keys, vec!["Id"]);
    }

    #[test]
    fn test_table_constraints_are_kept_verbatim() {
        let table = parse_one(
            "CREATE TABLE t (
                a INT,
                b INT,
                CONSTRAINT positive CHECK (a > 0),
                UNIQUE (a, b),
                FOREIGN KEY (b) REFERENCES other (id) ON DELETE SET NULL
            )",
        );
        assert_eq!(
            table.table_constraints,
            vec![
                "CONSTRAINT positive CHECK (a > 0)",
                "UNIQUE (a, b)",
                "FOREIGN KEY (b) REFERENCES other (id) ON DELETE SET NULL",
            ]
        );
    }

    #[test]
    fn test_exclude_is_a_column_name_unless_it_opens_a_constraint() {
        let table = parse_one(
            "CREATE TABLE t (
                id INT PRIMARY KEY,
                exclude BOOLEAN NOT NULL,
                during TEXT,
                EXCLUDE USING gist (during WITH &&),
                CONSTRAINT no_twins EXCLUDE (id WITH =)
            )",
        );
        let names: Vec<_> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "exclude", "during"]);
        assert!(!table.columns[1].nullable);
        assert_eq!(
            table.table_constraints,
            vec![
                "EXCLUDE USING gist (during WITH &&)",
                "CONSTRAINT no_twins EXCLUDE (id WITH =)",
            ]
        );
    }

    #[test]
    fn test_escape_string_defaults_are_kept_verbatim() {
        let table = parse_one(r"CREATE TABLE t (note TEXT DEFAULT E'it\'s', tag TEXT)");
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.columns[0].default.as_deref(), Some(r"E'it\'s'"));
    }

    #[test]
    fn test_unicode_identifiers() {
        let table = parse_one("CREATE TABLE café (prénom TEXT PRIMARY KEY)");
        assert_eq!(table.name, "café");
        assert_eq!(table.columns[0].name, "prénom");
        assert_eq!(table.primary_keys, vec!["prénom"]);
    }

    #[test]
    fn test_inline_clauses() {
        let table = parse_one(
            "CREATE TABLE t (
                a INT CONSTRAINT a_ref REFERENCES other (id) ON DELETE SET NULL NOT NULL,
                b INT GENERATED BY DEFAULT AS IDENTITY,
                c TEXT COLLATE \"C\" DEFAULT 'x'::text NULL,
                d TIMESTAMP DEFAULT now() NOT NULL
            )",
        );
        let a = table.column("a").unwrap();
        assert_eq!(
            a.inline_constraints,
            vec!["CONSTRAINT a_ref REFERENCES other (id) ON DELETE SET NULL"]
        );
        assert!(!a.nullable);

        let b = table.column("b").unwrap();
        assert_eq!(
            b.inline_constraints,
            vec!["GENERATED BY DEFAULT AS IDENTITY"]
        );
        assert_eq!(b.default, None);

        let c = table.column("c").unwrap();
        assert_eq!(c.inline_constraints, vec!["COLLATE \"C\""]);
        assert_eq!(c.default.as_deref(), Some("'x'::text"));
        assert!(c.nullable);

        let d = table.column("d").unwrap();
        assert_eq!(d.default.as_deref(), Some("now()"));
        assert!(!d.nullable);
    }

    #[test]
    fn test_multiple_statements_and_skipped_statements() {
        let tables = parse_ddl(
            "CREATE TABLE a (x INT);
             CREATE INDEX a_x ON a (x);
             INSERT INTO a VALUES (1);
             CREATE UNLOGGED TABLE b (y TEXT);",
        )
        .unwrap();
        let names: Vec<_> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_input_without_tables() {
        assert!(parse_ddl("").unwrap().is_empty());
        assert!(parse_ddl("-- nothing here\n;;").unwrap().is_empty());
    }

    #[test]
    fn test_storage_options_are_ignored() {
        let table = parse_one("CREATE TABLE t (a INT) WITH (fillfactor = 70) TABLESPACE fast");
        assert_eq!(table.columns.len(), 1);
    }

    #[test]
    fn test_unsupported_constructs() {
        let cases = [
            ("CREATE TABLE c (a INT) INHERITS (p)", "INHERITS"),
            ("CREATE TABLE m (a INT) PARTITION BY RANGE (a)", "PARTITION BY"),
            ("CREATE TABLE p PARTITION OF m FOR VALUES IN (1)", "PARTITION OF"),
            ("CREATE TABLE t AS SELECT 1", "CREATE TABLE AS"),
            ("CREATE TABLE t OF my_type", "OF type"),
            ("CREATE TABLE t (LIKE other)", "LIKE"),
            ("CREATE TEMPORARY TABLE t (a INT)", "TEMPORARY tables"),
            ("CREATE TEMP TABLE t (a INT)", "TEMPORARY tables"),
            (
                "CREATE TABLE db.public.t (a INT)",
                "catalog-qualified table names",
            ),
        ];
        for (ddl, expected) in cases {
            match parse_ddl(ddl) {
                Err(ParseError::Unsupported { construct, .. }) => {
                    assert_eq!(construct, expected, "for {ddl}")
                }
                other => panic!("expected Unsupported for {ddl}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_conflicting_primary_keys() {
        let err = parse_ddl("CREATE TABLE t (a INT PRIMARY KEY, b INT, PRIMARY KEY (b))").unwrap_err();
        assert!(matches!(err, ParseError::ConflictingPrimaryKey { ref table, .. } if table == "t"));

        let err = parse_ddl("CREATE TABLE t (a INT, PRIMARY KEY (a), PRIMARY KEY (a))").unwrap_err();
        assert!(matches!(err, ParseError::ConflictingPrimaryKey { .. }));
    }

    #[test]
    fn test_unknown_primary_key_column() {
        let err = parse_ddl("CREATE TABLE t (a INT,\n PRIMARY KEY (missing))").unwrap_err();
        match err {
            ParseError::UnknownPrimaryKeyColumn {
                table,
                column,
                position,
            } => {
                assert_eq!(table, "t");
                assert_eq!(column, "missing");
                assert_eq!(position.line, 2);
                assert_eq!(position.column, 15);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_primary_key_column() {
        let err = parse_ddl("CREATE TABLE t (a INT, PRIMARY KEY (a, a))").unwrap_err();
        assert!(matches!(err, ParseError::DuplicatePrimaryKeyColumn { ref column, .. } if column == "a"));
    }

    #[test]
    fn test_duplicate_column() {
        let err = parse_ddl("CREATE TABLE t (a INT, a TEXT)").unwrap_err();
        assert!(matches!(err, ParseError::DuplicateColumn { ref column, .. } if column == "a"));
    }

    #[test]
    fn test_unexpected_token_reports_position() {
        let err = parse_ddl("CREATE TABLE t (a INT,)").unwrap_err();
        match err {
            ParseError::UnexpectedToken {
                position, found, ..
            } => {
                assert_eq!(position.offset, 22);
                assert_eq!(found, "')'");
            }
            other => panic!("unexpected error {other:?}"),
        }

        let err = parse_ddl("CREATE TABLE t (a DECIMAL(10,").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));

        let err = parse_ddl("CREATE TABLE t (a INT) garbage").unwrap_err();
        match err {
            ParseError::UnexpectedToken {
                expected, found, ..
            } => {
                assert_eq!(expected, "end of statement");
                assert_eq!(found, "identifier 'garbage'");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_first_error_aborts_multi_statement_input() {
        let err = parse_ddl("CREATE TABLE ok (a INT); CREATE TABLE bad (a INT, a INT);").unwrap_err();
        assert!(matches!(err, ParseError::DuplicateColumn { ref table, .. } if table == "bad"));
    }

    #[test]
    fn test_lex_errors_abort_parsing() {
        let err = parse_ddl("CREATE TABLE t (a TEXT DEFAULT 'open").unwrap_err();
        assert!(matches!(err, ParseError::Lex(_)));
    }

    #[test]
    fn test_table_without_columns() {
        let table = parse_one("CREATE TABLE empty ()");
        assert!(table.columns.is_empty());
    }
}
