use crate::ast::{BinaryOp, Binding, CastType, Expr, LogicalOp, Program, Stmt, UnaryOp};
use crate::error::{SimError, Span};
use crate::lexer::{Token, TokenType};
use crate::value::Value;

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    pub fn parse(&mut self) -> Result<Program, SimError> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            statements.push(self.statement()?);
        }

        Ok(Program { statements })
    }

    fn statement(&mut self) -> Result<Stmt, SimError> {
        if self.match_types(&[TokenType::LeftBrace]) {
            let start = self.previous().span.start;
            let statements = self.block()?;
            Ok(Stmt::Block {
                statements,
                span: Span::new(start, self.previous().span.end),
            })
        } else if self.match_types(&[TokenType::Let]) {
            self.let_declaration()
        } else if self.match_types(&[TokenType::If]) {
            self.if_statement()
        } else if self.match_types(&[TokenType::While]) {
            self.while_statement()
        } else if self.match_types(&[TokenType::Do]) {
            self.do_while_statement()
        } else if self.match_types(&[TokenType::For]) {
            self.for_statement()
        } else if self.match_types(&[TokenType::Break]) {
            let span = self.previous().span.clone();
            self.optional_semicolon();
            Ok(Stmt::Break { span })
        } else if self.match_types(&[TokenType::Continue]) {
            let span = self.previous().span.clone();
            self.optional_semicolon();
            Ok(Stmt::Continue { span })
        } else if self.match_types(&[TokenType::Return]) {
            self.return_statement()
        } else if self.match_types(&[TokenType::Semicolon]) {
            Ok(Stmt::Empty {
                span: self.previous().span.clone(),
            })
        } else {
            self.expression_statement()
        }
    }

    fn block(&mut self) -> Result<Vec<Stmt>, SimError> {
        let mut statements = Vec::new();

        while !self.check(&TokenType::RightBrace) && !self.is_at_end() {
            statements.push(self.statement()?);
        }

        self.consume_with_help(
            TokenType::RightBrace,
            "Expected '}' after block",
            "Block statements must be closed with '}' after the opening '{'.".to_string(),
        )?;
        Ok(statements)
    }

    fn let_declaration(&mut self) -> Result<Stmt, SimError> {
        let start = self.previous().span.start;
        let mut bindings = Vec::new();

        loop {
            let name = self
                .consume_with_help(
                    TokenType::Identifier,
                    "Expected variable name",
                    "A declaration names its variable: int count = 0;".to_string(),
                )?
                .lexeme
                .clone();
            let initializer = if self.match_types(&[TokenType::Equal]) {
                Some(self.expression()?)
            } else {
                None
            };
            bindings.push(Binding { name, initializer });

            if !self.match_types(&[TokenType::Comma]) {
                break;
            }
        }

        self.optional_semicolon();
        Ok(Stmt::Let {
            bindings,
            span: Span::new(start, self.previous().span.end),
        })
    }

    fn if_statement(&mut self) -> Result<Stmt, SimError> {
        let start = self.previous().span.start;

        self.consume_with_help(
            TokenType::LeftParen,
            "Expected '(' after 'if'",
            "If statements require parentheses around the condition: if (condition) { ... }".to_string(),
        )?;
        let condition = self.expression()?;
        self.consume_with_help(
            TokenType::RightParen,
            "Expected ')' after if condition",
            "If conditions must be enclosed in parentheses: if (condition) { ... }".to_string(),
        )?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.match_types(&[TokenType::Else]) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        let end = match &else_branch {
            Some(else_stmt) => else_stmt.span().end,
            None => then_branch.span().end,
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            span: Span::new(start, end),
        })
    }

    fn while_statement(&mut self) -> Result<Stmt, SimError> {
        let start = self.previous().span.start;

        self.consume(TokenType::LeftParen, "Expected '(' after 'while'")?;
        let condition = self.expression()?;
        self.consume(TokenType::RightParen, "Expected ')' after while condition")?;

        let body = Box::new(self.statement()?);
        let end = body.span().end;

        Ok(Stmt::While {
            condition,
            body,
            span: Span::new(start, end),
        })
    }

    fn do_while_statement(&mut self) -> Result<Stmt, SimError> {
        let start = self.previous().span.start;
        let body = Box::new(self.statement()?);

        self.consume_with_help(
            TokenType::While,
            "Expected 'while' after do body",
            "A do loop ends with its condition: do { ... } while (condition);".to_string(),
        )?;
        self.consume(TokenType::LeftParen, "Expected '(' after 'while'")?;
        let condition = self.expression()?;
        self.consume(TokenType::RightParen, "Expected ')' after while condition")?;
        self.optional_semicolon();

        Ok(Stmt::DoWhile {
            body,
            condition,
            span: Span::new(start, self.previous().span.end),
        })
    }

    fn for_statement(&mut self) -> Result<Stmt, SimError> {
        let start = self.previous().span.start;

        self.consume(TokenType::LeftParen, "Expected '(' after 'for'")?;

        if self.is_for_each_header() {
            return self.for_each_statement(start);
        }

        let initializer = if self.match_types(&[TokenType::Semicolon]) {
            None
        } else if self.match_types(&[TokenType::Let]) {
            Some(Box::new(self.let_declaration()?))
        } else {
            let init_start = self.peek().span.start;
            let expressions = self.expression_list(&TokenType::Semicolon)?;
            self.consume(TokenType::Semicolon, "Expected ';' after loop initializer")?;
            let span = Span::new(init_start, self.previous().span.end);
            let statements = expressions
                .into_iter()
                .map(|expr| {
                    let span = expr.span().clone();
                    Stmt::Expression { expr, span }
                })
                .collect();
            Some(Box::new(Stmt::Block { statements, span }))
        };

        let condition = if !self.check(&TokenType::Semicolon) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenType::Semicolon, "Expected ';' after loop condition")?;

        let updates = self.expression_list(&TokenType::RightParen)?;
        self.consume(TokenType::RightParen, "Expected ')' after for clauses")?;

        let body = Box::new(self.statement()?);
        let end = body.span().end;

        Ok(Stmt::For {
            initializer,
            condition,
            updates,
            body,
            span: Span::new(start, end),
        })
    }

    /// `let name of` right after the opening parenthesis.
    fn is_for_each_header(&self) -> bool {
        let ahead = |distance: usize| self.tokens.get(self.current + distance);
        matches!(ahead(0), Some(token) if token.token_type == TokenType::Let)
            && matches!(ahead(1), Some(token) if token.token_type == TokenType::Identifier)
            && matches!(ahead(2), Some(token) if token.token_type == TokenType::Identifier && token.lexeme == "of")
    }

    fn for_each_statement(&mut self, start: usize) -> Result<Stmt, SimError> {
        self.advance();
        let name = self.advance().lexeme.clone();
        self.advance();

        let iterable = self.expression()?;
        self.consume_with_help(
            TokenType::RightParen,
            "Expected ')' after loop collection",
            "An enhanced for loop reads: for (Type item : collection) { ... }".to_string(),
        )?;

        let body = Box::new(self.statement()?);
        let end = body.span().end;

        Ok(Stmt::ForEach {
            name,
            iterable,
            body,
            span: Span::new(start, end),
        })
    }

    fn return_statement(&mut self) -> Result<Stmt, SimError> {
        let start = self.previous().span.start;
        let value = if self.check(&TokenType::Semicolon) || self.check(&TokenType::RightBrace) || self.is_at_end() {
            None
        } else {
            Some(self.expression()?)
        };
        self.optional_semicolon();

        Ok(Stmt::Return {
            value,
            span: Span::new(start, self.previous().span.end),
        })
    }

    fn expression_statement(&mut self) -> Result<Stmt, SimError> {
        let start = self.peek().span.start;
        let expr = self.expression()?;

        self.optional_semicolon();
        let end = self.previous().span.end;

        Ok(Stmt::Expression {
            expr,
            span: Span::new(start, end),
        })
    }

    /// Comma-separated expressions up to (not including) `terminator`.
    fn expression_list(&mut self, terminator: &TokenType) -> Result<Vec<Expr>, SimError> {
        let mut expressions = Vec::new();
        if self.check(terminator) {
            return Ok(expressions);
        }
        loop {
            expressions.push(self.expression()?);
            if !self.match_types(&[TokenType::Comma]) {
                break;
            }
        }
        Ok(expressions)
    }

    fn optional_semicolon(&mut self) {
        if self.check(&TokenType::Semicolon) {
            self.advance();
        }
    }

    fn expression(&mut self) -> Result<Expr, SimError> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Expr, SimError> {
        let expr = self.ternary()?;

        let operator = match self.peek().token_type {
            TokenType::Equal => None,
            TokenType::PlusEqual => Some(BinaryOp::Add),
            TokenType::MinusEqual => Some(BinaryOp::Subtract),
            TokenType::StarEqual => Some(BinaryOp::Multiply),
            TokenType::SlashEqual => Some(BinaryOp::Divide),
            TokenType::PercentEqual => Some(BinaryOp::Remainder),
            _ => return Ok(expr),
        };
        let equals = self.advance().clone();

        if !expr.is_assignable() {
            return Err(SimError::parse_error_with_help(
                equals.span,
                "Invalid assignment target".to_string(),
                "Only variables and array elements can be assigned to.".to_string(),
            ));
        }

        let value = self.assignment()?;
        let span = Span::new(expr.span().start, value.span().end);
        Ok(Expr::Assign {
            target: Box::new(expr),
            operator,
            value: Box::new(value),
            span,
        })
    }

    fn ternary(&mut self) -> Result<Expr, SimError> {
        let condition = self.or()?;

        if !self.match_types(&[TokenType::Question]) {
            return Ok(condition);
        }

        let then_value = self.expression()?;
        self.consume_with_help(
            TokenType::Colon,
            "Expected ':' in conditional expression",
            "A conditional expression reads: condition ? whenTrue : whenFalse".to_string(),
        )?;
        let else_value = self.ternary()?;

        let span = Span::new(condition.span().start, else_value.span().end);
        Ok(Expr::Ternary {
            condition: Box::new(condition),
            then_value: Box::new(then_value),
            else_value: Box::new(else_value),
            span,
        })
    }

    fn or(&mut self) -> Result<Expr, SimError> {
        let mut expr = self.and()?;

        while self.match_types(&[TokenType::OrOr]) {
            let start = expr.span().start;
            let right = self.and()?;
            let end = right.span().end;

            expr = Expr::Logical {
                left: Box::new(expr),
                operator: LogicalOp::Or,
                right: Box::new(right),
                span: Span::new(start, end),
            };
        }

        Ok(expr)
    }

    fn and(&mut self) -> Result<Expr, SimError> {
        let mut expr = self.equality()?;

        while self.match_types(&[TokenType::AndAnd]) {
            let start = expr.span().start;
            let right = self.equality()?;
            let end = right.span().end;

            expr = Expr::Logical {
                left: Box::new(expr),
                operator: LogicalOp::And,
                right: Box::new(right),
                span: Span::new(start, end),
            };
        }

        Ok(expr)
    }

    /// Left-associative binary level: `next (op next)*`.
    fn binary_level(
        &mut self,
        operators: &[(TokenType, BinaryOp)],
        next: fn(&mut Self) -> Result<Expr, SimError>,
        help: &str,
    ) -> Result<Expr, SimError> {
        let mut expr = next(self)?;

        while let Some(operator) = operators
            .iter()
            .find(|(token_type, _)| self.check(token_type))
            .map(|(_, op)| *op)
        {
            let operator_token = self.advance().clone();
            let start = expr.span().start;
            let right = next(self).map_err(|_| {
                SimError::parse_error_with_help(
                    operator_token.span.clone(),
                    format!("Expected expression after '{}'", operator_token.lexeme),
                    help.to_string(),
                )
            })?;
            let end = right.span().end;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
                span: Span::new(start, end),
            };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr, SimError> {
        self.binary_level(
            &[
                (TokenType::BangEqual, BinaryOp::NotEqual),
                (TokenType::EqualEqual, BinaryOp::Equal),
            ],
            Self::comparison,
            "Equality operators like '==' and '!=' require expressions on both sides.",
        )
    }

    fn comparison(&mut self) -> Result<Expr, SimError> {
        self.binary_level(
            &[
                (TokenType::Greater, BinaryOp::Greater),
                (TokenType::GreaterEqual, BinaryOp::GreaterEqual),
                (TokenType::Less, BinaryOp::Less),
                (TokenType::LessEqual, BinaryOp::LessEqual),
            ],
            Self::term,
            "Comparison operators like '>', '<', '>=' and '<=' require expressions on both sides.",
        )
    }

    fn term(&mut self) -> Result<Expr, SimError> {
        self.binary_level(
            &[
                (TokenType::Minus, BinaryOp::Subtract),
                (TokenType::Plus, BinaryOp::Add),
            ],
            Self::factor,
            "Arithmetic operators like '+' and '-' require expressions on both sides.",
        )
    }

    fn factor(&mut self) -> Result<Expr, SimError> {
        self.binary_level(
            &[
                (TokenType::Slash, BinaryOp::Divide),
                (TokenType::Star, BinaryOp::Multiply),
                (TokenType::Percent, BinaryOp::Remainder),
            ],
            Self::unary,
            "Multiplication, division and remainder operators require expressions on both sides.",
        )
    }

    fn unary(&mut self) -> Result<Expr, SimError> {
        if self.match_types(&[TokenType::Bang, TokenType::Minus, TokenType::Plus]) {
            let operator_token = self.previous().clone();
            let start = operator_token.span.start;
            let operand = self.unary()?;
            let end = operand.span().end;

            let operator = match operator_token.token_type {
                TokenType::Bang => UnaryOp::Not,
                TokenType::Minus => UnaryOp::Negate,
                _ => return Ok(operand),
            };
            return Ok(Expr::Unary {
                operator,
                operand: Box::new(operand),
                span: Span::new(start, end),
            });
        }

        if self.match_types(&[TokenType::PlusPlus, TokenType::MinusMinus]) {
            let operator_token = self.previous().clone();
            let target = self.unary()?;
            if !target.is_assignable() {
                return Err(SimError::parse_error(
                    operator_token.span,
                    format!("Operand of '{}' must be a variable", operator_token.lexeme),
                ));
            }
            let span = Span::new(operator_token.span.start, target.span().end);
            return Ok(Expr::Update {
                target: Box::new(target),
                delta: if operator_token.token_type == TokenType::PlusPlus { 1 } else { -1 },
                prefix: true,
                span,
            });
        }

        if let Some(target) = self.cast_type() {
            let start = self.peek().span.start;
            self.current += 3;
            let operand = self.unary()?;
            let span = Span::new(start, operand.span().end);
            return Ok(Expr::Cast {
                target,
                operand: Box::new(operand),
                span,
            });
        }

        self.postfix()
    }

    /// `( type )` with a primitive type name at the current position.
    fn cast_type(&self) -> Option<CastType> {
        let ahead = |distance: usize| self.tokens.get(self.current + distance);
        let open = ahead(0)?;
        let name = ahead(1)?;
        let close = ahead(2)?;
        if open.token_type != TokenType::LeftParen
            || name.token_type != TokenType::Identifier
            || close.token_type != TokenType::RightParen
        {
            return None;
        }
        CastType::from_name(&name.lexeme)
    }

    fn postfix(&mut self) -> Result<Expr, SimError> {
        let expr = self.call()?;

        if expr.is_assignable() && self.match_types(&[TokenType::PlusPlus, TokenType::MinusMinus]) {
            let operator_token = self.previous().clone();
            let span = Span::new(expr.span().start, operator_token.span.end);
            return Ok(Expr::Update {
                target: Box::new(expr),
                delta: if operator_token.token_type == TokenType::PlusPlus { 1 } else { -1 },
                prefix: false,
                span,
            });
        }

        Ok(expr)
    }

    fn call(&mut self) -> Result<Expr, SimError> {
        let mut expr = self.primary()?;

        loop {
            if self.match_types(&[TokenType::LeftParen]) {
                expr = self.finish_call(expr)?;
            } else if self.match_types(&[TokenType::Dot]) {
                let property_token = self
                    .consume(TokenType::Identifier, "Expected property name after '.'")?
                    .clone();
                let start = expr.span().start;

                if self.match_types(&[TokenType::LeftParen]) {
                    let args = self.arguments()?;
                    expr = Expr::MethodCall {
                        object: Box::new(expr),
                        method: property_token.lexeme,
                        args,
                        span: Span::new(start, self.previous().span.end),
                    };
                } else {
                    expr = Expr::PropertyAccess {
                        object: Box::new(expr),
                        property: property_token.lexeme,
                        span: Span::new(start, property_token.span.end),
                    };
                }
            } else if self.match_types(&[TokenType::LeftBracket]) {
                let index = self.expression()?;
                let end_token = self.consume_with_help(
                    TokenType::RightBracket,
                    "Expected ']' after index",
                    "Array elements are read as name[index].".to_string(),
                )?;
                let span = Span::new(expr.span().start, end_token.span.end);
                expr = Expr::Index {
                    object: Box::new(expr),
                    index: Box::new(index),
                    span,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> Result<Expr, SimError> {
        let (name, span) = match callee {
            Expr::Variable { name, span } => (name, span),
            other => {
                return Err(SimError::parse_error_with_help(
                    other.span().clone(),
                    "Expression is not callable".to_string(),
                    "Only methods of objects and built-in functions can be called.".to_string(),
                ));
            }
        };

        let args = self.arguments()?;
        Ok(Expr::Call {
            callee: name,
            args,
            span: Span::new(span.start, self.previous().span.end),
        })
    }

    /// Arguments after an opening parenthesis, through the closing one.
    fn arguments(&mut self) -> Result<Vec<Expr>, SimError> {
        let args = self.expression_list(&TokenType::RightParen)?;
        self.consume_with_help(
            TokenType::RightParen,
            "Expected ')' after arguments",
            "Function call arguments must be closed with ')'. Example: print(\"Hello\")".to_string(),
        )?;
        Ok(args)
    }

    fn primary(&mut self) -> Result<Expr, SimError> {
        if self.is_at_end() {
            return Err(SimError::parse_error_with_help(
                self.peek().span.clone(),
                "Unexpected end of input".to_string(),
                "Expected an expression here. Check for unmatched parentheses, brackets, or incomplete statements.".to_string(),
            ));
        }

        let token = self.advance().clone();

        match token.token_type {
            TokenType::False => Ok(literal(Value::Bool(false), token.span)),
            TokenType::True => Ok(literal(Value::Bool(true), token.span)),
            TokenType::Null => Ok(literal(Value::Null, token.span)),
            TokenType::Integer => {
                let value = token.lexeme.parse::<i64>().map_err(|_| {
                    SimError::parse_error(token.span.clone(), "Invalid integer".to_string())
                })?;
                Ok(literal(Value::Int(value), token.span))
            }
            TokenType::Double => {
                let value = token.lexeme.parse::<f64>().map_err(|_| {
                    SimError::parse_error(token.span.clone(), "Invalid double".to_string())
                })?;
                Ok(literal(Value::Double(value), token.span))
            }
            TokenType::String => Ok(literal(Value::String(token.lexeme), token.span)),
            TokenType::Char => {
                let value = token.lexeme.chars().next().unwrap_or('\0');
                Ok(literal(Value::Char(value), token.span))
            }
            TokenType::Identifier => Ok(Expr::Variable {
                name: token.lexeme,
                span: token.span,
            }),
            TokenType::New => self.new_expression(token.span),
            TokenType::LeftParen => {
                let start_span = token.span;

                if self.check(&TokenType::RightParen) {
                    return Err(SimError::parse_error_with_help(
                        Span::new(start_span.start, self.peek().span.end),
                        "Empty parentheses are not allowed".to_string(),
                        "Parentheses must contain an expression. Example: (x + 1)".to_string(),
                    ));
                }

                let expr = self.expression()?;
                let end_token = self.consume_with_help(
                    TokenType::RightParen,
                    "Expected ')' after expression",
                    "Every opening parenthesis '(' must have a matching closing parenthesis ')'.".to_string(),
                )?;
                Ok(Expr::Grouping {
                    expr: Box::new(expr),
                    span: Span::new(start_span.start, end_token.span.end),
                })
            }
            TokenType::LeftBracket => self.array_literal(token.span),
            _ => {
                let help_msg = match token.token_type {
                    TokenType::RightParen => "Found ')' without matching '('. Check for unbalanced parentheses.",
                    TokenType::RightBrace => "Found '}' without matching '{'. Check for unbalanced braces.",
                    TokenType::RightBracket => "Found ']' without matching '['. Check for unbalanced brackets.",
                    TokenType::LeftBrace => "Array initializers are only supported in declarations: int[] xs = {1, 2};",
                    _ => "Expected a literal value, variable, or parenthesized expression here.",
                };

                Err(SimError::parse_error_with_help(
                    token.span,
                    format!("Expected expression, found '{}'", token.lexeme),
                    help_msg.to_string(),
                ))
            }
        }
    }

    /// `new Name(args)`; qualified names keep only the last segment.
    fn new_expression(&mut self, start_span: Span) -> Result<Expr, SimError> {
        let mut class = self
            .consume_with_help(
                TokenType::Identifier,
                "Expected class name after 'new'",
                "Objects are created with: new ClassName(arguments)".to_string(),
            )?
            .lexeme
            .clone();
        while self.match_types(&[TokenType::Dot]) {
            class = self
                .consume(TokenType::Identifier, "Expected class name after '.'")?
                .lexeme
                .clone();
        }

        self.consume_with_help(
            TokenType::LeftParen,
            "Expected '(' after class name",
            "Objects are created with: new ClassName(arguments)".to_string(),
        )?;
        let args = self.arguments()?;

        Ok(Expr::New {
            class,
            args,
            span: Span::new(start_span.start, self.previous().span.end),
        })
    }

    fn array_literal(&mut self, start_span: Span) -> Result<Expr, SimError> {
        let mut elements = Vec::new();

        if !self.check(&TokenType::RightBracket) {
            loop {
                elements.push(self.expression()?);
                if !self.match_types(&[TokenType::Comma]) || self.check(&TokenType::RightBracket) {
                    break;
                }
            }
        }

        let end_token = self.consume_with_help(
            TokenType::RightBracket,
            "Expected ']' after array elements",
            "Array literals must be closed with ']' after the opening '['. Example: [1, 2, 3]".to_string(),
        )?;
        Ok(Expr::Array {
            elements,
            span: Span::new(start_span.start, end_token.span.end),
        })
    }

    fn match_types(&mut self, types: &[TokenType]) -> bool {
        for token_type in types {
            if self.check(token_type) {
                self.advance();
                return true;
            }
        }
        false
    }

    fn check(&self, token_type: &TokenType) -> bool {
        if self.is_at_end() {
            false
        } else {
            &self.peek().token_type == token_type
        }
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().token_type == TokenType::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    /// Points at the unexpected token, or just past the last real one at EOF.
    fn error_span(&self) -> Span {
        if self.is_at_end() && self.current > 0 {
            Span::single(self.tokens[self.current - 1].span.end)
        } else {
            self.peek().span.clone()
        }
    }

    fn consume(&mut self, token_type: TokenType, message: &str) -> Result<&Token, SimError> {
        if self.check(&token_type) {
            Ok(self.advance())
        } else {
            Err(SimError::parse_error(self.error_span(), message.to_string()))
        }
    }

    fn consume_with_help(&mut self, token_type: TokenType, message: &str, help: String) -> Result<&Token, SimError> {
        if self.check(&token_type) {
            Ok(self.advance())
        } else {
            Err(SimError::parse_error_with_help(
                self.error_span(),
                message.to_string(),
                help,
            ))
        }
    }
}

fn literal(value: Value, span: Span) -> Expr {
    Expr::Literal { value, span }
}
