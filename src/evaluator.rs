use crate::ast::{BinaryOp, Binding, CastType, Expr, LogicalOp, Program, Stmt, UnaryOp};
use crate::error::{SimError, Span};
use crate::shim::{self, collections, RunContext, ShimError};
use crate::value::{shared, Shared, Value};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Block-scoped variable storage. The outermost scope holds the globals.
#[derive(Debug, Default)]
pub struct Environment {
    scopes: Vec<HashMap<String, Value>>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    fn push(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn pop(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Declares `name` in the innermost scope. Fails when that scope
    /// already has it.
    pub fn define(&mut self, name: &str, value: Value) -> bool {
        let Some(scope) = self.scopes.last_mut() else {
            return false;
        };
        if scope.contains_key(name) {
            return false;
        }
        scope.insert(name.to_string(), value);
        true
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .cloned()
    }

    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        match self.scopes.iter_mut().rev().find_map(|scope| scope.get_mut(name)) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

/// How a statement finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Normal,
    Break,
    Continue,
    Return,
}

pub struct Evaluator<'ctx> {
    environment: Environment,
    ctx: &'ctx mut RunContext,
}

impl<'ctx> Evaluator<'ctx> {
    pub fn new(ctx: &'ctx mut RunContext) -> Self {
        let mut environment = Environment::new();
        for (name, value) in shim::globals() {
            environment.define(name, value);
        }
        Self { environment, ctx }
    }

    pub fn evaluate_program(&mut self, program: &Program) -> Result<(), SimError> {
        tracing::trace!(statements = program.statements.len(), "evaluating program");
        for statement in &program.statements {
            match self.execute_statement(statement)? {
                Flow::Normal => {}
                Flow::Return => break,
                Flow::Break | Flow::Continue => {
                    return Err(SimError::runtime_error(
                        statement.span().clone(),
                        "break or continue outside of a loop".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    fn execute_statement(&mut self, stmt: &Stmt) -> Result<Flow, SimError> {
        match stmt {
            Stmt::Expression { expr, .. } => {
                self.evaluate_expression(expr)?;
                Ok(Flow::Normal)
            }
            Stmt::Let { bindings, span } => {
                self.declare(bindings, span)?;
                Ok(Flow::Normal)
            }
            Stmt::Block { statements, .. } => self.scoped(|this| this.execute_block(statements)),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                if self.evaluate_condition(condition)? {
                    self.execute_statement(then_branch)
                } else if let Some(else_stmt) = else_branch {
                    self.execute_statement(else_stmt)
                } else {
                    Ok(Flow::Normal)
                }
            }
            Stmt::While { condition, body, .. } => {
                while self.evaluate_condition(condition)? {
                    match self.execute_statement(body)? {
                        Flow::Break => break,
                        Flow::Return => return Ok(Flow::Return),
                        Flow::Normal | Flow::Continue => {}
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::DoWhile { body, condition, .. } => {
                loop {
                    match self.execute_statement(body)? {
                        Flow::Break => break,
                        Flow::Return => return Ok(Flow::Return),
                        Flow::Normal | Flow::Continue => {}
                    }
                    if !self.evaluate_condition(condition)? {
                        break;
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::For {
                initializer,
                condition,
                updates,
                body,
                ..
            } => self.scoped(|this| {
                if let Some(init) = initializer {
                    this.execute_statement(init)?;
                }

                loop {
                    if let Some(cond) = condition {
                        if !this.evaluate_condition(cond)? {
                            break;
                        }
                    }

                    match this.execute_statement(body)? {
                        Flow::Break => break,
                        Flow::Return => return Ok(Flow::Return),
                        Flow::Normal | Flow::Continue => {}
                    }

                    for update in updates {
                        this.evaluate_expression(update)?;
                    }
                }
                Ok(Flow::Normal)
            }),
            Stmt::ForEach {
                name,
                iterable,
                body,
                span,
            } => {
                let items = match self.evaluate_expression(iterable)? {
                    Value::Array(items) | Value::List(items) => items.borrow().clone(),
                    other => {
                        return Err(SimError::runtime_error(
                            iterable.span().clone(),
                            format!("for-each not applicable to expression type {}", other.type_name()),
                        ));
                    }
                };

                for item in items {
                    let flow = self.scoped(|this| {
                        this.define(name, item, span)?;
                        this.execute_statement(body)
                    })?;
                    match flow {
                        Flow::Break => break,
                        Flow::Return => return Ok(Flow::Return),
                        Flow::Normal | Flow::Continue => {}
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::Break { .. } => Ok(Flow::Break),
            Stmt::Continue { .. } => Ok(Flow::Continue),
            Stmt::Return { value, .. } => {
                if let Some(value) = value {
                    self.evaluate_expression(value)?;
                }
                Ok(Flow::Return)
            }
            Stmt::Empty { .. } => Ok(Flow::Normal),
        }
    }

    fn execute_block(&mut self, statements: &[Stmt]) -> Result<Flow, SimError> {
        for statement in statements {
            let flow = self.execute_statement(statement)?;
            if flow != Flow::Normal {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    /// Runs `body` in a fresh scope that is dropped afterwards, even on error.
    fn scoped<T>(&mut self, body: impl FnOnce(&mut Self) -> Result<T, SimError>) -> Result<T, SimError> {
        self.environment.push();
        let result = body(self);
        self.environment.pop();
        result
    }

    fn declare(&mut self, bindings: &[Binding], span: &Span) -> Result<(), SimError> {
        for binding in bindings {
            let value = match &binding.initializer {
                Some(initializer) => self.evaluate_expression(initializer)?,
                None => Value::Null,
            };
            self.define(&binding.name, value, span)?;
        }
        Ok(())
    }

    fn define(&mut self, name: &str, value: Value, span: &Span) -> Result<(), SimError> {
        if self.environment.define(name, value) {
            Ok(())
        } else {
            Err(SimError::runtime_error(
                span.clone(),
                format!("Duplicate local variable {}", name),
            ))
        }
    }

    fn evaluate_condition(&mut self, condition: &Expr) -> Result<bool, SimError> {
        match self.evaluate_expression(condition)? {
            Value::Bool(b) => Ok(b),
            other => Err(SimError::runtime_error_with_help(
                condition.span().clone(),
                format!("Type mismatch: cannot convert from {} to boolean", other.type_name()),
                "Conditions must be boolean expressions such as x > 0.".to_string(),
            )),
        }
    }

    pub fn evaluate_expression(&mut self, expr: &Expr) -> Result<Value, SimError> {
        match expr {
            Expr::Literal { value, .. } => Ok(value.clone()),
            Expr::Variable { name, span } => self.environment.get(name).ok_or_else(|| unresolved(name, span)),
            Expr::Assign {
                target,
                operator,
                value,
                span,
            } => {
                let place = self.resolve_place(target)?;
                let operand = self.evaluate_expression(value)?;
                let current = self.read_place(&place)?;
                let new_value = match operator {
                    None => widen_to(&current, operand),
                    Some(operator) => {
                        let combined = evaluate_binary_op(*operator, current.clone(), operand, span)?;
                        narrow_to(&current, combined)
                    }
                };
                self.write_place(place, new_value.clone())?;
                Ok(new_value)
            }
            Expr::Update {
                target,
                delta,
                prefix,
                span,
            } => {
                let place = self.resolve_place(target)?;
                let current = self.read_place(&place)?;
                let updated = match &current {
                    Value::Int(n) => Value::Int(n.wrapping_add(*delta)),
                    Value::Double(n) => Value::Double(n + *delta as f64),
                    Value::Char(c) => shift_char(*c, *delta),
                    other => {
                        return Err(SimError::runtime_error(
                            span.clone(),
                            format!("The operator ++/-- is undefined for the argument type {}", other.type_name()),
                        ));
                    }
                };
                self.write_place(place, updated.clone())?;
                Ok(if *prefix { updated } else { current })
            }
            Expr::Binary {
                left,
                operator,
                right,
                span,
            } => {
                let left_val = self.evaluate_expression(left)?;
                let right_val = self.evaluate_expression(right)?;
                evaluate_binary_op(*operator, left_val, right_val, span)
            }
            Expr::Unary {
                operator,
                operand,
                span,
            } => {
                let operand_val = self.evaluate_expression(operand)?;
                evaluate_unary_op(*operator, operand_val, span)
            }
            Expr::Logical { left, operator, right, .. } => {
                let left_val = self.evaluate_condition(left)?;
                match operator {
                    LogicalOp::Or if left_val => Ok(Value::Bool(true)),
                    LogicalOp::And if !left_val => Ok(Value::Bool(false)),
                    _ => Ok(Value::Bool(self.evaluate_condition(right)?)),
                }
            }
            Expr::Ternary {
                condition,
                then_value,
                else_value,
                ..
            } => {
                if self.evaluate_condition(condition)? {
                    self.evaluate_expression(then_value)
                } else {
                    self.evaluate_expression(else_value)
                }
            }
            Expr::Cast { target, operand, span } => {
                let value = self.evaluate_expression(operand)?;
                cast(*target, value, span)
            }
            Expr::Call { callee, args, span } => {
                let args = self.evaluate_arguments(args)?;
                shim::call_function(callee, args).map_err(|err| shim_fault(err, span))
            }
            Expr::MethodCall {
                object,
                method,
                args,
                span,
            } => {
                let receiver = self.evaluate_expression(object)?;
                let args = self.evaluate_arguments(args)?;
                shim::call_method(self.ctx, &receiver, method, args).map_err(|err| shim_fault(err, span))
            }
            Expr::PropertyAccess { object, property, span } => {
                let receiver = self.evaluate_expression(object)?;
                shim::get_property(&receiver, property).map_err(|err| shim_fault(err, span))
            }
            Expr::Index { object, index, span } => {
                let (items, slot) = self.resolve_element(object, index, span)?;
                let value = items.borrow()[slot].clone();
                Ok(value)
            }
            Expr::New { class, args, span } => {
                let args = self.evaluate_arguments(args)?;
                shim::construct(self.ctx, class, args).map_err(|err| shim_fault(err, span))
            }
            Expr::Grouping { expr, .. } => self.evaluate_expression(expr),
            Expr::Array { elements, .. } => {
                let items = self.evaluate_arguments(elements)?;
                Ok(Value::Array(shared(items)))
            }
        }
    }

    fn evaluate_arguments(&mut self, args: &[Expr]) -> Result<Vec<Value>, SimError> {
        args.iter().map(|arg| self.evaluate_expression(arg)).collect()
    }

    /// Evaluates `object[index]` down to the backing array and a checked slot.
    fn resolve_element(
        &mut self,
        object: &Expr,
        index: &Expr,
        span: &Span,
    ) -> Result<(Shared<Vec<Value>>, usize), SimError> {
        let items = match self.evaluate_expression(object)? {
            Value::Array(items) => items,
            Value::Null => {
                return Err(shim_fault(ShimError::NullPointer("array access".to_string()), span));
            }
            other => {
                return Err(SimError::runtime_error(
                    span.clone(),
                    format!("The type of the expression must be an array type but it resolved to {}", other.type_name()),
                ));
            }
        };
        let index_value = self.evaluate_expression(index)?;
        let index = index_value.as_i64().ok_or_else(|| {
            SimError::runtime_error(
                span.clone(),
                format!("Type mismatch: cannot convert from {} to int", index_value.type_name()),
            )
        })?;
        let length = items.borrow().len();
        let slot = collections::check_index(index, length).map_err(|err| shim_fault(err, span))?;
        Ok((items, slot))
    }

    /// Resolves an assignment target once, so `xs[i++] += 1` evaluates its
    /// index a single time.
    fn resolve_place(&mut self, target: &Expr) -> Result<Place, SimError> {
        match target {
            Expr::Variable { name, span } => Ok(Place::Variable {
                name: name.clone(),
                span: span.clone(),
            }),
            Expr::Index { object, index, span } => {
                let (items, slot) = self.resolve_element(object, index, span)?;
                Ok(Place::Element { items, slot })
            }
            other => Err(SimError::runtime_error(
                other.span().clone(),
                "Invalid assignment target".to_string(),
            )),
        }
    }

    fn read_place(&self, place: &Place) -> Result<Value, SimError> {
        match place {
            Place::Variable { name, span } => self.environment.get(name).ok_or_else(|| unresolved(name, span)),
            Place::Element { items, slot } => Ok(items.borrow()[*slot].clone()),
        }
    }

    fn write_place(&mut self, place: Place, value: Value) -> Result<(), SimError> {
        match place {
            Place::Variable { name, span } => {
                if self.environment.assign(&name, value) {
                    Ok(())
                } else {
                    Err(unresolved(&name, &span))
                }
            }
            Place::Element { items, slot } => {
                items.borrow_mut()[slot] = value;
                Ok(())
            }
        }
    }
}

/// A storage location an assignment writes to.
enum Place {
    Variable { name: String, span: Span },
    Element { items: Shared<Vec<Value>>, slot: usize },
}

fn unresolved(name: &str, span: &Span) -> SimError {
    SimError::runtime_error(span.clone(), format!("{} cannot be resolved to a variable", name))
}

fn shim_fault(err: ShimError, span: &Span) -> SimError {
    SimError::runtime_error(span.clone(), err.to_string())
}

fn shift_char(c: char, delta: i64) -> Value {
    match u32::try_from(c as i64 + delta).ok().and_then(char::from_u32) {
        Some(shifted) => Value::Char(shifted),
        None => Value::Int(c as i64 + delta),
    }
}

/// A variable or element holding a double keeps holding one when an
/// integral value is assigned to it.
fn widen_to(current: &Value, assigned: Value) -> Value {
    match (current, assigned) {
        (Value::Double(_), Value::Int(n)) => Value::Double(n as f64),
        (Value::Double(_), Value::Char(c)) => Value::Double(c as u32 as f64),
        (_, assigned) => assigned,
    }
}

/// Compound assignment stores back in the target's own type, as Java's
/// implicit narrowing does for `x += 1.5` on an int.
fn narrow_to(current: &Value, combined: Value) -> Value {
    match (current, combined) {
        (Value::Int(_), Value::Double(n)) => Value::Int(n as i64),
        (Value::Char(_), Value::Int(n)) => match u32::try_from(n).ok().and_then(char::from_u32) {
            Some(c) => Value::Char(c),
            None => Value::Int(n),
        },
        (_, combined) => combined,
    }
}

fn both_integral(left: &Value, right: &Value) -> bool {
    matches!(left, Value::Int(_) | Value::Char(_)) && matches!(right, Value::Int(_) | Value::Char(_))
}

fn operand_error(operator: BinaryOp, left: &Value, right: &Value, span: &Span) -> SimError {
    let symbol = match operator {
        BinaryOp::Add => "+",
        BinaryOp::Subtract => "-",
        BinaryOp::Multiply => "*",
        BinaryOp::Divide => "/",
        BinaryOp::Remainder => "%",
        BinaryOp::Equal => "==",
        BinaryOp::NotEqual => "!=",
        BinaryOp::Less => "<",
        BinaryOp::LessEqual => "<=",
        BinaryOp::Greater => ">",
        BinaryOp::GreaterEqual => ">=",
    };
    SimError::runtime_error(
        span.clone(),
        format!(
            "The operator {} is undefined for the argument type(s) {}, {}",
            symbol,
            left.type_name(),
            right.type_name()
        ),
    )
}

fn evaluate_binary_op(operator: BinaryOp, left: Value, right: Value, span: &Span) -> Result<Value, SimError> {
    match operator {
        BinaryOp::Equal => return Ok(Value::Bool(left.equals(&right))),
        BinaryOp::NotEqual => return Ok(Value::Bool(!left.equals(&right))),
        BinaryOp::Add if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) => {
            return Ok(Value::String(format!("{}{}", left, right)));
        }
        _ => {}
    }

    if both_integral(&left, &right) {
        let (l, r) = match (left.as_i64(), right.as_i64()) {
            (Some(l), Some(r)) => (l, r),
            _ => return Err(operand_error(operator, &left, &right, span)),
        };
        let divide_by_zero = || {
            SimError::runtime_error(span.clone(), "ArithmeticException: / by zero".to_string())
        };
        return Ok(match operator {
            BinaryOp::Add => Value::Int(l.wrapping_add(r)),
            BinaryOp::Subtract => Value::Int(l.wrapping_sub(r)),
            BinaryOp::Multiply => Value::Int(l.wrapping_mul(r)),
            BinaryOp::Divide if r == 0 => return Err(divide_by_zero()),
            BinaryOp::Divide => Value::Int(l.wrapping_div(r)),
            BinaryOp::Remainder if r == 0 => return Err(divide_by_zero()),
            BinaryOp::Remainder => Value::Int(l.wrapping_rem(r)),
            comparison => Value::Bool(compare(comparison, l.cmp(&r))),
        });
    }

    let (l, r) = match (left.as_f64(), right.as_f64()) {
        (Some(l), Some(r)) => (l, r),
        _ => return Err(operand_error(operator, &left, &right, span)),
    };
    Ok(match operator {
        BinaryOp::Add => Value::Double(l + r),
        BinaryOp::Subtract => Value::Double(l - r),
        BinaryOp::Multiply => Value::Double(l * r),
        BinaryOp::Divide => Value::Double(l / r),
        BinaryOp::Remainder => Value::Double(l % r),
        comparison => match l.partial_cmp(&r) {
            Some(ordering) => Value::Bool(compare(comparison, ordering)),
            None => Value::Bool(false),
        },
    })
}

fn compare(operator: BinaryOp, ordering: Ordering) -> bool {
    match operator {
        BinaryOp::Less => ordering == Ordering::Less,
        BinaryOp::LessEqual => ordering != Ordering::Greater,
        BinaryOp::Greater => ordering == Ordering::Greater,
        BinaryOp::GreaterEqual => ordering != Ordering::Less,
        BinaryOp::Equal => ordering == Ordering::Equal,
        _ => ordering != Ordering::Equal,
    }
}

fn evaluate_unary_op(operator: UnaryOp, operand: Value, span: &Span) -> Result<Value, SimError> {
    match (operator, operand) {
        (UnaryOp::Negate, Value::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
        (UnaryOp::Negate, Value::Char(c)) => Ok(Value::Int(-(c as i64))),
        (UnaryOp::Negate, Value::Double(n)) => Ok(Value::Double(-n)),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (operator, operand) => Err(SimError::runtime_error(
            span.clone(),
            format!(
                "The operator {} is undefined for the argument type(s) {}",
                if operator == UnaryOp::Not { "!" } else { "-" },
                operand.type_name()
            ),
        )),
    }
}

fn cast(target: CastType, value: Value, span: &Span) -> Result<Value, SimError> {
    let mismatch = |value: &Value| {
        SimError::runtime_error(
            span.clone(),
            format!("Cannot cast from {} to {:?}", value.type_name(), target).to_lowercase(),
        )
    };

    match target {
        CastType::Double | CastType::Float => value.as_f64().map(Value::Double).ok_or_else(|| mismatch(&value)),
        CastType::Char => {
            let code = value.as_f64().ok_or_else(|| mismatch(&value))? as i64;
            u32::try_from(code)
                .ok()
                .and_then(char::from_u32)
                .map(Value::Char)
                .ok_or_else(|| mismatch(&value))
        }
        CastType::Int | CastType::Long | CastType::Short | CastType::Byte => {
            let whole = match &value {
                Value::Double(n) => *n as i64,
                other => other.as_i64().ok_or_else(|| mismatch(other))?,
            };
            Ok(Value::Int(match target {
                CastType::Int => whole as i32 as i64,
                CastType::Short => whole as i16 as i64,
                CastType::Byte => whole as i8 as i64,
                _ => whole,
            }))
        }
    }
}
