/*
MIT License

Copyright (c) 2026 Raja Lehtihet and Wael El Oraiby

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Expression evaluation.

use super::*;
use crate::ast::{Expr, ExprKind, LogicOp};
use crate::runtime::{ResolveOptions, ops};
use std::collections::BTreeMap;

impl Interpreter {
    /// Evaluates an expression in the current scope.
    pub fn eval(&mut self, expr: &Expr) -> Result<Value, ScriptError> {
        match &expr.kind {
            ExprKind::Number(value) => Ok(Value::Number(*value)),
            ExprKind::Str(text) => Ok(Value::from(text.as_str())),
            ExprKind::Bool(value) => Ok(Value::Bool(*value)),
            ExprKind::Null => Ok(Value::Null),
            ExprKind::Ident(name) => Ok(self.resolve(name, ResolveOptions::default())),
            ExprKind::Array(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval(item)?);
                }
                Ok(Value::array(values))
            }
            ExprKind::Object(fields) => {
                let mut values = BTreeMap::new();
                for (key, value) in fields {
                    let value = self.eval(value)?;
                    values.insert(key.clone(), value);
                }
                Ok(Value::object(values))
            }
            ExprKind::Unary { op, operand } => {
                let value = self.eval(operand)?;
                ops::unary(*op, &value).map_err(|err| err.or_at(&expr.span))
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                ops::binary(*op, &left, &right, &self.options).map_err(|err| err.or_at(&expr.span))
            }
            ExprKind::Logical { op, left, right } => {
                // Short circuit: the deciding operand is the result.
                let left = self.eval(left)?;
                match (op, left.is_truthy()) {
                    (LogicOp::And, false) | (LogicOp::Or, true) => Ok(left),
                    _ => self.eval(right),
                }
            }
            ExprKind::Conditional {
                cond,
                then,
                otherwise,
            } => {
                if self.eval(cond)?.is_truthy() {
                    self.eval(then)
                } else {
                    self.eval(otherwise)
                }
            }
            ExprKind::Member { object, property } => {
                let object = self.eval(object)?;
                self.get_member(&object, property, &expr.span)
            }
            ExprKind::Index { object, index } => {
                let object = self.eval(object)?;
                let index = self.eval(index)?;
                self.get_index(&object, &index, &expr.span)
            }
            ExprKind::Call {
                callee,
                args,
                attrs,
            } => self.eval_call(callee, args, attrs.as_deref(), &expr.span),
            ExprKind::Function(lit) => {
                let scope = self.scopes.current();
                Ok(self.make_closure(Body::Function(lit.clone()), scope, false))
            }
            ExprKind::Map(lit) => {
                let scope = self.scopes.current();
                Ok(self.make_closure(Body::Map(lit.clone()), scope, false))
            }
        }
    }
}
