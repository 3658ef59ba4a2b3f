//! Generic AST walker (spec §4.1).
//!
//! Polymorphic over a capability set of {pre-visit, post-visit} hooks for
//! each of {Expr, Stmt, Pattern, Decl, TypeRepr}. Children are visited in
//! source order; a `None` from a post-visit hook aborts the traversal,
//! propagating the abort up through every enclosing call. Parent context
//! is tracked on a scoped stack pushed on descent and popped on every exit
//! path (including an aborted one), matching `vex-compiler`'s own
//! closed-AST-walker diagnostics (`linter::unreachable_code`,
//! `linter::unused_variables`), which walk the same `Program`/`Item` tree
//! by hand with an explicit scope stack.

use crate::decl::{Decl, DeclKind};
use crate::{Block, Expression, MatchArm, Pattern, Statement, Type};

/// What a visitor decides for a node before its children are visited.
pub enum PreAction<T> {
    /// Descend into children, then replace this node with `T` afterward
    /// (or leave it as-is if unchanged).
    Descend,
    /// Do not descend; replace the node with the given value immediately.
    Replace(T),
}

/// The set of callbacks a walker client may implement. Every method has a
/// default no-op implementation so a client only overrides what it needs —
/// this is the "extensibility via composition" design note (spec §9):
/// distinct walker clients compose by each implementing a subset, not by
/// subclassing a base walker.
pub trait AstVisitor {
    fn pre_expr(&mut self, _e: &Expression) -> PreAction<Expression> {
        PreAction::Descend
    }
    fn post_expr(&mut self, e: Expression) -> Option<Expression> {
        Some(e)
    }

    fn pre_stmt(&mut self, _s: &Statement) -> PreAction<Statement> {
        PreAction::Descend
    }
    fn post_stmt(&mut self, s: Statement) -> Option<Statement> {
        Some(s)
    }

    fn pre_pattern(&mut self, _p: &Pattern) -> PreAction<Pattern> {
        PreAction::Descend
    }
    fn post_pattern(&mut self, p: Pattern) -> Option<Pattern> {
        Some(p)
    }

    fn pre_type(&mut self, _t: &Type) -> PreAction<Type> {
        PreAction::Descend
    }
    fn post_type(&mut self, t: Type) -> Option<Type> {
        Some(t)
    }

    fn pre_decl(&mut self, _d: &Decl) -> PreAction<Decl> {
        PreAction::Descend
    }
    fn post_decl(&mut self, d: Decl) -> Option<Decl> {
        Some(d)
    }

    /// Lifecycle notifications around a block scope, for clients that need
    /// to push/pop their own per-scope state (e.g. "has this block already
    /// terminated"). Not one of the five pre/post-visit categories — a
    /// block never gets replaced, just entered and exited.
    fn enter_block(&mut self) {}
    fn exit_block(&mut self) {}
}

/// One frame of the parent-pointer stack. Only the node kind and a cheap
/// discriminant are kept — enough for diagnostics (e.g. "unreachable code
/// inside this block") without holding a borrow that would fight the
/// walker's need to own-and-replace nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentFrame {
    Block,
    If,
    Loop,
    Match,
    Call,
    Closure,
}

/// Drives a traversal, maintaining the parent stack described in spec
/// §4.1: pushed on every recursive descent, popped on every exit path
/// (normal or aborted).
pub struct Walker<'v, V: AstVisitor> {
    visitor: &'v mut V,
    parents: Vec<ParentFrame>,
}

impl<'v, V: AstVisitor> Walker<'v, V> {
    pub fn new(visitor: &'v mut V) -> Self {
        Self {
            visitor,
            parents: Vec::new(),
        }
    }

    pub fn parents(&self) -> &[ParentFrame] {
        &self.parents
    }

    fn scoped<T>(&mut self, frame: ParentFrame, body: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        self.parents.push(frame);
        let result = body(self);
        self.parents.pop();
        result
    }

    pub fn walk_block(&mut self, block: Block) -> Option<Block> {
        self.visitor.enter_block();
        let result = self.scoped(ParentFrame::Block, |this| {
            let mut statements = Vec::with_capacity(block.statements.len());
            for stmt in block.statements {
                statements.push(this.walk_stmt(stmt)?);
            }
            Some(Block { statements })
        });
        self.visitor.exit_block();
        result
    }

    /// Bounded descent into a declaration's own body: a function,
    /// constructor, or destructor's statements, or a variable's
    /// initializer expression. Does not follow `DeclId` cross-references
    /// (member lists, inheritance clauses) — those require arena access
    /// the walker doesn't have.
    pub fn walk_decl(&mut self, decl: Decl) -> Option<Decl> {
        let decl = match self.visitor.pre_decl(&decl) {
            PreAction::Replace(replacement) => return self.visitor.post_decl(replacement),
            PreAction::Descend => decl,
        };

        let Decl { common, kind } = decl;
        let kind = match kind {
            DeclKind::Func(mut f) => {
                f.body = self.walk_block(f.body)?;
                DeclKind::Func(f)
            }
            DeclKind::Constructor(mut c) => {
                c.body = self.walk_block(c.body)?;
                DeclKind::Constructor(c)
            }
            DeclKind::Destructor(mut d) => {
                d.body = self.walk_block(d.body)?;
                DeclKind::Destructor(d)
            }
            DeclKind::Var(mut v) => {
                if let Some(init) = v.initializer.take() {
                    v.initializer = Some(self.walk_expr(init)?);
                }
                DeclKind::Var(v)
            }
            other => other,
        };

        self.visitor.post_decl(Decl { common, kind })
    }

    pub fn walk_stmt(&mut self, stmt: Statement) -> Option<Statement> {
        let stmt = match self.visitor.pre_stmt(&stmt) {
            PreAction::Replace(replacement) => return self.visitor.post_stmt(replacement),
            PreAction::Descend => stmt,
        };

        let descended = match stmt {
            Statement::Let {
                is_mutable,
                name,
                ty,
                value,
            } => Statement::Let {
                is_mutable,
                name,
                ty: ty.map(|t| self.walk_type(t)).transpose()?,
                value: self.walk_expr(value)?,
            },
            Statement::Assign { target, value } => Statement::Assign {
                target: self.walk_expr(target)?,
                value: self.walk_expr(value)?,
            },
            Statement::CompoundAssign { target, op, value } => Statement::CompoundAssign {
                target: self.walk_expr(target)?,
                op,
                value: self.walk_expr(value)?,
            },
            Statement::Return(expr) => {
                Statement::Return(expr.map(|e| self.walk_expr(e)).transpose()?)
            }
            Statement::Break => Statement::Break,
            Statement::Continue => Statement::Continue,
            Statement::Defer(inner) => Statement::Defer(Box::new(self.walk_stmt(*inner)?)),
            Statement::If {
                span_id,
                condition,
                then_block,
                elif_branches,
                else_block,
            } => self.scoped(ParentFrame::If, |this| {
                let condition = this.walk_expr(condition)?;
                let then_block = this.walk_block(then_block)?;
                let mut branches = Vec::with_capacity(elif_branches.len());
                for (cond, block) in elif_branches {
                    branches.push((this.walk_expr(cond)?, this.walk_block(block)?));
                }
                let else_block = else_block.map(|b| this.walk_block(b)).transpose()?;
                Some(Statement::If {
                    span_id,
                    condition,
                    then_block,
                    elif_branches: branches,
                    else_block,
                })
            })?,
            Statement::For {
                span_id,
                init,
                condition,
                post,
                body,
            } => self.scoped(ParentFrame::Loop, |this| {
                Some(Statement::For {
                    span_id,
                    init: init
                        .map(|i| this.walk_stmt(*i).map(Box::new))
                        .transpose()?,
                    condition: condition.map(|c| this.walk_expr(c)).transpose()?,
                    post: post.map(|p| this.walk_stmt(*p).map(Box::new)).transpose()?,
                    body: this.walk_block(body)?,
                })
            })?,
            Statement::While {
                span_id,
                condition,
                body,
            } => self.scoped(ParentFrame::Loop, |this| {
                Some(Statement::While {
                    span_id,
                    condition: this.walk_expr(condition)?,
                    body: this.walk_block(body)?,
                })
            })?,
            Statement::ForIn {
                variable,
                iterable,
                body,
            } => self.scoped(ParentFrame::Loop, |this| {
                Some(Statement::ForIn {
                    variable,
                    iterable: this.walk_expr(iterable)?,
                    body: this.walk_block(body)?,
                })
            })?,
            Statement::Switch {
                value,
                cases,
                default_case,
            } => {
                let value = value.map(|v| self.walk_expr(v)).transpose()?;
                let mut new_cases = Vec::with_capacity(cases.len());
                for case in cases {
                    let mut patterns = Vec::with_capacity(case.patterns.len());
                    for p in case.patterns {
                        patterns.push(self.walk_expr(p)?);
                    }
                    new_cases.push(crate::SwitchCase {
                        patterns,
                        body: self.walk_block(case.body)?,
                    });
                }
                Statement::Switch {
                    value,
                    cases: new_cases,
                    default_case: default_case.map(|b| self.walk_block(b)).transpose()?,
                }
            }
            Statement::Select { cases } => Statement::Select { cases },
            Statement::Go(e) => Statement::Go(self.walk_expr(e)?),
            Statement::Unsafe(block) => Statement::Unsafe(self.walk_block(block)?),
            Statement::Expression(e) => Statement::Expression(self.walk_expr(e)?),
        };

        self.visitor.post_stmt(descended)
    }

    pub fn walk_expr(&mut self, expr: Expression) -> Option<Expression> {
        let expr = match self.visitor.pre_expr(&expr) {
            PreAction::Replace(replacement) => return self.visitor.post_expr(replacement),
            PreAction::Descend => expr,
        };

        let descended = match expr {
            Expression::Binary {
                span_id,
                left,
                op,
                right,
            } => Expression::Binary {
                span_id,
                left: Box::new(self.walk_expr(*left)?),
                op,
                right: Box::new(self.walk_expr(*right)?),
            },
            Expression::Unary { span_id, op, expr } => Expression::Unary {
                span_id,
                op,
                expr: Box::new(self.walk_expr(*expr)?),
            },
            Expression::Call {
                span_id,
                func,
                type_args,
                args,
            } => self.scoped(ParentFrame::Call, |this| {
                let func = Box::new(this.walk_expr(*func)?);
                let mut new_args = Vec::with_capacity(args.len());
                for a in args {
                    new_args.push(this.walk_expr(a)?);
                }
                Some(Expression::Call {
                    span_id,
                    func,
                    type_args,
                    args: new_args,
                })
            })?,
            Expression::MethodCall {
                receiver,
                method,
                args,
                is_mutable_call,
            } => self.scoped(ParentFrame::Call, |this| {
                let receiver = Box::new(this.walk_expr(*receiver)?);
                let mut new_args = Vec::with_capacity(args.len());
                for a in args {
                    new_args.push(this.walk_expr(a)?);
                }
                Some(Expression::MethodCall {
                    receiver,
                    method,
                    args: new_args,
                    is_mutable_call,
                })
            })?,
            Expression::FieldAccess { object, field } => Expression::FieldAccess {
                object: Box::new(self.walk_expr(*object)?),
                field,
            },
            Expression::Index { object, index } => Expression::Index {
                object: Box::new(self.walk_expr(*object)?),
                index: Box::new(self.walk_expr(*index)?),
            },
            Expression::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for i in items {
                    out.push(self.walk_expr(i)?);
                }
                Expression::Array(out)
            }
            Expression::ArrayRepeat(value, count) => Expression::ArrayRepeat(
                Box::new(self.walk_expr(*value)?),
                Box::new(self.walk_expr(*count)?),
            ),
            Expression::MapLiteral(pairs) => {
                let mut out = Vec::with_capacity(pairs.len());
                for (k, v) in pairs {
                    out.push((self.walk_expr(k)?, self.walk_expr(v)?));
                }
                Expression::MapLiteral(out)
            }
            Expression::TupleLiteral(items) => {
                let mut out = Vec::with_capacity(items.len());
                for i in items {
                    out.push(self.walk_expr(i)?);
                }
                Expression::TupleLiteral(out)
            }
            Expression::StructLiteral {
                name,
                type_args,
                fields,
            } => {
                let mut out = Vec::with_capacity(fields.len());
                for (n, v) in fields {
                    out.push((n, self.walk_expr(v)?));
                }
                Expression::StructLiteral {
                    name,
                    type_args,
                    fields: out,
                }
            }
            Expression::EnumLiteral {
                enum_name,
                variant,
                data,
            } => {
                let mut out = Vec::with_capacity(data.len());
                for d in data {
                    out.push(self.walk_expr(d)?);
                }
                Expression::EnumLiteral {
                    enum_name,
                    variant,
                    data: out,
                }
            }
            Expression::Range { start, end } => Expression::Range {
                start: start.map(|e| self.walk_expr(*e).map(Box::new)).transpose()?,
                end: end.map(|e| self.walk_expr(*e).map(Box::new)).transpose()?,
            },
            Expression::RangeInclusive { start, end } => Expression::RangeInclusive {
                start: start.map(|e| self.walk_expr(*e).map(Box::new)).transpose()?,
                end: end.map(|e| self.walk_expr(*e).map(Box::new)).transpose()?,
            },
            Expression::Reference { is_mutable, expr } => Expression::Reference {
                is_mutable,
                expr: Box::new(self.walk_expr(*expr)?),
            },
            Expression::Deref(e) => Expression::Deref(Box::new(self.walk_expr(*e)?)),
            Expression::Await(e) => Expression::Await(Box::new(self.walk_expr(*e)?)),
            Expression::Match { value, arms } => self.scoped(ParentFrame::Match, |this| {
                let value = Box::new(this.walk_expr(*value)?);
                let mut new_arms = Vec::with_capacity(arms.len());
                for arm in arms {
                    new_arms.push(MatchArm {
                        pattern: this.walk_pattern(arm.pattern)?,
                        guard: arm.guard.map(|g| this.walk_expr(g)).transpose()?,
                        body: this.walk_expr(arm.body)?,
                    });
                }
                Some(Expression::Match {
                    value,
                    arms: new_arms,
                })
            })?,
            Expression::Block {
                statements,
                return_expr,
            } => self.scoped(ParentFrame::Block, |this| {
                let mut new_statements = Vec::with_capacity(statements.len());
                for s in statements {
                    new_statements.push(this.walk_stmt(s)?);
                }
                Some(Expression::Block {
                    statements: new_statements,
                    return_expr: return_expr
                        .map(|e| this.walk_expr(*e).map(Box::new))
                        .transpose()?,
                })
            })?,
            Expression::Launch { func, grid, args } => {
                let mut new_grid = Vec::with_capacity(grid.len());
                for g in grid {
                    new_grid.push(self.walk_expr(g)?);
                }
                let mut new_args = Vec::with_capacity(args.len());
                for a in args {
                    new_args.push(self.walk_expr(a)?);
                }
                Expression::Launch {
                    func,
                    grid: new_grid,
                    args: new_args,
                }
            }
            Expression::New(e) => Expression::New(Box::new(self.walk_expr(*e)?)),
            Expression::Make { element_type, size } => Expression::Make {
                element_type: self.walk_type(element_type)?,
                size: Box::new(self.walk_expr(*size)?),
            },
            Expression::Cast { expr, target_type } => Expression::Cast {
                expr: Box::new(self.walk_expr(*expr)?),
                target_type: self.walk_type(target_type)?,
            },
            Expression::QuestionMark(e) => Expression::QuestionMark(Box::new(self.walk_expr(*e)?)),
            Expression::Typeof(e) => Expression::Typeof(Box::new(self.walk_expr(*e)?)),
            Expression::PostfixOp { expr, op } => Expression::PostfixOp {
                expr: Box::new(self.walk_expr(*expr)?),
                op,
            },
            Expression::ErrorNew(e) => Expression::ErrorNew(Box::new(self.walk_expr(*e)?)),
            Expression::Closure {
                params,
                return_type,
                body,
                capture_mode,
            } => self.scoped(ParentFrame::Closure, |this| {
                Some(Expression::Closure {
                    params,
                    return_type: return_type.map(|t| this.walk_type(t)).transpose()?,
                    body: Box::new(this.walk_expr(*body)?),
                    capture_mode,
                })
            })?,
            // Leaves: nothing to descend into.
            leaf @ (Expression::IntLiteral(_)
            | Expression::FloatLiteral(_)
            | Expression::StringLiteral(_)
            | Expression::FStringLiteral(_)
            | Expression::BoolLiteral(_)
            | Expression::Nil
            | Expression::Ident(_)) => leaf,
        };

        self.visitor.post_expr(descended)
    }

    pub fn walk_pattern(&mut self, pattern: Pattern) -> Option<Pattern> {
        let pattern = match self.visitor.pre_pattern(&pattern) {
            PreAction::Replace(replacement) => return self.visitor.post_pattern(replacement),
            PreAction::Descend => pattern,
        };

        let descended = match pattern {
            Pattern::Wildcard => Pattern::Wildcard,
            Pattern::Literal(e) => Pattern::Literal(self.walk_expr(e)?),
            Pattern::Ident(name) => Pattern::Ident(name),
            Pattern::Tuple(items) => {
                let mut out = Vec::with_capacity(items.len());
                for p in items {
                    out.push(self.walk_pattern(p)?);
                }
                Pattern::Tuple(out)
            }
            Pattern::Struct { name, fields } => {
                let mut out = Vec::with_capacity(fields.len());
                for (n, p) in fields {
                    out.push((n, self.walk_pattern(p)?));
                }
                Pattern::Struct { name, fields: out }
            }
            Pattern::Enum {
                name,
                variant,
                data,
            } => {
                let mut out = Vec::with_capacity(data.len());
                for p in data {
                    out.push(self.walk_pattern(p)?);
                }
                Pattern::Enum {
                    name,
                    variant,
                    data: out,
                }
            }
            Pattern::Array { elements, rest } => {
                let mut out = Vec::with_capacity(elements.len());
                for p in elements {
                    out.push(self.walk_pattern(p)?);
                }
                Pattern::Array { elements: out, rest }
            }
            Pattern::Or(items) => {
                let mut out = Vec::with_capacity(items.len());
                for p in items {
                    out.push(self.walk_pattern(p)?);
                }
                Pattern::Or(out)
            }
        };

        self.visitor.post_pattern(descended)
    }

    pub fn walk_type(&mut self, ty: Type) -> Option<Type> {
        match self.visitor.pre_type(&ty) {
            PreAction::Replace(replacement) => self.visitor.post_type(replacement),
            PreAction::Descend => self.visitor.post_type(ty),
        }
    }
}
