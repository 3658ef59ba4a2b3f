//! Three walker-based diagnostics, in the shape of
//! `vex-compiler::linter::{unreachable_code, unused_variables}`: each is an
//! [`AstVisitor`] whose hooks are driven by the generic [`silc_ast::Walker`]
//! over a clone of the function body, rather than a hand-rolled recursive
//! pass — the walker owns traversal order and scope bookkeeping, each lint
//! only owns the small bit of state its rule needs.

use silc_ast::walker::{AstVisitor, PreAction, Walker};
use silc_ast::{Expression, Function, Statement};
use silc_support::{Diagnostic, DiagnosticEngine, ErrorLevel, Span};
use std::collections::HashMap;

/// `x = x`: an assignment whose target and value are the same identifier.
struct SelfAssignVisitor<'a> {
    diagnostics: &'a mut DiagnosticEngine,
}

impl AstVisitor for SelfAssignVisitor<'_> {
    fn pre_stmt(&mut self, s: &Statement) -> PreAction<Statement> {
        if let Statement::Assign {
            target: Expression::Ident(a),
            value: Expression::Ident(b),
        } = s
        {
            if a == b {
                self.diagnostics.emit(
                    Diagnostic::new(
                        ErrorLevel::Warning,
                        "W0009",
                        format!("useless assignment of `{a}` to itself"),
                        Span::unknown(),
                    )
                    .with_help("remove this statement".to_string()),
                );
            }
        }
        PreAction::Descend
    }
}

pub fn check_self_assign(func: &Function, diagnostics: &mut DiagnosticEngine) {
    let mut visitor = SelfAssignVisitor { diagnostics };
    Walker::new(&mut visitor).walk_block(func.body.clone());
}

/// Code appearing after a statement that unconditionally terminates its
/// enclosing block (`return`, or `break`/`continue` inside a loop) is
/// unreachable. Simplification versus a full conjunction analysis: an
/// `if`/`switch` whose every branch terminates is not itself treated as a
/// terminator of the enclosing block, since that needs a per-block summary
/// value the walker's hooks don't hand back up to the parent statement.
struct UnreachableVisitor<'a> {
    diagnostics: &'a mut DiagnosticEngine,
    terminated_stack: Vec<bool>,
    reported_stack: Vec<bool>,
    loop_stack: Vec<bool>,
    pending_loop: bool,
}

impl AstVisitor for UnreachableVisitor<'_> {
    fn enter_block(&mut self) {
        let inherited_loop = self.pending_loop || *self.loop_stack.last().unwrap_or(&false);
        self.pending_loop = false;
        self.loop_stack.push(inherited_loop);
        self.terminated_stack.push(false);
        self.reported_stack.push(false);
    }

    fn exit_block(&mut self) {
        self.loop_stack.pop();
        self.terminated_stack.pop();
        self.reported_stack.pop();
    }

    fn pre_stmt(&mut self, s: &Statement) -> PreAction<Statement> {
        if *self.terminated_stack.last().unwrap_or(&false) {
            if let Some(reported) = self.reported_stack.last_mut() {
                if !*reported {
                    *reported = true;
                    self.diagnostics.emit(
                        Diagnostic::new(
                            ErrorLevel::Warning,
                            "W0007",
                            "unreachable code".to_string(),
                            Span::unknown(),
                        )
                        .with_help("remove this code or fix control flow".to_string()),
                    );
                }
            }
        }
        if matches!(s, Statement::For { .. } | Statement::While { .. } | Statement::ForIn { .. }) {
            self.pending_loop = true;
        }
        PreAction::Descend
    }

    fn post_stmt(&mut self, s: Statement) -> Option<Statement> {
        let in_loop = *self.loop_stack.last().unwrap_or(&false);
        let terminates = match &s {
            Statement::Return(_) => true,
            Statement::Break | Statement::Continue => in_loop,
            _ => false,
        };
        if terminates {
            if let Some(top) = self.terminated_stack.last_mut() {
                *top = true;
            }
        }
        Some(s)
    }
}

pub fn check_unreachable_after_return(func: &Function, diagnostics: &mut DiagnosticEngine) {
    let mut visitor = UnreachableVisitor {
        diagnostics,
        terminated_stack: Vec::new(),
        reported_stack: Vec::new(),
        loop_stack: Vec::new(),
        pending_loop: false,
    };
    Walker::new(&mut visitor).walk_block(func.body.clone());
}

/// References to a name whose declaration carries `@unavailable` are
/// diagnosed wherever they're used. `unavailable` maps a top-level name
/// to its attribute's optional replacement message.
struct AvailabilityVisitor<'a> {
    unavailable: &'a HashMap<String, Option<String>>,
    diagnostics: &'a mut DiagnosticEngine,
}

impl AstVisitor for AvailabilityVisitor<'_> {
    fn pre_expr(&mut self, e: &Expression) -> PreAction<Expression> {
        if let Expression::Ident(name) = e {
            if let Some(message) = self.unavailable.get(name) {
                let mut diag = Diagnostic::new(
                    ErrorLevel::Error,
                    "E2009",
                    format!("`{name}` is unavailable"),
                    Span::unknown(),
                );
                if let Some(m) = message {
                    diag = diag.with_note(m.clone());
                }
                self.diagnostics.emit(diag);
            }
        }
        PreAction::Descend
    }
}

pub fn check_availability(
    func: &Function,
    unavailable: &HashMap<String, Option<String>>,
    diagnostics: &mut DiagnosticEngine,
) {
    let mut visitor = AvailabilityVisitor { unavailable, diagnostics };
    Walker::new(&mut visitor).walk_block(func.body.clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use silc_ast::{Block, Function};

    fn func_with_body(statements: Vec<Statement>) -> Function {
        Function {
            is_async: false,
            is_gpu: false,
            is_mutable: false,
            receiver: None,
            name: "f".to_string(),
            type_params: vec![],
            where_clause: vec![],
            params: vec![],
            return_type: None,
            body: Block { statements },
            is_variadic: false,
            variadic_type: None,
        }
    }

    #[test]
    fn self_assignment_is_flagged() {
        let func = func_with_body(vec![Statement::Assign {
            target: Expression::Ident("x".to_string()),
            value: Expression::Ident("x".to_string()),
        }]);
        let mut diags = DiagnosticEngine::new();
        check_self_assign(&func, &mut diags);
        assert_eq!(diags.warning_count(), 1);
    }

    #[test]
    fn code_after_return_is_unreachable() {
        let func = func_with_body(vec![
            Statement::Return(None),
            Statement::Expression(Expression::IntLiteral(1)),
        ]);
        let mut diags = DiagnosticEngine::new();
        check_unreachable_after_return(&func, &mut diags);
        assert_eq!(diags.warning_count(), 1);
    }

    #[test]
    fn code_before_return_is_fine() {
        let func = func_with_body(vec![
            Statement::Expression(Expression::IntLiteral(1)),
            Statement::Return(None),
        ]);
        let mut diags = DiagnosticEngine::new();
        check_unreachable_after_return(&func, &mut diags);
        assert_eq!(diags.warning_count(), 0);
    }

    #[test]
    fn code_after_break_inside_a_loop_is_unreachable() {
        let func = func_with_body(vec![Statement::While {
            span_id: None,
            condition: Expression::BoolLiteral(true),
            body: Block {
                statements: vec![
                    Statement::Break,
                    Statement::Expression(Expression::IntLiteral(1)),
                ],
            },
        }]);
        let mut diags = DiagnosticEngine::new();
        check_unreachable_after_return(&func, &mut diags);
        assert_eq!(diags.warning_count(), 1);
    }

    #[test]
    fn reference_to_unavailable_name_is_rejected() {
        let func = func_with_body(vec![Statement::Expression(Expression::Ident("oldApi".to_string()))]);
        let mut unavailable = HashMap::new();
        unavailable.insert("oldApi".to_string(), Some("use newApi instead".to_string()));
        let mut diags = DiagnosticEngine::new();
        check_availability(&func, &unavailable, &mut diags);
        assert_eq!(diags.error_count(), 1);
    }
}
