//! Conditional branch factories.
//!
//! Both families produce `test ? consequent : alternative`; the alternative
//! is `void 0` when the surrounding expression uses the value and `false`
//! when it is discarded.

use crate::error::{Result, RewriteError};
use crate::guards::{self, GuardSubject};
use exq_ast::{NodeFactory, NodeIndex};

fn alternative<F: NodeFactory>(factory: &mut F, consumed: bool) -> NodeIndex {
    if consumed {
        factory.create_void_zero()
    } else {
        factory.create_boolean_literal(false)
    }
}

/// `exists(base) ? base : void 0`, or `exists(base) ? true : false` when the
/// result is discarded.
pub fn member_branch<F: NodeFactory>(
    factory: &mut F,
    subject: GuardSubject,
    consumed: bool,
) -> Result<NodeIndex> {
    let test = guards::exists_guard(factory, subject)?;
    let consequent = if consumed {
        let copy = factory.clone_node(subject.subject);
        if copy.is_none() {
            return Err(RewriteError::MissingNode(subject.subject));
        }
        copy
    } else {
        factory.create_boolean_literal(true)
    };
    let alternative = alternative(factory, consumed);
    Ok(factory.create_conditional(test, consequent, alternative))
}

/// `exists(base) && typeof base !== "function" ? base(args) : void 0`
///
/// `arguments` are adopted by the new call, not copied.
pub fn call_branch<F: NodeFactory>(
    factory: &mut F,
    subject: GuardSubject,
    arguments: Vec<NodeIndex>,
    consumed: bool,
) -> Result<NodeIndex> {
    let test = guards::exists_and_is_not_callable_guard(factory, subject)?;
    let callee = factory.clone_node(subject.subject);
    if callee.is_none() {
        return Err(RewriteError::MissingNode(subject.subject));
    }
    let consequent = factory.create_call(callee, arguments);
    let alternative = alternative(factory, consumed);
    Ok(factory.create_conditional(test, consequent, alternative))
}
