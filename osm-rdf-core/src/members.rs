//! Relation member encoding.
//!
//! Each member yields a membership statement and a role statement:
//!
//! ```text
//! osmrel:123  osmm:has    osmway:456
//! osmrel:123  osmway:456  "inner"
//! ```
//!
//! The first answers "all members of a relation", the second "role of a
//! member within the relation" without joining through an intermediate node.

use crate::vocab::HAS;
use crate::{Member, Statement, StatementKind};

/// Append two statements per member, in member order.
pub fn encode_members(members: &[Member], statements: &mut Vec<Statement>) {
    statements.reserve(members.len().saturating_mul(2));
    for member in members {
        let reference = member.kind.qualified_id(member.id);
        statements.push(Statement::new(StatementKind::Ref, HAS, reference.as_str()));
        statements.push(Statement::new(
            StatementKind::Str,
            reference,
            member.role.as_str(),
        ));
    }
}
