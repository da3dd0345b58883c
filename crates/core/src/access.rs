//! Access policy for course and lesson material.
//!
//! Permissions are expressed as a small boolean rule tree ([`Rule`])
//! evaluated against an explicit [`AccessContext`]. Evaluation is pure:
//! no storage access, no side effects. A deny means the caller must not
//! touch the entity store for this request.
//!
//! The policy table:
//!
//! | Action | Rule                               |
//! |--------|------------------------------------|
//! | Create | authenticated AND NOT moderator    |
//! | Read   | authenticated                      |
//! | Update | owner OR moderator                 |
//! | Delete | owner (moderators excluded)        |
//!
//! List endpoints additionally scope rows: moderators see everything,
//! everyone else sees only rows they own. That scoping lives in the
//! repository queries, not here.

use crate::error::CoreError;
use crate::groups::GROUP_MODERATORS;
use crate::types::DbId;

/// The operation an identity is attempting on a material entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

/// Everything a rule may inspect about the current request.
///
/// `owner_id` is `None` for collection-level actions (create, list) and
/// for entities whose owner was deleted (owner FK is SET NULL).
#[derive(Debug, Clone)]
pub struct AccessContext<'a> {
    /// The authenticated user's id.
    pub user_id: DbId,
    /// Group names the user belongs to (from JWT claims).
    pub groups: &'a [String],
    /// The target entity's owner, when acting on a specific entity.
    pub owner_id: Option<DbId>,
}

impl AccessContext<'_> {
    pub fn is_moderator(&self) -> bool {
        self.groups.iter().any(|g| g == GROUP_MODERATORS)
    }
}

/// A composable access rule.
///
/// Atoms are `Authenticated`, `Moderator`, and `Owner`; `Not`, `All`,
/// and `Any` compose them. `Authenticated` is trivially true here
/// (contexts are only built from authenticated requests) but is kept as
/// an explicit atom so policy definitions read as the full rule.
#[derive(Debug, Clone)]
pub enum Rule {
    Authenticated,
    Moderator,
    Owner,
    Not(Box<Rule>),
    All(Vec<Rule>),
    Any(Vec<Rule>),
}

impl Rule {
    /// Evaluate the rule tree against a context.
    pub fn evaluate(&self, ctx: &AccessContext<'_>) -> bool {
        match self {
            Rule::Authenticated => true,
            Rule::Moderator => ctx.is_moderator(),
            Rule::Owner => ctx.owner_id == Some(ctx.user_id),
            Rule::Not(inner) => !inner.evaluate(ctx),
            Rule::All(rules) => rules.iter().all(|r| r.evaluate(ctx)),
            Rule::Any(rules) => rules.iter().any(|r| r.evaluate(ctx)),
        }
    }
}

/// The rule governing `action` on course/lesson material.
pub fn material_rule(action: Action) -> Rule {
    match action {
        Action::Create => Rule::All(vec![
            Rule::Authenticated,
            Rule::Not(Box::new(Rule::Moderator)),
        ]),
        Action::Read => Rule::Authenticated,
        Action::Update => Rule::Any(vec![Rule::Owner, Rule::Moderator]),
        Action::Delete => Rule::Owner,
    }
}

/// Check `action` against the context, returning `Forbidden` on deny.
pub fn check_material(action: Action, ctx: &AccessContext<'_>) -> Result<(), CoreError> {
    if material_rule(action).evaluate(ctx) {
        Ok(())
    } else {
        let what = match action {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        };
        Err(CoreError::Forbidden(format!(
            "You do not have permission to {what} this resource"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(user_id: DbId, groups: &'a [String], owner_id: Option<DbId>) -> AccessContext<'a> {
        AccessContext {
            user_id,
            groups,
            owner_id,
        }
    }

    fn moderator_groups() -> Vec<String> {
        vec![GROUP_MODERATORS.to_string()]
    }

    #[test]
    fn owner_may_do_everything_on_own_entity() {
        let groups = vec![];
        let c = ctx(1, &groups, Some(1));
        for action in [Action::Read, Action::Update, Action::Delete] {
            assert!(check_material(action, &c).is_ok(), "{action:?} should be allowed");
        }
    }

    #[test]
    fn regular_user_may_create() {
        let groups = vec![];
        let c = ctx(1, &groups, None);
        assert!(check_material(Action::Create, &c).is_ok());
    }

    #[test]
    fn moderator_may_not_create() {
        let groups = moderator_groups();
        let c = ctx(1, &groups, None);
        let err = check_material(Action::Create, &c).unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }

    #[test]
    fn moderator_may_read_and_update_foreign_entity() {
        let groups = moderator_groups();
        let c = ctx(2, &groups, Some(1));
        assert!(check_material(Action::Read, &c).is_ok());
        assert!(check_material(Action::Update, &c).is_ok());
    }

    #[test]
    fn moderator_may_not_delete_foreign_entity() {
        let groups = moderator_groups();
        let c = ctx(2, &groups, Some(1));
        assert!(matches!(
            check_material(Action::Delete, &c),
            Err(CoreError::Forbidden(_))
        ));
    }

    #[test]
    fn non_owner_may_not_update_or_delete() {
        let groups = vec![];
        let c = ctx(2, &groups, Some(1));
        assert!(check_material(Action::Update, &c).is_err());
        assert!(check_material(Action::Delete, &c).is_err());
    }

    #[test]
    fn orphaned_entity_has_no_owner_rights() {
        // Owner FK was nulled on user deletion: nobody owns it anymore.
        let groups = vec![];
        let c = ctx(2, &groups, None);
        assert!(check_material(Action::Delete, &c).is_err());
    }

    #[test]
    fn rule_combinators_compose() {
        let groups = moderator_groups();
        let c = ctx(5, &groups, Some(9));

        // NOT(moderator) is false for a moderator.
        assert!(!Rule::Not(Box::new(Rule::Moderator)).evaluate(&c));

        // ANY(owner, moderator) is true via the moderator arm.
        assert!(Rule::Any(vec![Rule::Owner, Rule::Moderator]).evaluate(&c));

        // ALL(authenticated, owner) is false: not the owner.
        assert!(!Rule::All(vec![Rule::Authenticated, Rule::Owner]).evaluate(&c));
    }
}
