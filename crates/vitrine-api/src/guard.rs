use vitrine_types::models::Role;

use crate::error::ApiError;
use crate::session::{Caller, CurrentUser};

/// The remote operations this service exposes, as subjects of authorization
/// decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ContactSubmit,
    NewsList,
    NewsGet,
    NewsCreate,
    NewsUpdate,
    NewsDelete,
    NewsListAll,
}

impl Operation {
    fn requires_admin(self) -> bool {
        matches!(
            self,
            Operation::NewsCreate
                | Operation::NewsUpdate
                | Operation::NewsDelete
                | Operation::NewsListAll
        )
    }
}

/// Two tiers only: public operations are open to everyone including anonymous
/// callers; privileged operations require an authenticated admin.
pub fn is_permitted(operation: Operation, caller: &Caller) -> bool {
    if !operation.requires_admin() {
        return true;
    }
    matches!(caller.user(), Some(user) if user.role == Role::Admin)
}

/// Turn a guard decision into a workflow result. The denial carries no
/// detail about the resource.
pub fn ensure_permitted(operation: Operation, caller: &Caller) -> Result<(), ApiError> {
    if is_permitted(operation, caller) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Gate for privileged operations. Hands back the acting admin so workflows
/// can record authorship.
pub fn require_admin(operation: Operation, caller: &Caller) -> Result<&CurrentUser, ApiError> {
    ensure_permitted(operation, caller)?;
    caller.user().ok_or(ApiError::Forbidden)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller_with_role(role: Role) -> Caller {
        Caller::authenticated(CurrentUser {
            id: 1,
            username: "someone".into(),
            role,
        })
    }

    #[test]
    fn public_operations_allow_anonymous() {
        for op in [Operation::ContactSubmit, Operation::NewsList, Operation::NewsGet] {
            assert!(is_permitted(op, &Caller::anonymous()));
            assert!(is_permitted(op, &caller_with_role(Role::User)));
        }
    }

    #[test]
    fn privileged_operations_require_admin() {
        for op in [
            Operation::NewsCreate,
            Operation::NewsUpdate,
            Operation::NewsDelete,
            Operation::NewsListAll,
        ] {
            assert!(!is_permitted(op, &Caller::anonymous()));
            assert!(!is_permitted(op, &caller_with_role(Role::User)));
            assert!(is_permitted(op, &caller_with_role(Role::Admin)));
        }
    }

    #[test]
    fn require_admin_returns_the_acting_admin() {
        let caller = caller_with_role(Role::Admin);
        let admin = require_admin(Operation::NewsCreate, &caller).unwrap();
        assert_eq!(admin.id, 1);

        assert!(matches!(
            require_admin(Operation::NewsCreate, &Caller::anonymous()),
            Err(ApiError::Forbidden)
        ));
    }
}
