//! Ownership guard - the single authorization rule for recipe mutation.
//!
//! Every mutating path goes through [`require_owner`], so the rule is
//! enforced once and cannot be forgotten on a new mutation path. The
//! check is a pure value comparison; it never mutates anything.

use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// A resource with a recorded owner
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

impl Owned for super::recipe::Recipe {
    fn owner_id(&self) -> Uuid {
        self.owner.id
    }
}

/// Pass only when the acting identity owns the resource. Any mismatch is
/// `Forbidden`, never a silent no-op.
pub fn require_owner(acting_user_id: Uuid, resource: &impl Owned) -> AppResult<()> {
    if resource.owner_id() == acting_user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Note {
        owner: Uuid,
    }

    impl Owned for Note {
        fn owner_id(&self) -> Uuid {
            self.owner
        }
    }

    #[test]
    fn test_owner_passes() {
        let owner = Uuid::new_v4();
        let note = Note { owner };
        assert!(require_owner(owner, &note).is_ok());
    }

    #[test]
    fn test_non_owner_is_forbidden() {
        let note = Note {
            owner: Uuid::new_v4(),
        };
        let result = require_owner(Uuid::new_v4(), &note);
        assert!(matches!(result.unwrap_err(), AppError::Forbidden));
    }
}
