//! Per-record access rules applied after the role gate. The role gate answers
//! "may this role hit this operation"; these rules answer "may this actor
//! touch this particular row".

use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthActor;

pub enum RecordRule {
    /// Only the user who created the record may act on it.
    AuthorOnly { author: Uuid },
    /// The record belongs to an office; tenant-bound actors must match it.
    /// Actors without an office binding pass.
    SameOffice { office: Option<Uuid> },
}

impl RecordRule {
    pub fn check(&self, actor: &AuthActor) -> Result<(), ApiError> {
        match self {
            RecordRule::AuthorOnly { author } => {
                if actor.id == *author {
                    Ok(())
                } else {
                    Err(ApiError::forbidden(
                        "You do not have permission to access this resource.",
                    ))
                }
            }
            RecordRule::SameOffice { office } => match actor.office_id {
                None => Ok(()),
                Some(actor_office) if Some(actor_office) == *office => Ok(()),
                Some(_) => Err(ApiError::forbidden(
                    "You do not have permission to access this resource.",
                )),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn actor(id: Uuid, office_id: Option<Uuid>) -> AuthActor {
        AuthActor {
            id,
            role: Role::Officer,
            office_id,
        }
    }

    #[test]
    fn author_only_rejects_other_users() {
        let author = Uuid::new_v4();
        let rule = RecordRule::AuthorOnly { author };
        assert!(rule.check(&actor(author, None)).is_ok());
        assert!(rule.check(&actor(Uuid::new_v4(), None)).is_err());
    }

    #[test]
    fn same_office_binds_tenant_actors_only() {
        let office = Uuid::new_v4();
        let rule = RecordRule::SameOffice {
            office: Some(office),
        };
        assert!(rule.check(&actor(Uuid::new_v4(), None)).is_ok());
        assert!(rule.check(&actor(Uuid::new_v4(), Some(office))).is_ok());
        assert!(rule
            .check(&actor(Uuid::new_v4(), Some(Uuid::new_v4())))
            .is_err());
    }
}
