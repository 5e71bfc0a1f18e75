use crate::entity::user::Role;

/// Result of a successful login
///
/// `entity_id` is the learner/instructor profile id, `0` for administrator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user_id: i32,
    pub entity_id: i32,
    pub role: Role,
    pub email: String,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
