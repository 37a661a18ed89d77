use serde::{Deserialize, Serialize};

/// Organizational roles. Route allow-lists are expressed in terms of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    DatabaseAdmin,
    SystemAdmin,
    Head,
    Hr,
    Finance,
    Reception,
    LandBank,
    Officer,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Inactive,
    Deactivated,
    Blocked,
}

impl UserStatus {
    /// Disabled accounts fail authentication regardless of credential validity.
    pub fn blocks_authentication(self) -> bool {
        matches!(self, UserStatus::Deactivated | UserStatus::Blocked)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfficeType {
    MainOffice,
    SubCity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LandStatus {
    Active,
    Restricted,
    Disputed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OwnershipType {
    Private,
    Government,
    Organization,
    Cooperative,
    JointOwnership,
    Community,
    Trust,
    NotAssigned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeStatus {
    Active,
    Inactive,
    Suspended,
    Terminated,
    OnLeave,
    Retired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn can_approve(self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Rejected)
    }

    pub fn can_complete(self) -> bool {
        self == AppointmentStatus::Approved
    }

    pub fn can_reject(self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Approved)
    }

    pub fn can_cancel(self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Approved)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackStatus {
    Pending,
    Resolved,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnnouncementStatus {
    Draft,
    Published,
    Archived,
}

macro_rules! enum_as_str {
    ($ty:ty { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            /// Wire/database representation, used when binding filter params.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(<$ty>::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

enum_as_str!(Role {
    DatabaseAdmin => "DATABASE_ADMIN",
    SystemAdmin => "SYSTEM_ADMIN",
    Head => "HEAD",
    Hr => "HR",
    Finance => "FINANCE",
    Reception => "RECEPTION",
    LandBank => "LAND_BANK",
    Officer => "OFFICER",
    Other => "OTHER",
});

enum_as_str!(UserStatus {
    Active => "ACTIVE",
    Inactive => "INACTIVE",
    Deactivated => "DEACTIVATED",
    Blocked => "BLOCKED",
});

enum_as_str!(OfficeType {
    MainOffice => "MAIN_OFFICE",
    SubCity => "SUB_CITY",
});

enum_as_str!(Gender {
    Male => "MALE",
    Female => "FEMALE",
});

enum_as_str!(LandStatus {
    Active => "ACTIVE",
    Restricted => "RESTRICTED",
    Disputed => "DISPUTED",
});

enum_as_str!(OwnershipType {
    Private => "PRIVATE",
    Government => "GOVERNMENT",
    Organization => "ORGANIZATION",
    Cooperative => "COOPERATIVE",
    JointOwnership => "JOINT_OWNERSHIP",
    Community => "COMMUNITY",
    Trust => "TRUST",
    NotAssigned => "NOT_ASSIGNED",
});

enum_as_str!(EmployeeStatus {
    Active => "ACTIVE",
    Inactive => "INACTIVE",
    Suspended => "SUSPENDED",
    Terminated => "TERMINATED",
    OnLeave => "ON_LEAVE",
    Retired => "RETIRED",
});

enum_as_str!(AppointmentStatus {
    Pending => "PENDING",
    Approved => "APPROVED",
    Rejected => "REJECTED",
    Completed => "COMPLETED",
    Cancelled => "CANCELLED",
});

enum_as_str!(FeedbackStatus {
    Pending => "PENDING",
    Resolved => "RESOLVED",
    Archived => "ARCHIVED",
});

enum_as_str!(AnnouncementStatus {
    Draft => "DRAFT",
    Published => "PUBLISHED",
    Archived => "ARCHIVED",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_representation_matches_as_str() {
        let json = serde_json::to_value(Role::LandBank).unwrap();
        assert_eq!(json, "LAND_BANK");
        assert_eq!(Role::LandBank.as_str(), "LAND_BANK");

        let parsed: EmployeeStatus = serde_json::from_str("\"ON_LEAVE\"").unwrap();
        assert_eq!(parsed, EmployeeStatus::OnLeave);
    }

    #[test]
    fn disabled_statuses_block_authentication() {
        assert!(UserStatus::Deactivated.blocks_authentication());
        assert!(UserStatus::Blocked.blocks_authentication());
        assert!(!UserStatus::Active.blocks_authentication());
        assert!(!UserStatus::Inactive.blocks_authentication());
    }

    #[test]
    fn appointment_transitions() {
        assert!(AppointmentStatus::Pending.can_approve());
        assert!(AppointmentStatus::Rejected.can_approve());
        assert!(!AppointmentStatus::Completed.can_approve());

        assert!(AppointmentStatus::Approved.can_complete());
        assert!(!AppointmentStatus::Pending.can_complete());
        assert!(!AppointmentStatus::Rejected.can_complete());

        assert!(AppointmentStatus::Pending.can_reject());
        assert!(AppointmentStatus::Approved.can_reject());
        assert!(!AppointmentStatus::Cancelled.can_reject());
    }
}
