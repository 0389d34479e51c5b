//! Shared domain enums, stored as TEXT columns

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use utoipa::ToSchema;

/// Declares a closed set of lowercase text values with serde, `FromStr`
/// and sqlx TEXT conversions.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!(
                        "'{}' is not a valid {} (expected one of: {})",
                        other,
                        stringify!($name),
                        [$($text),+].join(", ")
                    )),
                }
            }
        }

        impl sqlx::Type<Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<Postgres>>::compatible(ty)
            }
        }

        impl<'r> Decode<'r, Postgres> for $name {
            fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let s: &str = Decode::<Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $name {
            fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
                <&str as Encode<Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }
    };
}

text_enum! {
    /// Role resolved from the identity provider token
    UserRole {
        Donor => "donor",
        School => "school",
        Admin => "admin",
    }
}

text_enum! {
    /// Equipment type declared by a donor
    DonationComputerType {
        Desktop => "desktop",
        Laptop => "laptop",
        Tablet => "tablet",
        Mixed => "mixed",
    }
}

text_enum! {
    /// Condition declared by a donor
    DonationCondition {
        Working => "working",
        NeedsRepair => "needs-repair",
        NotWorking => "not-working",
        Mixed => "mixed",
    }
}

text_enum! {
    DonationStatus {
        Pending => "pending",
        Approved => "approved",
        Collected => "collected",
        Processing => "processing",
        Delivered => "delivered",
        Rejected => "rejected",
    }
}

text_enum! {
    /// Equipment type asked for by a school
    RequestComputerType {
        Desktop => "desktop",
        Laptop => "laptop",
        Tablet => "tablet",
        Any => "any",
    }
}

text_enum! {
    RequestStatus {
        Pending => "pending",
        Approved => "approved",
        Fulfilled => "fulfilled",
        Rejected => "rejected",
    }
}

text_enum! {
    /// Type of a single inventory unit (never "mixed")
    InventoryComputerType {
        Desktop => "desktop",
        Laptop => "laptop",
        Tablet => "tablet",
    }
}

text_enum! {
    /// Condition of a unit when it arrived
    ReceivedCondition {
        Working => "working",
        NeedsRepair => "needs-repair",
        NotWorking => "not-working",
    }
}

text_enum! {
    /// Condition of a unit after refurbishment
    RefurbishedCondition {
        Excellent => "excellent",
        Good => "good",
        Fair => "fair",
        Unusable => "unusable",
    }
}

text_enum! {
    InventoryStatus {
        Received => "received",
        InRefurbishment => "in-refurbishment",
        Ready => "ready",
        Delivered => "delivered",
        Unusable => "unusable",
    }
}

text_enum! {
    ContactStatus {
        Unread => "unread",
        Read => "read",
        Replied => "replied",
    }
}

text_enum! {
    SchoolLevel {
        Primary => "primary",
        Secondary => "secondary",
        Tertiary => "tertiary",
    }
}

text_enum! {
    SchoolStatus {
        Active => "active",
        Inactive => "inactive",
    }
}
